use std::cell::Cell;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::MeshError;
use crate::pointcloud::{Aabb, ColoredPoint};

/// A mesh vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// The vertex position.
    pub position: DVec3,
    /// The vertex normal, zero when not computed.
    pub normal: DVec3,
    /// The vertex color, each channel in `[0, 1]`.
    pub color: DVec3,
    /// The texture coordinate.
    pub uv: DVec2,
}

impl Vertex {
    /// Create a vertex at `position` with the given color and no normal.
    pub fn new(position: DVec3, color: DVec3) -> Self {
        Self {
            position,
            normal: DVec3::ZERO,
            color,
            uv: DVec2::ZERO,
        }
    }
}

impl From<&ColoredPoint> for Vertex {
    fn from(point: &ColoredPoint) -> Self {
        Self {
            position: point.position,
            normal: point.normal,
            color: point.color,
            uv: DVec2::ZERO,
        }
    }
}

/// An indexed triangle mesh.
///
/// Every consecutive triple of `indices` forms one triangle and every index is
/// smaller than the number of vertices. The bounding box is computed on demand
/// and cached until the next mutable access to the vertices or indices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    #[serde(skip)]
    bounds: Cell<Option<Aabb>>,
}

impl Mesh {
    /// Create a mesh from vertices and a flat triangle index buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the index count is not a multiple of 3 or an index
    /// is out of bounds.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(MeshError::IndexOutOfBounds {
                index,
                num_vertices: vertices.len(),
            });
        }
        Ok(Self {
            vertices,
            indices,
            bounds: Cell::new(None),
        })
    }

    /// Create an empty mesh with room for the given number of vertices and triangles.
    pub fn with_capacity(num_vertices: usize, num_triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            indices: Vec::with_capacity(num_triangles * 3),
            bounds: Cell::new(None),
        }
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        self.bounds.set(None);
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as u32
    }

    /// Append a triangle.
    ///
    /// PRECONDITION: every index refers to an existing vertex.
    pub fn push_triangle(&mut self, triangle: [u32; 3]) {
        assert!(
            triangle.iter().all(|&i| (i as usize) < self.vertices.len()),
            "triangle {triangle:?} references a missing vertex"
        );
        self.indices.extend_from_slice(&triangle);
    }

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Get as reference the vertices.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Get as reference the flat index buffer.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Iterate over the triangles of the mesh.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Get mutable access to the vertices. Invalidates the cached bounds.
    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        self.bounds.set(None);
        &mut self.vertices
    }

    /// Get mutable access to the index buffer. Invalidates the cached bounds.
    ///
    /// The caller must keep every index in range and the length a multiple of 3.
    pub fn indices_mut(&mut self) -> &mut Vec<u32> {
        self.bounds.set(None);
        &mut self.indices
    }

    /// Replace the index buffer.
    ///
    /// # Errors
    ///
    /// Returns an error and leaves the mesh untouched if the new indices break
    /// the mesh invariants.
    pub fn set_indices(&mut self, indices: Vec<u32>) -> Result<(), MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= self.vertices.len()) {
            return Err(MeshError::IndexOutOfBounds {
                index,
                num_vertices: self.vertices.len(),
            });
        }
        self.bounds.set(None);
        self.indices = indices;
        Ok(())
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, index: u32) -> DVec3 {
        self.vertices[index as usize].position
    }

    /// Get the bounding box of the vertices, `None` if there are none.
    pub fn bounding_box(&self) -> Option<Aabb> {
        if let Some(bounds) = self.bounds.get() {
            return Some(bounds);
        }
        let bounds = Aabb::from_points(self.vertices.iter().map(|v| v.position));
        self.bounds.set(bounds);
        bounds
    }

    /// Drop the cached derived attributes.
    pub fn invalidate_cache(&mut self) {
        self.bounds.set(None);
    }

    /// Consume the mesh and return its vertices and indices.
    pub fn into_parts(self) -> (Vec<Vertex>, Vec<u32>) {
        (self.vertices, self.indices)
    }
}
