use std::collections::{HashMap, HashSet};

use glam::DVec3;
use scanmesh_3d::Mesh;

use crate::normals::recompute_normals;

/// Find the edges used by exactly one triangle.
///
/// Edges are compared undirected. Each boundary edge is returned with the
/// direction it has in its triangle, in order of first appearance.
pub fn boundary_edges(mesh: &Mesh) -> Vec<[u32; 2]> {
    let mut counts: HashMap<(u32, u32), usize> = HashMap::new();
    let mut edges: Vec<[u32; 2]> = Vec::new();

    for [a, b, c] in mesh.triangles() {
        for (v0, v1) in [(a, b), (b, c), (c, a)] {
            let key = (v0.min(v1), v0.max(v1));
            let count = counts.entry(key).or_insert(0);
            if *count == 0 {
                edges.push([v0, v1]);
            }
            *count += 1;
        }
    }

    edges.retain(|&[v0, v1]| counts.get(&(v0.min(v1), v0.max(v1))) == Some(&1));
    edges
}

/// Group the boundary edges of a mesh into closed loops.
///
/// Each loop lists its vertices following the direction of the boundary edges.
/// Open chains, which only appear on non-manifold input, are dropped.
pub fn boundary_loops(mesh: &Mesh) -> Vec<Vec<u32>> {
    let edges = boundary_edges(mesh);

    let mut outgoing: HashMap<u32, Vec<usize>> = HashMap::new();
    for (i, &[v0, _]) in edges.iter().enumerate() {
        outgoing.entry(v0).or_default().push(i);
    }

    let mut visited = vec![false; edges.len()];
    let mut loops = Vec::new();

    for start in 0..edges.len() {
        if visited[start] {
            continue;
        }
        let first = edges[start][0];
        let mut current = start;
        let mut vertices = Vec::new();
        let mut closed = false;

        loop {
            visited[current] = true;
            let [v0, v1] = edges[current];
            vertices.push(v0);
            if v1 == first {
                closed = true;
                break;
            }
            let next = outgoing
                .get(&v1)
                .and_then(|candidates| candidates.iter().copied().find(|&e| !visited[e]));
            match next {
                Some(e) => current = e,
                None => break,
            }
        }

        if closed && vertices.len() >= 3 {
            loops.push(vertices);
        } else {
            log::debug!("dropping open boundary chain of {} edges", vertices.len());
        }
    }

    loops
}

/// Triangulate a boundary loop by ear clipping.
///
/// The loop is projected on its best-fit plane (Newell normal). The returned
/// triangles wind opposite to the loop so that they agree with the faces
/// around the hole. If no ear can be found, the remaining polygon is fanned.
///
/// # Arguments
///
/// * `mesh` - The mesh owning the loop vertices.
/// * `boundary` - The loop vertex indices, as returned by [`boundary_loops`].
///
/// # Returns
///
/// A flat list of triangle indices covering the loop.
pub fn triangulate_loop(mesh: &Mesh, boundary: &[u32]) -> Vec<u32> {
    if boundary.len() < 3 {
        return Vec::new();
    }

    let mut polygon = boundary.iter().rev().copied().collect::<Vec<_>>();
    let normal = newell_normal(mesh, &polygon);
    let mut triangles = Vec::with_capacity((polygon.len() - 2) * 3);

    if normal == DVec3::ZERO {
        fan(&polygon, &mut triangles);
        return triangles;
    }

    while polygon.len() > 3 {
        let n = polygon.len();
        let ear = (0..n).find(|&i| {
            let prev = polygon[(i + n - 1) % n];
            let cur = polygon[i];
            let next = polygon[(i + 1) % n];
            is_ear(mesh, &polygon, [prev, cur, next], normal)
        });

        match ear {
            Some(i) => {
                let prev = polygon[(i + n - 1) % n];
                let next = polygon[(i + 1) % n];
                triangles.extend_from_slice(&[prev, polygon[i], next]);
                polygon.remove(i);
            }
            None => {
                log::debug!("no ear left in a {n}-gon, falling back to a fan");
                break;
            }
        }
    }

    fan(&polygon, &mut triangles);
    triangles
}

/// Fill every boundary loop of at most `max_loop_len` vertices.
///
/// A loop whose patch would repeat an existing face is skipped. This is the
/// case for the border of an isolated triangle, where the patch would be the
/// same triangle with its winding flipped. Normals are recomputed when at
/// least one hole was filled.
///
/// # Returns
///
/// The number of filled holes.
pub fn fill_holes(mesh: &mut Mesh, max_loop_len: usize) -> usize {
    let loops = boundary_loops(mesh);

    let mut faces = mesh.triangles().map(face_key).collect::<HashSet<_>>();
    let mut patches = Vec::new();
    let mut filled = 0;
    for boundary in loops.iter().filter(|l| l.len() <= max_loop_len) {
        let triangles = triangulate_loop(mesh, boundary);
        let keys = triangles
            .chunks_exact(3)
            .map(|t| face_key([t[0], t[1], t[2]]))
            .collect::<Vec<_>>();
        if keys.is_empty() || keys.iter().any(|k| faces.contains(k)) {
            continue;
        }
        faces.extend(keys);
        patches.extend(triangles);
        filled += 1;
    }

    if filled > 0 {
        mesh.indices_mut().extend(patches);
        recompute_normals(mesh);
    }

    log::debug!("filled {filled} of {} holes", loops.len());

    filled
}

/// Vertex set of a triangle, independent of winding.
fn face_key(mut triangle: [u32; 3]) -> [u32; 3] {
    triangle.sort_unstable();
    triangle
}

fn newell_normal(mesh: &Mesh, polygon: &[u32]) -> DVec3 {
    let n = polygon.len();
    (0..n).fold(DVec3::ZERO, |acc, i| {
        acc + mesh
            .position(polygon[i])
            .cross(mesh.position(polygon[(i + 1) % n]))
    })
}

fn is_ear(mesh: &Mesh, polygon: &[u32], [prev, cur, next]: [u32; 3], normal: DVec3) -> bool {
    let (a, b, c) = (mesh.position(prev), mesh.position(cur), mesh.position(next));

    // reflex or collinear corners are never ears
    if (b - a).cross(c - b).dot(normal) <= 0.0 {
        return false;
    }

    polygon
        .iter()
        .filter(|&&v| v != prev && v != cur && v != next)
        .all(|&v| !inside_triangle(mesh.position(v), [a, b, c], normal))
}

fn inside_triangle(p: DVec3, [a, b, c]: [DVec3; 3], normal: DVec3) -> bool {
    [(a, b), (b, c), (c, a)]
        .iter()
        .all(|&(e0, e1)| (e1 - e0).cross(p - e0).dot(normal) >= 0.0)
}

fn fan(polygon: &[u32], triangles: &mut Vec<u32>) {
    for i in 1..polygon.len().saturating_sub(1) {
        triangles.extend_from_slice(&[polygon[0], polygon[i], polygon[i + 1]]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normals::face_normal;
    use approx::assert_relative_eq;
    use scanmesh_3d::Vertex;

    const CORNERS: [[f64; 3]; 8] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ];

    /// Unit cube sharing its corners, without the +z face.
    fn open_box() -> Mesh {
        let vertices = CORNERS
            .iter()
            .map(|c| Vertex::new(DVec3::from_array(*c), DVec3::ONE))
            .collect();
        let indices = vec![
            0, 2, 1, 0, 3, 2, // -z
            0, 1, 5, 0, 5, 4, // -y
            3, 7, 6, 3, 6, 2, // +y
            0, 4, 7, 0, 7, 3, // -x
            1, 2, 6, 1, 6, 5, // +x
        ];
        Mesh::new(vertices, indices).unwrap()
    }

    #[test]
    fn test_boundary_edges_single_triangle() {
        let vertices = vec![Vertex::new(DVec3::ZERO, DVec3::ONE); 3];
        let mesh = Mesh::new(vertices, vec![0, 1, 2]).unwrap();
        assert_eq!(boundary_edges(&mesh), vec![[0, 1], [1, 2], [2, 0]]);
    }

    #[test]
    fn test_boundary_edges_shared_edge() {
        let vertices = vec![Vertex::new(DVec3::ZERO, DVec3::ONE); 4];
        let mesh = Mesh::new(vertices, vec![0, 1, 2, 0, 2, 3]).unwrap();
        // edge 0-2 appears twice (once in each direction)
        assert_eq!(
            boundary_edges(&mesh),
            vec![[0, 1], [1, 2], [2, 3], [3, 0]]
        );
    }

    #[test]
    fn test_boundary_loops_open_box() {
        let mesh = open_box();
        let loops = boundary_loops(&mesh);
        assert_eq!(loops.len(), 1);

        let mut top = loops[0].clone();
        top.sort_unstable();
        assert_eq!(top, vec![4, 5, 6, 7]);
    }

    #[test]
    fn test_fill_holes_closes_box() {
        let mut mesh = open_box();
        assert_eq!(fill_holes(&mut mesh, 10), 1);
        assert_eq!(mesh.num_triangles(), 12);
        assert!(boundary_edges(&mesh).is_empty());

        // the patch faces outwards like the rest of the box
        for [a, b, c] in mesh.triangles().skip(10) {
            let n = face_normal(mesh.position(a), mesh.position(b), mesh.position(c));
            assert!(n.z > 0.0);
        }
    }

    #[test]
    fn test_fill_holes_respects_max_len() {
        let mut mesh = open_box();
        assert_eq!(fill_holes(&mut mesh, 3), 0);
        assert_eq!(mesh.num_triangles(), 10);
    }

    #[test]
    fn test_fill_holes_skips_isolated_triangles() {
        use crate::triangulate::greedy_triangulation;
        use scanmesh_3d::ColoredPoint;

        let mut points = Vec::new();
        for i in 0..6 {
            for j in 0..6 {
                let position = DVec3::new(i as f64 * 0.1, j as f64 * 0.1, 0.0);
                points.push(ColoredPoint::new(position, DVec3::ONE));
            }
        }
        let mut mesh = greedy_triangulation(&points, 0.15);
        let triangles = mesh.num_triangles();
        assert!(triangles > 0);
        assert_eq!(boundary_loops(&mesh).len(), triangles);

        assert_eq!(fill_holes(&mut mesh, 6), 0);
        assert_eq!(mesh.num_triangles(), triangles);
        for [a, b, c] in mesh.triangles() {
            for v in [a, b, c] {
                let normal = mesh.vertices()[v as usize].normal;
                assert_relative_eq!(normal.length(), 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_triangulate_concave_loop() {
        // L-shaped polygon of area 3
        let outline = [
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 1.0],
            [1.0, 1.0],
            [1.0, 2.0],
            [0.0, 2.0],
        ];
        let mut mesh = Mesh::default();
        for [x, y] in outline {
            mesh.push_vertex(Vertex::new(DVec3::new(x, y, 0.0), DVec3::ONE));
        }
        let boundary = (0..6).collect::<Vec<u32>>();
        let triangles = triangulate_loop(&mesh, &boundary);
        assert_eq!(triangles.len(), 4 * 3);

        let mut area = 0.0;
        for t in triangles.chunks_exact(3) {
            let n = face_normal(mesh.position(t[0]), mesh.position(t[1]), mesh.position(t[2]));
            // opposite winding to the counter-clockwise loop
            assert!(n.z < 0.0);
            area += n.length() * 0.5;
        }
        assert_relative_eq!(area, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_triangulate_degenerate_loops() {
        let mut mesh = Mesh::default();
        for _ in 0..3 {
            mesh.push_vertex(Vertex::new(DVec3::ZERO, DVec3::ONE));
        }
        assert!(triangulate_loop(&mesh, &[0, 1]).is_empty());
        // zero-area loop still gets covered by a fan
        assert_eq!(triangulate_loop(&mesh, &[0, 1, 2]), vec![2, 1, 0]);
    }
}
