use glam::DVec3;
use scanmesh_3d::{ops::normalize_or_keep, Mesh};

/// Compute the area-weighted face normal of a triangle (not normalized).
#[inline]
pub fn face_normal(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    (b - a).cross(c - a)
}

/// Recompute the per-vertex normals of a mesh.
///
/// The unnormalized cross product of every face is added to its three vertices,
/// then each accumulated normal is normalized. Vertices not referenced by any
/// triangle end up with a zero normal. Other vertex attributes are untouched.
pub fn recompute_normals(mesh: &mut Mesh) {
    let mut accumulated = vec![DVec3::ZERO; mesh.num_vertices()];
    for [a, b, c] in mesh.triangles() {
        let n = face_normal(mesh.position(a), mesh.position(b), mesh.position(c));
        accumulated[a as usize] += n;
        accumulated[b as usize] += n;
        accumulated[c as usize] += n;
    }

    for (vertex, normal) in mesh.vertices_mut().iter_mut().zip(accumulated) {
        vertex.normal = normalize_or_keep(normal);
    }
}
