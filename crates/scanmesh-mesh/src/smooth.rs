use glam::DVec3;
use scanmesh_3d::Mesh;

use crate::normals::recompute_normals;

/// Smooth a mesh in place by moving every vertex towards its neighbors.
///
/// For each iteration, every vertex accumulates the positions of the vertices
/// it shares a triangle edge with, once per triangle, and is interpolated
/// towards their average by `lambda`. Vertices without incident triangles are
/// left in place. Normals are recomputed at the end.
///
/// # Arguments
///
/// * `mesh` - The mesh to smooth.
/// * `iterations` - The number of smoothing passes.
/// * `lambda` - The interpolation factor.
pub fn smooth_mesh_laplacian(mesh: &mut Mesh, iterations: usize, lambda: f64) {
    let num_vertices = mesh.num_vertices();

    for i in 0..iterations {
        let mut sums = vec![DVec3::ZERO; num_vertices];
        let mut counts = vec![0usize; num_vertices];

        for [a, b, c] in mesh.triangles() {
            let (pa, pb, pc) = (mesh.position(a), mesh.position(b), mesh.position(c));
            let (a, b, c) = (a as usize, b as usize, c as usize);
            sums[a] += pb + pc;
            sums[b] += pc + pa;
            sums[c] += pa + pb;
            counts[a] += 2;
            counts[b] += 2;
            counts[c] += 2;
        }

        for (v, (sum, count)) in mesh
            .vertices_mut()
            .iter_mut()
            .zip(sums.into_iter().zip(counts))
        {
            if count == 0 {
                continue;
            }
            let average = sum / count as f64;
            v.position = v.position.lerp(average, lambda);
        }

        log::trace!("mesh smoothing iteration {i} done");
    }

    recompute_normals(mesh);
}
