use scanmesh_3d::Mesh;

use crate::normals::recompute_normals;

/// Simplification stops once fewer indices than this remain.
const MIN_INDICES: usize = 6;

/// Find the globally shortest triangle edge, keeping the first one on ties.
fn shortest_edge(mesh: &Mesh) -> Option<(u32, u32)> {
    let mut best: Option<((u32, u32), f64)> = None;
    for [a, b, c] in mesh.triangles() {
        for (v0, v1) in [(a, b), (b, c), (c, a)] {
            let length = mesh.position(v0).distance(mesh.position(v1));
            match best {
                Some((_, l)) if l <= length => {}
                _ => best = Some(((v0, v1), length)),
            }
        }
    }
    best.map(|(edge, _)| edge)
}

/// Collapse the edge `(keep, remove)` into `keep`, placed at the edge midpoint.
///
/// Triangles referencing both endpoints are deleted and every remaining
/// reference to `remove` is redirected to `keep`.
fn collapse_edge(mesh: &mut Mesh, keep: u32, remove: u32) {
    let midpoint = (mesh.position(keep) + mesh.position(remove)) * 0.5;
    mesh.vertices_mut()[keep as usize].position = midpoint;

    let indices = mesh.indices_mut();
    let collapsed = indices
        .chunks_exact(3)
        .filter(|t| !(t.contains(&keep) && t.contains(&remove)))
        .flat_map(|t| t.iter().map(|&i| if i == remove { keep } else { i }))
        .collect::<Vec<_>>();
    *indices = collapsed;
}

/// Reduce the triangle count of a mesh in place by collapsing shortest edges.
///
/// The target triangle count is `num_triangles * (1 - target_reduction)`,
/// truncated. While the mesh has more triangles than the target and at least
/// two triangles remain, the globally shortest edge is collapsed into its first
/// endpoint. The bounding box and normals are refreshed at the end.
///
/// # Arguments
///
/// * `mesh` - The mesh to simplify.
/// * `target_reduction` - The fraction of triangles to remove, in `[0, 1]`.
///
/// # Returns
///
/// The number of collapsed edges.
pub fn simplify_edge_collapse(mesh: &mut Mesh, target_reduction: f64) -> usize {
    let initial = mesh.num_triangles();
    let target = (initial as f64 * (1.0 - target_reduction)) as usize;

    let mut collapses = 0;
    while mesh.num_triangles() > target && mesh.indices().len() >= MIN_INDICES {
        let Some((keep, remove)) = shortest_edge(mesh) else {
            break;
        };
        collapse_edge(mesh, keep, remove);
        collapses += 1;
    }

    mesh.invalidate_cache();
    recompute_normals(mesh);

    log::debug!(
        "edge collapse (reduction {target_reduction}): {initial} -> {} triangles in {collapses} collapses",
        mesh.num_triangles()
    );

    collapses
}
