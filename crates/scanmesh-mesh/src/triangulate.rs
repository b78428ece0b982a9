use scanmesh_3d::{ColoredPoint, Mesh, Vertex};

use crate::normals::{face_normal, recompute_normals};

/// Triangles whose doubled area is at or below this value are rejected.
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-6;

/// Build a sparse mesh by greedily connecting nearby unused points.
///
/// Points are scanned in index order. For each unused point `i`, candidate
/// triples `i < j < k` of unused points are visited in ascending order and the
/// first one whose three edges are at most `max_edge_length` long and whose
/// doubled area exceeds [`DEGENERATE_AREA_EPSILON`] is emitted; its points are
/// then marked as used. Most points of a dense cloud remain unreferenced.
///
/// Every input point becomes a vertex. Fewer than 3 points yields an empty mesh.
///
/// # Arguments
///
/// * `points` - The input point cloud.
/// * `max_edge_length` - The maximum length of a triangle edge.
pub fn greedy_triangulation(points: &[ColoredPoint], max_edge_length: f64) -> Mesh {
    if points.len() < 3 {
        return Mesh::default();
    }

    let n = points.len();
    let mut mesh = Mesh::with_capacity(n, n / 3);
    for p in points {
        mesh.push_vertex(Vertex::from(p));
    }

    let within = |a: usize, b: usize| {
        points[a].position.distance(points[b].position) <= max_edge_length
    };

    let mut used = vec![false; n];
    for i in 0..n {
        if used[i] {
            continue;
        }
        if let Some((j, k)) = first_triangle(points, &used, i, &within) {
            mesh.push_triangle([i as u32, j as u32, k as u32]);
            used[i] = true;
            used[j] = true;
            used[k] = true;
        }
    }

    recompute_normals(&mut mesh);

    log::debug!(
        "greedy triangulation (max edge {max_edge_length}): {} triangles over {} points",
        mesh.num_triangles(),
        n
    );

    mesh
}

/// Find the first valid `(j, k)` completing a triangle with `i`.
fn first_triangle(
    points: &[ColoredPoint],
    used: &[bool],
    i: usize,
    within: &impl Fn(usize, usize) -> bool,
) -> Option<(usize, usize)> {
    let n = points.len();
    for j in (i + 1)..n {
        if used[j] || !within(i, j) {
            continue;
        }
        for k in (j + 1)..n {
            if used[k] || !within(j, k) || !within(k, i) {
                continue;
            }
            let area = face_normal(points[i].position, points[j].position, points[k].position)
                .length();
            if area > DEGENERATE_AREA_EPSILON {
                return Some((j, k));
            }
        }
    }
    None
}
