use glam::DVec3;

use crate::pointcloud::ColoredPoint;

/// A neighbor found by a nearest neighbor query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index of the neighbor in the queried slice.
    pub index: usize,
    /// Euclidean distance from the query to the neighbor.
    pub distance: f64,
}

/// Find the `k` points closest to `query`, sorted by ascending distance.
///
/// Every point whose position is exactly equal to the query is excluded, which
/// also drops true duplicates of the query point. Ties keep scan order. If
/// fewer than `k` eligible points exist, all of them are returned.
///
/// The search is a linear scan followed by a sort, O(N log N) per query.
///
/// # Arguments
///
/// * `points` - The points to search.
/// * `query` - The query position.
/// * `k` - The maximum number of neighbors to return.
///
/// Example:
///
/// ```
/// use glam::DVec3;
/// use scanmesh_3d::neighbors::k_nearest;
/// use scanmesh_3d::ColoredPoint;
///
/// let points = vec![
///     ColoredPoint::new(DVec3::ZERO, DVec3::ONE),
///     ColoredPoint::new(DVec3::X, DVec3::ONE),
///     ColoredPoint::new(DVec3::X * 3.0, DVec3::ONE),
/// ];
/// let neighbors = k_nearest(&points, DVec3::ZERO, 5);
/// assert_eq!(neighbors.len(), 2);
/// assert_eq!(neighbors[0].index, 1);
/// ```
pub fn k_nearest(points: &[ColoredPoint], query: DVec3, k: usize) -> Vec<Neighbor> {
    if k == 0 {
        return Vec::new();
    }

    let mut candidates = points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.position != query)
        .map(|(index, p)| Neighbor {
            index,
            distance: p.position.distance(query),
        })
        .collect::<Vec<_>>();

    // stable sort so equal distances keep scan order
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    candidates.truncate(k);
    candidates
}

/// Same as [`k_nearest`] but returns copies of the neighbor points.
pub fn k_nearest_points(points: &[ColoredPoint], query: DVec3, k: usize) -> Vec<ColoredPoint> {
    k_nearest(points, query, k)
        .into_iter()
        .map(|n| points[n.index])
        .collect()
}

/// Find the point closest to `query`, keeping the first one on ties.
///
/// Unlike [`k_nearest`], points at the query position are eligible.
/// Returns `None` for an empty slice.
pub fn nearest_one(points: &[ColoredPoint], query: DVec3) -> Option<Neighbor> {
    let mut best: Option<Neighbor> = None;
    for (index, p) in points.iter().enumerate() {
        let distance = p.position.distance(query);
        match best {
            Some(b) if b.distance <= distance => {}
            _ => best = Some(Neighbor { index, distance }),
        }
    }
    best
}
