use glam::{DMat4, DVec3};
use scanmesh_3d::{neighbors::nearest_one, ColoredPoint};

/// A pairing of one source point with its nearest target point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correspondence {
    /// Index of the point in the source cloud.
    pub source: usize,
    /// Index of the nearest point in the target cloud.
    pub target: usize,
    /// Distance between the two points.
    pub distance: f64,
}

/// Pair every source point with its nearest target point.
///
/// The target is scanned linearly and the first minimal point wins. Source
/// points are skipped only when the target is empty.
pub(crate) fn find_correspondences(
    source: &[ColoredPoint],
    target: &[ColoredPoint],
) -> Vec<Correspondence> {
    source
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            nearest_one(target, p.position).map(|nn| Correspondence {
                source: i,
                target: nn.index,
                distance: nn.distance,
            })
        })
        .collect()
}

/// Compute the centroids of the paired source and target points.
///
/// # Arguments
///
/// * `source` - The source points.
/// * `target` - The target points.
/// * `correspondences` - The pairs to average over.
///
/// # Returns
///
/// The centroids of the paired source points and the paired target points,
/// zero when there are no pairs.
pub fn compute_centroids(
    source: &[ColoredPoint],
    target: &[ColoredPoint],
    correspondences: &[Correspondence],
) -> (DVec3, DVec3) {
    if correspondences.is_empty() {
        return (DVec3::ZERO, DVec3::ZERO);
    }

    let (sum_src, sum_dst) = correspondences
        .iter()
        .fold((DVec3::ZERO, DVec3::ZERO), |(s, d), c| {
            (s + source[c.source].position, d + target[c.target].position)
        });

    let n = correspondences.len() as f64;
    (sum_src / n, sum_dst / n)
}

/// Estimate the transform aligning the paired source points onto the target.
///
/// Only a translation is estimated: the difference between the centroid of
/// the paired target points and the centroid of the paired source points.
pub fn fit_translation(
    source: &[ColoredPoint],
    target: &[ColoredPoint],
    correspondences: &[Correspondence],
) -> DMat4 {
    let (src_centroid, dst_centroid) = compute_centroids(source, target, correspondences);
    DMat4::from_translation(dst_centroid - src_centroid)
}

/// Mean distance between the current source points and their paired targets.
pub(crate) fn mean_correspondence_distance(
    source: &[ColoredPoint],
    target: &[ColoredPoint],
    correspondences: &[Correspondence],
) -> f64 {
    if correspondences.is_empty() {
        return 0.0;
    }
    correspondences
        .iter()
        .map(|c| source[c.source].position.distance(target[c.target].position))
        .sum::<f64>()
        / correspondences.len() as f64
}
