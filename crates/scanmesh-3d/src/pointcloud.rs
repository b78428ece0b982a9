use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A single colored sample captured by a depth sensor.
///
/// The normal defaults to the zero vector, which means "not estimated yet".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColoredPoint {
    /// The position of the sample.
    pub position: DVec3,
    /// The color of the sample, each channel in `[0, 1]`.
    pub color: DVec3,
    /// The surface normal, or zero when unestimated.
    pub normal: DVec3,
}

impl ColoredPoint {
    /// Create a new point with an unestimated normal.
    pub fn new(position: DVec3, color: DVec3) -> Self {
        Self {
            position,
            color,
            normal: DVec3::ZERO,
        }
    }

    /// Return a copy of the point carrying the given normal.
    #[must_use]
    pub fn with_normal(mut self, normal: DVec3) -> Self {
        self.normal = normal;
        self
    }

    /// Return a copy of the point moved to the given position.
    #[must_use]
    pub fn with_position(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    /// Check whether a normal has been estimated for this point.
    #[inline]
    pub fn has_normal(&self) -> bool {
        self.normal != DVec3::ZERO
    }
}

impl Default for ColoredPoint {
    fn default() -> Self {
        Self::new(DVec3::ZERO, DVec3::ONE)
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// The minimum corner.
    pub min: DVec3,
    /// The maximum corner.
    pub max: DVec3,
}

impl Aabb {
    /// Compute the bounding box of a set of positions.
    ///
    /// Returns `None` when the iterator is empty.
    pub fn from_points<I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = DVec3>,
    {
        let mut positions = positions.into_iter();
        let first = positions.next()?;
        let (min, max) = positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Get the center of the box.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extent of the box along each axis.
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Grow the box by `margin` on every side.
    #[must_use]
    pub fn padded(&self, margin: f64) -> Self {
        Self {
            min: self.min - DVec3::splat(margin),
            max: self.max + DVec3::splat(margin),
        }
    }

    /// Check if a position lies inside the box, boundaries included.
    pub fn contains(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Compute the bounding box of a point cloud.
pub fn bounding_box(points: &[ColoredPoint]) -> Option<Aabb> {
    Aabb::from_points(points.iter().map(|p| p.position))
}
