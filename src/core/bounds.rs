use crate::core::constants::MIN_BOUNDS_EXTENT;
use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Represents an axis-aligned bounding box in world-pixel coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Creates new bounds from two points
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Smallest bounds containing every point, `None` for an empty slice
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self::new(*first, *first);
        for point in &points[1..] {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Gets the width of the bounds
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Gets the height of the bounds
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Width used for fitting; never below `MIN_BOUNDS_EXTENT`
    pub fn fit_width(&self) -> f64 {
        self.width().max(MIN_BOUNDS_EXTENT)
    }

    /// Height used for fitting; never below `MIN_BOUNDS_EXTENT`
    pub fn fit_height(&self) -> f64 {
        self.height().max(MIN_BOUNDS_EXTENT)
    }

    /// Whether the fit extents are within `width` x `height`
    pub fn fits_within(&self, width: f64, height: f64) -> bool {
        self.fit_width() <= width && self.fit_height() <= height
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> Point {
        self.min.midpoint(&self.max)
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &Point) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }
}
