/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT
*/

use crate::structures::Point2D;
use serde::{Deserialize, Serialize};
use std::f64;

/// An axis-aligned extent. A fresh `BoundingBox::default()` is inverted
/// (min = +inf, max = -inf) so that the first expansion sets it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> BoundingBox {
        BoundingBox {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }
}

impl BoundingBox {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> BoundingBox {
        let (x1, x2) = if min_x < max_x {
            (min_x, max_x)
        } else {
            (max_x, min_x)
        };
        let (y1, y2) = if min_y < max_y {
            (min_y, max_y)
        } else {
            (max_y, min_y)
        };
        BoundingBox {
            min_x: x1,
            min_y: y1,
            max_x: x2,
            max_y: y2,
        }
    }

    /// The extent of a point sequence; inverted if `points` is empty.
    pub fn from_points(points: &[Point2D]) -> BoundingBox {
        let mut bb = BoundingBox::default();
        for p in points {
            bb.expand_to_point(p);
        }
        bb
    }

    /// True until at least one point has been added.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn get_height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn get_width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn expand_to_point(&mut self, p: &Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn expand_to(&mut self, other: BoundingBox) {
        self.max_y = if self.max_y >= other.max_y { self.max_y } else { other.max_y };
        self.max_x = if self.max_x >= other.max_x { self.max_x } else { other.max_x };
        self.min_y = if self.min_y <= other.min_y { self.min_y } else { other.min_y };
        self.min_x = if self.min_x <= other.min_x { self.min_x } else { other.min_x };
    }
}

#[cfg(test)]
mod test {
    use super::BoundingBox;
    use crate::structures::Point2D;

    #[test]
    fn test_from_points() {
        let bb = BoundingBox::from_points(&[
            Point2D::new(3.0, -1.0),
            Point2D::new(-2.0, 4.0),
            Point2D::new(0.5, 0.5),
        ]);
        assert_eq!(bb, BoundingBox::new(-2.0, 3.0, -1.0, 4.0));
        assert_eq!(bb.get_width(), 5.0);
    }

    #[test]
    fn test_empty_box_expands() {
        let mut bb = BoundingBox::from_points(&[]);
        assert!(bb.is_empty());
        bb.expand_to(BoundingBox::new(0.0, 1.0, 0.0, 1.0));
        assert!(!bb.is_empty());
        assert_eq!(bb.get_height(), 1.0);
    }
}
