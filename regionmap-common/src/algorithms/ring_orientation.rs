/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT
*/
use crate::structures::Point2D;
use serde::{Deserialize, Serialize};

/// Direction in which the y coordinate grows in the consumer's coordinate system.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum YAxis {
    /// Cartesian / geographic: north is up.
    Up,
    /// Screen space: y grows downwards.
    Down,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WindingDirection {
    Clockwise,
    CounterClockwise,
    /// Zero enclosed area (empty, single point, or collinear ring).
    Degenerate,
}

/// Sums `(x[i+1] - x[i]) * (y[i+1] + y[i])` over every edge of `ring`,
/// including the edge from the last point back to the first.
///
/// This is twice the signed area with the sign flipped, so only the sign
/// and the relative magnitude are meaningful. With a y-up axis a positive
/// sum means the ring runs clockwise and a negative sum counter-clockwise;
/// with a y-down (screen) axis the mapping is reversed. Use
/// `winding_direction` to resolve the sign for a given axis.
///
/// A closed ring (first point repeated) and its open form give the same sum,
/// since the duplicated edge has zero width. An empty ring sums to zero.
pub fn signed_edge_sum(ring: &[Point2D]) -> f64 {
    let n = ring.len();
    if n == 0 {
        return 0f64;
    }
    let mut sum = 0f64;
    for i in 0..n - 1 {
        sum += (ring[i + 1].x - ring[i].x) * (ring[i + 1].y + ring[i].y);
    }
    sum += (ring[0].x - ring[n - 1].x) * (ring[0].y + ring[n - 1].y);
    sum
}

/// Resolves the sign of `signed_edge_sum` into a winding direction.
pub fn winding_direction(ring: &[Point2D], y_axis: YAxis) -> WindingDirection {
    let sum = signed_edge_sum(ring);
    if sum == 0f64 {
        return WindingDirection::Degenerate;
    }
    let clockwise_when_y_up = sum > 0f64;
    match (clockwise_when_y_up, y_axis) {
        (true, YAxis::Up) | (false, YAxis::Down) => WindingDirection::Clockwise,
        _ => WindingDirection::CounterClockwise,
    }
}

#[cfg(test)]
mod test {
    use super::{signed_edge_sum, winding_direction, WindingDirection, YAxis};
    use crate::structures::Point2D;

    fn square() -> Vec<Point2D> {
        vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(4.0, 0.0),
            Point2D::new(4.0, 4.0),
            Point2D::new(0.0, 4.0),
            Point2D::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_reversed_ring_flips_sign() {
        let mut points = square();
        let forward = signed_edge_sum(&points);
        points.reverse();
        let backward = signed_edge_sum(&points);
        assert_eq!(forward, -32.0);
        assert_eq!(backward, 32.0);
        assert_eq!(forward.abs(), backward.abs());
    }

    #[test]
    fn test_open_and_closed_rings_agree() {
        let closed = square();
        let open = &closed[..closed.len() - 1];
        assert_eq!(signed_edge_sum(open), signed_edge_sum(&closed));
    }

    #[test]
    fn test_winding_direction_depends_on_axis() {
        let mut points = square();
        assert_eq!(
            winding_direction(&points, YAxis::Up),
            WindingDirection::CounterClockwise
        );
        assert_eq!(
            winding_direction(&points, YAxis::Down),
            WindingDirection::Clockwise
        );
        points.reverse();
        assert_eq!(
            winding_direction(&points, YAxis::Up),
            WindingDirection::Clockwise
        );
    }

    #[test]
    fn test_degenerate_rings() {
        assert_eq!(signed_edge_sum(&[]), 0.0);
        let single = [Point2D::new(3.0, 7.0)];
        assert_eq!(signed_edge_sum(&single), 0.0);
        let line = [
            Point2D::new(0.0, 0.0),
            Point2D::new(2.0, 2.0),
            Point2D::new(0.0, 0.0),
        ];
        assert_eq!(
            winding_direction(&line, YAxis::Up),
            WindingDirection::Degenerate
        );
    }
}
