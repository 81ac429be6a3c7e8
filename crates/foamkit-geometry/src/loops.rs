//! Loop input from the external CAD/PDF converter.
//!
//! A loop set is a list of closed polygonal loops with a stated unit and a
//! signed area per loop: positive area is solid material (the block outline
//! or an island inside a cavity), negative area is a cavity. One loop,
//! identified by index, is the outer block boundary.

use foamkit_core::Unit;
use serde::{Deserialize, Serialize};

/// Represents a 2D point with X and Y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point with the given X and Y coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculates the distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// True when both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Bounding box of a point list, or `None` for an empty list.
pub fn bounds_of(points: &[Point]) -> Option<Bounds> {
    let first = points.first()?;
    let mut b = Bounds {
        min_x: first.x,
        min_y: first.y,
        max_x: first.x,
        max_y: first.y,
    };
    for p in &points[1..] {
        b.min_x = b.min_x.min(p.x);
        b.min_y = b.min_y.min(p.y);
        b.max_x = b.max_x.max(p.x);
        b.max_y = b.max_y.max(p.y);
    }
    Some(b)
}

/// Arithmetic-mean centroid of a point list.
///
/// Good enough for containment probes against well-formed cavity loops;
/// this is not the area-weighted polygon centroid.
pub fn centroid_of(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// One closed polygonal loop from the converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loop {
    pub points: Vec<Point>,
    /// Signed area: positive = solid material, negative = cavity/hole.
    pub area: f64,
}

impl Loop {
    /// True when the signed area marks this loop as a cavity.
    pub fn is_cavity(&self) -> bool {
        self.area < 0.0
    }

    /// Points with non-finite coordinates dropped and a duplicate closing
    /// point removed.
    pub fn sanitized_points(&self) -> Vec<Point> {
        let mut pts: Vec<Point> = self.points.iter().copied().filter(Point::is_finite).collect();
        if pts.len() > 1 {
            let first = pts[0];
            let last = pts[pts.len() - 1];
            if first.distance_to(&last) < 1e-9 {
                pts.pop();
            }
        }
        pts
    }
}

/// A full loop set as delivered by the geometry-conversion collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopSet {
    pub units: Unit,
    /// Index into `loops` of the outer block boundary.
    pub outer_loop_index: usize,
    pub loops: Vec<Loop>,
}
