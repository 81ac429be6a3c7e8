//! Shape classification for closed loops.
//!
//! Turns one loop's point list into a typed shape descriptor. Inner loops are
//! tried in the order rectangle, circle, polygon; the outer block loop gets a
//! chamfered-rectangle test first. The tolerances are business-tuned
//! constants, kept as named values so they stay discoverable and testable.

use crate::loops::{bounds_of, centroid_of, Point};

/// Point-on-bbox-edge tolerance for the rectangle test, in inches.
pub const RECT_EDGE_EPSILON_IN: f64 = 1e-3;

/// Clustering tolerance when collecting unique X/Y coordinates, in inches.
pub const COORD_DEDUP_EPSILON_IN: f64 = 1e-3;

/// Max ratio between the two smallest corner-cut runs of a 6-point outline.
pub const CHAMFER_RATIO_6PT: f64 = 2.0;

/// Max ratio between the largest and smallest corner-cut run of an 8-point
/// outline.
pub const CHAMFER_RATIO_8PT: f64 = 1.25;

/// Minimum vertex count before a loop is considered a circle candidate.
pub const CIRCLE_MIN_POINTS: usize = 12;

/// Max mean absolute radius deviation, relative to the mean radius.
pub const CIRCLE_MAX_RADIUS_DEVIATION: f64 = 0.02;

/// A classified loop shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedShape {
    /// Axis-aligned rectangle; `length` is the X extent, `width` the Y extent.
    Rect { length: f64, width: f64 },
    /// Near-circular loop.
    Circle { center: Point, diameter: f64 },
    /// Anything else, preserved as an ordered point list.
    Poly { points: Vec<Point> },
}

/// Classify an inner loop (cavity or island).
pub fn classify(points: &[Point]) -> ClassifiedShape {
    if let Some(rect) = try_rectangle(points) {
        return rect;
    }
    if let Some(circle) = try_circle(points) {
        return circle;
    }
    ClassifiedShape::Poly {
        points: points.to_vec(),
    }
}

/// Rectangle test: every point sits on one of the four bbox edges and the
/// four bbox corners are all present as distinct vertices.
fn try_rectangle(points: &[Point]) -> Option<ClassifiedShape> {
    if points.len() < 4 {
        return None;
    }
    let b = bounds_of(points)?;
    if b.width() <= 0.0 || b.height() <= 0.0 {
        return None;
    }

    let eps = RECT_EDGE_EPSILON_IN;
    let on_edge = |p: &Point| {
        (p.x - b.min_x).abs() <= eps
            || (p.x - b.max_x).abs() <= eps
            || (p.y - b.min_y).abs() <= eps
            || (p.y - b.max_y).abs() <= eps
    };
    if !points.iter().all(on_edge) {
        return None;
    }

    let corners = [
        Point::new(b.min_x, b.min_y),
        Point::new(b.max_x, b.min_y),
        Point::new(b.max_x, b.max_y),
        Point::new(b.min_x, b.max_y),
    ];
    let corner_hits = corners
        .iter()
        .filter(|c| points.iter().any(|p| p.distance_to(c) <= eps))
        .count();
    if corner_hits != 4 {
        return None;
    }

    // Distinct vertices coinciding with a corner; a collapsed loop that
    // repeats corners still has exactly four of them.
    let mut distinct: Vec<Point> = Vec::new();
    for p in points {
        if corners.iter().any(|c| p.distance_to(c) <= eps)
            && !distinct.iter().any(|d| d.distance_to(p) <= eps)
        {
            distinct.push(*p);
        }
    }
    if distinct.len() != 4 {
        return None;
    }

    Some(ClassifiedShape::Rect {
        length: b.width(),
        width: b.height(),
    })
}

/// Circle test: enough vertices and a tight radial spread around the
/// centroid.
fn try_circle(points: &[Point]) -> Option<ClassifiedShape> {
    if points.len() < CIRCLE_MIN_POINTS {
        return None;
    }
    let center = centroid_of(points);
    let radii: Vec<f64> = points.iter().map(|p| center.distance_to(p)).collect();
    let mean_r = radii.iter().sum::<f64>() / radii.len() as f64;
    if mean_r <= 0.0 {
        return None;
    }
    let mean_dev = radii.iter().map(|r| (r - mean_r).abs()).sum::<f64>() / radii.len() as f64;
    if mean_dev / mean_r > CIRCLE_MAX_RADIUS_DEVIATION {
        return None;
    }
    Some(ClassifiedShape::Circle {
        center,
        diameter: 2.0 * mean_r,
    })
}

/// Chamfered-rectangle detection for the outer block loop.
///
/// A 6-point outline clusters to 3 unique X and 3 unique Y coordinates (one
/// cut corner, counting the closing point); an 8-point outline clusters to 4
/// and 4 (all four corners cut). Returns the chamfer size, or `None` when
/// the pattern does not hold, in which case the caller falls through to the
/// rectangle and polygon paths.
pub fn detect_chamfer(points: &[Point]) -> Option<f64> {
    // 5..=9 covers both patterns with or without a duplicate closing point.
    if points.len() < 5 || points.len() > 9 {
        return None;
    }
    let xs = unique_coords(points.iter().map(|p| p.x));
    let ys = unique_coords(points.iter().map(|p| p.y));

    match (xs.len(), ys.len()) {
        (3, 3) => {
            // Corner-cut runs from the middle coordinate out to each end.
            let runs = [
                xs[1] - xs[0],
                xs[2] - xs[1],
                ys[1] - ys[0],
                ys[2] - ys[1],
            ];
            let mut sorted = runs;
            sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite runs"));
            let (a, b) = (sorted[0], sorted[1]);
            if a <= 0.0 {
                return None;
            }
            if b / a > CHAMFER_RATIO_6PT {
                return None;
            }
            Some((a + b) / 2.0)
        }
        (4, 4) => {
            // Runs between adjacent unique coordinates at the rectangle ends.
            let runs = [
                xs[1] - xs[0],
                xs[3] - xs[2],
                ys[1] - ys[0],
                ys[3] - ys[2],
            ];
            if runs.iter().any(|r| *r <= 0.0) {
                return None;
            }
            let min = runs.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = runs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            if max / min > CHAMFER_RATIO_8PT {
                return None;
            }
            Some(min)
        }
        _ => None,
    }
}

/// Sorted, tolerance-deduplicated coordinate values.
fn unique_coords(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite coordinates"));
    let mut unique: Vec<f64> = Vec::new();
    for v in sorted {
        match unique.last() {
            Some(last) if (v - last).abs() <= COORD_DEDUP_EPSILON_IN => {}
            _ => unique.push(v),
        }
    }
    unique
}
