//! Cavity-within-cavity resolution.
//!
//! Positive-area loops that are not the outer boundary are islands: solid
//! material standing inside a cavity. Each island is attached to the first
//! cavity whose polygon contains the island's centroid. First match wins;
//! overlapping cavities therefore adopt an island in input order, which is a
//! documented simplification rather than a geometric guarantee.

use crate::loops::{centroid_of, Point};

/// Ray-casting point-in-polygon test, even-odd rule.
///
/// Points exactly on an edge may land on either side; island centroids sit
/// well inside their parent in practice.
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// For each island point list, the index of the first cavity containing its
/// centroid, or `None` when no cavity does.
pub fn assign_islands(cavities: &[Vec<Point>], islands: &[Vec<Point>]) -> Vec<Option<usize>> {
    islands
        .iter()
        .map(|island| {
            let c = centroid_of(island);
            cavities.iter().position(|cavity| point_in_polygon(c, cavity))
        })
        .collect()
}
