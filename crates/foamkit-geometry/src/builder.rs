//! Layout model builder.
//!
//! Drives the full pipeline: sanitize the raw loops, convert to inches,
//! classify shapes, resolve cavity nesting, normalize into the unit-square
//! top-left coordinate space, snap physical dimensions, and assemble the
//! canonical layout model with a single seeded layer.
//!
//! Malformed input degrades gracefully: loops with fewer than 3 usable
//! points are skipped, non-finite coordinates are dropped, and an unusable
//! outer loop yields [`LayoutModel::fallback`] instead of an error.

use crate::classify::{classify, detect_chamfer, ClassifiedShape};
use crate::loops::{bounds_of, Bounds, Loop, LoopSet, Point};
use crate::model::{Block, Cavity, CavityShape, CornerStyle, Layer, LayoutModel, NestedCavity};
use crate::nesting::assign_islands;
use crate::snap::snap_inches;
use tracing::{debug, warn};

/// Knobs the loop input cannot provide.
///
/// The converter delivers planar loops, so block thickness and the optional
/// round-corner request arrive from the quote form.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub thickness_in: f64,
    pub round_corners: bool,
    pub round_radius_in: Option<f64>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            thickness_in: 2.0,
            round_corners: false,
            round_radius_in: None,
        }
    }
}

/// Build a canonical layout model from a converter loop set.
pub fn build_layout(set: &LoopSet, opts: &BuildOptions) -> LayoutModel {
    let Some(outer) = set.loops.get(set.outer_loop_index) else {
        warn!(
            outer_loop_index = set.outer_loop_index,
            loop_count = set.loops.len(),
            "outer loop index out of range, using fallback layout"
        );
        return LayoutModel::fallback();
    };

    let outer_pts = to_inches(outer, set);
    if outer_pts.len() < 3 {
        warn!("outer loop has fewer than 3 usable points, using fallback layout");
        return LayoutModel::fallback();
    }
    let bounds = match bounds_of(&outer_pts) {
        Some(b) if b.width() > 0.0 && b.height() > 0.0 => b,
        _ => {
            warn!("outer loop bounding box is degenerate, using fallback layout");
            return LayoutModel::fallback();
        }
    };

    let chamfer = detect_chamfer(&outer_pts);
    let block = Block {
        length_in: snap_inches(bounds.width()),
        width_in: snap_inches(bounds.height()),
        thickness_in: snap_inches(opts.thickness_in),
        corner_style: if chamfer.is_some() {
            CornerStyle::Chamfer
        } else {
            CornerStyle::Square
        },
        chamfer_in: chamfer.map(snap_inches),
        round_corners: opts.round_corners.then_some(true),
        round_radius_in: if opts.round_corners {
            opts.round_radius_in.map(snap_inches)
        } else {
            None
        },
    };

    // Split the remaining loops into cavities and islands, skipping
    // anything too small to be a polygon.
    let mut cavity_loops: Vec<Vec<Point>> = Vec::new();
    let mut island_loops: Vec<Vec<Point>> = Vec::new();
    for (i, lp) in set.loops.iter().enumerate() {
        if i == set.outer_loop_index {
            continue;
        }
        let pts = to_inches(lp, set);
        if pts.len() < 3 {
            warn!(loop_index = i, "skipping loop with fewer than 3 usable points");
            continue;
        }
        if lp.is_cavity() {
            cavity_loops.push(pts);
        } else {
            island_loops.push(pts);
        }
    }
    debug!(
        cavities = cavity_loops.len(),
        islands = island_loops.len(),
        "classifying loops"
    );

    // Attach each island to the first cavity containing its centroid;
    // orphans are dropped.
    let mut nested: Vec<Vec<NestedCavity>> = vec![Vec::new(); cavity_loops.len()];
    for (island, parent) in island_loops.iter().zip(assign_islands(&cavity_loops, &island_loops)) {
        match parent {
            Some(idx) => nested[idx].push(NestedCavity {
                points: normalize_points(island, &bounds),
            }),
            None => warn!("island loop is not inside any cavity, dropping it"),
        }
    }

    let cavities: Vec<Cavity> = cavity_loops
        .iter()
        .zip(nested)
        .enumerate()
        .map(|(i, (pts, nested_cavities))| {
            build_cavity(format!("C{}", i + 1), pts, nested_cavities, &bounds)
        })
        .collect();

    let layer = Layer {
        id: "L1".to_string(),
        label: "Layer 1".to_string(),
        thickness_in: block.thickness_in,
        cavities,
        chamfered: None,
        chamfer_in: None,
    };
    LayoutModel::new(block, vec![layer])
}

/// Classify one cavity loop and place it in the normalized space.
fn build_cavity(
    id: String,
    pts: &[Point],
    nested_cavities: Vec<NestedCavity>,
    block: &Bounds,
) -> Cavity {
    let cb = bounds_of(pts).expect("cavity loop has points");
    match classify(pts) {
        ClassifiedShape::Rect { length, width } => Cavity {
            id,
            shape: CavityShape::Rect {
                length_in: snap_inches(length),
                width_in: snap_inches(width),
            },
            x: norm_x(cb.min_x, block),
            y: norm_y(cb.max_y, block),
            nested_cavities,
        },
        ClassifiedShape::Circle { center, diameter } => Cavity {
            id,
            shape: CavityShape::Circle {
                diameter_in: snap_inches(diameter),
            },
            x: norm_x(center.x, block),
            y: norm_y(center.y, block),
            nested_cavities,
        },
        ClassifiedShape::Poly { points } => Cavity {
            id,
            shape: CavityShape::Poly {
                points: normalize_points(&points, block),
            },
            x: norm_x(cb.min_x, block),
            y: norm_y(cb.max_y, block),
            nested_cavities,
        },
    }
}

/// Unit-square X relative to the block bounding box.
fn norm_x(x: f64, block: &Bounds) -> f64 {
    (x - block.min_x) / block.width()
}

/// Unit-square Y with the top-left-origin flip.
///
/// The y-flip is a presentation convention inherited from the consuming
/// editor; it lives here at the normalizer boundary only. The classifier
/// and hasher never see flipped coordinates.
fn norm_y(y: f64, block: &Bounds) -> f64 {
    1.0 - (y - block.min_y) / block.height()
}

fn normalize_points(pts: &[Point], block: &Bounds) -> Vec<Point> {
    pts.iter()
        .map(|p| Point::new(norm_x(p.x, block), norm_y(p.y, block)))
        .collect()
}

fn to_inches(lp: &Loop, set: &LoopSet) -> Vec<Point> {
    lp.sanitized_points()
        .into_iter()
        .map(|p| Point::new(set.units.to_inches(p.x), set.units.to_inches(p.y)))
        .collect()
}
