//! # FoamKit Geometry
//!
//! Turns raw CAD/PDF vector loops into the canonical layout model:
//! classification of loops into block/cavity/island shapes, nesting
//! resolution, normalization into the unit-square top-left space, and
//! snapping to manufacturable fractional-inch dimensions. Also provides the
//! layer slicer for isolated single-layer export.
//!
//! All functions here are pure and CPU-bound; they never perform I/O and
//! are safe to run concurrently.

pub mod builder;
pub mod classify;
pub mod loops;
pub mod model;
pub mod nesting;
pub mod slicer;
pub mod snap;

pub use builder::{build_layout, BuildOptions};
pub use classify::{classify, detect_chamfer, ClassifiedShape};
pub use loops::{bounds_of, centroid_of, Bounds, Loop, LoopSet, Point};
pub use model::{Block, Cavity, CavityShape, CornerStyle, Layer, LayoutModel, NestedCavity};
pub use nesting::{assign_islands, point_in_polygon};
pub use slicer::{layer_corner_treatment, slice_layer, DEFAULT_LAYER_CHAMFER_IN};
pub use snap::snap_inches;
