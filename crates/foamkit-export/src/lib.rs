//! # FoamKit Export
//!
//! Deterministic export artifacts for layout models: the canonical SHA-256
//! geometry hash, and SVG / DXF / STEP writers that can embed that hash so
//! an exported drawing or solid is verifiably bound to a locked geometry
//! state.
//!
//! All writers are pure text producers; persistence and the release flow
//! that calls them live in `foamkit-store`.

pub mod dxf;
pub mod hash;
pub mod step;
pub mod svg;

pub use dxf::{render_dxf, render_dxf_with_hash};
pub use hash::{canonical_form, fmt_num, geometry_hash};
pub use step::{
    layer_step_filename, render_layer_step, render_simple_step, render_step,
    render_step_with_hash, simple_step_filename,
};
pub use svg::{render_svg, render_svg_with_hash};
