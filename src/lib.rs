//! # FoamKit
//!
//! Geometry and release core for foam-insert quoting: ingests closed
//! polygonal loops from CAD/PDF extraction, classifies them into a block
//! outline, cavities, and nested islands, normalizes and snaps the result
//! into a canonical layout model, and manages hash-verified release
//! snapshots with exported SVG/DXF/STEP artifacts.
//!
//! ## Architecture
//!
//! FoamKit is organized as a workspace with multiple crates:
//!
//! 1. **foamkit-core** - Error taxonomy, units, shared constants
//! 2. **foamkit-geometry** - Loop classification, nesting, snapping,
//!    layout model building, layer slicing
//! 3. **foamkit-export** - Geometry hashing and SVG/DXF/STEP writers
//! 4. **foamkit-store** - Versioned layout packages and the lock/release
//!    state machine
//! 5. **foamkit** - Facade library and the command-line tool

pub use foamkit_core::{Error, ExportError, GeometryError, ReleaseError, Result, Unit};
pub use foamkit_export::{
    canonical_form, geometry_hash, layer_step_filename, render_dxf, render_dxf_with_hash,
    render_layer_step, render_simple_step, render_step, render_step_with_hash, render_svg,
    render_svg_with_hash, simple_step_filename,
};
pub use foamkit_geometry::{
    build_layout, classify, layer_corner_treatment, slice_layer, snap_inches, Block, BuildOptions,
    Cavity, CavityShape, ClassifiedShape, CornerStyle, Layer, LayoutModel, Loop, LoopSet,
    NestedCavity, Point,
};
pub use foamkit_store::{
    lock_quote, next_revision_letter, unlock_quote, DefaultExporter, ExportBundle, Exporter,
    LayoutPackage, PackageStore, Quote, ReleaseOutcome,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with console output, honoring the RUST_LOG
/// environment variable (default level INFO).
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
