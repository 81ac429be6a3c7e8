//! # FoamKit Core
//!
//! Core types, errors, and unit handling for FoamKit.
//! Provides the error taxonomy shared by the geometry, export, and store
//! crates, and the unit conversion used at the loop-input boundary.

pub mod error;
pub mod units;

pub use error::{Error, ExportError, GeometryError, ReleaseError, Result};
pub use units::{Unit, MM_PER_INCH};
