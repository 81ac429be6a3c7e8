//! Error handling for FoamKit
//!
//! Provides error types for all layers of the geometry/release core:
//! - Geometry errors (classification, slicing)
//! - Export errors (SVG/DXF/STEP generation)
//! - Release errors (lock/unlock state machine, optimistic concurrency)
//!
//! All error types use `thiserror` for ergonomic error handling. Release and
//! geometry errors carry a stable string code so a web layer can map them to
//! an HTTP status and a machine-readable error field without matching on the
//! Rust type.

use thiserror::Error;

/// Geometry error type
///
/// Represents errors from the geometry pipeline. Classification and
/// normalization degrade gracefully instead of failing, so the only hard
/// geometry errors are lookups that cannot be satisfied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Requested layer index does not exist in the layout stack
    #[error("Layer {index} not found (stack has {layer_count} layers)")]
    LayerNotFound {
        /// The zero-based layer index that was requested.
        index: usize,
        /// The number of layers in the stack.
        layer_count: usize,
    },

    /// Loop input is unusable (e.g. outer loop index out of range)
    #[error("Invalid loop input: {reason}")]
    InvalidLoopInput {
        /// The reason the loop input was rejected.
        reason: String,
    },
}

impl GeometryError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            GeometryError::LayerNotFound { .. } => "LAYER_NOT_FOUND",
            GeometryError::InvalidLoopInput { .. } => "INVALID_LOOP_INPUT",
        }
    }
}

/// Export error type
///
/// Represents failures producing exported artifacts from a layout model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    /// Layout model has no usable solid to export
    #[error("Layout model is empty or degenerate: {reason}")]
    EmptyModel {
        /// The reason the model cannot be exported.
        reason: String,
    },

    /// Requested layer does not exist
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Release error type
///
/// Represents failures of the lock/release state machine. Every variant maps
/// to a stable code consumed by the quoting web layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReleaseError {
    /// No layout package has ever been applied for the quote
    #[error("No layout package exists for quote {quote_no}")]
    LayoutNotFound {
        /// The quote number that has no layout.
        quote_no: String,
    },

    /// Relock attempted with geometry differing from the stored lock hash
    #[error("Geometry hash mismatch for quote {quote_no}: locked {locked_hash}, current {current_hash}")]
    GeometryHashMismatch {
        /// The quote number being relocked.
        quote_no: String,
        /// The hash stored when the quote was locked.
        locked_hash: String,
        /// The hash of the current layout.
        current_hash: String,
    },

    /// A different layout package became current between the outer read and
    /// the transactional re-read
    #[error("Layout for quote {quote_no} changed during release (package {read_id} superseded by {current_id})")]
    LayoutChangedDuringRelease {
        /// The quote number being released.
        quote_no: String,
        /// The package id read before the transaction.
        read_id: i64,
        /// The package id found inside the transaction.
        current_id: i64,
    },

    /// The current package kept its id but its geometry hash changed
    #[error("Geometry for quote {quote_no} changed during release")]
    GeometryChangedDuringRelease {
        /// The quote number being released.
        quote_no: String,
    },

    /// CAD-solid export could not be produced; the release aborts whole
    #[error("STEP export not available for quote {quote_no}: {reason}")]
    StepNotAvailable {
        /// The quote number being released.
        quote_no: String,
        /// Why the STEP body could not be produced.
        reason: String,
    },

    /// Quote number is unknown to the store
    #[error("Quote {quote_no} not found")]
    QuoteNotFound {
        /// The unknown quote number.
        quote_no: String,
    },
}

impl ReleaseError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ReleaseError::LayoutNotFound { .. } => "LAYOUT_NOT_FOUND",
            ReleaseError::GeometryHashMismatch { .. } => "GEOMETRY_HASH_MISMATCH",
            ReleaseError::LayoutChangedDuringRelease { .. } => "LAYOUT_CHANGED_DURING_RELEASE",
            ReleaseError::GeometryChangedDuringRelease { .. } => "GEOMETRY_CHANGED_DURING_RELEASE",
            ReleaseError::StepNotAvailable { .. } => "STEP_NOT_AVAILABLE",
            ReleaseError::QuoteNotFound { .. } => "QUOTE_NOT_FOUND",
        }
    }
}

/// Main error type for FoamKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Release error
    #[error(transparent)]
    Release(#[from] ReleaseError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this error should map to "not found"
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Geometry(GeometryError::LayerNotFound { .. })
                | Error::Release(ReleaseError::LayoutNotFound { .. })
                | Error::Release(ReleaseError::QuoteNotFound { .. })
        )
    }

    /// Check if this error should map to "conflict"
    ///
    /// Conflicts are retryable by re-reading the current layout package and
    /// repeating the whole lock operation.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Error::Release(ReleaseError::GeometryHashMismatch { .. })
                | Error::Release(ReleaseError::LayoutChangedDuringRelease { .. })
                | Error::Release(ReleaseError::GeometryChangedDuringRelease { .. })
        )
    }

    /// Stable machine-readable code, if this error carries one
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Error::Geometry(e) => Some(e.code()),
            Error::Export(ExportError::Geometry(e)) => Some(e.code()),
            Error::Export(ExportError::EmptyModel { .. }) => Some("STEP_NOT_AVAILABLE"),
            Error::Release(e) => Some(e.code()),
            _ => None,
        }
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_error_codes() {
        let e = ReleaseError::LayoutNotFound {
            quote_no: "Q-100".into(),
        };
        assert_eq!(e.code(), "LAYOUT_NOT_FOUND");

        let e = ReleaseError::GeometryHashMismatch {
            quote_no: "Q-100".into(),
            locked_hash: "aa".into(),
            current_hash: "bb".into(),
        };
        assert_eq!(e.code(), "GEOMETRY_HASH_MISMATCH");
    }

    #[test]
    fn test_status_predicates() {
        let not_found: Error = ReleaseError::LayoutNotFound {
            quote_no: "Q-1".into(),
        }
        .into();
        assert!(not_found.is_not_found());
        assert!(!not_found.is_conflict());

        let conflict: Error = ReleaseError::LayoutChangedDuringRelease {
            quote_no: "Q-1".into(),
            read_id: 3,
            current_id: 4,
        }
        .into();
        assert!(conflict.is_conflict());
        assert!(!conflict.is_not_found());

        let layer: Error = GeometryError::LayerNotFound {
            index: 9,
            layer_count: 2,
        }
        .into();
        assert!(layer.is_not_found());
        assert_eq!(layer.code(), Some("LAYER_NOT_FOUND"));
    }
}
