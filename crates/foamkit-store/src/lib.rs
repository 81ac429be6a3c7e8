//! # FoamKit Store
//!
//! Versioned layout package storage and the lock/release state machine.
//! Every edit appends an immutable [`LayoutPackage`]; locking freezes the
//! current package into a hash-verified release snapshot and mints the next
//! revision letter inside one atomic transaction.

pub mod package;
pub mod release;
pub mod store;

pub use package::{LayoutPackage, Quote};
pub use release::{
    lock_quote, next_revision_letter, unlock_quote, DefaultExporter, ExportBundle, Exporter,
    ReleaseOutcome,
};
pub use store::{PackageStore, StoreTxn};
