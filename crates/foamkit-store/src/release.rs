//! Lock/release state machine.
//!
//! Locking freezes a quote's current layout into an immutable release
//! snapshot whose exported artifacts carry the geometry hash, then mints
//! the next released revision letter. The flow is optimistic: the layout is
//! read and the (possibly slow) artifact rendering happens outside any
//! transaction, and a short atomic transaction re-validates both the
//! current package id and its recomputed hash before committing. Unlock
//! clears the lock fields only; it never touches packages or `stage_rev`.

use crate::package::Quote;
use crate::store::PackageStore;
use chrono::Utc;
use foamkit_core::{ExportError, ReleaseError, Result};
use foamkit_export::{
    geometry_hash, render_dxf_with_hash, render_step_with_hash, render_svg_with_hash,
};
use foamkit_geometry::LayoutModel;
use tracing::{debug, info};

/// Staging revision seeded on first release when none exists yet. Only the
/// separate Revise flow advances it afterwards.
const STAGE_REV_SEED: &str = "AS";

/// Hash-stamped artifact set produced for a release snapshot.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub svg: String,
    pub dxf: String,
    pub step: String,
}

/// Renders the release artifacts for a layout.
///
/// A seam for the external CAD-solid service: the default implementation
/// renders in-process, tests substitute a failing one to exercise the
/// `STEP_NOT_AVAILABLE` path.
pub trait Exporter {
    fn render(&self, layout: &LayoutModel, hash: &str) -> std::result::Result<ExportBundle, ExportError>;
}

/// In-process exporter using the foamkit-export writers.
#[derive(Debug, Default)]
pub struct DefaultExporter;

impl Exporter for DefaultExporter {
    fn render(&self, layout: &LayoutModel, hash: &str) -> std::result::Result<ExportBundle, ExportError> {
        Ok(ExportBundle {
            svg: render_svg_with_hash(layout, hash),
            dxf: render_dxf_with_hash(layout, hash),
            step: render_step_with_hash(layout, hash)?,
        })
    }
}

/// Result of a successful lock.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    pub locked: bool,
    pub geometry_hash: Option<String>,
    /// Id of the frozen release snapshot package.
    pub release_pkg_id: Option<i64>,
}

/// Lock a quote, freezing its current layout into a release snapshot.
pub fn lock_quote(
    store: &PackageStore,
    exporter: &dyn Exporter,
    quote_no: &str,
) -> Result<ReleaseOutcome> {
    let quote = store.quote(quote_no)?;
    let package = store
        .current_package(quote_no)?
        .ok_or(ReleaseError::LayoutNotFound {
            quote_no: quote_no.to_string(),
        })?;

    let hash = geometry_hash(&package.layout);

    // A relock must see the geometry it froze; anything else is a conflict.
    if quote.locked {
        if let Some(locked_hash) = &quote.geometry_hash {
            if locked_hash != &hash {
                return Err(ReleaseError::GeometryHashMismatch {
                    quote_no: quote_no.to_string(),
                    locked_hash: locked_hash.clone(),
                    current_hash: hash,
                }
                .into());
            }
        }
    }

    // Artifact rendering stays outside the transaction; it may be slow.
    let bundle = exporter
        .render(&package.layout, &hash)
        .map_err(|e| ReleaseError::StepNotAvailable {
            quote_no: quote_no.to_string(),
            reason: e.to_string(),
        })?;

    let read_id = package.id;
    let quote_no_owned = quote_no.to_string();
    let txn_hash = hash.clone();
    let release_pkg_id = store.transaction(move |txn| {
        let current = txn
            .current_package(quote.id)
            .ok_or(ReleaseError::LayoutNotFound {
                quote_no: quote_no_owned.clone(),
            })?;
        if current.id != read_id {
            return Err(ReleaseError::LayoutChangedDuringRelease {
                quote_no: quote_no_owned.clone(),
                read_id,
                current_id: current.id,
            }
            .into());
        }
        // Same id is not enough: an edit and a compensating re-edit could
        // leave the id unchanged with different content.
        if geometry_hash(&current.layout) != txn_hash {
            return Err(ReleaseError::GeometryChangedDuringRelease {
                quote_no: quote_no_owned.clone(),
            }
            .into());
        }

        let layout = current.layout.clone();
        let snapshot = txn.insert_package(
            quote.id,
            layout,
            Some(format!("release snapshot of package {}", read_id)),
            bundle.svg,
            bundle.dxf,
            Some(bundle.step),
        );

        let q = txn
            .quote_mut(&quote_no_owned)
            .ok_or(ReleaseError::QuoteNotFound {
                quote_no: quote_no_owned.clone(),
            })?;
        q.locked = true;
        q.geometry_hash = Some(txn_hash.clone());
        q.locked_at = Some(Utc::now());

        let next = next_revision_letter(q.released_rev.as_deref());
        q.released_rev = Some(next.clone());
        q.revision = Some(next);
        if q.stage_rev.is_none() {
            q.stage_rev = Some(STAGE_REV_SEED.to_string());
        }

        Ok(snapshot.id)
    })?;

    info!(quote_no, %hash, release_pkg_id, "quote locked");
    Ok(ReleaseOutcome {
        locked: true,
        geometry_hash: Some(hash),
        release_pkg_id: Some(release_pkg_id),
    })
}

/// Unlock a quote. Idempotent; clears only the lock fields.
pub fn unlock_quote(store: &PackageStore, quote_no: &str) -> Result<Quote> {
    let quote_no_owned = quote_no.to_string();
    let quote = store.transaction(move |txn| {
        let q = txn
            .quote_mut(&quote_no_owned)
            .ok_or(ReleaseError::QuoteNotFound {
                quote_no: quote_no_owned.clone(),
            })?;
        q.locked = false;
        q.locked_at = None;
        q.geometry_hash = None;
        Ok(q.clone())
    })?;
    debug!(quote_no, "quote unlocked");
    Ok(quote)
}

/// Next released revision letter: A, B, ... Z, AA, AB, ...
///
/// Append-only and monotonic; malformed input restarts the sequence.
pub fn next_revision_letter(current: Option<&str>) -> String {
    let cur = match current {
        Some(cur) => cur.trim().to_ascii_uppercase(),
        None => return "A".to_string(),
    };
    if cur.is_empty() || !cur.bytes().all(|b| b.is_ascii_uppercase()) {
        return "A".to_string();
    }
    let mut bytes = cur.into_bytes();
    let mut i = bytes.len();
    while i > 0 {
        i -= 1;
        if bytes[i] < b'Z' {
            bytes[i] += 1;
            return String::from_utf8_lossy(&bytes).into_owned();
        }
        bytes[i] = b'A';
    }
    bytes.insert(0, b'A');
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Exporter that rewrites the current package's layout in place, id
    /// unchanged, between the outer read and the lock transaction. The
    /// append-only store cannot produce this through its public API; the
    /// recheck exists because a relational backing store could.
    struct RewriteInPlaceExporter<'a> {
        store: &'a PackageStore,
    }

    impl Exporter for RewriteInPlaceExporter<'_> {
        fn render(
            &self,
            layout: &LayoutModel,
            hash: &str,
        ) -> std::result::Result<ExportBundle, ExportError> {
            let package = self
                .store
                .current_package("Q-1")
                .expect("quote")
                .expect("package");
            let mut changed = package.layout.clone();
            changed.block.length_in += 1.0;
            self.store
                .transaction(move |txn| {
                    txn.overwrite_package_layout(package.id, changed);
                    Ok(())
                })
                .expect("rewrite");
            DefaultExporter.render(layout, hash)
        }
    }

    #[test]
    fn test_same_id_content_change_caught_by_hash_recheck() {
        let store = PackageStore::new();
        store.create_quote("Q-1");
        store
            .apply_layout("Q-1", LayoutModel::fallback(), None)
            .expect("apply");

        let exporter = RewriteInPlaceExporter { store: &store };
        let err = lock_quote(&store, &exporter, "Q-1").unwrap_err();
        assert_eq!(err.code(), Some("GEOMETRY_CHANGED_DURING_RELEASE"));
        assert!(err.is_conflict());

        // The aborted lock wrote nothing.
        let quote = store.quote("Q-1").expect("quote");
        assert!(!quote.locked);
        assert!(quote.geometry_hash.is_none());
        assert!(quote.released_rev.is_none());
    }

    #[test]
    fn test_revision_sequence() {
        assert_eq!(next_revision_letter(None), "A");
        assert_eq!(next_revision_letter(Some("A")), "B");
        assert_eq!(next_revision_letter(Some("Y")), "Z");
        assert_eq!(next_revision_letter(Some("Z")), "AA");
        assert_eq!(next_revision_letter(Some("AA")), "AB");
        assert_eq!(next_revision_letter(Some("AZ")), "BA");
        assert_eq!(next_revision_letter(Some("ZZ")), "AAA");
    }

    #[test]
    fn test_revision_tolerates_malformed_input() {
        assert_eq!(next_revision_letter(Some("")), "A");
        assert_eq!(next_revision_letter(Some("3")), "A");
        assert_eq!(next_revision_letter(Some(" b ")), "C");
    }
}
