//! Append-only layout package store.
//!
//! Stands in for the product's relational store with the same transaction
//! discipline: packages are only ever inserted, quotes are mutated only
//! inside a transaction, and a transaction commits or aborts as a whole.
//! All state sits behind one `parking_lot::Mutex`, so transactions are
//! serialized and a committed read is always consistent.

use crate::package::{LayoutPackage, Quote};
use chrono::Utc;
use foamkit_core::{ReleaseError, Result};
use foamkit_export::{render_dxf, render_step, render_svg};
use foamkit_geometry::LayoutModel;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// Mutable view of the store contents inside a transaction.
///
/// Everything a closure does to this view is applied to a staged copy and
/// becomes visible only when the closure returns `Ok`.
#[derive(Debug, Clone, Default)]
pub struct StoreTxn {
    quotes: HashMap<String, Quote>,
    packages: Vec<LayoutPackage>,
    next_package_id: i64,
}

impl StoreTxn {
    /// Look up a quote by its quote number.
    pub fn quote(&self, quote_no: &str) -> Option<&Quote> {
        self.quotes.get(quote_no)
    }

    pub fn quote_mut(&mut self, quote_no: &str) -> Option<&mut Quote> {
        self.quotes.get_mut(quote_no)
    }

    fn insert_quote(&mut self, quote: Quote) {
        self.quotes.insert(quote.quote_no.clone(), quote);
    }

    /// The current package for a quote: greatest `(created_at, id)`.
    pub fn current_package(&self, quote_id: Uuid) -> Option<&LayoutPackage> {
        self.packages
            .iter()
            .filter(|p| p.quote_id == quote_id)
            .max_by_key(|p| (p.created_at, p.id))
    }

    /// All packages for a quote, oldest first.
    pub fn package_history(&self, quote_id: Uuid) -> Vec<&LayoutPackage> {
        let mut history: Vec<&LayoutPackage> = self
            .packages
            .iter()
            .filter(|p| p.quote_id == quote_id)
            .collect();
        history.sort_by_key(|p| (p.created_at, p.id));
        history
    }

    /// Insert a new package row. Rows are never updated or deleted.
    pub fn insert_package(
        &mut self,
        quote_id: Uuid,
        layout: LayoutModel,
        notes: Option<String>,
        svg_text: String,
        dxf_text: String,
        step_text: Option<String>,
    ) -> LayoutPackage {
        self.next_package_id += 1;
        let package = LayoutPackage {
            id: self.next_package_id,
            quote_id,
            layout,
            notes,
            svg_text,
            dxf_text,
            step_text,
            created_at: Utc::now(),
        };
        self.packages.push(package.clone());
        package
    }
}

#[cfg(test)]
impl StoreTxn {
    /// Test hook: overwrite a package's layout in place, keeping its id.
    ///
    /// The public API never does this (rows are append-only with unique
    /// ids); it exists to exercise the release flow's in-transaction hash
    /// recheck, which guards against exactly this shape of store.
    pub(crate) fn overwrite_package_layout(&mut self, id: i64, layout: LayoutModel) {
        if let Some(package) = self.packages.iter_mut().find(|p| p.id == id) {
            package.layout = layout;
        }
    }
}

/// In-memory, append-only store for quotes and their layout packages.
#[derive(Debug, Default)]
pub struct PackageStore {
    state: Mutex<StoreTxn>,
}

impl PackageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a quote, or return the existing one with that number.
    pub fn create_quote(&self, quote_no: &str) -> Quote {
        let mut state = self.state.lock();
        if let Some(existing) = state.quote(quote_no) {
            return existing.clone();
        }
        let quote = Quote::new(quote_no);
        debug!(quote_no, "created quote");
        state.insert_quote(quote.clone());
        quote
    }

    /// Fetch a quote by number.
    pub fn quote(&self, quote_no: &str) -> Result<Quote> {
        self.state
            .lock()
            .quote(quote_no)
            .cloned()
            .ok_or_else(|| {
                ReleaseError::QuoteNotFound {
                    quote_no: quote_no.to_string(),
                }
                .into()
            })
    }

    /// Record an edit: insert a new package for the quote's layout.
    ///
    /// Draft artifacts are rendered without an embedded hash; a failed STEP
    /// render leaves `step_text` empty rather than failing the edit.
    pub fn apply_layout(
        &self,
        quote_no: &str,
        layout: LayoutModel,
        notes: Option<String>,
    ) -> Result<LayoutPackage> {
        let svg_text = render_svg(&layout);
        let dxf_text = render_dxf(&layout);
        let step_text = render_step(&layout).ok();
        let quote_no = quote_no.to_string();
        self.transaction(move |txn| {
            let quote_id = txn
                .quote(&quote_no)
                .ok_or(ReleaseError::QuoteNotFound {
                    quote_no: quote_no.clone(),
                })?
                .id;
            Ok(txn.insert_package(quote_id, layout, notes, svg_text, dxf_text, step_text))
        })
    }

    /// The quote's current package, if any layout has ever been applied.
    pub fn current_package(&self, quote_no: &str) -> Result<Option<LayoutPackage>> {
        let state = self.state.lock();
        let quote = state.quote(quote_no).ok_or(ReleaseError::QuoteNotFound {
            quote_no: quote_no.to_string(),
        })?;
        Ok(state.current_package(quote.id).cloned())
    }

    /// All packages ever written for the quote, oldest first.
    pub fn package_history(&self, quote_no: &str) -> Result<Vec<LayoutPackage>> {
        let state = self.state.lock();
        let quote = state.quote(quote_no).ok_or(ReleaseError::QuoteNotFound {
            quote_no: quote_no.to_string(),
        })?;
        Ok(state
            .package_history(quote.id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Run `f` against a staged copy of the store under the single lock.
    ///
    /// On `Ok` the staged copy replaces the live state; on `Err` every
    /// mutation `f` made is discarded.
    pub fn transaction<T>(&self, f: impl FnOnce(&mut StoreTxn) -> Result<T>) -> Result<T> {
        let mut state = self.state.lock();
        let mut staged = state.clone();
        let value = f(&mut staged)?;
        *state = staged;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foamkit_core::Error;

    fn layout() -> LayoutModel {
        LayoutModel::fallback()
    }

    #[test]
    fn test_create_quote_idempotent() {
        let store = PackageStore::new();
        let a = store.create_quote("Q-1");
        let b = store.create_quote("Q-1");
        assert_eq!(a.id, b.id);
        assert_eq!(store.quote("Q-1").unwrap().id, a.id);
    }

    #[test]
    fn test_unknown_quote_is_not_found() {
        let store = PackageStore::new();
        let err = store.quote("Q-404").unwrap_err();
        assert!(err.is_not_found());
        assert!(store.apply_layout("Q-404", layout(), None).is_err());
    }

    #[test]
    fn test_apply_layout_appends() {
        let store = PackageStore::new();
        store.create_quote("Q-1");
        let first = store.apply_layout("Q-1", layout(), None).unwrap();
        let second = store
            .apply_layout("Q-1", layout(), Some("rev".to_string()))
            .unwrap();
        assert!(second.id > first.id);

        let history = store.package_history("Q-1").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, first.id);

        let current = store.current_package("Q-1").unwrap().unwrap();
        assert_eq!(current.id, second.id);
        assert_eq!(current.notes.as_deref(), Some("rev"));
    }

    #[test]
    fn test_draft_package_carries_artifacts() {
        let store = PackageStore::new();
        store.create_quote("Q-1");
        let pkg = store.apply_layout("Q-1", layout(), None).unwrap();
        assert!(pkg.svg_text.starts_with("<svg "));
        assert!(pkg.dxf_text.contains("$ACADVER"));
        assert!(pkg.step_text.is_some());
        // Draft artifacts are unhashed.
        assert!(!pkg.svg_text.contains("geometry-hash"));
    }

    #[test]
    fn test_transaction_aborts_without_side_effects() {
        let store = PackageStore::new();
        let quote = store.create_quote("Q-1");
        store.apply_layout("Q-1", layout(), None).unwrap();

        let result: Result<()> = store.transaction(|txn| {
            txn.insert_package(
                quote.id,
                layout(),
                None,
                String::new(),
                String::new(),
                None,
            );
            if let Some(q) = txn.quote_mut("Q-1") {
                q.locked = true;
            }
            Err(Error::other("boom"))
        });
        assert!(result.is_err());
        assert_eq!(store.package_history("Q-1").unwrap().len(), 1);
        assert!(!store.quote("Q-1").unwrap().locked);
    }

    #[test]
    fn test_transaction_commits_on_ok() {
        let store = PackageStore::new();
        store.create_quote("Q-1");
        store
            .transaction(|txn| {
                if let Some(q) = txn.quote_mut("Q-1") {
                    q.stage_rev = Some("AS".to_string());
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(store.quote("Q-1").unwrap().stage_rev.as_deref(), Some("AS"));
    }
}
