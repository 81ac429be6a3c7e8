//! Persistent records: versioned layout packages and quote lock state.
//!
//! A layout package is immutable once inserted; every edit produces a new
//! row and "current" means greatest `(created_at, id)`. The quote record
//! carries only the lock/revision fields this core owns; pricing and the
//! rest of the quote live elsewhere.

use chrono::{DateTime, Utc};
use foamkit_geometry::LayoutModel;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One immutable, versioned snapshot of a quote's layout and its exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPackage {
    /// Monotonic row id, assigned by the store on insert.
    pub id: i64,
    /// Owning quote.
    pub quote_id: Uuid,
    /// The canonical layout model frozen into this package.
    pub layout: LayoutModel,
    /// Free-form operator notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// SVG artifact rendered at insert time.
    pub svg_text: String,
    /// DXF artifact rendered at insert time.
    pub dxf_text: String,
    /// STEP artifact; absent when solid generation was unavailable for a
    /// draft package. Release snapshots always carry one.
    #[serde(default)]
    pub step_text: Option<String>,
    /// Insertion timestamp; part of the "current package" ordering.
    pub created_at: DateTime<Utc>,
}

/// Lock and revision state of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    /// Human-facing quote number, unique per store.
    pub quote_no: String,
    /// True between a successful lock and the next unlock.
    pub locked: bool,
    /// Geometry hash frozen by the lock; cleared on unlock.
    #[serde(default)]
    pub geometry_hash: Option<String>,
    #[serde(default)]
    pub locked_at: Option<DateTime<Utc>>,
    /// Effective revision shown on drawings; equals `released_rev` after a
    /// lock.
    #[serde(default)]
    pub revision: Option<String>,
    /// Staging revision; advanced only by the out-of-scope Revise flow,
    /// never by lock or unlock.
    #[serde(default)]
    pub stage_rev: Option<String>,
    /// Last released revision letter (A, B, ... Z, AA, ...).
    #[serde(default)]
    pub released_rev: Option<String>,
}

impl Quote {
    /// A fresh, unlocked quote with no revision history.
    pub fn new(quote_no: impl Into<String>) -> Self {
        Quote {
            id: Uuid::new_v4(),
            quote_no: quote_no.into(),
            locked: false,
            geometry_hash: None,
            locked_at: None,
            revision: None,
            stage_rev: None,
            released_rev: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_quote_is_unlocked() {
        let q = Quote::new("Q-1001");
        assert_eq!(q.quote_no, "Q-1001");
        assert!(!q.locked);
        assert!(q.geometry_hash.is_none());
        assert!(q.revision.is_none());
        assert!(q.stage_rev.is_none());
    }

    #[test]
    fn test_quote_serde_camel_case() {
        let q = Quote::new("Q-1001");
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"quoteNo\":\"Q-1001\""));
        assert!(json.contains("\"geometryHash\":null"));
        assert!(json.contains("\"stageRev\":null"));
        let back: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }
}
