//! The persisted session blob and its versioned codec.

use serde::{Deserialize, Serialize};

use crate::filters::{DateFilterSet, FilterSet};
use crate::query_spec::QuerySpec;
use crate::search_const;
use crate::search_state::SearchType;


/// Snapshot of the active query, written to session storage after every
/// successful search and restored on startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub version: u32,
    /// Milliseconds since the epoch when the snapshot was taken.
    pub date: i64,
    pub term: String,
    pub q: QuerySpec,
    pub filters: FilterSet,
    pub date_filters: DateFilterSet,
    pub search_type: SearchType,
    pub sort: Option<String>,
    pub site: String,
    pub start: u64,
}

/// Serialize a snapshot to the persisted JSON form.
pub fn encode(saved: &SavedQuery) -> serde_json::Result<String> {
    serde_json::to_string(saved)
}

/// Deserialize a persisted blob. Missing, malformed or version-mismatched
/// input reads as absent so callers fall back to fresh initialization.
pub fn decode(blob: &str) -> Option<SavedQuery> {
    let saved: SavedQuery = serde_json::from_str(blob).ok()?;
    if saved.version != search_const::SESSION_VERSION {
        return None;
    }
    Some(saved)
}
