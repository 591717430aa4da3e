//! Display-ready result and facet shapes.

use serde::{Deserialize, Serialize};


/// One engine-side group of result documents, in engine-provided order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultGroup {
    /// Total documents in the group.
    pub num_found: u64,
    /// Offset within the group's doclist.
    pub start: u64,
    pub docs: Vec<serde_json::Value>,
    /// 1-based position relative to the page's start offset.
    pub sequence_no: u64,
}


/// Normalized result of one search invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub term: String,
    pub total_groups: u64,
    pub total_matches: u64,
    /// Offset the producing query was issued with, echoed by the engine.
    pub start: u64,
    pub items: Vec<ResultGroup>,
    /// Highlighting snippets keyed by document id.
    pub highlighting: serde_json::Value,
}

impl ResultSet {
    /// The zero-count set an empty or absent response normalizes to.
    pub fn empty(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            total_groups: 0,
            total_matches: 0,
            start: 0,
            items: Vec::new(),
            highlighting: serde_json::Value::Null,
        }
    }
}


/// One facet value with its document count and selection state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetEntry {
    pub value: String,
    pub count: u64,
    pub selected: bool,
}


/// One bucket of a date range facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateBucket {
    pub range_start: i32,
    pub range_end: i32,
    pub count: u64,
}
