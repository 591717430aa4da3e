//! Wire-level query parameter sets for the engine's select endpoint.

use serde::{Deserialize, Serialize};

use crate::search_const;


/// Facet options layered onto a base query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FacetParams {
    /// Plain field facet, counts sorted descending.
    Field { field: String, offset: u64, limit: u64 },
    /// Range facet over fixed-width buckets.
    Range { field: String, start: String, end: String, gap: String },
}


/// A fully rendered query: a pure function of the search state and filter
/// sets, never stored as authoritative state on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub q: String,
    pub start: u64,
    pub rows: u64,
    /// Single joined filter-query clause; empty when no filters are active.
    pub fq: String,
    /// Explicit result sort, used by the outer-bounds probes.
    pub sort: Option<String>,
    pub grouped: bool,
    /// Per-group document cap; `-1` lifts the cap for group drill-down.
    pub group_limit: Option<i64>,
    pub highlight: bool,
    pub facet: Option<FacetParams>,
}

impl QuerySpec {
    /// Render the spec as request parameters for the select endpoint.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("q".into(), self.q.clone()),
            ("start".into(), self.start.to_string()),
            ("rows".into(), self.rows.to_string()),
            ("wt".into(), "json".into()),
            ("fq".into(), self.fq.clone()),
        ];

        if self.grouped {
            params.push(("group".into(), "true".into()));
            params.push(("group.field".into(), search_const::GROUP_FIELD.into()));
            params.push(("group.sort".into(), search_const::GROUP_SORT.into()));
            params.push(("group.ngroups".into(), "true".into()));
            if let Some(limit) = self.group_limit {
                params.push(("group.limit".into(), limit.to_string()));
            }
        }

        if self.highlight {
            params.push(("hl".into(), "true".into()));
            params.push(("hl.simple.pre".into(), search_const::HIGHLIGHT_PRE.into()));
            params.push(("hl.simple.post".into(), search_const::HIGHLIGHT_POST.into()));
        }

        if let Some(sort) = &self.sort {
            params.push(("sort".into(), sort.clone()));
        }

        match &self.facet {
            Some(FacetParams::Field { field, offset, limit }) => {
                params.push(("facet".into(), "true".into()));
                params.push(("facet.field".into(), field.clone()));
                params.push(("facet.limit".into(), limit.to_string()));
                params.push(("facet.sort".into(), "count".into()));
                params.push(("facet.offset".into(), offset.to_string()));
            }
            Some(FacetParams::Range { field, start, end, gap }) => {
                params.push(("facet".into(), "true".into()));
                params.push(("facet.range".into(), field.clone()));
                params.push(("facet.range.start".into(), start.clone()));
                params.push(("facet.range.end".into(), end.clone()));
                params.push(("facet.range.gap".into(), gap.clone()));
            }
            None => {}
        }

        params
    }
}
