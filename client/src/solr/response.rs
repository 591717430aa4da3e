//! Raw response shapes from the engine's select endpoint.

use std::collections::BTreeMap;

use serde::Deserialize;


#[derive(Debug, Default, Deserialize)]
pub struct SolrResponse {
    #[serde(rename = "responseHeader", default)]
    pub response_header: ResponseHeader,
    /// Grouped results, keyed by the grouping field.
    #[serde(default)]
    pub grouped: Option<BTreeMap<String, GroupedSection>>,
    /// Highlighting snippets keyed by document id.
    #[serde(default)]
    pub highlighting: Option<serde_json::Value>,
    #[serde(default)]
    pub facet_counts: Option<FacetCountsSection>,
    /// Flat doclist for ungrouped probes.
    #[serde(default)]
    pub response: Option<DocList>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseHeader {
    #[serde(default)]
    pub params: EchoedParams,
}

/// Parameters the engine echoes back with the response. The echo is
/// authoritative for the offset a result set was produced with.
#[derive(Debug, Default, Deserialize)]
pub struct EchoedParams {
    #[serde(default)]
    pub start: Option<serde_json::Value>,
}

impl EchoedParams {
    /// The echoed start offset; the engine returns it as a string.
    pub fn start_offset(&self) -> Option<u64> {
        match &self.start {
            Some(serde_json::Value::String(s)) => s.parse().ok(),
            Some(serde_json::Value::Number(n)) => n.as_u64(),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GroupedSection {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub ngroups: u64,
    #[serde(default)]
    pub matches: u64,
}

#[derive(Debug, Deserialize)]
pub struct Group {
    #[serde(rename = "groupValue", default)]
    pub group_value: Option<serde_json::Value>,
    pub doclist: DocList,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocList {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub docs: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FacetCountsSection {
    /// Flat alternating value/count arrays per facet field.
    #[serde(default)]
    pub facet_fields: BTreeMap<String, Vec<serde_json::Value>>,
    #[serde(default)]
    pub facet_ranges: BTreeMap<String, RangeCounts>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeCounts {
    /// Flat alternating bucket-start/count array.
    #[serde(default)]
    pub counts: Vec<serde_json::Value>,
}
