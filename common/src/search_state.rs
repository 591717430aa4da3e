//! The active search state owned by the orchestrator.

use serde::{Deserialize, Serialize};

use crate::search_const;


/// How the entered term is interpreted when the query string is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Whitespace-separated words joined by the configured operator token.
    Keyword,
    /// The term is matched as one exact phrase.
    Phrase,
}

impl Default for SearchType {
    fn default() -> Self {
        SearchType::Phrase
    }
}


/// Mutable per-session search state. One instance per orchestrator,
/// passed explicitly rather than held in ambient globals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub term: String,
    pub search_type: SearchType,
    pub sort: Option<String>,
    /// Result offset of the current page.
    pub start: u64,
    /// Page size.
    pub rows: u64,
    /// The engine core this session targets.
    pub site: String,
    /// Base URL of the engine deployment.
    pub deployment: String,
}

impl SearchState {
    pub fn new(deployment: impl Into<String>, site: impl Into<String>, search_type: SearchType) -> Self {
        Self {
            term: "*".to_string(),
            search_type,
            sort: None,
            start: 0,
            rows: search_const::PAGE_SIZE,
            site: site.into(),
            deployment: deployment.into(),
        }
    }

    /// The select endpoint for this deployment and core.
    pub fn select_url(&self) -> String {
        format!("{}/{}/select", self.deployment, self.site)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_defaults_to_wildcard_term() {
        let state = SearchState::new("http://solr.example.org/solr", "FACP", SearchType::Phrase);
        assert_eq!(state.term, "*");
        assert_eq!(state.start, 0);
        assert_eq!(state.rows, search_const::PAGE_SIZE);
        assert_eq!(state.select_url(), "http://solr.example.org/solr/FACP/select");
    }
}
