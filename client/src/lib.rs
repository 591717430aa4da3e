//! Query orchestrator brokering all communication between the search
//! engine and the UI layer: query construction, filter bookkeeping,
//! result normalization, facet refreshes and session persistence.

pub mod config;
pub mod logging;
pub mod events;
pub mod session_store;
pub mod solr;
pub mod search;
pub mod facets;
