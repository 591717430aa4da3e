//! Shared data model for the search client: query state, filter sets,
//! result shapes and the persisted session blob.

extern crate serde;


pub mod search_state;
pub mod filters;
pub mod query_spec;
pub mod search_result;
pub mod search_const;
pub mod session;
