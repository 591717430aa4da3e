//! Engine-facing pieces: parameter building, response shapes, transport.

pub mod params;
pub mod response;

mod client;
pub use client::{HttpSolrClient, SolrApi};
