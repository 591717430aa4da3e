//! Deployment and search configuration.

use std::collections::BTreeMap;

use anyhow::Context;
use common::search_const;
use common::search_state::SearchType;
use serde::{Deserialize, Serialize};


/// Operator joining multiple selected values of one facet field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnionOp {
    And,
    Or,
}

impl UnionOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnionOp::And => "AND",
            UnionOp::Or => "OR",
        }
    }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Known engine deployments, keyed by name.
    pub deployments: BTreeMap<String, String>,
    /// Name of the deployment to target.
    pub deployment: String,
    /// The engine core to target, e.g. `FACP`.
    pub site: String,
    pub search_type: SearchType,
    /// Operator substituted for whitespace in keyword searches.
    pub keyword_operator: String,
    /// Per-field union operator for multi-valued filters.
    pub filter_union: BTreeMap<String, UnionOp>,
    /// Earliest existence date present in the dataset.
    pub dataset_start: String,
    /// Latest existence date present in the dataset.
    pub dataset_end: String,
    pub rows: u64,
    pub log_level: String,
}

impl Default for Configuration {
    fn default() -> Self {
        let mut deployments = BTreeMap::new();
        deployments.insert("testing".to_string(), "http://localhost:8983/solr".to_string());
        deployments.insert("production".to_string(), "https://search.example.org/solr".to_string());
        Self {
            deployments,
            deployment: "testing".to_string(),
            site: "FACP".to_string(),
            search_type: SearchType::Keyword,
            keyword_operator: "AND".to_string(),
            filter_union: BTreeMap::new(),
            dataset_start: "1836-01-01T00:00:00Z".to_string(),
            dataset_end: "1950-12-31T23:59:59Z".to_string(),
            rows: search_const::PAGE_SIZE,
            log_level: "info".to_string(),
        }
    }
}

impl Configuration {
    /// Build a configuration from the environment, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            deployments: default.deployments,
            deployment: std::env::var("SEARCH_DEPLOYMENT").unwrap_or(default.deployment),
            site: std::env::var("SEARCH_SITE").unwrap_or(default.site),
            search_type: default.search_type,
            keyword_operator: std::env::var("SEARCH_KEYWORD_OPERATOR").unwrap_or(default.keyword_operator),
            filter_union: default.filter_union,
            dataset_start: std::env::var("SEARCH_DATASET_START").unwrap_or(default.dataset_start),
            dataset_end: std::env::var("SEARCH_DATASET_END").unwrap_or(default.dataset_end),
            rows: std::env::var("SEARCH_ROWS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.rows),
            log_level: std::env::var("SEARCH_LOG_LEVEL").unwrap_or(default.log_level),
        }
    }

    /// Base URL of the configured deployment.
    pub fn deployment_url(&self) -> anyhow::Result<&str> {
        self.deployments
            .get(&self.deployment)
            .map(|url| url.as_str())
            .with_context(|| format!("unknown deployment '{}'", self.deployment))
    }

    /// Union operator for one facet field. Fields without explicit
    /// configuration union with OR.
    pub fn union_op(&self, field: &str) -> UnionOp {
        self.filter_union.get(field).copied().unwrap_or(UnionOp::Or)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_deployment_is_an_error() {
        let mut config = Configuration::default();
        config.deployment = "staging".to_string();
        assert!(config.deployment_url().is_err());
    }

    #[test]
    fn union_op_defaults_to_or() {
        let mut config = Configuration::default();
        config.filter_union.insert("language".to_string(), UnionOp::And);
        assert_eq!(config.union_op("language"), UnionOp::And);
        assert_eq!(config.union_op("keywords"), UnionOp::Or);
    }
}
