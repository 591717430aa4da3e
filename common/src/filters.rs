//! Named and date-range filter bookkeeping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};


/// Selected facet values, keyed by facet field. An entry disappears when
/// its last value is toggled off.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(BTreeMap<String, Vec<String>>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the value if absent, remove it if present. Removing the last
    /// value for a field deletes the field's entry entirely.
    pub fn toggle(&mut self, field: &str, value: &str) {
        match self.0.get_mut(field) {
            None => {
                self.0.insert(field.to_string(), vec![value.to_string()]);
            }
            Some(values) => {
                if let Some(idx) = values.iter().position(|v| v == value) {
                    values.remove(idx);
                    if values.is_empty() {
                        self.0.remove(field);
                    }
                } else {
                    values.push(value.to_string());
                }
            }
        }
    }

    pub fn remove_field(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str, value: &str) -> bool {
        self.0.get(field).is_some_and(|v| v.iter().any(|x| x == value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}


/// A selected date window, optionally carrying an existence-field pair for
/// interval-overlap filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    /// Lower bound timestamp, e.g. `1850-01-01T00:00:00Z`.
    pub from: String,
    /// Upper bound timestamp, e.g. `1860-12-31T23:59:59Z`.
    pub to: String,
    pub facet_field: String,
    /// Display label the range was derived from, e.g. `1850 - 1860`.
    pub label: String,
    pub existence_from_field: Option<String>,
    pub existence_to_field: Option<String>,
}

impl DateRange {
    /// Build a range from a `"<lower> - <upper>"` year label.
    pub fn from_label(
        facet_field: &str,
        label: &str,
        existence_from_field: Option<&str>,
        existence_to_field: Option<&str>,
    ) -> Self {
        let mut parts = label.splitn(2, " - ");
        let lower = parts.next().unwrap_or("").trim();
        let upper = parts.next().unwrap_or(lower).trim();
        Self {
            from: format!("{lower}-01-01T00:00:00Z"),
            to: format!("{upper}-12-31T23:59:59Z"),
            facet_field: facet_field.to_string(),
            label: label.to_string(),
            existence_from_field: existence_from_field.map(|f| f.to_string()),
            existence_to_field: existence_to_field.map(|f| f.to_string()),
        }
    }

    /// Composite key identifying this selection: the existence-field pair
    /// when present, the facet field otherwise, plus the flattened label.
    pub fn marker(&self) -> String {
        let label = self.label.replace(" - ", "_");
        match (&self.existence_from_field, &self.existence_to_field) {
            (Some(from), Some(to)) => format!("{from}-{to}-{label}"),
            _ => format!("{}-{label}", self.facet_field),
        }
    }
}


/// Selected date ranges keyed by their composite marker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateFilterSet(BTreeMap<String, DateRange>);

impl DateFilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the range if its marker is absent, remove it if present.
    pub fn toggle(&mut self, range: DateRange) {
        let marker = range.marker();
        if self.0.remove(&marker).is_none() {
            self.0.insert(marker, range);
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_marker(&self, marker: &str) -> bool {
        self.0.contains_key(marker)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DateRange)> {
        self.0.iter()
    }
}
