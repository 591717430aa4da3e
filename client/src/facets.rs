//! Facet count refreshes and date-facet bucket compilation, layered on
//! top of the current query context.

use anyhow::Context;
use chrono::{Datelike, Utc};
use common::query_spec::{FacetParams, QuerySpec};
use common::search_result::{DateBucket, FacetEntry};
use tracing::warn;

use crate::events::SearchEvent;
use crate::search::SearchService;
use crate::solr::SolrApi;


const DEFAULT_FACET_LIMIT: u64 = 10;

/// Clamp a bucket's inclusive end to the overall bound and the current
/// calendar year.
fn bucket_end(range_start: i32, interval: i32, end_year: i32, this_year: i32) -> i32 {
    let mut range_end = range_start + interval - 1;
    if range_end > end_year {
        range_end = end_year;
    }
    if range_end > this_year {
        range_end = this_year;
    }
    range_end
}

fn leading_year(timestamp: &str) -> Option<i32> {
    timestamp.split('-').next()?.parse().ok()
}


impl<A: SolrApi> SearchService<A> {
    /// Refresh the counts for one facet field. The facet query reuses
    /// the current query as its base so counts reflect the other active
    /// filters. Replaces any prior counts for the field.
    pub async fn update_facet_count(
        &mut self,
        field: &str,
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> anyhow::Result<()> {
        let mut query = self.build_query(0, None, None);
        query.rows = 0;
        query.facet = Some(FacetParams::Field {
            field: field.to_string(),
            offset: offset.unwrap_or(0),
            limit: limit.unwrap_or(DEFAULT_FACET_LIMIT),
        });

        let response = self.api.select(&self.state.select_url(), &query).await?;
        let Some(facet_counts) = response.facet_counts else {
            return Ok(());
        };

        for (field, flat) in facet_counts.facet_fields {
            let entries = flat
                .chunks(2)
                .filter_map(|pair| match pair {
                    [value, count] => Some(FacetEntry {
                        value: match value {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        },
                        count: count.as_u64().unwrap_or(0),
                        selected: false,
                    }),
                    _ => None,
                })
                .collect();
            self.facets.insert(field.clone(), entries);
            self.publish(SearchEvent::FacetsUpdated { field });
        }
        Ok(())
    }

    /// Refresh every currently tracked facet field against the current
    /// context, then nudge date-facet consumers. Individual failures are
    /// logged and do not stop the fan-out.
    pub async fn update_all_facet_counts(&mut self) {
        let fields: Vec<String> = self.facets.keys().cloned().collect();
        for field in fields {
            if let Err(err) = self.update_facet_count(&field, None, None).await {
                warn!("facet refresh for '{field}' failed: {err:#}");
            }
        }
        self.publish(SearchEvent::RefreshDateFacets);
    }

    /// Compile date-range buckets for a field over `[start_year,
    /// end_year]` in `interval`-year steps, keyed by `field_id`.
    pub async fn compile_date_facets(
        &mut self,
        field: &str,
        id: &str,
        start_year: i32,
        end_year: i32,
        interval: i32,
    ) -> anyhow::Result<()> {
        self.publish(SearchEvent::DateFacetsReset);

        let mut query = self.build_query(0, None, None);
        query.rows = 0;
        query.facet = Some(FacetParams::Range {
            field: field.to_string(),
            start: format!("{start_year}-01-01T00:00:00Z"),
            end: format!("{end_year}-12-31T23:59:59Z"),
            gap: format!("+{interval}YEARS"),
        });

        let response = self.api.select(&self.state.select_url(), &query).await?;
        let counts = response
            .facet_counts
            .and_then(|mut section| section.facet_ranges.remove(field))
            .map(|range| range.counts)
            .unwrap_or_default();

        let this_year = Utc::now().year();
        let buckets: Vec<DateBucket> = counts
            .chunks(2)
            .filter_map(|pair| match pair {
                [bucket_start, count] => {
                    let range_start = leading_year(bucket_start.as_str()?)?;
                    Some(DateBucket {
                        range_start,
                        range_end: bucket_end(range_start, interval, end_year, this_year),
                        count: count.as_u64().unwrap_or(0),
                    })
                }
                _ => None,
            })
            .collect();

        let key = format!("{field}_{id}");
        self.date_facets.insert(key.clone(), buckets);
        self.publish(SearchEvent::DateFacetsReady { key });
        Ok(())
    }

    /// Discover the dataset's earliest and latest existence dates with
    /// two single-row probes, then compile the buckets over them.
    pub async fn date_outer_bounds(
        &mut self,
        field: &str,
        id: &str,
        interval: i32,
    ) -> anyhow::Result<()> {
        let earliest = self.probe_bound("exist_from asc", "exist_from").await?;
        let latest = self.probe_bound("exist_from desc", "exist_to").await?;

        let start_year = leading_year(&earliest).context("unparseable earliest existence date")?;
        let end_year = leading_year(&latest).context("unparseable latest existence date")?;
        self.date_start_boundary = Some(earliest);
        self.date_end_boundary = Some(latest);

        self.compile_date_facets(field, id, start_year, end_year, interval).await
    }

    async fn probe_bound(&mut self, sort: &str, date_field: &str) -> anyhow::Result<String> {
        let query = QuerySpec {
            q: "*:*".to_string(),
            start: 0,
            rows: 1,
            fq: String::new(),
            sort: Some(sort.to_string()),
            grouped: false,
            group_limit: None,
            highlight: false,
            facet: None,
        };
        let response = self.api.select(&self.state.select_url(), &query).await?;
        let doc = response
            .response
            .and_then(|doclist| doclist.docs.into_iter().next())
            .with_context(|| format!("no documents for '{sort}' bound probe"))?;
        doc.get(date_field)
            .and_then(|value| value.as_str())
            .map(|value| value.to_string())
            .with_context(|| format!("probe document has no '{date_field}' field"))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_end_clamps_to_the_overall_bound() {
        assert_eq!(bucket_end(1850, 10, 1950, 2100), 1859);
        assert_eq!(bucket_end(1945, 10, 1950, 2100), 1950);
    }

    #[test]
    fn bucket_end_clamps_to_the_current_year() {
        assert_eq!(bucket_end(2090, 20, 2200, 2100), 2100);
    }

    #[test]
    fn leading_year_parses_engine_timestamps() {
        assert_eq!(leading_year("1850-01-01T00:00:00Z"), Some(1850));
        assert_eq!(leading_year("not a date"), None);
    }
}
