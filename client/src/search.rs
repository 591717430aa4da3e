//! The search executor: state machine, result normalization, filter
//! toggles, pagination and session persistence.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use common::filters::{DateFilterSet, DateRange, FilterSet};
use common::query_spec::QuerySpec;
use common::search_const;
use common::search_result::{DateBucket, FacetEntry, ResultGroup, ResultSet};
use common::search_state::SearchState;
use common::session::{self, SavedQuery};
use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::events::{EventBus, SearchEvent};
use crate::logging;
use crate::session_store::SessionStore;
use crate::solr::params;
use crate::solr::response::SolrResponse;
use crate::solr::SolrApi;


/// Where the executor currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Querying,
    Completed,
    Empty,
    /// The transport exhausted its retries.
    Failed,
}

/// The hosting view. The document viewer triggers the two-phase search
/// that fetches full context before the highlighting match map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewContext {
    Results,
    DocumentViewer,
}

/// Query parameters carried on the location at startup. `q` sets the
/// term; every other key toggles a filter value on.
pub type LocationParams = BTreeMap<String, Vec<String>>;

/// Delay before `AppReady` fires, letting dependent widgets attach
/// their subscriptions first.
const READY_DELAY: Duration = Duration::from_secs(1);


/// Session-wide search orchestrator. Owns the search state explicitly;
/// hosts hold one instance and subscribe to its event bus.
pub struct SearchService<A: SolrApi> {
    pub config: Configuration,
    pub state: SearchState,
    pub filters: FilterSet,
    pub date_filters: DateFilterSet,
    pub results: ResultSet,
    pub facets: BTreeMap<String, Vec<FacetEntry>>,
    pub date_facets: BTreeMap<String, Vec<DateBucket>>,
    /// Highlighting match map from the viewer's follow-up term query.
    pub matches: Option<serde_json::Value>,
    pub phase: SearchPhase,
    pub view_context: ViewContext,
    /// Dataset existence bounds discovered by the outer-bounds probes.
    pub date_start_boundary: Option<String>,
    pub date_end_boundary: Option<String>,
    hide_details: bool,
    search_seq: u64,
    pub(crate) api: A,
    session: Box<dyn SessionStore + Send>,
    bus: EventBus,
}

impl<A: SolrApi> SearchService<A> {
    pub fn new(
        config: Configuration,
        api: A,
        session: Box<dyn SessionStore + Send>,
    ) -> anyhow::Result<Self> {
        let state = SearchState::new(config.deployment_url()?, &config.site, config.search_type);
        Ok(Self {
            config,
            state,
            filters: FilterSet::new(),
            date_filters: DateFilterSet::new(),
            results: ResultSet::empty("*"),
            facets: BTreeMap::new(),
            date_facets: BTreeMap::new(),
            matches: None,
            phase: SearchPhase::Idle,
            view_context: ViewContext::Results,
            date_start_boundary: None,
            date_end_boundary: None,
            hide_details: false,
            search_seq: 0,
            api,
            session,
            bus: EventBus::default(),
        })
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SearchEvent> {
        self.bus.subscribe()
    }

    pub(crate) fn publish(&self, event: SearchEvent) {
        self.bus.publish(event);
    }

    /// Initialize the session. Location parameters override any saved
    /// query; a saved query for a different site is discarded. Emits
    /// `AppReady` once, after a settling delay.
    ///
    /// Must run inside a tokio runtime.
    pub fn init(&mut self, location: LocationParams) {
        logging::init(&self.config.log_level);
        info!("############");
        info!("############ APPLICATION INITIALISED");
        info!("############");
        debug!("select endpoint: {}", self.state.select_url());
        debug!("site: {}", self.state.site);

        // location parameters override saved queries
        if !location.is_empty() {
            self.session.remove(search_const::SESSION_KEY);
        }

        match self.load_saved() {
            Some(saved) => self.restore_saved(saved),
            None => self.bootstrap(location),
        }

        let bus = self.bus.clone();
        tokio::spawn(async move {
            tokio::time::sleep(READY_DELAY).await;
            bus.publish(SearchEvent::AppReady);
        });
    }

    /// Read the persisted blob. A blob saved for a different site is
    /// dropped; malformed or missing data reads as absent.
    fn load_saved(&mut self) -> Option<SavedQuery> {
        let blob = self.session.get(search_const::SESSION_KEY)?;
        let saved = session::decode(&blob)?;
        if saved.site != self.state.site {
            self.session.remove(search_const::SESSION_KEY);
            return None;
        }
        Some(saved)
    }

    fn restore_saved(&mut self, saved: SavedQuery) {
        info!("initialising from saved query");
        self.state.term = saved.term;
        self.state.search_type = saved.search_type;
        self.state.sort = saved.sort;
        self.state.start = saved.start;
        self.filters = saved.filters;
        self.date_filters = saved.date_filters;
    }

    fn bootstrap(&mut self, location: LocationParams) {
        info!("bootstrapping fresh state");
        self.state.term = location
            .get("q")
            .and_then(|values| values.first())
            .cloned()
            .unwrap_or_else(|| "*".to_string());

        for (key, values) in &location {
            if key == "q" {
                continue;
            }
            for value in values {
                self.filters.toggle(key, value);
            }
        }
    }

    /// The current query rendered for the given offset.
    pub fn build_query(&self, start: u64, group_id: Option<&str>, override_term: Option<&str>) -> QuerySpec {
        params::build_query(
            &self.state,
            &self.config,
            &self.filters,
            &self.date_filters,
            start,
            group_id,
            override_term,
        )
    }

    /// Persist the current query to the session store.
    pub(crate) fn save_current_search(&mut self) {
        let saved = SavedQuery {
            version: search_const::SESSION_VERSION,
            date: Utc::now().timestamp_millis(),
            term: self.state.term.clone(),
            q: self.build_query(0, None, None),
            filters: self.filters.clone(),
            date_filters: self.date_filters.clone(),
            search_type: self.state.search_type,
            sort: self.state.sort.clone(),
            site: self.state.site.clone(),
            start: self.state.start,
        };
        match session::encode(&saved) {
            Ok(blob) => self.session.set(search_const::SESSION_KEY, blob),
            Err(err) => warn!("failed to encode session blob: {err}"),
        }
    }

    /// Run a search from the given offset, optionally narrowed to one
    /// group. In the document viewer with a real term, a wildcard query
    /// fetches the full context first and a follow-up term query fills
    /// the highlighting match map.
    pub async fn search(&mut self, start: u64, group_id: Option<&str>) -> anyhow::Result<()> {
        let seq = self.begin_search(start);

        let viewer_with_term =
            self.view_context == ViewContext::DocumentViewer && self.state.term != "*";

        if viewer_with_term {
            let context_query = self.build_query(start, group_id, Some("*"));
            let response = match self.api.select(&self.state.select_url(), &context_query).await {
                Ok(response) => response,
                Err(err) => return self.fail(seq, err),
            };
            if self.is_stale(seq) {
                return Ok(());
            }
            self.ingest(response).await;

            // follow-up with the real term, solely for the match map
            let term_query = self.build_query(start, group_id, None);
            match self.api.select(&self.state.select_url(), &term_query).await {
                Ok(response) => {
                    if self.is_stale(seq) {
                        return Ok(());
                    }
                    self.matches = response.highlighting;
                    self.publish(SearchEvent::MatchesAvailable);
                }
                Err(err) => return self.fail(seq, err),
            }
            Ok(())
        } else {
            let query = self.build_query(start, group_id, None);
            debug!("query: {:?}", query);
            let outcome = self.api.select(&self.state.select_url(), &query).await;
            self.complete_search(seq, outcome).await
        }
    }

    /// Record a new search issue: the offset it runs from, the Querying
    /// phase, and a fresh sequence id the response must be applied with.
    /// Hosts scheduling their own transport pair this with
    /// [`complete_search`](Self::complete_search).
    pub fn begin_search(&mut self, start: u64) -> u64 {
        self.state.start = start;
        self.search_seq += 1;
        self.phase = SearchPhase::Querying;
        self.search_seq
    }

    /// Apply a transport outcome for an issued search. An outcome whose
    /// id is older than the latest issue is discarded without touching
    /// state, so overlapping searches resolve to the latest request
    /// issued rather than the latest response to land.
    pub async fn complete_search(
        &mut self,
        seq: u64,
        outcome: anyhow::Result<SolrResponse>,
    ) -> anyhow::Result<()> {
        match outcome {
            Ok(response) => {
                if self.is_stale(seq) {
                    return Ok(());
                }
                self.matches = None;
                self.ingest(response).await;
                Ok(())
            }
            Err(err) => self.fail(seq, err),
        }
    }

    /// A response is stale when a newer search was issued while it was
    /// in flight.
    fn is_stale(&self, seq: u64) -> bool {
        seq != self.search_seq
    }

    fn fail(&mut self, seq: u64, err: anyhow::Error) -> anyhow::Result<()> {
        if self.is_stale(seq) {
            return Ok(());
        }
        warn!("search failed: {err:#}");
        self.phase = SearchPhase::Failed;
        self.publish(SearchEvent::SearchFailed { message: format!("{err:#}") });
        Err(err)
    }

    /// Normalize a response into the display-ready result set, refresh
    /// facet counts, persist the session and announce the update.
    pub(crate) async fn ingest(&mut self, response: SolrResponse) {
        // the echo is authoritative for the producing offset
        let start = response
            .response_header
            .params
            .start_offset()
            .unwrap_or(self.state.start);
        let grouped = response
            .grouped
            .and_then(|mut sections| sections.remove(search_const::GROUP_FIELD));

        match grouped {
            Some(section) if section.matches > 0 => {
                let items = section
                    .groups
                    .into_iter()
                    .enumerate()
                    .map(|(index, group)| ResultGroup {
                        num_found: group.doclist.num_found,
                        start: group.doclist.start,
                        docs: group.doclist.docs,
                        sequence_no: start + index as u64 + 1,
                    })
                    .collect();
                self.results = ResultSet {
                    term: self.state.term.clone(),
                    total_groups: section.ngroups,
                    total_matches: section.matches,
                    start,
                    items,
                    highlighting: response.highlighting.unwrap_or(serde_json::Value::Null),
                };
                self.phase = SearchPhase::Completed;
            }
            _ => {
                let mut results = ResultSet::empty(self.state.term.clone());
                results.start = start;
                self.results = results;
                self.phase = SearchPhase::Empty;
            }
        }

        self.update_all_facet_counts().await;
        self.save_current_search();
        self.publish(SearchEvent::ResultsUpdated);
    }

    pub async fn next_page(&mut self) -> anyhow::Result<()> {
        let start = self.state.start + self.state.rows;
        self.search(start, None).await
    }

    pub async fn previous_page(&mut self) -> anyhow::Result<()> {
        let start = self.state.start.saturating_sub(self.state.rows);
        self.search(start, None).await
    }

    /// Re-run the current search from the first page with the updated
    /// sort order.
    pub async fn re_sort(&mut self) -> anyhow::Result<()> {
        self.search(0, None).await
    }

    /// Toggle one facet value. Unless suppressed, resets pagination and
    /// re-searches.
    pub async fn toggle_filter(
        &mut self,
        field: &str,
        value: &str,
        suppress_search: bool,
    ) -> anyhow::Result<()> {
        self.filters.toggle(field, value);
        if !suppress_search {
            self.search(0, None).await?;
        }
        Ok(())
    }

    /// Toggle a date-range filter, keyed by its composite marker.
    pub async fn toggle_date_filter(&mut self, range: DateRange) -> anyhow::Result<()> {
        self.date_filters.toggle(range);
        self.search(0, None).await
    }

    /// Drop every selected value for one field and re-search.
    pub async fn clear_filter(&mut self, field: &str) -> anyhow::Result<()> {
        self.filters.remove_field(field);
        self.search(0, None).await
    }

    /// Empty both filter sets, re-search and tell bound UI to reset its
    /// own selection state.
    pub async fn clear_all_filters(&mut self) -> anyhow::Result<()> {
        self.filters.clear();
        self.date_filters.clear();
        let outcome = self.search(0, None).await;
        self.publish(SearchEvent::ResetAllFilters);
        outcome
    }

    /// Flip the result-detail visibility flag.
    pub fn toggle_details(&mut self) {
        self.hide_details = !self.hide_details;
        if self.hide_details {
            self.publish(SearchEvent::HideResultDetails);
        } else {
            self.publish(SearchEvent::ShowResultDetails);
        }
    }

    pub fn details_hidden(&self) -> bool {
        self.hide_details
    }
}
