//! Query and filter-clause construction. Pure functions over the current
//! state and filter sets.

use common::filters::{DateFilterSet, FilterSet};
use common::query_spec::QuerySpec;
use common::search_const;
use common::search_state::{SearchState, SearchType};

use crate::config::Configuration;


/// Build the main query for the given offset. A `group_id` narrows the
/// query to one group and lifts the per-group document cap; an
/// `override_term` replaces the state's term (the viewer uses this to
/// fetch full context with a wildcard).
pub fn build_query(
    state: &SearchState,
    config: &Configuration,
    filters: &FilterSet,
    date_filters: &DateFilterSet,
    start: u64,
    group_id: Option<&str>,
    override_term: Option<&str>,
) -> QuerySpec {
    let term = override_term.unwrap_or(&state.term);

    let mut q = match state.search_type {
        SearchType::Keyword => {
            let joined = term.replace(' ', &format!(" {} ", config.keyword_operator));
            format!(
                "title:({joined})^{} OR text:({joined})^{}",
                search_const::TITLE_BOOST,
                search_const::TEXT_BOOST
            )
        }
        SearchType::Phrase => format!(
            "title:\"{term}\"^{} OR text:\"{term}\"^{}",
            search_const::TITLE_BOOST,
            search_const::TEXT_BOOST
        ),
    };

    if let Some(id) = group_id {
        q.push_str(&format!(" AND {}:{id}", search_const::GROUP_FIELD));
    }

    QuerySpec {
        q,
        start,
        rows: state.rows,
        fq: build_filter_clause(filters, date_filters, config),
        sort: Some(
            state
                .sort
                .clone()
                .unwrap_or_else(|| search_const::RESULT_SORT.to_string()),
        ),
        grouped: true,
        group_limit: group_id.map(|_| -1),
        highlight: true,
        facet: None,
    }
}


/// Render the active filter sets as a single filter-query clause.
///
/// Named filters become `field:("v1" OP "v2")` with the field's configured
/// union operator. Date filters become plain range clauses, or the
/// symmetric overlap clause when an existence-field pair is present. Date
/// clauses OR-join into one parenthesized group which ANDs with the named
/// clauses; with no active filters the clause is empty.
pub fn build_filter_clause(
    filters: &FilterSet,
    date_filters: &DateFilterSet,
    config: &Configuration,
) -> String {
    let mut clauses: Vec<String> = filters
        .iter()
        .map(|(field, values)| {
            let op = config.union_op(field);
            let joined = values
                .iter()
                .map(|v| format!("\"{v}\""))
                .collect::<Vec<_>>()
                .join(&format!(" {} ", op.as_str()));
            format!("{field}:({joined})")
        })
        .collect();

    let date_clauses: Vec<String> = date_filters
        .iter()
        .map(|(_, range)| match (&range.existence_from_field, &range.existence_to_field) {
            (Some(exist_from), Some(exist_to)) => format!(
                "({exist_from}:[{} TO {}] AND {exist_to}:[{} TO {}])",
                config.dataset_start, range.to, range.from, config.dataset_end
            ),
            _ => format!("{}:[{} TO {}]", range.facet_field, range.from, range.to),
        })
        .collect();

    if !date_clauses.is_empty() {
        clauses.push(format!("({})", date_clauses.join(" OR ")));
    }

    clauses.join(" AND ")
}


#[cfg(test)]
mod tests {
    use super::*;
    use common::filters::DateRange;
    use crate::config::UnionOp;

    fn state(term: &str, search_type: SearchType) -> SearchState {
        let mut state = SearchState::new("http://localhost:8983/solr", "FACP", search_type);
        state.term = term.to_string();
        state
    }

    #[test]
    fn keyword_term_is_joined_with_the_configured_operator() {
        let config = Configuration::default();
        let spec = build_query(
            &state("alpha beta", SearchType::Keyword),
            &config,
            &FilterSet::new(),
            &DateFilterSet::new(),
            0,
            None,
            None,
        );
        assert_eq!(spec.q, "title:(alpha AND beta)^20 OR text:(alpha AND beta)^10");
    }

    #[test]
    fn phrase_term_is_quoted() {
        let config = Configuration::default();
        let spec = build_query(
            &state("gold rush", SearchType::Phrase),
            &config,
            &FilterSet::new(),
            &DateFilterSet::new(),
            0,
            None,
            None,
        );
        assert_eq!(spec.q, "title:\"gold rush\"^20 OR text:\"gold rush\"^10");
    }

    #[test]
    fn group_id_appends_an_exact_clause_and_lifts_the_group_cap() {
        let config = Configuration::default();
        let spec = build_query(
            &state("alpha", SearchType::Keyword),
            &config,
            &FilterSet::new(),
            &DateFilterSet::new(),
            0,
            Some("g42"),
            None,
        );
        assert!(spec.q.ends_with(" AND group:g42"));
        assert_eq!(spec.group_limit, Some(-1));
    }

    #[test]
    fn override_term_replaces_the_state_term() {
        let config = Configuration::default();
        let spec = build_query(
            &state("alpha", SearchType::Keyword),
            &config,
            &FilterSet::new(),
            &DateFilterSet::new(),
            0,
            None,
            Some("*"),
        );
        assert_eq!(spec.q, "title:(*)^20 OR text:(*)^10");
    }

    #[test]
    fn result_sort_defaults_to_score_descending() {
        let config = Configuration::default();
        let spec = build_query(
            &state("alpha", SearchType::Keyword),
            &config,
            &FilterSet::new(),
            &DateFilterSet::new(),
            0,
            None,
            None,
        );
        assert_eq!(spec.sort.as_deref(), Some("score desc"));
    }

    #[test]
    fn state_sort_overrides_the_default_result_sort() {
        let config = Configuration::default();
        let mut state = state("alpha", SearchType::Keyword);
        state.sort = Some("title asc".to_string());
        let spec = build_query(
            &state,
            &config,
            &FilterSet::new(),
            &DateFilterSet::new(),
            0,
            None,
            None,
        );
        assert_eq!(spec.sort.as_deref(), Some("title asc"));
    }

    #[test]
    fn named_filters_use_the_per_field_union_operator() {
        let mut config = Configuration::default();
        config.filter_union.insert("language".to_string(), UnionOp::And);
        let mut filters = FilterSet::new();
        filters.toggle("language", "english");
        filters.toggle("language", "german");
        filters.toggle("keywords", "mining");
        let clause = build_filter_clause(&filters, &DateFilterSet::new(), &config);
        assert_eq!(
            clause,
            "keywords:(\"mining\") AND language:(\"english\" AND \"german\")"
        );
    }

    #[test]
    fn plain_date_filter_renders_a_range_clause() {
        let config = Configuration::default();
        let mut date_filters = DateFilterSet::new();
        date_filters.toggle(DateRange::from_label("date_from", "1850 - 1860", None, None));
        let clause = build_filter_clause(&FilterSet::new(), &date_filters, &config);
        assert_eq!(
            clause,
            "(date_from:[1850-01-01T00:00:00Z TO 1860-12-31T23:59:59Z])"
        );
    }

    #[test]
    fn existence_pair_renders_the_symmetric_overlap_clause() {
        let mut config = Configuration::default();
        config.dataset_start = "1836-01-01T00:00:00Z".to_string();
        config.dataset_end = "1950-12-31T23:59:59Z".to_string();
        let mut date_filters = DateFilterSet::new();
        date_filters.toggle(DateRange::from_label(
            "date_from",
            "1850 - 1860",
            Some("exist_from"),
            Some("exist_to"),
        ));
        let clause = build_filter_clause(&FilterSet::new(), &date_filters, &config);
        assert_eq!(
            clause,
            "((exist_from:[1836-01-01T00:00:00Z TO 1860-12-31T23:59:59Z] \
             AND exist_to:[1850-01-01T00:00:00Z TO 1950-12-31T23:59:59Z]))"
        );
    }

    #[test]
    fn named_and_date_filters_combine_with_and() {
        let config = Configuration::default();
        let mut filters = FilterSet::new();
        filters.toggle("language", "english");
        let mut date_filters = DateFilterSet::new();
        date_filters.toggle(DateRange::from_label("date_from", "1850 - 1860", None, None));
        date_filters.toggle(DateRange::from_label("date_from", "1900 - 1910", None, None));
        let clause = build_filter_clause(&filters, &date_filters, &config);
        assert_eq!(
            clause,
            "language:(\"english\") AND \
             (date_from:[1850-01-01T00:00:00Z TO 1860-12-31T23:59:59Z] OR \
             date_from:[1900-01-01T00:00:00Z TO 1910-12-31T23:59:59Z])"
        );
    }

    #[test]
    fn empty_filter_sets_render_an_empty_clause() {
        let config = Configuration::default();
        let clause = build_filter_clause(&FilterSet::new(), &DateFilterSet::new(), &config);
        assert_eq!(clause, "");
        assert!(!clause.contains("()"));
    }
}
