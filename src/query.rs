//! Translation of [`SearchQuery`] values into engine-facing query plans.
//!
//! `translate` is pure and total: absent request fields simply omit the
//! corresponding clause, and two equal queries always produce equal plans.
//! The plan stays engine-agnostic — the Elasticsearch wire encoding lives
//! in [`crate::store::elastic`], and the in-memory index executes plans
//! directly.

use crate::models::{SearchQuery, SortField, SortOrder};

/// Fixed result-window size for autocomplete plans.
pub const AUTOCOMPLETE_LIMIT: i64 = 5;

/// A scoring ("must") clause.
#[derive(Debug, Clone, PartialEq)]
pub enum MustClause {
    /// Matches every document. Emitted when no free-text term is present
    /// so that filters alone can drive the result set.
    MatchAll,
    /// Fuzzy multi-field match with the name field boosted over the
    /// description field. Fuzziness follows the engine's auto policy
    /// (magnitude determined by term length).
    MultiMatch { query: String },
    /// Prefix match against the name field. Autocomplete only.
    PrefixName { text: String },
}

/// A non-scoring, exact-match or range filter clause.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    Term {
        field: &'static str,
        value: String,
    },
    /// Inclusive price range; either bound may be absent.
    Range {
        field: &'static str,
        gte: Option<f64>,
        lte: Option<f64>,
    },
}

/// Ordering of the result set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortSpec {
    /// Computed relevance score, descending.
    Score,
    /// A literal field with an explicit direction. Name sorts on its
    /// exact-match (keyword) form so ordering is lexicographic.
    Field { field: SortField, order: SortOrder },
}

/// Pagination window. `None` defers to the search backend's defaults;
/// the translator never clamps or fills these in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Window {
    pub offset: Option<i64>,
    pub size: Option<i64>,
}

/// Engine-facing representation of a search request.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub must: Vec<MustClause>,
    pub filters: Vec<FilterClause>,
    pub sort: SortSpec,
    pub window: Window,
}

/// Map a structured search request to a query plan.
pub fn translate(query: &SearchQuery) -> QueryPlan {
    let mut must = Vec::new();
    match query.q.as_deref().filter(|q| !q.is_empty()) {
        Some(q) => must.push(MustClause::MultiMatch {
            query: q.to_string(),
        }),
        None => must.push(MustClause::MatchAll),
    }

    let mut filters = Vec::new();
    if let Some(category) = &query.category {
        filters.push(FilterClause::Term {
            field: "category",
            value: category.clone(),
        });
    }
    if let Some(subcategory) = &query.subcategory {
        filters.push(FilterClause::Term {
            field: "subcategory",
            value: subcategory.clone(),
        });
    }
    if let Some(location) = &query.location {
        filters.push(FilterClause::Term {
            field: "location",
            value: location.clone(),
        });
    }
    if query.min_price.is_some() || query.max_price.is_some() {
        filters.push(FilterClause::Range {
            field: "price",
            gte: query.min_price,
            lte: query.max_price,
        });
    }

    let sort = match query.sort {
        None | Some(SortField::Relevance) => SortSpec::Score,
        Some(field) => SortSpec::Field {
            field,
            order: query.order.unwrap_or(SortOrder::Asc),
        },
    };

    QueryPlan {
        must,
        filters,
        sort,
        window: Window {
            offset: query.offset,
            size: query.limit,
        },
    }
}

/// Build the fixed plan for an autocomplete request: a single name-prefix
/// clause, no filters, no user-controlled sort, window capped at
/// [`AUTOCOMPLETE_LIMIT`].
pub fn autocomplete_plan(text: &str) -> QueryPlan {
    QueryPlan {
        must: vec![MustClause::PrefixName {
            text: text.to_string(),
        }],
        filters: Vec::new(),
        sort: SortSpec::Score,
        window: Window {
            offset: None,
            size: Some(AUTOCOMPLETE_LIMIT),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_term_produces_match_all() {
        let plan = translate(&SearchQuery::default());
        assert_eq!(plan.must, vec![MustClause::MatchAll]);
        assert!(plan.filters.is_empty());
    }

    #[test]
    fn test_empty_term_treated_as_absent() {
        let query = SearchQuery {
            q: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(translate(&query).must, vec![MustClause::MatchAll]);
    }

    #[test]
    fn test_term_produces_multi_match() {
        let query = SearchQuery {
            q: Some("laptop".to_string()),
            ..Default::default()
        };
        let plan = translate(&query);
        assert_eq!(
            plan.must,
            vec![MustClause::MultiMatch {
                query: "laptop".to_string()
            }]
        );
    }

    #[test]
    fn test_exact_filters_emitted_per_field() {
        let query = SearchQuery {
            category: Some("Electronics".to_string()),
            location: Some("Berlin".to_string()),
            ..Default::default()
        };
        let plan = translate(&query);
        assert_eq!(
            plan.filters,
            vec![
                FilterClause::Term {
                    field: "category",
                    value: "Electronics".to_string()
                },
                FilterClause::Term {
                    field: "location",
                    value: "Berlin".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_both_price_bounds_yield_single_range_filter() {
        let query = SearchQuery {
            min_price: Some(10.0),
            max_price: Some(99.5),
            ..Default::default()
        };
        let plan = translate(&query);
        let ranges: Vec<_> = plan
            .filters
            .iter()
            .filter(|f| matches!(f, FilterClause::Range { .. }))
            .collect();
        assert_eq!(ranges.len(), 1);
        assert_eq!(
            ranges[0],
            &FilterClause::Range {
                field: "price",
                gte: Some(10.0),
                lte: Some(99.5)
            }
        );
        // The must clause is unaffected by price bounds.
        assert_eq!(plan.must, vec![MustClause::MatchAll]);
    }

    #[test]
    fn test_single_price_bound_still_emits_range() {
        let query = SearchQuery {
            max_price: Some(50.0),
            ..Default::default()
        };
        let plan = translate(&query);
        assert_eq!(
            plan.filters,
            vec![FilterClause::Range {
                field: "price",
                gte: None,
                lte: Some(50.0)
            }]
        );
    }

    #[test]
    fn test_inverted_bounds_pass_through_unvalidated() {
        // min > max is the caller's problem; the translator just carries it.
        let query = SearchQuery {
            min_price: Some(100.0),
            max_price: Some(1.0),
            ..Default::default()
        };
        let plan = translate(&query);
        assert_eq!(
            plan.filters,
            vec![FilterClause::Range {
                field: "price",
                gte: Some(100.0),
                lte: Some(1.0)
            }]
        );
    }

    #[test]
    fn test_relevance_and_absent_sort_use_score() {
        assert_eq!(translate(&SearchQuery::default()).sort, SortSpec::Score);
        let query = SearchQuery {
            sort: Some(SortField::Relevance),
            order: Some(SortOrder::Asc),
            ..Default::default()
        };
        assert_eq!(translate(&query).sort, SortSpec::Score);
    }

    #[test]
    fn test_field_sort_defaults_ascending() {
        let query = SearchQuery {
            sort: Some(SortField::Price),
            ..Default::default()
        };
        assert_eq!(
            translate(&query).sort,
            SortSpec::Field {
                field: SortField::Price,
                order: SortOrder::Asc
            }
        );
    }

    #[test]
    fn test_pagination_passes_through_unclamped() {
        let query = SearchQuery {
            limit: Some(500),
            offset: Some(-3),
            ..Default::default()
        };
        let plan = translate(&query);
        assert_eq!(plan.window.size, Some(500));
        assert_eq!(plan.window.offset, Some(-3));

        let plan = translate(&SearchQuery::default());
        assert_eq!(plan.window, Window::default());
    }

    #[test]
    fn test_translate_is_deterministic() {
        let query = SearchQuery {
            q: Some("usb hub".to_string()),
            category: Some("Electronics".to_string()),
            min_price: Some(5.0),
            limit: Some(20),
            sort: Some(SortField::Name),
            order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(translate(&query), translate(&query.clone()));
    }

    #[test]
    fn test_autocomplete_plan_shape() {
        let plan = autocomplete_plan("wid");
        assert_eq!(
            plan.must,
            vec![MustClause::PrefixName {
                text: "wid".to_string()
            }]
        );
        assert!(plan.filters.is_empty());
        assert_eq!(plan.sort, SortSpec::Score);
        assert_eq!(plan.window.size, Some(AUTOCOMPLETE_LIMIT));
    }
}
