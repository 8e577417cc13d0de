// src/pipeline/mod.rs
//! Pure derivation of everything the analysis list shows from the full
//! record set and the interaction state.
//!
//! Order of operations: facets and stats read the whole record set; the
//! visible page is filter, then sort, then paginate.

use serde::{Deserialize, Serialize};

pub mod facets;
pub mod filter;
pub mod pager;
pub mod sort;
pub mod stats;

pub use facets::{derive_facets, Facets};
pub use filter::{filter_records, FilterAxis, FilterCategory};
pub use pager::{page_window, paginate, PageToken, ITEMS_PER_PAGE, PAGE_WINDOW_DELTA};
pub use sort::{sort_records, SortKey};
pub use stats::{aggregate, CollectionStats};

use crate::types::AnalysisRecord;

/// Interaction state that selects the visible page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
    /// 1-based.
    pub page: usize,
    pub sort: SortKey,
    pub filter: FilterCategory,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            page: 1,
            sort: SortKey::Newest,
            filter: FilterCategory::All,
        }
    }
}

impl ViewQuery {
    pub fn has_active_filters(&self) -> bool {
        self.filter != FilterCategory::All || self.sort != SortKey::Newest
    }
}

/// Everything needed to render one state of the analysis list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub items: Vec<AnalysisRecord>,
    pub query: ViewQuery,
    pub page_size: usize,
    pub total_pages: usize,
    /// Records matching the filter, across all pages.
    pub filtered_count: usize,
    /// 1-based inclusive display range within the filtered records.
    pub start: usize,
    pub end: usize,
    pub window: Vec<PageToken>,
    pub facets: Facets,
    pub stats: CollectionStats,
}

impl PageResult {
    /// The page strip is hidden when there is nothing to page through.
    pub fn show_pagination(&self) -> bool {
        self.total_pages > 1
    }

    pub fn has_previous(&self) -> bool {
        self.query.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.query.page < self.total_pages
    }

    pub fn total_records(&self) -> usize {
        self.stats.total
    }
}

/// Run the whole pipeline once.
pub fn view(records: &[AnalysisRecord], query: &ViewQuery, page_size: usize) -> PageResult {
    let facets = derive_facets(records);
    let stats = aggregate(records);

    let mut selected = filter_records(records, query.filter);
    sort_records(&mut selected, query.sort);

    let page = paginate(&selected, query.page, page_size);
    let window = page_window(query.page, page.total_pages, PAGE_WINDOW_DELTA);

    PageResult {
        items: page.items.iter().map(|record| (*record).clone()).collect(),
        query: *query,
        page_size,
        total_pages: page.total_pages,
        filtered_count: selected.len(),
        start: page.start,
        end: page.end,
        window,
        facets,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{numbered_records, record};
    use pretty_assertions::assert_eq;

    fn ids(result: &PageResult) -> Vec<&str> {
        result.items.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_fourteen_records_first_page() {
        let records = numbered_records(14);
        let result = view(&records, &ViewQuery::default(), ITEMS_PER_PAGE);

        assert_eq!(ids(&result), vec!["1", "2", "3", "4", "5", "6"]);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.filtered_count, 14);
        assert_eq!((result.start, result.end), (1, 6));
        assert!(result.show_pagination());
        assert!(!result.has_previous());
        assert!(result.has_next());
    }

    #[test]
    fn test_filter_then_sort_then_page() {
        let records = vec![
            record("1", "Backend Developer", "Senior", 10),
            record("2", "Frontend Developer", "Senior", 20),
            record("3", "Backend Engineer", "Junior", 30),
            record("4", "Back End Lead", "Senior", 5),
        ];
        let query = ViewQuery {
            page: 1,
            sort: SortKey::Oldest,
            filter: FilterCategory::Backend,
        };
        let result = view(&records, &query, 2);

        assert_eq!(ids(&result), vec!["4", "1"]);
        assert_eq!(result.filtered_count, 3);
        assert_eq!(result.total_pages, 2);
        assert_eq!(result.window, vec![PageToken::Page(1), PageToken::Page(2)]);
    }

    #[test]
    fn test_stats_and_facets_ignore_filter_and_sort() {
        let records = numbered_records(9);
        let base = view(&records, &ViewQuery::default(), ITEMS_PER_PAGE);

        for filter in FilterCategory::ROLE_FAMILIES {
            for sort in SortKey::ALL {
                let query = ViewQuery { page: 1, sort, filter };
                let result = view(&records, &query, ITEMS_PER_PAGE);
                assert_eq!(result.stats, base.stats);
                assert_eq!(result.facets, base.facets);
            }
        }
    }

    #[test]
    fn test_selected_filter_stays_offered() {
        let records = vec![
            record("1", "Backend Developer", "Senior", 1),
            record("2", "Frontend Developer", "Junior", 2),
        ];
        let query = ViewQuery {
            filter: FilterCategory::Frontend,
            ..ViewQuery::default()
        };
        let result = view(&records, &query, ITEMS_PER_PAGE);

        assert_eq!(ids(&result), vec!["2"]);
        assert!(result.facets.offers(FilterCategory::Frontend));
        assert!(result.facets.offers(FilterCategory::Backend));
    }

    #[test]
    fn test_empty_store() {
        let result = view(&[], &ViewQuery::default(), ITEMS_PER_PAGE);
        assert!(result.items.is_empty());
        assert_eq!(result.total_pages, 0);
        assert_eq!(result.filtered_count, 0);
        assert!(!result.show_pagination());
        assert!(result.facets.is_empty());
    }

    #[test]
    fn test_active_filters() {
        assert!(!ViewQuery::default().has_active_filters());
        let sorted = ViewQuery {
            sort: SortKey::Role,
            ..ViewQuery::default()
        };
        assert!(sorted.has_active_filters());
    }

    #[test]
    fn test_far_out_of_range_page_yields_empty_view() {
        let records = numbered_records(3);
        let query = ViewQuery {
            page: 1 << 63,
            ..ViewQuery::default()
        };
        let result = view(&records, &query, ITEMS_PER_PAGE);

        assert!(result.items.is_empty());
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.filtered_count, 3);
        assert!(!result.has_next());
    }
}
