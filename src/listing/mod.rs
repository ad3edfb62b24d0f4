//! Listing
//!
//! The in-memory half of every back-office list view: a fetched collection is
//! filtered by a free-text query and an optional facet, ordered by a sort key, and
//! sliced into a page window.

use std::{borrow::Cow, fmt::Debug, num::NonZeroUsize};

use jiff::Timestamp;
use rust_decimal::Decimal;

mod filter;
mod page;
mod sort;

pub use filter::{facet_options, filter, matches_search};
pub use page::{DEFAULT_PAGE_SIZE, Page, paginate};
pub use sort::SortKey;

/// A record that can be shown in a list view.
pub trait Listable {
    /// Equality facet (category, role, status) the list can be narrowed by.
    type Facet: Clone + PartialEq + Debug;

    /// Field matched by free-text search and ordered by alphabetical sorts.
    fn name(&self) -> Cow<'_, str>;

    /// Creation time, used by the newest/oldest sorts.
    fn created_at(&self) -> Timestamp;

    /// Price used by the price sorts. Records without a price compare equal.
    fn price(&self) -> Option<Decimal> {
        None
    }

    /// The record's facet value, if it has one.
    fn facet(&self) -> Option<Self::Facet> {
        None
    }
}

/// Everything a list view needs to turn a collection into a page window.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F> {
    search: String,
    facet: Option<F>,
    sort: SortKey,
    page: usize,
    page_size: NonZeroUsize,
}

impl<F> Default for ListQuery<F> {
    fn default() -> Self {
        Self {
            search: String::new(),
            facet: None,
            sort: SortKey::Newest,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl<F> ListQuery<F> {
    /// Query for the first page, newest first, with no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text search. Returns to the first page.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self.page = 1;
        self
    }

    /// Set or clear the facet filter. Returns to the first page.
    #[must_use]
    pub fn with_facet(mut self, facet: Option<F>) -> Self {
        self.facet = facet;
        self.page = 1;
        self
    }

    /// Set the sort key. Returns to the first page.
    #[must_use]
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self.page = 1;
        self
    }

    /// Set the page size. Returns to the first page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: NonZeroUsize) -> Self {
        self.page_size = page_size;
        self.page = 1;
        self
    }

    /// Jump to a 1-based page. Out of range pages are clamped when applied.
    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Free-text search.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Facet filter.
    pub fn facet(&self) -> Option<&F> {
        self.facet.as_ref()
    }

    /// Sort key.
    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Requested 1-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Page size.
    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }
}

/// Run the full pipeline: filter, sort, then slice into a page window.
pub fn apply<'a, T: Listable>(items: &'a [T], query: &ListQuery<T::Facet>) -> Page<&'a T> {
    let mut matched = filter(items, query.search(), query.facet());

    query.sort().sort(&mut matched);

    paginate(matched, query.page(), query.page_size())
}
