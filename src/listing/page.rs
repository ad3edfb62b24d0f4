//! Page windows

use std::num::NonZeroUsize;

/// Rows per page when a view does not choose otherwise.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(9);

/// A bounded window over a filtered collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    items: Vec<T>,
    number: usize,
    size: NonZeroUsize,
    total: usize,
}

impl<T> Page<T> {
    /// Records on this page.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, keeping its records.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// 1-based page number after clamping.
    pub fn page(&self) -> usize {
        self.number
    }

    /// Page size the window was cut with.
    pub fn page_size(&self) -> NonZeroUsize {
        self.size
    }

    /// Number of records that matched before slicing.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of pages; zero for an empty collection.
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.size.get())
    }

    /// Whether nothing matched. Views render an empty state, not an error.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Whether a previous page exists.
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Whether a next page exists.
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages()
    }

    /// 1-based row number of the first record on this page.
    pub fn first_row_number(&self) -> usize {
        (self.number - 1) * self.size.get() + 1
    }

    /// Map the records while keeping the window's position.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total: self.total,
        }
    }

    /// Build a page from a window the server already cut.
    pub fn from_window(items: Vec<T>, page: usize, page_size: NonZeroUsize, total: usize) -> Self {
        Self {
            items,
            number: page.max(1),
            size: page_size,
            total,
        }
    }
}

/// Slice `items` into the requested 1-based page.
///
/// Pages past the end are clamped to the last page; an empty collection yields
/// page 1 with no records.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: NonZeroUsize) -> Page<T> {
    let total = items.len();
    let last_page = total.div_ceil(page_size.get()).max(1);
    let page = page.clamp(1, last_page);
    let offset = (page - 1) * page_size.get();

    let items = items
        .into_iter()
        .skip(offset)
        .take(page_size.get())
        .collect();

    Page {
        items,
        number: page,
        size: page_size,
        total,
    }
}
