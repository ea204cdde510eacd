//! Fixed-size pagination over an ordered result list.

use std::ops::{Range, RangeInclusive};

use serde::Serialize;

use crate::config::SearchConfig;

/// Page arithmetic for a result list of `total_items`.
///
/// Pages are 1-based. The current page is clamped into `1..=total_pages`
/// (page 1 for an empty list), so a stale page number never slices past the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    total_items: usize,
    current_page: usize,
    page_size: usize,
}

impl Pagination {
    pub fn new(total_items: usize, current_page: usize) -> Self {
        Self::with_page_size(total_items, current_page, SearchConfig::PAGE_SIZE)
    }

    pub fn with_page_size(total_items: usize, current_page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size);
        Self {
            total_items,
            current_page: current_page.clamp(1, total_pages.max(1)),
            page_size,
        }
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    /// Index range of the current page within the full result list.
    pub fn page_range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// The current page's items.
    pub fn page_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.page_range();
        let end = range.end.min(items.len());
        &items[range.start.min(end)..end]
    }

    /// Page numbers shown as buttons, at most [`SearchConfig::PAGE_WINDOW`]
    /// wide and centred on the current page where the edges allow.
    pub fn window(&self) -> RangeInclusive<usize> {
        let total = self.total_pages();
        if total == 0 {
            return 1..=0;
        }
        let half = SearchConfig::PAGE_WINDOW / 2;
        let span = SearchConfig::PAGE_WINDOW - 1;
        let start = self.current_page.saturating_sub(half).max(1);
        let end = (start + span).min(total);
        let start = end.saturating_sub(span).max(1);
        start..=end
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn first_page(&self) -> usize {
        1
    }

    pub fn last_page(&self) -> usize {
        self.total_pages().max(1)
    }

    /// 1-based `(first, last)` item numbers for "showing X–Y of N".
    /// `None` when there is nothing to show.
    pub fn display_range(&self) -> Option<(usize, usize)> {
        let range = self.page_range();
        if range.is_empty() {
            None
        } else {
            Some((range.start + 1, range.end))
        }
    }

    /// Navigation is hidden when everything fits on one page.
    pub fn shows_controls(&self) -> bool {
        self.total_pages() > 1
    }
}
