//! Pure pagination state for externally-controlled lists.
//!
//! A [`PageWindow`] knows nothing about fetching: the caller feeds it the
//! total and reads back navigation and the collapsed page-number display.
//! [`super::PagedCollection`] derives its numbering through the same code.

/// One slot of the collapsed page-number display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    /// Rendered as an ellipsis.
    Gap,
}

/// Number of page slots shown before the display collapses with gaps.
const MAX_VISIBLE: u64 = 5;

/// Pagination state: current page (1-based), page size, and total item
/// count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u32,
    page_size: u32,
    total: u64,
}

impl PageWindow {
    pub fn new(page_size: u32) -> Self {
        Self { page: 1, page_size: page_size.max(1), total: 0 }
    }

    /// Build a window from already-known state without clamping; used by the
    /// self-fetching controller to derive its display.
    pub(crate) fn with_state(page: u32, page_size: u32, total: u64) -> Self {
        Self { page: page.max(1), page_size: page_size.max(1), total }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page_size))
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// Update the total reported by the server.
    pub fn set_total(&mut self, total: u64) {
        self.total = total;
    }

    /// Jump to a page, clamped to `1..=total_pages`.
    pub fn set_page(&mut self, page: u32) {
        let last = self.total_pages().max(1).min(u64::from(u32::MAX)) as u32;
        self.page = page.clamp(1, last);
    }

    /// Change the page size and reset to the first page.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn next(&mut self) {
        if self.has_next() {
            self.page += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.has_prev() {
            self.page -= 1;
        }
    }

    /// Collapse the page numbers to at most five visible slots.
    ///
    /// With more than five pages: near the start show pages 1–4, a gap, and
    /// the last page; near the end show the first page, a gap, and the last
    /// four; otherwise show the first page, a gap, the current page and its
    /// neighbors, a gap, and the last page.
    pub fn slots(&self) -> Vec<PageSlot> {
        let total_pages = self.total_pages();
        let page = u64::from(self.page);
        let mut slots = Vec::new();

        if total_pages <= MAX_VISIBLE {
            for p in 1..=total_pages {
                slots.push(PageSlot::Page(p as u32));
            }
        } else if page <= 3 {
            for p in 1..=4 {
                slots.push(PageSlot::Page(p));
            }
            slots.push(PageSlot::Gap);
            slots.push(PageSlot::Page(total_pages as u32));
        } else if page >= total_pages - 2 {
            slots.push(PageSlot::Page(1));
            slots.push(PageSlot::Gap);
            for p in (total_pages - 3)..=total_pages {
                slots.push(PageSlot::Page(p as u32));
            }
        } else {
            slots.push(PageSlot::Page(1));
            slots.push(PageSlot::Gap);
            for p in (page - 1)..=(page + 1) {
                slots.push(PageSlot::Page(p as u32));
            }
            slots.push(PageSlot::Gap);
            slots.push(PageSlot::Page(total_pages as u32));
        }

        slots
    }
}
