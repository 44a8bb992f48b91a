use super::cache::HistoryCache;
use super::fetch::{FetchDirection, FetchState};
use super::filter::Filter;

/// How the visible window moves over the transaction ordering.
///
/// The window is an offset range into the ordered cache, independent of how
/// much has actually been fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// Fixed pages of `page_size` rows, driven by next/previous controls.
    Paged { page: usize },
    /// A floating offset driven by scroll position, with bounded memory:
    /// old rows are evicted once the cache outgrows the eviction threshold.
    Scroll { offset: usize },
}

/// Availability of the paging controls, derived for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageControls {
    pub has_previous: bool,
    pub has_next: bool,
    /// 1-based row numbers of the window, for "Showing transactions N-M".
    pub first_row: usize,
    pub last_row: usize,
    pub total: Option<u64>,
}

/// Computes which cache slice corresponds to the current page or scroll
/// position and whether a fetch is needed to fill it.
#[derive(Debug)]
pub struct PageWindow {
    mode: WindowMode,
    page_size: usize,
}

impl PageWindow {
    pub fn new(mode: WindowMode, page_size: usize) -> Self {
        Self { mode, page_size }
    }

    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Absolute offset of the first visible row.
    pub fn start(&self) -> usize {
        match self.mode {
            WindowMode::Paged { page } => page * self.page_size,
            WindowMode::Scroll { offset } => offset,
        }
    }

    /// Move the window one page toward older transactions. In paged mode
    /// the step is refused once the known total (or an exhausted cache)
    /// says there is no further page.
    pub fn advance(&mut self, cache: &HistoryCache, fetch: &FetchState, filter: &Filter) -> bool {
        match &mut self.mode {
            WindowMode::Paged { page } => {
                let next_start = (*page + 1) * self.page_size;
                let within_total = match filter.total_count {
                    Some(total) => (next_start as u64) < total,
                    None => true,
                };
                let beyond_data = fetch.exhausted_forward && next_start >= cache.end_offset();
                if !within_total || beyond_data {
                    return false;
                }
                *page += 1;
                true
            }
            WindowMode::Scroll { offset } => {
                let next = *offset + self.page_size;
                if fetch.exhausted_forward && next >= cache.end_offset() {
                    return false;
                }
                *offset = next;
                true
            }
        }
    }

    /// Move the window one page toward newer transactions.
    pub fn retreat(&mut self) -> bool {
        match &mut self.mode {
            WindowMode::Paged { page } => {
                if *page == 0 {
                    return false;
                }
                *page -= 1;
                true
            }
            WindowMode::Scroll { offset } => {
                if *offset == 0 {
                    return false;
                }
                *offset = offset.saturating_sub(self.page_size);
                true
            }
        }
    }

    /// At most one fetch that would grow the cache toward covering the
    /// current window. Forward growth wins when both edges are uncovered;
    /// the caller ignores the plan entirely while a fetch is in flight.
    pub fn plan_fetch(&self, cache: &HistoryCache, fetch: &FetchState) -> Option<FetchPlan> {
        let start = self.start();
        let end = start + self.page_size;

        if end > cache.end_offset() && !fetch.exhausted(FetchDirection::Forward) {
            return Some(FetchPlan {
                direction: FetchDirection::Forward,
                offset: cache.end_offset(),
                count: self.page_size,
            });
        }

        if start < cache.base_offset() && !fetch.exhausted(FetchDirection::Backward) {
            let offset = cache.base_offset().saturating_sub(self.page_size);
            return Some(FetchPlan {
                direction: FetchDirection::Backward,
                offset,
                count: cache.base_offset() - offset,
            });
        }

        None
    }

    /// Rows to trim off the head after a forward merge in scroll mode, or 0.
    /// `eviction_pages` is the bounded-memory threshold in screen-pages.
    pub fn eviction(&self, cache: &HistoryCache, eviction_pages: usize) -> usize {
        match self.mode {
            WindowMode::Scroll { offset } => {
                if cache.len() > eviction_pages * self.page_size {
                    // keep the window itself plus one page of slack above it
                    let keep_from = offset.saturating_sub(self.page_size);
                    keep_from.saturating_sub(cache.base_offset())
                } else {
                    0
                }
            }
            WindowMode::Paged { .. } => 0,
        }
    }

    /// Derive the paging controls for the renderer.
    pub fn controls(&self, cache: &HistoryCache, fetch: &FetchState, filter: &Filter) -> PageControls {
        let start = self.start();
        let shown = cache.slice(start, self.page_size).len();
        let has_next = match filter.total_count {
            Some(total) => ((start + self.page_size) as u64) < total,
            None => !fetch.exhausted_forward,
        };
        PageControls {
            has_previous: start > 0,
            has_next,
            first_row: if shown == 0 { 0 } else { start + 1 },
            last_row: if shown == 0 { 0 } else { start + shown },
            total: filter.total_count,
        }
    }

    /// Back to the first page. Called on filter change.
    pub fn reset(&mut self) {
        self.mode = match self.mode {
            WindowMode::Paged { .. } => WindowMode::Paged { page: 0 },
            WindowMode::Scroll { .. } => WindowMode::Scroll { offset: 0 },
        };
    }
}

/// A single missing-direction fetch that would grow the cache toward the
/// current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    pub direction: FetchDirection,
    pub offset: usize,
    pub count: usize,
}
