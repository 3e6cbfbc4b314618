//! Recency tracking for LRU eviction.

use crate::page::Page;
use crate::types::PageId;

/// Monotonic logical clock used to stamp page accesses
#[derive(Debug, Default)]
pub struct AccessClock {
    now: u64,
}

impl AccessClock {
    pub fn new() -> Self {
        Self { now: 0 }
    }

    /// Advance the clock and return the new time
    pub fn tick(&mut self) -> u64 {
        self.now += 1;
        self.now
    }
}

/// Pick the page with the oldest access time.
///
/// Ties go to the lowest page number.
pub fn select_victim<'a>(pages: impl IntoIterator<Item = &'a Page>) -> Option<PageId> {
    pages
        .into_iter()
        .min_by_key(|page| (page.last_access(), page.page_id()))
        .map(Page::page_id)
}
