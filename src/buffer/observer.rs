//! Page swap notifications.

use crate::types::PageId;
use std::fmt;

/// Page movement between the resident set and the primary file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// A page was read from disk into the resident set
    Loaded(PageId),
    /// A page left the resident set
    Evicted { page_id: PageId, written_back: bool },
    /// A dirty page was written back without being evicted
    Flushed(PageId),
}

impl fmt::Display for PageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded(page_id) => write!(f, "[SWAP-IN ] <- page {}", page_id),
            Self::Evicted {
                page_id,
                written_back: true,
            } => write!(f, "[SWAP-OUT] -> page {} (written back)", page_id),
            Self::Evicted { page_id, .. } => write!(f, "[SWAP-OUT] -> page {}", page_id),
            Self::Flushed(page_id) => write!(f, "[FLUSH   ] -> page {}", page_id),
        }
    }
}

/// Receives page events from the buffer pool.
///
/// Observers are informational only; the pool never depends on them.
pub trait PageObserver: Send + Sync {
    fn on_event(&self, event: &PageEvent);
}

impl<F> PageObserver for F
where
    F: Fn(&PageEvent) + Send + Sync,
{
    fn on_event(&self, event: &PageEvent) {
        self(event)
    }
}

/// Observer that keeps every event it sees (test only)
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingObserver {
    events: parking_lot::Mutex<Vec<PageEvent>>,
}

#[cfg(test)]
impl RecordingObserver {
    pub(crate) fn events(&self) -> Vec<PageEvent> {
        self.events.lock().clone()
    }

    pub(crate) fn clear(&self) {
        self.events.lock().clear();
    }
}

#[cfg(test)]
impl PageObserver for RecordingObserver {
    fn on_event(&self, event: &PageEvent) {
        self.events.lock().push(*event);
    }
}
