//! Buffer pool implementation.
//!
//! The buffer pool owns the resident pages, loads pages from the page
//! store on a miss and writes dirty pages back before evicting them.

use crate::buffer::lru::{self, AccessClock};
use crate::buffer::{PageEvent, PageObserver};
use crate::error::Result;
use crate::page::Page;
use crate::storage::PageStore;
use crate::types::{PageGeometry, PageId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Buffer pool counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    /// Maximum number of resident pages
    pub capacity: usize,
    /// Pages currently resident
    pub resident_pages: usize,
    /// Resident pages with unsaved changes
    pub dirty_pages: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Pages written back to the primary file
    pub write_backs: u64,
}

/// Bounded page cache over a page store
pub struct BufferPool {
    /// The page store for I/O
    store: Arc<dyn PageStore>,
    /// Resident pages indexed by page number
    resident: HashMap<PageId, Page>,
    clock: AccessClock,
    /// Maximum number of resident pages
    capacity: usize,
    observer: Option<Arc<dyn PageObserver>>,
    stats: PoolStats,
}

impl BufferPool {
    /// Create an empty buffer pool. A capacity of 0 is treated as 1.
    pub fn new(
        store: Arc<dyn PageStore>,
        capacity: usize,
        observer: Option<Arc<dyn PageObserver>>,
    ) -> Self {
        let capacity = capacity.max(1);
        Self {
            store,
            resident: HashMap::with_capacity(capacity),
            clock: AccessClock::new(),
            capacity,
            observer,
            stats: PoolStats::default(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        self.store.geometry()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Load the first pages of the file until the pool is full
    pub fn preload(&mut self) -> Result<()> {
        let count = self.capacity.min(self.geometry().total_pages as usize);
        for page_id in 0..count as u32 {
            self.fetch_page(PageId::new(page_id))?;
        }
        Ok(())
    }

    /// Fetch a page for reading
    pub fn fetch_page(&mut self, page_id: PageId) -> Result<&Page> {
        self.resolve(page_id).map(|page| &*page)
    }

    /// Fetch a page for writing. Setters on the page mark it dirty.
    pub fn fetch_page_mut(&mut self, page_id: PageId) -> Result<&mut Page> {
        self.resolve(page_id)
    }

    /// Make `page_id` resident and stamp its access time
    fn resolve(&mut self, page_id: PageId) -> Result<&mut Page> {
        let mut page = match self.resident.remove(&page_id) {
            Some(page) => {
                self.stats.hits += 1;
                page
            }
            None => {
                self.stats.misses += 1;
                if self.resident.len() >= self.capacity {
                    self.evict_one()?;
                }
                let page = self.store.read_page(page_id)?;
                self.emit(PageEvent::Loaded(page_id));
                page
            }
        };

        page.touch(self.clock.tick());
        Ok(self.resident.entry(page_id).or_insert(page))
    }

    /// Evict the least recently used page.
    ///
    /// The page stays resident if its write-back fails.
    fn evict_one(&mut self) -> Result<()> {
        let Some(victim) = lru::select_victim(self.resident.values()) else {
            return Ok(());
        };

        let mut written_back = false;
        if let Some(page) = self.resident.get_mut(&victim) {
            if page.is_dirty() {
                self.store.write_page(page)?;
                self.stats.write_backs += 1;
                written_back = true;
            }
        }

        self.resident.remove(&victim);
        self.stats.evictions += 1;
        self.emit(PageEvent::Evicted {
            page_id: victim,
            written_back,
        });
        Ok(())
    }

    /// Write back a resident page if it is dirty
    pub fn flush_page(&mut self, page_id: PageId) -> Result<()> {
        if let Some(page) = self.resident.get_mut(&page_id) {
            if page.is_dirty() {
                self.store.write_page(page)?;
                self.stats.write_backs += 1;
                self.emit(PageEvent::Flushed(page_id));
            }
        }
        Ok(())
    }

    /// Write back every dirty resident page and sync the store
    pub fn flush_all(&mut self) -> Result<()> {
        for page_id in self.resident_pages() {
            self.flush_page(page_id)?;
        }
        self.store.sync()
    }

    /// Resident page numbers in ascending order
    pub fn resident_pages(&self) -> Vec<PageId> {
        let mut ids: Vec<PageId> = self.resident.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity,
            resident_pages: self.resident.len(),
            dirty_pages: self.resident.values().filter(|p| p.is_dirty()).count(),
            ..self.stats
        }
    }

    fn emit(&self, event: PageEvent) {
        match event {
            PageEvent::Loaded(page_id) => tracing::debug!(page = %page_id, "swap in"),
            PageEvent::Evicted {
                page_id,
                written_back,
            } => tracing::debug!(page = %page_id, written_back, "swap out"),
            PageEvent::Flushed(page_id) => tracing::debug!(page = %page_id, "flush"),
        }
        if let Some(observer) = &self.observer {
            observer.on_event(&event);
        }
    }
}
