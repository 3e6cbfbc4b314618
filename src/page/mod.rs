//! Page layer: one page of typed slots plus its validity bitmap.
//!
//! A page is the unit of transfer between the buffer pool and the
//! primary file. Its bytes are split into two regions:
//! - a bitmap recording which slots have been written
//! - a data region of packed fixed-width slots

mod bitmap;
pub mod codec;

pub use bitmap::Bitmap;

use crate::types::{PageGeometry, PageId, INT_SLOT_WIDTH};

/// In-memory copy of one page of the primary file
#[derive(Debug, Clone)]
pub struct Page {
    page_id: PageId,
    bitmap: Bitmap,
    data: Vec<u8>,
    dirty: bool,
    last_access: u64,
}

impl Page {
    /// Create an empty page (all slots unset)
    pub fn new(page_id: PageId, geometry: &PageGeometry) -> Self {
        Self {
            page_id,
            bitmap: Bitmap::new(geometry.bitmap_size),
            data: vec![0u8; geometry.data_size],
            dirty: false,
            last_access: 0,
        }
    }

    /// Split raw page bytes into bitmap and data regions
    pub fn from_bytes(page_id: PageId, bytes: &[u8], geometry: &PageGeometry) -> Self {
        let (bitmap, data) = bytes.split_at(geometry.bitmap_size);
        Self {
            page_id,
            bitmap: Bitmap::from_bytes(bitmap),
            data: data[..geometry.data_size].to_vec(),
            dirty: false,
            last_access: 0,
        }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the page differs from its on-disk copy
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Logical timestamp of the last access
    pub fn last_access(&self) -> u64 {
        self.last_access
    }

    /// Record an access at logical time `tick`
    pub fn touch(&mut self, tick: u64) {
        self.last_access = tick;
    }

    /// Whether `slot` has been written
    pub fn is_set(&self, slot: usize) -> bool {
        self.bitmap.is_set(slot)
    }

    /// Read the integer (or data log offset) in `slot`
    pub fn get_int(&self, slot: usize) -> i32 {
        codec::decode_int(&self.data[codec::slot_range(slot, INT_SLOT_WIDTH)])
    }

    /// Write an integer (or data log offset) into `slot`
    pub fn set_int(&mut self, slot: usize, value: i32) {
        codec::encode_int(
            &mut self.data[codec::slot_range(slot, INT_SLOT_WIDTH)],
            value,
        );
        self.bitmap.set(slot);
        self.dirty = true;
    }

    /// Read the `length`-byte text in `slot`, without trailing padding
    pub fn get_text(&self, slot: usize, length: usize) -> String {
        codec::decode_text(&self.data[codec::slot_range(slot, length)])
    }

    /// Write text into a `length`-byte slot.
    ///
    /// Returns `true` if `value` was truncated to fit.
    pub fn set_text(&mut self, slot: usize, value: &str, length: usize) -> bool {
        let truncated = codec::encode_text(&mut self.data[codec::slot_range(slot, length)], value);
        self.bitmap.set(slot);
        self.dirty = true;
        truncated
    }
}
