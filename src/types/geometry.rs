//! Page geometry derived from an array's element type and count.

use crate::error::{ArrayError, Result};
use crate::types::{ElementType, PageId, BITMAP_ALIGN, SECTOR_SIZE, SIGNATURE_LEN};

/// Sizes of the regions of a page and of the primary file.
///
/// Layout of one page:
/// ```text
/// ┌──────────────────────┬──────────────────────────────────┐
/// │ bitmap (bitmap_size) │ data (data_size, 512-aligned)    │
/// └──────────────────────┴──────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub element_type: ElementType,
    pub element_count: u64,
    pub elements_per_page: usize,
    pub slot_width: usize,
    pub bitmap_size: usize,
    pub data_size: usize,
    pub page_size: usize,
    pub total_pages: u32,
}

fn round_up(value: usize, multiple: usize) -> usize {
    value.div_ceil(multiple) * multiple
}

impl PageGeometry {
    /// Compute the geometry for `element_count` elements of `element_type`
    pub fn new(element_type: ElementType, element_count: u64) -> Result<Self> {
        element_type.validate()?;

        let elements_per_page = element_type.elements_per_page();
        let slot_width = element_type.slot_width();
        let bitmap_size = round_up(elements_per_page.div_ceil(8), BITMAP_ALIGN);
        let data_size = round_up(elements_per_page * slot_width, SECTOR_SIZE);

        let total_pages = u32::try_from(element_count.div_ceil(elements_per_page as u64))
            .map_err(|_| {
                ArrayError::invalid_type(format!("element count {} is too large", element_count))
            })?;

        Ok(Self {
            element_type,
            element_count,
            elements_per_page,
            slot_width,
            bitmap_size,
            data_size,
            page_size: bitmap_size + data_size,
            total_pages,
        })
    }

    /// Map an element index to its page and slot.
    ///
    /// Fails with `IndexOutOfRange` unless `0 <= index < element_count`.
    pub fn locate(&self, index: i64) -> Result<(PageId, usize)> {
        if index < 0 || index as u64 >= self.element_count {
            return Err(ArrayError::IndexOutOfRange {
                index,
                len: self.element_count,
            });
        }
        let index = index as u64;
        let per_page = self.elements_per_page as u64;
        Ok((
            PageId::new((index / per_page) as u32),
            (index % per_page) as usize,
        ))
    }

    /// Byte offset of a page in the primary file
    pub fn page_offset(&self, page_id: PageId) -> u64 {
        page_id.file_offset(self.page_size)
    }

    /// Length of a freshly initialized primary file
    pub fn file_len(&self) -> u64 {
        SIGNATURE_LEN as u64 + self.total_pages as u64 * self.page_size as u64
    }
}
