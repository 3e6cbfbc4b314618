//! Virtual array manager.
//!
//! Translates element indices to pages and slots, routes typed reads and
//! writes through the buffer pool and, for `varchar` arrays, through the
//! data log. The array is open from construction until `close()`; every
//! operation after that fails with `ArrayError::Closed`.

use crate::buffer::{BufferPool, PoolStats};
use crate::error::{ArrayError, Result};
use crate::page::codec;
use crate::storage::{DataLog, FilePageStore};
use crate::types::{ElementType, PageGeometry, Value};
use crate::Config;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Description of an array and its files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayMetadata {
    pub element_type: ElementType,
    pub element_count: u64,
    pub elements_per_page: usize,
    pub page_size: usize,
    pub total_pages: u32,
    pub primary_path: PathBuf,
    /// Only present for `varchar` arrays
    pub data_log_path: Option<PathBuf>,
}

/// Files and pages held while the array is open
struct OpenArray {
    pool: BufferPool,
    data_log: Option<DataLog>,
}

/// Handle to a paged, disk-backed array
pub struct VirtualArray {
    /// `None` once closed
    state: Mutex<Option<OpenArray>>,
    metadata: ArrayMetadata,
}

impl VirtualArray {
    /// Create or open an array with default settings
    pub fn create<P: Into<PathBuf>>(
        path: P,
        element_count: u64,
        element_type: ElementType,
    ) -> Result<Self> {
        Self::open(Config::new(path, element_count, element_type))
    }

    /// Create or open an array.
    ///
    /// Missing files are created; existing ones are used as-is. The first
    /// pages are loaded into the buffer pool before returning.
    pub fn open(config: Config) -> Result<Self> {
        let geometry = PageGeometry::new(config.element_type, config.element_count)?;
        let store = Arc::new(FilePageStore::open(
            &config.path,
            geometry,
            config.sync_on_write,
        )?);

        let data_log_path = config.data_log_path();
        let data_log = data_log_path
            .as_deref()
            .map(|path| DataLog::open(path, config.sync_on_write))
            .transpose()?;

        let mut pool = BufferPool::new(store, config.buffer_pool_size, config.observer.clone());
        pool.preload()?;

        tracing::debug!(
            path = %config.path.display(),
            element_type = %config.element_type,
            element_count = config.element_count,
            "opened virtual array"
        );

        Ok(Self {
            state: Mutex::new(Some(OpenArray { pool, data_log })),
            metadata: ArrayMetadata {
                element_type: geometry.element_type,
                element_count: geometry.element_count,
                elements_per_page: geometry.elements_per_page,
                page_size: geometry.page_size,
                total_pages: geometry.total_pages,
                primary_path: config.path,
                data_log_path,
            },
        })
    }

    pub fn element_type(&self) -> ElementType {
        self.metadata.element_type
    }

    /// Number of elements
    pub fn len(&self) -> u64 {
        self.metadata.element_count
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.element_count == 0
    }

    pub fn path(&self) -> &Path {
        &self.metadata.primary_path
    }

    /// Array description; available after close as well
    pub fn metadata(&self) -> ArrayMetadata {
        self.metadata.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().is_none()
    }

    /// Current size of the data log in bytes, `None` unless `varchar`
    pub fn data_log_len(&self) -> Result<Option<u64>> {
        self.with_open(|array| array.data_log.as_ref().map(DataLog::len).transpose())
    }

    /// Buffer pool counters
    pub fn stats(&self) -> Result<PoolStats> {
        self.with_open(|array| Ok(array.pool.stats()))
    }

    fn with_open<T>(&self, f: impl FnOnce(&mut OpenArray) -> Result<T>) -> Result<T> {
        let mut state = self.state.lock();
        let array = state.as_mut().ok_or(ArrayError::Closed)?;
        f(array)
    }

    fn mismatch(&self, expected: &'static str) -> ArrayError {
        ArrayError::type_mismatch(expected, self.metadata.element_type)
    }

    // ---- int ----

    /// Write an integer. Only valid for `int` arrays.
    pub fn write_int(&self, index: i64, value: i32) -> Result<()> {
        self.with_open(|array| {
            if self.element_type() != ElementType::Int32 {
                return Err(self.mismatch("int"));
            }
            let (page_id, slot) = array.pool.geometry().locate(index)?;
            array.pool.fetch_page_mut(page_id)?.set_int(slot, value);
            Ok(())
        })
    }

    /// Read an integer, or `None` if the element was never written
    pub fn read_int(&self, index: i64) -> Result<Option<i32>> {
        self.with_open(|array| {
            if self.element_type() != ElementType::Int32 {
                return Err(self.mismatch("int"));
            }
            let (page_id, slot) = array.pool.geometry().locate(index)?;
            let page = array.pool.fetch_page(page_id)?;
            Ok(page.is_set(slot).then(|| page.get_int(slot)))
        })
    }

    // ---- char(N) ----

    /// Write fixed-length text. Longer values are silently truncated to
    /// `N` characters (and `N` bytes); shorter ones are null-padded.
    pub fn write_fixed_text(&self, index: i64, value: &str) -> Result<()> {
        self.with_open(|array| {
            let ElementType::FixedText(length) = self.element_type() else {
                return Err(self.mismatch("char"));
            };
            let (page_id, slot) = array.pool.geometry().locate(index)?;
            if array
                .pool
                .fetch_page_mut(page_id)?
                .set_text(slot, value, length)
            {
                tracing::debug!(index, length, "fixed text truncated");
            }
            Ok(())
        })
    }

    /// Read fixed-length text without its padding
    pub fn read_fixed_text(&self, index: i64) -> Result<Option<String>> {
        self.with_open(|array| {
            let ElementType::FixedText(length) = self.element_type() else {
                return Err(self.mismatch("char"));
            };
            let (page_id, slot) = array.pool.geometry().locate(index)?;
            let page = array.pool.fetch_page(page_id)?;
            Ok(page.is_set(slot).then(|| page.get_text(slot, length)))
        })
    }

    // ---- varchar(N) ----

    /// Write variable-length text, truncated to `N` characters.
    ///
    /// The text is appended to the data log and its offset stored in the
    /// slot. Earlier records for the same index stay in the log. If the log
    /// cannot take the record the element keeps its previous value.
    pub fn write_var_text(&self, index: i64, value: &str) -> Result<()> {
        self.with_open(|array| {
            let ElementType::VarText(max_length) = self.element_type() else {
                return Err(self.mismatch("varchar"));
            };
            let log = array
                .data_log
                .as_ref()
                .ok_or_else(|| self.mismatch("varchar"))?;
            let (page_id, slot) = array.pool.geometry().locate(index)?;

            let text = codec::fit_text(value, max_length, usize::MAX);
            if text.len() < value.len() {
                tracing::debug!(index, max_length, "var text truncated");
            }

            let page = array.pool.fetch_page_mut(page_id)?;
            let offset = log.append_record(text.as_bytes())?;
            page.set_int(slot, offset);
            Ok(())
        })
    }

    /// Read variable-length text.
    ///
    /// An unset slot, or a stored offset that does not address a complete
    /// record, reads as `None`.
    pub fn read_var_text(&self, index: i64) -> Result<Option<String>> {
        self.with_open(|array| {
            let ElementType::VarText(_) = self.element_type() else {
                return Err(self.mismatch("varchar"));
            };
            let log = array
                .data_log
                .as_ref()
                .ok_or_else(|| self.mismatch("varchar"))?;
            let (page_id, slot) = array.pool.geometry().locate(index)?;

            let page = array.pool.fetch_page(page_id)?;
            if !page.is_set(slot) {
                return Ok(None);
            }
            let offset = page.get_int(slot);

            match log.read_record(offset)? {
                Some(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
                None => {
                    tracing::warn!(index, offset, "data log offset does not address a record");
                    Ok(None)
                }
            }
        })
    }

    // ---- untyped ----

    /// Write a value whose shape must match the element type
    pub fn write(&self, index: i64, value: impl Into<Value>) -> Result<()> {
        if self.is_closed() {
            return Err(ArrayError::Closed);
        }
        match (self.element_type(), value.into()) {
            (ElementType::Int32, Value::Int(v)) => self.write_int(index, v),
            (ElementType::FixedText(_), Value::Text(s)) => self.write_fixed_text(index, &s),
            (ElementType::VarText(_), Value::Text(s)) => self.write_var_text(index, &s),
            (_, Value::Int(_)) => Err(self.mismatch("int")),
            (_, Value::Text(_)) => Err(self.mismatch("text")),
        }
    }

    /// Read a value, or `None` if the element was never written
    pub fn read(&self, index: i64) -> Result<Option<Value>> {
        match self.element_type() {
            ElementType::Int32 => Ok(self.read_int(index)?.map(Value::Int)),
            ElementType::FixedText(_) => Ok(self.read_fixed_text(index)?.map(Value::Text)),
            ElementType::VarText(_) => Ok(self.read_var_text(index)?.map(Value::Text)),
        }
    }

    // ---- lifecycle ----

    /// Write back all dirty pages and sync both files, keeping the array open
    pub fn flush(&self) -> Result<()> {
        self.with_open(|array| {
            array.pool.flush_all()?;
            if let Some(log) = &array.data_log {
                log.sync()?;
            }
            Ok(())
        })
    }

    /// Flush everything and release the files.
    ///
    /// If flushing fails the array stays open. Closing twice fails with
    /// `Closed`.
    pub fn close(&self) -> Result<()> {
        let mut state = self.state.lock();
        let array = state.as_mut().ok_or(ArrayError::Closed)?;

        array.pool.flush_all()?;
        if let Some(log) = &array.data_log {
            log.sync()?;
        }
        *state = None;

        tracing::debug!(path = %self.metadata.primary_path.display(), "closed virtual array");
        Ok(())
    }
}

impl Drop for VirtualArray {
    fn drop(&mut self) {
        if self.state.get_mut().is_some() {
            if let Err(e) = self.close() {
                tracing::warn!(
                    path = %self.metadata.primary_path.display(),
                    error = %e,
                    "failed to flush virtual array on drop"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{PageEvent, RecordingObserver};
    use crate::types::PageId;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::collections::HashMap;
    use std::fs::File;
    use tempfile::tempdir;

    fn open_with_observer(
        path: &Path,
        element_count: u64,
        element_type: ElementType,
    ) -> Result<(VirtualArray, Arc<RecordingObserver>)> {
        let observer = Arc::new(RecordingObserver::default());
        let config = Config::new(path, element_count, element_type)
            .sync_on_write(false)
            .observer(observer.clone());
        Ok((VirtualArray::open(config)?, observer))
    }

    #[test]
    fn test_int_round_trip() -> Result<()> {
        let dir = tempdir().unwrap();
        let array = VirtualArray::create(dir.path().join("ints.bin"), 10_000, ElementType::Int32)?;

        array.write_int(0, 42)?;
        array.write_int(9_999, -7)?;
        array.write_int(0, 43)?;

        assert_eq!(array.read_int(0)?, Some(43));
        assert_eq!(array.read_int(9_999)?, Some(-7));

        Ok(())
    }

    #[test]
    fn test_unwritten_elements_are_absent() -> Result<()> {
        let dir = tempdir().unwrap();
        let array = VirtualArray::create(dir.path().join("ints.bin"), 1_000, ElementType::Int32)?;

        array.write_int(5, 0)?;

        assert_eq!(array.read_int(5)?, Some(0));
        for index in [0, 4, 6, 123, 124, 999] {
            assert_eq!(array.read_int(index)?, None, "index {}", index);
        }

        Ok(())
    }

    #[test]
    fn test_bounds() -> Result<()> {
        let dir = tempdir().unwrap();
        let array = VirtualArray::create(dir.path().join("ints.bin"), 10, ElementType::Int32)?;

        assert!(matches!(
            array.read_int(-1),
            Err(ArrayError::IndexOutOfRange { index: -1, len: 10 })
        ));
        assert!(matches!(
            array.read_int(10),
            Err(ArrayError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            array.write_int(10, 1),
            Err(ArrayError::IndexOutOfRange { .. })
        ));
        assert_eq!(array.read_int(9)?, None);

        Ok(())
    }

    #[test]
    fn test_type_mismatch() -> Result<()> {
        let dir = tempdir().unwrap();
        let array = VirtualArray::create(dir.path().join("ints.bin"), 10, ElementType::Int32)?;

        assert!(matches!(
            array.write_fixed_text(0, "x"),
            Err(ArrayError::TypeMismatch { expected: "char", .. })
        ));
        assert!(matches!(
            array.read_var_text(0),
            Err(ArrayError::TypeMismatch { expected: "varchar", .. })
        ));
        assert!(matches!(
            array.write(0, "text"),
            Err(ArrayError::TypeMismatch { .. })
        ));

        let text = VirtualArray::create(dir.path().join("text.bin"), 10, ElementType::FixedText(3))?;
        assert!(matches!(
            text.read_int(0),
            Err(ArrayError::TypeMismatch { expected: "int", .. })
        ));
        assert!(matches!(text.write(0, 5), Err(ArrayError::TypeMismatch { .. })));

        Ok(())
    }

    #[test]
    fn test_eviction_keeps_data() -> Result<()> {
        let dir = tempdir().unwrap();
        let (array, observer) =
            open_with_observer(&dir.path().join("ints.bin"), 10_000, ElementType::Int32)?;

        // Pages 0, 1, 2, 3 with 124 elements per page
        array.write_int(0, 42)?;
        array.write_int(130, 7)?;
        array.write_int(260, 9)?;
        array.write_int(400, 1)?;

        assert!(observer.events().contains(&PageEvent::Evicted {
            page_id: PageId::new(0),
            written_back: true
        }));

        assert_eq!(array.read_int(0)?, Some(42));
        assert_eq!(array.read_int(130)?, Some(7));
        assert_eq!(array.read_int(260)?, Some(9));
        assert_eq!(array.read_int(400)?, Some(1));
        assert!(array.stats()?.resident_pages <= 3);

        Ok(())
    }

    #[test]
    fn test_durability_across_reopen() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ints.bin");

        {
            let array = VirtualArray::create(&path, 10_000, ElementType::Int32)?;
            array.write_int(10, 1010)?;
            // Touch three other pages so page 0 is written back and evicted
            array.write_int(1_000, 1)?;
            array.write_int(2_000, 2)?;
            array.write_int(3_000, 3)?;
            // Still resident at close
            array.write_int(3_001, 4)?;
            array.close()?;
        }

        let array = VirtualArray::create(&path, 10_000, ElementType::Int32)?;
        assert_eq!(array.read_int(10)?, Some(1010));
        assert_eq!(array.read_int(3_001)?, Some(4));
        assert_eq!(array.read_int(11)?, None);

        Ok(())
    }

    #[test]
    fn test_drop_flushes() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("text.bin");

        {
            let array = VirtualArray::create(&path, 500, ElementType::FixedText(6))?;
            array.write_fixed_text(300, "kept")?;
        }

        let array = VirtualArray::create(&path, 500, ElementType::FixedText(6))?;
        assert_eq!(array.read_fixed_text(300)?, Some("kept".to_string()));

        Ok(())
    }

    #[test]
    fn test_fixed_text() -> Result<()> {
        let dir = tempdir().unwrap();
        let array = VirtualArray::create(dir.path().join("text.bin"), 300, ElementType::FixedText(5))?;

        array.write_fixed_text(0, "abc")?;
        array.write_fixed_text(1, "Hello, world")?;
        array.write_fixed_text(2, "")?;

        assert_eq!(array.read_fixed_text(0)?, Some("abc".to_string()));
        assert_eq!(array.read_fixed_text(1)?, Some("Hello".to_string()));
        assert_eq!(array.read_fixed_text(2)?, Some(String::new()));
        assert_eq!(array.read_fixed_text(3)?, None);

        Ok(())
    }

    #[test]
    fn test_var_text_overwrite_appends() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.bin");
        let array = VirtualArray::create(&path, 1_000, ElementType::VarText(50))?;
        let log_path = array.metadata().data_log_path.unwrap();
        assert_eq!(array.data_log_len()?, Some(0));

        array.write_var_text(7, "first value")?;
        let after_first = array.data_log_len()?.unwrap();
        array.write_var_text(7, "second")?;
        let after_second = array.data_log_len()?.unwrap();

        assert_eq!(array.read_var_text(7)?, Some("second".to_string()));
        assert_eq!(after_first, 4 + 11);
        assert_eq!(after_second, after_first + 4 + 6);
        array.close()?;

        // The old record is still physically present
        let log = std::fs::read(&log_path)?;
        assert_eq!(&log[4..15], b"first value");

        // Slot 7 of page 0 holds the offset of the newest record
        let primary = std::fs::read(&path)?;
        let slot = 2 + 16 + 7 * 4;
        assert_eq!(&primary[slot..slot + 4], &(after_first as i32).to_le_bytes());

        Ok(())
    }

    #[test]
    fn test_data_log_len_only_for_var_text() -> Result<()> {
        let dir = tempdir().unwrap();
        let ints = VirtualArray::create(dir.path().join("ints.bin"), 10, ElementType::Int32)?;
        assert_eq!(ints.data_log_len()?, None);

        ints.close()?;
        assert!(matches!(ints.data_log_len(), Err(ArrayError::Closed)));

        Ok(())
    }

    #[test]
    fn test_create_over_empty_file() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        File::create(&path)?;

        let array = VirtualArray::create(&path, 1_000, ElementType::Int32)?;
        assert_eq!(array.read_int(999)?, None);
        array.write_int(999, 5)?;
        assert_eq!(array.read_int(999)?, Some(5));

        Ok(())
    }

    #[test]
    fn test_var_text_truncates_to_max_length() -> Result<()> {
        let dir = tempdir().unwrap();
        let array = VirtualArray::create(dir.path().join("words.bin"), 10, ElementType::VarText(4))?;

        array.write_var_text(0, "abcdefgh")?;
        array.write_var_text(1, "héllo")?;
        array.write_var_text(2, "ok")?;

        assert_eq!(array.read_var_text(0)?.unwrap().as_bytes(), b"abcd");
        assert_eq!(array.read_var_text(1)?, Some("héll".to_string()));
        assert_eq!(array.read_var_text(2)?, Some("ok".to_string()));
        assert_eq!(array.read_var_text(3)?, None);

        Ok(())
    }

    #[test]
    fn test_var_text_survives_reopen() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.bin");

        {
            let array = VirtualArray::create(&path, 1_000, ElementType::VarText(100))?;
            array.write_var_text(0, "zero")?;
            array.write_var_text(999, "last")?;
            array.close()?;
        }

        let array = VirtualArray::create(&path, 1_000, ElementType::VarText(100))?;
        array.write_var_text(500, "middle")?;
        assert_eq!(array.read_var_text(0)?, Some("zero".to_string()));
        assert_eq!(array.read_var_text(999)?, Some("last".to_string()));
        assert_eq!(array.read_var_text(500)?, Some("middle".to_string()));

        Ok(())
    }

    #[test]
    fn test_var_text_overflow_keeps_old_value() -> Result<()> {
        let dir = tempdir().unwrap();
        let array = VirtualArray::create(dir.path().join("words.bin"), 10, ElementType::VarText(10))?;
        let log_path = array.metadata().data_log_path.unwrap();

        array.write_var_text(3, "before")?;
        File::options()
            .write(true)
            .open(&log_path)?
            .set_len(i32::MAX as u64 + 1)?;

        assert!(matches!(
            array.write_var_text(3, "after"),
            Err(ArrayError::StorageOverflow { .. })
        ));
        assert_eq!(array.read_var_text(3)?, Some("before".to_string()));

        Ok(())
    }

    #[test]
    fn test_var_text_dangling_offset_reads_absent() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.bin");

        {
            let array = VirtualArray::create(&path, 10, ElementType::VarText(10))?;
            array.write_var_text(0, "gone")?;
            array.write_var_text(1, "also gone")?;
            array.close()?;
        }
        // Lose the log contents; the slots still point into it
        File::options()
            .write(true)
            .open(dir.path().join("words.bin.dat"))?
            .set_len(0)?;

        let array = VirtualArray::create(&path, 10, ElementType::VarText(10))?;
        assert_eq!(array.read_var_text(0)?, None);
        assert_eq!(array.read_var_text(1)?, None);

        Ok(())
    }

    #[test]
    fn test_untyped_api() -> Result<()> {
        let dir = tempdir().unwrap();
        let ints = VirtualArray::create(dir.path().join("ints.bin"), 10, ElementType::Int32)?;
        ints.write(1, 11)?;
        assert_eq!(ints.read(1)?, Some(Value::Int(11)));
        assert_eq!(ints.read(2)?, None);

        let words = VirtualArray::create(dir.path().join("words.bin"), 10, ElementType::VarText(8))?;
        words.write(1, "eleven")?;
        assert_eq!(words.read(1)?, Some(Value::Text("eleven".to_string())));

        Ok(())
    }

    #[test]
    fn test_closed_rejects_operations() -> Result<()> {
        let dir = tempdir().unwrap();
        let array = VirtualArray::create(dir.path().join("ints.bin"), 10, ElementType::Int32)?;
        array.write_int(0, 1)?;
        array.close()?;

        assert!(array.is_closed());
        assert!(matches!(array.read_int(0), Err(ArrayError::Closed)));
        assert!(matches!(array.write_int(0, 2), Err(ArrayError::Closed)));
        assert!(matches!(array.write(0, "x"), Err(ArrayError::Closed)));
        assert!(matches!(array.stats(), Err(ArrayError::Closed)));
        assert!(matches!(array.flush(), Err(ArrayError::Closed)));
        assert!(matches!(array.close(), Err(ArrayError::Closed)));
        assert_eq!(array.metadata().element_count, 10);

        Ok(())
    }

    #[test]
    fn test_open_preloads_first_pages() -> Result<()> {
        let dir = tempdir().unwrap();
        let (array, observer) =
            open_with_observer(&dir.path().join("ints.bin"), 10_000, ElementType::Int32)?;

        assert_eq!(
            observer.events(),
            vec![
                PageEvent::Loaded(PageId::new(0)),
                PageEvent::Loaded(PageId::new(1)),
                PageEvent::Loaded(PageId::new(2)),
            ]
        );
        let stats = array.stats()?;
        assert_eq!(stats.resident_pages, 3);
        assert_eq!(stats.capacity, 3);

        Ok(())
    }

    #[test]
    fn test_metadata() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.bin");
        let array = VirtualArray::create(&path, 1_000, ElementType::VarText(20))?;

        let metadata = array.metadata();
        assert_eq!(metadata.element_type, ElementType::VarText(20));
        assert_eq!(metadata.element_count, 1_000);
        assert_eq!(metadata.elements_per_page, 128);
        assert_eq!(metadata.page_size, 528);
        assert_eq!(metadata.total_pages, 8);
        assert_eq!(metadata.primary_path, path);
        assert_eq!(
            metadata.data_log_path,
            Some(dir.path().join("words.bin.dat"))
        );

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["elementCount"], 1_000);
        assert_eq!(json["elementType"]["kind"], "varText");

        Ok(())
    }

    #[test]
    fn test_invalid_type_at_creation() {
        let dir = tempdir().unwrap();
        let result = VirtualArray::create(dir.path().join("bad.bin"), 10, ElementType::FixedText(0));
        assert!(matches!(result, Err(ArrayError::InvalidType(_))));
    }

    #[test]
    fn test_random_ops_match_model() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ints.bin");
        let element_count = 124 * 12;
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut model: HashMap<i64, i32> = HashMap::new();

        {
            let (array, _) = open_with_observer(&path, element_count, ElementType::Int32)?;
            for _ in 0..2_000 {
                let index = rng.gen_range(0..element_count as i64);
                if rng.gen_bool(0.6) {
                    let value: i32 = rng.gen();
                    array.write_int(index, value)?;
                    model.insert(index, value);
                } else {
                    assert_eq!(array.read_int(index)?, model.get(&index).copied());
                }
                assert!(array.stats()?.resident_pages <= 3);
            }
            array.close()?;
        }

        let (array, _) = open_with_observer(&path, element_count, ElementType::Int32)?;
        for index in 0..element_count as i64 {
            assert_eq!(array.read_int(index)?, model.get(&index).copied());
        }

        Ok(())
    }
}
