//! Append-only data log for var-text payloads.
//!
//! Record layout (no file header):
//! ```text
//! Offset  Size    Description
//! 0       4       Payload length (u32, little-endian)
//! 4       length  Payload bytes
//! ```
//!
//! Records are addressed by the offset of their length field and are
//! never rewritten. Overwriting an element appends a new record.

use crate::error::{ArrayError, Result};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Size of the length prefix of each record
pub const RECORD_HEADER_SIZE: u64 = 4;

/// Highest offset that fits in a 4-byte slot
pub const MAX_RECORD_OFFSET: u64 = i32::MAX as u64;

/// Append-only log of length-prefixed records
pub struct DataLog {
    file: Mutex<File>,
    sync_on_write: bool,
}

impl DataLog {
    /// Open or create a data log
    pub fn open(path: &Path, sync_on_write: bool) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        Ok(Self {
            file: Mutex::new(file),
            sync_on_write,
        })
    }

    /// Current length of the log in bytes
    pub fn len(&self) -> Result<u64> {
        Ok(self.file.lock().metadata()?.len())
    }

    /// Append a record and return its starting offset.
    ///
    /// Fails with `StorageOverflow` if the offset would not fit in a slot;
    /// nothing is written in that case.
    pub fn append_record(&self, payload: &[u8]) -> Result<i32> {
        let mut file = self.file.lock();
        let offset = file.seek(SeekFrom::End(0))?;
        if offset > MAX_RECORD_OFFSET {
            return Err(ArrayError::StorageOverflow { offset });
        }
        let len = u32::try_from(payload.len())
            .map_err(|_| ArrayError::StorageOverflow { offset })?;

        let mut record = Vec::with_capacity(RECORD_HEADER_SIZE as usize + payload.len());
        record.extend_from_slice(&len.to_le_bytes());
        record.extend_from_slice(payload);

        file.write_all(&record)?;
        file.flush()?;
        if self.sync_on_write {
            file.sync_data()?;
        }

        Ok(offset as i32)
    }

    /// Read the record starting at `offset`.
    ///
    /// Returns `None` for a negative offset or one where no complete
    /// record fits.
    pub fn read_record(&self, offset: i32) -> Result<Option<Vec<u8>>> {
        let Ok(offset) = u64::try_from(offset) else {
            return Ok(None);
        };
        let mut file = self.file.lock();
        let file_len = file.metadata()?.len();
        if offset + RECORD_HEADER_SIZE > file_len {
            return Ok(None);
        }

        file.seek(SeekFrom::Start(offset))?;
        let mut len_buf = [0u8; 4];
        file.read_exact(&mut len_buf)?;
        let len = u32::from_le_bytes(len_buf) as u64;
        if offset + RECORD_HEADER_SIZE + len > file_len {
            return Ok(None);
        }

        let mut payload = vec![0u8; len as usize];
        file.read_exact(&mut payload)?;
        Ok(Some(payload))
    }

    /// Sync all data to disk
    pub fn sync(&self) -> Result<()> {
        self.file.lock().sync_all()?;
        Ok(())
    }
}
