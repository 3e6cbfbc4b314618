//! # Virtual Array
//!
//! A fixed-size array of homogeneous elements whose storage is split
//! between a small in-memory buffer pool and a backing file, in the
//! manner of virtual-memory paging.
//!
//! ## Architecture
//!
//! - **Types** (`types`): element types, values and page geometry
//! - **Page Layer** (`page`): validity bitmap and typed slot codec
//! - **Storage Layer** (`storage`): primary file page I/O and the
//!   append-only data log used by `varchar` arrays
//! - **Buffer Pool** (`buffer`): bounded LRU page cache with dirty
//!   write-back and swap notifications
//! - **Virtual Array** (`array`): index translation, typed reads and
//!   writes, lifecycle
//!
//! ## Usage
//!
//! ```rust,ignore
//! use virtual_array::{Config, ElementType, VirtualArray};
//!
//! let config = Config::new("numbers.bin", 10_000, ElementType::Int32);
//! let array = VirtualArray::open(config)?;
//!
//! array.write_int(0, 42)?;
//! assert_eq!(array.read_int(0)?, Some(42));
//! assert_eq!(array.read_int(1)?, None); // never written
//!
//! array.close()?;
//! ```

pub mod array;
pub mod buffer;
pub mod error;
pub mod page;
pub mod storage;
pub mod types;

pub use array::{ArrayMetadata, VirtualArray};
pub use buffer::{BufferPool, PageEvent, PageObserver, PoolStats};
pub use error::{ArrayError, Result};
pub use types::{ElementType, PageGeometry, PageId, Value, DEFAULT_BUFFER_CAPACITY};

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Virtual array configuration
#[derive(Clone)]
pub struct Config {
    /// Path to the primary file
    pub path: PathBuf,
    /// Number of elements, fixed for the life of the files
    pub element_count: u64,
    /// Element type, fixed for the life of the files
    pub element_type: ElementType,
    /// Buffer pool size in number of pages (default: 3)
    pub buffer_pool_size: usize,
    /// Whether to sync every page write-back and log append (default: true)
    pub sync_on_write: bool,
    /// Optional receiver of page swap events
    pub observer: Option<Arc<dyn PageObserver>>,
}

impl Config {
    /// Create a new configuration with default settings
    pub fn new<P: Into<PathBuf>>(path: P, element_count: u64, element_type: ElementType) -> Self {
        Self {
            path: path.into(),
            element_count,
            element_type,
            buffer_pool_size: DEFAULT_BUFFER_CAPACITY,
            sync_on_write: true,
            observer: None,
        }
    }

    /// Set buffer pool size
    pub fn buffer_pool_size(mut self, size: usize) -> Self {
        self.buffer_pool_size = size;
        self
    }

    /// Enable or disable sync on write
    pub fn sync_on_write(mut self, enabled: bool) -> Self {
        self.sync_on_write = enabled;
        self
    }

    /// Attach a page event observer
    pub fn observer(mut self, observer: Arc<dyn PageObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Path of the data log: the primary path with `.dat` appended.
    ///
    /// Only `varchar` arrays have one.
    pub fn data_log_path(&self) -> Option<PathBuf> {
        self.element_type.uses_data_log().then(|| {
            let mut path = self.path.clone().into_os_string();
            path.push(".dat");
            PathBuf::from(path)
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("path", &self.path)
            .field("element_count", &self.element_count)
            .field("element_type", &self.element_type)
            .field("buffer_pool_size", &self.buffer_pool_size)
            .field("sync_on_write", &self.sync_on_write)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
