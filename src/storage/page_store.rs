//! Primary file page store.
//!
//! The page store reads and writes whole pages of the primary file. It
//! abstracts the file I/O behind a trait so the buffer pool can be
//! tested against other backends.

use crate::error::Result;
use crate::page::Page;
use crate::types::{PageGeometry, PageId, SIGNATURE, SIGNATURE_LEN};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Trait for whole-page I/O against a primary file
pub trait PageStore: Send + Sync {
    /// Geometry the store was opened with
    fn geometry(&self) -> &PageGeometry;

    /// Read a page from disk
    fn read_page(&self, page_id: PageId) -> Result<Page>;

    /// Write a page to disk and clear its dirty flag
    fn write_page(&self, page: &mut Page) -> Result<()>;

    /// Sync all data to disk
    fn sync(&self) -> Result<()>;
}

/// File-based page store
pub struct FilePageStore {
    /// The primary file
    file: Mutex<File>,
    geometry: PageGeometry,
    /// Whether to sync after each page write
    sync_on_write: bool,
}

impl FilePageStore {
    /// Open or create a primary file.
    ///
    /// A new file gets the signature and is extended (zero-filled) to hold
    /// every page. An existing file is opened as-is; its geometry is
    /// trusted to match.
    pub fn open(path: &Path, geometry: PageGeometry, sync_on_write: bool) -> Result<Self> {
        let exists = path.exists();

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        if exists {
            let mut signature = [0u8; SIGNATURE_LEN];
            if file.read_exact(&mut signature).is_err() || &signature != SIGNATURE {
                tracing::warn!(path = %path.display(), "primary file has no VM signature");
            }
            let len = file.metadata()?.len();
            if len < geometry.file_len() {
                tracing::warn!(
                    path = %path.display(),
                    len,
                    expected = geometry.file_len(),
                    "primary file shorter than its pages, zero-extending"
                );
                file.set_len(geometry.file_len())?;
            }
        } else {
            file.write_all(SIGNATURE)?;
            file.set_len(geometry.file_len())?;
            file.sync_all()?;
            tracing::debug!(
                path = %path.display(),
                pages = geometry.total_pages,
                page_size = geometry.page_size,
                "created primary file"
            );
        }

        Ok(Self {
            file: Mutex::new(file),
            geometry,
            sync_on_write,
        })
    }

    fn check_page(&self, page_id: PageId) -> io::Result<()> {
        if page_id.value() >= self.geometry.total_pages {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "page {} beyond end of file ({} pages)",
                    page_id, self.geometry.total_pages
                ),
            ));
        }
        Ok(())
    }
}

impl PageStore for FilePageStore {
    fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    fn read_page(&self, page_id: PageId) -> Result<Page> {
        self.check_page(page_id)?;

        let offset = self.geometry.page_offset(page_id);
        let mut buf = vec![0u8; self.geometry.page_size];

        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut buf)?;

        Ok(Page::from_bytes(page_id, &buf, &self.geometry))
    }

    fn write_page(&self, page: &mut Page) -> Result<()> {
        self.check_page(page.page_id())?;

        let offset = self.geometry.page_offset(page.page_id());

        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(page.bitmap().as_bytes())?;
        file.write_all(page.data())?;
        file.flush()?;

        if self.sync_on_write {
            file.sync_data()?;
        }

        page.mark_clean();
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        let file = self.file.lock();
        file.sync_all()?;
        Ok(())
    }
}
