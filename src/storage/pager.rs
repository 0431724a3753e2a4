use std::{
    collections::{HashMap, hash_map::Entry},
    fs::{File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::types::{PAGE_SIZE, PageNum, error::DatabaseError, page::Page};

/// Owns the backing file and an in-memory cache of its pages.
///
/// Pages are numbered densely from 0 and live at offset `page_num * PAGE_SIZE`.
/// There is no dirty tracking: every resident page is written back on
/// [`Pager::close`].
pub struct Pager {
    path: PathBuf,
    file: File,
    file_length: u64,
    num_pages: u32,
    max_pages: u32,
    pages: HashMap<PageNum, Page>,
}

impl Pager {
    pub fn open<P: AsRef<Path>>(path: P, max_pages: u32) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        let file_length = file.seek(SeekFrom::End(0))?;

        if file_length % PAGE_SIZE as u64 != 0 {
            return Err(DatabaseError::CorruptedFile {
                reason: format!(
                    "Db file is not a whole number of pages ({} bytes)",
                    file_length
                ),
            });
        }
        let num_pages = file_length / PAGE_SIZE as u64;
        if num_pages > max_pages as u64 {
            return Err(DatabaseError::CorruptedFile {
                reason: format!(
                    "Db file holds {} pages, more than the ceiling of {}",
                    num_pages, max_pages
                ),
            });
        }

        info!(path = %path.display(), num_pages, "opened pager");
        Ok(Self {
            path: path.to_path_buf(),
            file,
            file_length,
            num_pages: num_pages as u32,
            max_pages,
            pages: HashMap::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_length(&self) -> u64 {
        self.file_length
    }

    /// Number of pages the table spans, on disk or only in cache.
    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// New pages always go onto the end of the file.
    pub fn unused_page_num(&self) -> PageNum {
        self.num_pages
    }

    pub fn is_resident(&self, page_num: PageNum) -> bool {
        self.pages.contains_key(&page_num)
    }

    pub fn get_page(&mut self, page_num: PageNum) -> Result<&mut Page, DatabaseError> {
        if page_num >= self.max_pages {
            return Err(DatabaseError::PageOutOfBounds {
                page_num,
                max_pages: self.max_pages,
            });
        }

        let pages_on_disk = self.file_length / PAGE_SIZE as u64;
        let page = match self.pages.entry(page_num) {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => {
                let mut page = Page::new();
                if (page_num as u64) < pages_on_disk {
                    debug!(page_num, "cache miss, reading page from disk");
                    self.file
                        .seek(SeekFrom::Start(page_num as u64 * PAGE_SIZE as u64))?;
                    self.file.read_exact(page.as_bytes_mut())?;
                }
                v.insert(page)
            }
        };

        if page_num >= self.num_pages {
            self.num_pages = page_num + 1;
        }
        Ok(page)
    }

    pub fn flush(&mut self, page_num: PageNum) -> Result<(), DatabaseError> {
        let page = self
            .pages
            .get(&page_num)
            .ok_or_else(|| DatabaseError::CorruptedPage {
                page_num,
                reason: "Tried to flush a page that is not resident".to_string(),
            })?;

        let offset = page_num as u64 * PAGE_SIZE as u64;
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(page.as_bytes())?;
        self.file_length = self.file_length.max(offset + PAGE_SIZE as u64);
        debug!(page_num, "flushed page");
        Ok(())
    }

    /// Writes back every resident page and syncs the file. Pages that were
    /// never loaded cannot have changed, so they are skipped.
    pub fn close(mut self) -> Result<(), DatabaseError> {
        for page_num in 0..self.num_pages {
            if self.is_resident(page_num) {
                self.flush(page_num)?;
            }
        }
        self.file.flush()?;
        self.file.sync_all()?;
        info!(path = %self.path.display(), num_pages = self.num_pages, "closed pager");
        Ok(())
    }
}
