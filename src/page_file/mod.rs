use crate::pages::traits::Serialize;
use crate::pages::{Page, PageId, INVALID_PAGE, PAGE_SIZE};
use anyhow::{anyhow, Context, Result};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const DISK_STORAGE: &str = "data/data/";

const HEADER_FILE: &str = "header";

#[cfg(test)]
pub fn test_path() -> String {
    use uuid::Uuid;

    let id = Uuid::new_v4(); // Generate a unique UUID
    format!("data/test/test_{}/", id)
}

/// Handle identity of an open page file. Every `open` mints a fresh one,
/// so two handles to the same path do not compare equal.
pub type FileId = u64;

static NEXT_FILE_ID: AtomicU64 = AtomicU64::new(0);

pub type FilePtr = Arc<PageFile>;

/// File state that must survive reopen, bincode-serialized into the
/// header file of the page file's directory.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct FileHeader {
    next_page_no: PageId,
}

/// One page file on disk: a directory holding one file per page, named by
/// its page id, plus a header with the allocation counter.
///
/// The buffer pool compares files by handle identity ([`FileId`]), never
/// by path.
#[derive(Debug)]
pub struct PageFile {
    id: FileId,
    path: String,
    header: Mutex<FileHeader>,
}

impl PageFile {
    /// Open the page file at `path`, creating the directory and header if
    /// this is the first open.
    pub fn open(path: &str) -> Result<FilePtr> {
        let dir = Path::new(path);

        std::fs::create_dir_all(dir)?;

        let header_path = dir.join(HEADER_FILE);
        let header = if header_path.exists() {
            let bytes = std::fs::read(&header_path)?;
            bincode::deserialize(&bytes).context("page file header is unreadable")?
        } else {
            FileHeader { next_page_no: 1 }
        };

        let file = PageFile {
            id: NEXT_FILE_ID.fetch_add(1, Ordering::Relaxed),
            path: dir.to_str().unwrap().to_string(),
            header: Mutex::new(header),
        };
        file.persist_header(&file.header.lock())?;

        Ok(Arc::new(file))
    }

    fn persist_header(&self, header: &FileHeader) -> Result<()> {
        let bytes = bincode::serialize(header)?;
        std::fs::write(Path::join(Path::new(&self.path), HEADER_FILE), bytes)?;
        Ok(())
    }

    fn page_path(&self, page_no: PageId) -> PathBuf {
        Path::join(Path::new(&self.path), Path::new(&page_no.to_string()))
    }

    /// Assign the next page id and write the zeroed page to disk, so it
    /// can be read back even if the cached copy is evicted clean.
    pub fn allocate_page(&self) -> Result<Page> {
        let mut header = self.header.lock();
        let page_no = header.next_page_no;
        header.next_page_no += 1;
        self.persist_header(&header)?;

        let mut page = Page::new();
        page.set_page_id(page_no);
        self.write_page(&page)?;

        Ok(page)
    }

    pub fn read_page(&self, page_no: PageId) -> Result<Page> {
        if page_no == INVALID_PAGE {
            return Err(anyhow!("asked to read a page with invalid ID"));
        }

        let mut file = OpenOptions::new()
            .read(true)
            .open(self.page_path(page_no))
            .with_context(|| format!("page {} does not exist in {}", page_no, self.path))?;

        let mut buffer = vec![0u8; PAGE_SIZE];
        file.read_exact(&mut buffer)?;
        let mut page = Page::from_bytes(&buffer);
        page.set_page_id(page_no);

        Ok(page)
    }

    pub fn write_page(&self, page: &Page) -> Result<()> {
        if page.get_page_id() == INVALID_PAGE {
            return Err(anyhow!("asked to write a page with invalid ID"));
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false) // don't overwrite existing file
            .open(self.page_path(page.get_page_id()))?;

        file.write_all(page.as_bytes())?;

        Ok(())
    }

    pub fn delete_page(&self, page_no: PageId) -> Result<()> {
        if page_no == INVALID_PAGE {
            return Err(anyhow!("asked to delete a page with invalid ID"));
        }

        std::fs::remove_file(self.page_path(page_no))
            .with_context(|| format!("page {} does not exist in {}", page_no, self.path))?;

        Ok(())
    }

    /// Diagnostic identity for error messages only.
    pub fn filename(&self) -> &str {
        &self.path
    }

    pub fn id(&self) -> FileId {
        self.id
    }
}
