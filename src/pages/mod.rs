pub(crate) mod traits;

use traits::Serialize;

pub const PAGE_SIZE: usize = 4096; // 4 KBs
pub const INVALID_PAGE: PageId = -1;

pub type PageId = i64;

/// A generic page with an underlying array of [`PAGE_SIZE`] bytes and the
/// id assigned to it at allocation. A fresh page is zeroed and carries
/// [`INVALID_PAGE`] until a page file hands it an identity.
///
/// Whether a page differs from its on-disk copy is not tracked here; the
/// buffer pool keeps the dirty bit on the frame holding the page.
#[repr(C, align(4))]
#[derive(Clone, Debug)]
pub struct Page {
    /// Underlying block of memory of size [`PAGE_SIZE`]
    data: [u8; PAGE_SIZE],
    page_id: PageId,
}

impl Serialize for Page {
    fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len(), PAGE_SIZE);
        let mut page = Page::new();
        page.data.copy_from_slice(bytes);
        page
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::new()
    }
}

impl Page {
    pub fn new() -> Self {
        Page {
            data: [0u8; PAGE_SIZE],
            page_id: INVALID_PAGE,
        }
    }

    pub fn get_page_id(&self) -> PageId {
        self.page_id
    }

    pub fn set_page_id(&mut self, page_id: PageId) {
        self.page_id = page_id;
    }

    pub fn read_bytes(&self, start: usize, end: usize) -> &[u8] {
        &self.data[start..end]
    }

    pub fn write_bytes(&mut self, start: usize, end: usize, bytes: &[u8]) {
        self.data[start..end].copy_from_slice(bytes);
    }
}
