use crate::page_file::FilePtr;
use crate::pages::{Page, PageId, INVALID_PAGE};
use std::fmt;

use super::FrameId;

/// One buffer frame: a page-sized buffer plus the bookkeeping bits the
/// clock sweep runs over.
///
/// `valid` implies the frame owns a file handle and exactly one page index
/// entry points at it; an invalid frame holds no file, no pins, and no
/// dirty or reference bit.
pub struct Frame {
    id: FrameId,
    file: Option<FilePtr>,
    page: Page,
    pin_cnt: u16,
    dirty: bool,
    valid: bool,
    refbit: bool,
}

impl Frame {
    pub(super) fn new(id: FrameId) -> Self {
        Self {
            id,
            file: None,
            page: Page::new(),
            pin_cnt: 0,
            dirty: false,
            valid: false,
            refbit: false,
        }
    }

    /// Install a page into this frame, pinned once for the caller.
    pub(super) fn set(&mut self, file: FilePtr, page: Page) {
        self.file = Some(file);
        self.page = page;
        self.pin_cnt = 1;
        self.dirty = false;
        self.valid = true;
        self.refbit = false;
    }

    /// Back to the free state. The buffer bytes are left as-is; nothing
    /// reads them while the frame is invalid.
    pub(super) fn clear(&mut self) {
        self.file = None;
        self.page.set_page_id(INVALID_PAGE);
        self.pin_cnt = 0;
        self.dirty = false;
        self.valid = false;
        self.refbit = false;
    }

    pub(super) fn pin(&mut self) {
        self.pin_cnt += 1;
    }

    /// The manager checks the pin count before calling this.
    pub(super) fn unpin(&mut self) {
        self.pin_cnt -= 1;
    }

    pub fn get_pin_count(&self) -> u16 {
        self.pin_cnt
    }

    pub fn get_page_id(&self) -> PageId {
        self.page.get_page_id()
    }

    pub fn file(&self) -> Option<&FilePtr> {
        self.file.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(super) fn refbit(&self) -> bool {
        self.refbit
    }

    pub(super) fn set_refbit(&mut self) {
        self.refbit = true;
    }

    pub(super) fn clear_refbit(&mut self) {
        self.refbit = false;
    }

    pub(super) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(super) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn reader(&self) -> &Page {
        &self.page
    }

    pub fn writer(&mut self) -> &mut Page {
        &mut self.page
    }

    /// Diagnostic dump of the descriptor fields.
    pub fn print(&self) {
        let file = self.file.as_ref().map_or("-", |f| f.filename());
        println!(
            "frame {}: file: {}, page: {}, pin count: {}, dirty: {}, valid: {}, refbit: {}",
            self.id,
            file,
            self.get_page_id(),
            self.pin_cnt,
            self.dirty,
            self.valid,
            self.refbit
        );
    }

    /// Fakes the corruption `flush_file` reports as `BadBuffer`: an
    /// invalid descriptor that still names a file.
    #[cfg(test)]
    pub(super) fn force_invalid(&mut self) {
        self.valid = false;
    }
}

/// The descriptor fields only; the buffer itself stays out of debug
/// output.
impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("id", &self.id)
            .field("file", &self.file.as_ref().map(|file| file.filename()))
            .field("page", &self.get_page_id())
            .field("pin_cnt", &self.pin_cnt)
            .field("dirty", &self.dirty)
            .field("valid", &self.valid)
            .field("refbit", &self.refbit)
            .finish()
    }
}
