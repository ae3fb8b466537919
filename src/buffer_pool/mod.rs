mod frame;
mod page_index;
mod replacer;
mod stats;

use crate::errors::BufferError;
#[cfg(debug_assertions)]
use crate::get_caller_name;
use crate::page_file::FilePtr;
use crate::pages::PageId;
use crate::printdbg;
use anyhow::Result;
use lazy_static::lazy_static;
use page_index::PageIndex;
use parking_lot::FairMutex;
use replacer::ClockSweep;
use std::sync::Arc;

pub use frame::Frame;
pub use stats::BufferStats;

/// Frames of the process-wide pool, ~40 MB of page buffers.
const BUFFER_POOL_SIZE: usize = 10_000;

pub type FrameId = usize;
pub type ArcBufferPool = Arc<FairMutex<BufferPoolManager>>;

/// A fixed pool of page-sized frames caching disk pages.
///
/// Pages are fetched and released through a pin protocol: every successful
/// [`read_page`](Self::read_page) or [`alloc_page`](Self::alloc_page)
/// leaves the page pinned and must be paired with an
/// [`unpin_page`](Self::unpin_page). A pinned frame is never evicted;
/// once the pin count drops to zero the frame is up for grabs by the
/// clock sweep, which writes dirty pages back before reusing the frame.
pub struct BufferPoolManager {
    frames: Vec<Frame>,
    page_index: PageIndex,
    clock: ClockSweep,
    stats: BufferStats,
}

lazy_static! {
    static ref BUFFER_POOL: ArcBufferPool = Arc::new(FairMutex::new(BufferPoolManager::new(
        BUFFER_POOL_SIZE
    )));
}

impl BufferPoolManager {
    pub fn get() -> ArcBufferPool {
        BUFFER_POOL.clone()
    }

    pub fn new(size: usize) -> Self {
        Self {
            frames: (0..size).map(Frame::new).collect(),
            page_index: PageIndex::new(size),
            clock: ClockSweep::new(size),
            stats: BufferStats::default(),
        }
    }

    pub fn size(&self) -> usize {
        self.frames.len()
    }

    /// Free up a frame, evicting a resident page if needed.
    ///
    /// The returned frame is always invalid and unmapped. A dirty victim
    /// is written back to its file before the mapping is dropped.
    fn alloc_buf(&mut self) -> Result<FrameId> {
        let frame_no = self.clock.find_victim(&mut self.frames)?;

        // valid frames always own their file handle
        if let Some(file) = self.frames[frame_no].file().cloned() {
            let page_no = self.frames[frame_no].get_page_id();
            printdbg!(
                "page {page_no} (frame: {frame_no}) chosen for eviction, dirty: {}",
                self.frames[frame_no].is_dirty()
            );

            if self.frames[frame_no].is_dirty() {
                file.write_page(self.frames[frame_no].reader())?;
                self.stats.record_write();
                self.stats.record_access();
            }

            self.page_index.remove(&file, page_no)?;
            self.frames[frame_no].clear();
        }

        Ok(frame_no)
    }

    /// Fetch `page_no` of `file`, pinned for the caller.
    ///
    /// The pin outlives the returned borrow: every successful call must
    /// eventually be paired with one [`unpin_page`](Self::unpin_page).
    pub fn read_page(&mut self, file: &FilePtr, page_no: PageId) -> Result<&mut Frame> {
        match self.page_index.lookup(file, page_no) {
            Ok(frame_no) => {
                self.stats.record_access();
                let frame = &mut self.frames[frame_no];
                frame.set_refbit();
                frame.pin();
                printdbg!(
                    "{} hit on page {page_no} (frame: {frame_no}), pin count: {}",
                    get_caller_name!(),
                    frame.get_pin_count()
                );
                Ok(frame)
            }
            // a miss is expected, load the page from disk
            Err(_) => {
                let frame_no = self.alloc_buf()?;
                let page = file.read_page(page_no)?;
                self.stats.record_read();
                self.stats.record_access();
                self.page_index.insert(file, page_no, frame_no)?;

                printdbg!(
                    "{} read page {page_no} from disk into frame {frame_no}",
                    get_caller_name!()
                );

                let frame = &mut self.frames[frame_no];
                frame.set(file.clone(), page);
                Ok(frame)
            }
        }
    }

    /// Allocate a fresh page in `file` and cache it, pinned for the
    /// caller. Returns the new page id along with the frame.
    pub fn alloc_page(&mut self, file: &FilePtr) -> Result<(PageId, &mut Frame)> {
        let page = file.allocate_page()?;
        let page_no = page.get_page_id();

        let frame_no = self.alloc_buf()?;
        self.page_index.insert(file, page_no, frame_no)?;
        self.stats.record_access();

        printdbg!("created page {page_no} in frame {frame_no}");

        let frame = &mut self.frames[frame_no];
        frame.set(file.clone(), page);
        Ok((page_no, frame))
    }

    /// Release one pin on the page, marking the frame dirty if the caller
    /// modified it. Unpinning a page that is not resident is a no-op;
    /// `dirty` only ever sets the bit, it never cleans it.
    pub fn unpin_page(&mut self, file: &FilePtr, page_no: PageId, dirty: bool) -> Result<()> {
        let frame_no = match self.page_index.lookup(file, page_no) {
            Ok(frame_no) => frame_no,
            Err(_) => return Ok(()),
        };

        let frame = &mut self.frames[frame_no];
        if frame.get_pin_count() == 0 {
            return Err(BufferError::PageNotPinned {
                file: file.filename().to_string(),
                page_no,
                frame_no,
            }
            .into());
        }

        frame.unpin();
        if dirty {
            frame.mark_dirty();
        }

        printdbg!(
            "{} page {page_no} (frame: {frame_no}) unpinned, pin count: {}",
            get_caller_name!(),
            frame.get_pin_count()
        );

        Ok(())
    }

    /// Write back and drop every resident page of `file`, in frame order.
    ///
    /// Fails on the first pinned or corrupted frame; frames already
    /// processed stay flushed. Frames of other files are untouched.
    pub fn flush_file(&mut self, file: &FilePtr) -> Result<()> {
        for frame_no in 0..self.frames.len() {
            let owner = match self.frames[frame_no].file() {
                Some(f) if f.id() == file.id() => f.clone(),
                _ => continue,
            };

            let frame = &self.frames[frame_no];
            if !frame.is_valid() {
                return Err(BufferError::BadBuffer {
                    frame_no,
                    dirty: frame.is_dirty(),
                    valid: frame.is_valid(),
                    refbit: frame.refbit(),
                }
                .into());
            }

            let page_no = frame.get_page_id();
            if frame.get_pin_count() > 0 {
                return Err(BufferError::PagePinned {
                    file: owner.filename().to_string(),
                    page_no,
                    frame_no,
                }
                .into());
            }

            if frame.is_dirty() {
                owner.write_page(frame.reader())?;
                self.frames[frame_no].mark_clean();
                self.stats.record_write();
            }

            self.page_index.remove(&owner, page_no)?;
            self.frames[frame_no].clear();
        }

        Ok(())
    }

    /// Drop the cached copy of the page, if any, and delete the page in
    /// the file layer. Cached contents are discarded without write-back;
    /// the page is going away.
    pub fn dispose_page(&mut self, file: &FilePtr, page_no: PageId) -> Result<()> {
        if let Ok(frame_no) = self.page_index.lookup(file, page_no) {
            self.page_index.remove(file, page_no)?;
            self.frames[frame_no].clear();
        }

        file.delete_page(page_no)
    }

    pub fn stats(&self) -> BufferStats {
        self.stats
    }

    pub fn clear_stats(&mut self) {
        self.stats.clear();
    }

    /// Dump every frame descriptor and the count of valid frames.
    pub fn inspect(&self) {
        let mut valid = 0;
        for frame in &self.frames {
            frame.print();
            if frame.is_valid() {
                valid += 1;
            }
        }
        println!("total valid frames: {valid}");
    }

    #[cfg(test)]
    fn frame_of(&self, file: &FilePtr, page_no: PageId) -> Option<FrameId> {
        self.page_index.lookup(file, page_no).ok()
    }

    #[cfg(test)]
    pub fn get_pin_count(&self, file: &FilePtr, page_no: PageId) -> Option<u16> {
        Some(self.frames[self.frame_of(file, page_no)?].get_pin_count())
    }

    #[cfg(test)]
    fn valid_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.is_valid()).count()
    }
}

/// The process-wide pool is never dropped, this is mainly for tests:
/// a pin still held at teardown is a leak in the calling code.
#[cfg(test)]
impl Drop for BufferPoolManager {
    fn drop(&mut self) {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, f)| f.get_pin_count() != 0)
            .for_each(|(i, f)| {
                println!("frame {} dropped with pin count {}", i, f.get_pin_count());
            });
    }
}
