use crate::buffer_pool::FrameId;
use crate::pages::PageId;
use thiserror::Error;

/// Failures raised by the buffer pool and its page index.
///
/// `HashNotFound` doubles as the cache-miss signal inside the manager:
/// `read_page` answers it by loading from disk, `unpin_page` and
/// `dispose_page` ignore it. It never reaches callers of the public API.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("buffer pool exceeded, all frames are pinned")]
    BufferExceeded,

    #[error("page {page_no} of file {file} (frame {frame_no}) is not pinned")]
    PageNotPinned {
        file: String,
        page_no: PageId,
        frame_no: FrameId,
    },

    #[error("page {page_no} of file {file} (frame {frame_no}) is still pinned")]
    PagePinned {
        file: String,
        page_no: PageId,
        frame_no: FrameId,
    },

    #[error("frame {frame_no} is corrupted (valid: {valid}, dirty: {dirty}, refbit: {refbit})")]
    BadBuffer {
        frame_no: FrameId,
        dirty: bool,
        valid: bool,
        refbit: bool,
    },

    #[error("page {page_no} of file {file} is not in the buffer pool")]
    HashNotFound { file: String, page_no: PageId },

    #[error("page {page_no} of file {file} is already in the buffer pool")]
    HashAlreadyPresent { file: String, page_no: PageId },
}
