use anyhow::Result;
use badgerdb::buffer_pool::BufferPoolManager;
use badgerdb::page_file::{PageFile, DISK_STORAGE};

fn main() -> Result<()> {
    let pool = BufferPoolManager::get();
    let mut bpm = pool.lock();

    let file = PageFile::open(DISK_STORAGE)?;

    let (page_no, frame) = bpm.alloc_page(&file)?;
    frame.writer().write_bytes(0, 12, b"hello, pages");
    bpm.unpin_page(&file, page_no, true)?;

    bpm.flush_file(&file)?;

    let frame = bpm.read_page(&file, page_no)?;
    println!(
        "page {page_no}: {}",
        String::from_utf8_lossy(frame.reader().read_bytes(0, 12))
    );
    bpm.unpin_page(&file, page_no, false)?;
    bpm.flush_file(&file)?;

    println!("{:?}", bpm.stats());

    Ok(())
}
