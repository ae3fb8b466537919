/// Buffer pool access counters. Only the manager increments them.
#[derive(Clone, Copy, Debug, Default)]
pub struct BufferStats {
    accesses: u64,
    diskreads: u64,
    diskwrites: u64,
}

impl BufferStats {
    /// Successful page accesses through the pool, plus one per dirty
    /// eviction write-back.
    pub fn accesses(&self) -> u64 {
        self.accesses
    }

    /// Pages read from disk on a cache miss.
    pub fn diskreads(&self) -> u64 {
        self.diskreads
    }

    /// Pages written back to disk by eviction or flush.
    pub fn diskwrites(&self) -> u64 {
        self.diskwrites
    }

    pub(super) fn record_access(&mut self) {
        self.accesses += 1;
    }

    pub(super) fn record_read(&mut self) {
        self.diskreads += 1;
    }

    pub(super) fn record_write(&mut self) {
        self.diskwrites += 1;
    }

    pub(super) fn clear(&mut self) {
        *self = Self::default();
    }
}
