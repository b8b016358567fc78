use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::Error;
use crate::index::{map_eof_to_range, Index};
use crate::record::Record;
use crate::store::Store;

/// Binds one [`Store`] + one [`Index`] under a base offset, covering the
/// contiguous absolute-offset range `[base_offset, next_offset)`.
pub struct Segment {
    store: Store,
    index: Index,
    base_offset: u64,
    next_offset: u64,
    config: Config,
}

impl Segment {
    /// Opens (creating if absent) the `<base_offset>.store`/`.index` pair
    /// under `dir`. If the index is non-empty, `next_offset` is recovered
    /// from its last entry's relative offset; otherwise it starts at
    /// `base_offset`.
    pub fn open(dir: &Path, base_offset: u64, config: Config) -> Result<Self, Error> {
        let store = Store::open(dir.join(format!("{base_offset}.store")))?;
        let index = Index::open(
            dir.join(format!("{base_offset}.index")),
            config.max_index_bytes,
        )?;

        let next_offset = match index.read(-1) {
            Ok((rel_off, _)) => base_offset + rel_off as u64 + 1,
            Err(_) => base_offset,
        };

        debug!(base_offset, next_offset, "segment opened");
        Ok(Segment {
            store,
            index,
            base_offset,
            next_offset,
            config,
        })
    }

    pub fn base_offset(&self) -> u64 {
        self.base_offset
    }

    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }

    /// Stamps `record.offset`, appends its value bytes to the store as a
    /// single frame, then records the frame's position in the index. Either
    /// both writes land or the segment is considered terminal — there is no
    /// partial-write rollback. The offset itself is never written into the
    /// frame; it is reconstructed from `base_offset + relative offset` on
    /// read, so it costs nothing in the on-disk frame size.
    pub fn append(&mut self, mut record: Record) -> Result<u64, Error> {
        let cur = self.next_offset;
        record.offset = cur;

        let (_, pos) = self.store.append(&record.value)?;
        let rel_off = (cur - self.base_offset) as u32;
        self.index.write(rel_off, pos)?;
        self.next_offset += 1;
        Ok(cur)
    }

    /// Reads the record at absolute offset `abs`. Fails with
    /// `Error::OffsetOutOfRange` if `abs` lies outside this segment's range.
    pub fn read(&self, abs: u64) -> Result<Record, Error> {
        let rel = abs as i64 - self.base_offset as i64;
        let (_, pos) = self.index.read(rel).map_err(map_eof_to_range)?;
        let value = self.store.read(pos).map_err(map_eof_to_range)?;
        Ok(Record { offset: abs, value })
    }

    /// True once either the store or the index has reached its configured
    /// cap — either can force rollover first, depending on record size.
    pub fn is_maxed(&self) -> bool {
        self.store.size() >= self.config.max_store_bytes
            || self.index.size() >= self.config.max_index_bytes
            || self.index.is_maxed()
    }

    pub fn close(&mut self) -> Result<(), Error> {
        self.index.close()?;
        self.store.close()?;
        Ok(())
    }

    /// Closes, then unlinks both underlying files.
    pub fn remove(mut self) -> Result<(), Error> {
        self.close()?;
        fs::remove_file(self.store.path())?;
        fs::remove_file(self.index.path())?;
        Ok(())
    }

    pub(crate) fn store_path(&self) -> &Path {
        self.store.path()
    }

    pub(crate) fn index_path(&self) -> PathBuf {
        self.index.path().to_path_buf()
    }
}
