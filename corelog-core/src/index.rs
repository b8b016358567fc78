use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use memmap2::{MmapMut, MmapOptions};
use tracing::debug;

use crate::error::{eof, is_eof, Error};

/// Width of the relative-offset field in an index entry.
pub const OFF_W: usize = 4;
/// Width of the store-position field in an index entry.
pub const POS_W: usize = 8;
/// Width of one index entry: `OFF_W + POS_W`.
pub const ENT_W: usize = OFF_W + POS_W;

/// A fixed-width, memory-mapped file mapping relative offset → byte position
/// in a companion [`crate::Store`].
///
/// The file is truncated to `max_index_bytes` at construction so the mapping
/// reserves contiguous address space for every entry the segment could ever
/// hold, then truncated back down to the valid prefix (`size` bytes) on
/// close — that's how the next open recovers the count of valid entries
/// from the file's length alone.
pub struct Index {
    path: PathBuf,
    mmap: MmapMut,
    file: File,
    /// Number of bytes currently in use, i.e. `entries_written * ENT_W`.
    size: u64,
}

impl Index {
    /// Opens (creating if absent) the index file at `path` and truncates it
    /// to `max_index_bytes`, rounding down to a multiple of `ENT_W` if
    /// necessary, then maps it read/write/shared.
    pub fn open(path: impl AsRef<Path>, max_index_bytes: u64) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;
        let size = file.metadata()?.len();

        let cap = max_index_bytes - (max_index_bytes % ENT_W as u64);
        let cap = cap.max(size);
        file.set_len(cap)?;

        let mmap = unsafe { MmapOptions::new().map_mut(&file)? };
        debug!(path = %path.display(), size, cap, "index opened");
        Ok(Index {
            path,
            mmap,
            file,
            size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of bytes currently in use (`entries * ENT_W`).
    pub fn size(&self) -> u64 {
        self.size
    }

    /// True once no further entry fits in the mapped window.
    pub fn is_maxed(&self) -> bool {
        self.size + ENT_W as u64 > self.mmap.len() as u64
    }

    /// Appends one entry: a 4-byte big-endian relative offset and an 8-byte
    /// big-endian store position.
    pub fn write(&mut self, rel_off: u32, pos: u64) -> Result<(), Error> {
        if self.size + ENT_W as u64 > self.mmap.len() as u64 {
            return Err(eof().into());
        }
        let start = self.size as usize;
        self.mmap[start..start + OFF_W].copy_from_slice(&rel_off.to_be_bytes());
        self.mmap[start + OFF_W..start + ENT_W].copy_from_slice(&pos.to_be_bytes());
        self.size += ENT_W as u64;
        Ok(())
    }

    /// Reads entry number `i`. `i == -1` means "the last valid entry",
    /// which is how a segment recovers `next_offset` on open.
    pub fn read(&self, i: i64) -> Result<(u32, u64), Error> {
        if self.size == 0 {
            return Err(eof().into());
        }
        let i = if i == -1 {
            (self.size / ENT_W as u64) as i64 - 1
        } else {
            i
        };
        if i < 0 {
            return Err(eof().into());
        }
        let byte = i as u64 * ENT_W as u64;
        if byte + ENT_W as u64 > self.size {
            return Err(eof().into());
        }
        let start = byte as usize;
        let mut off_buf = [0u8; OFF_W];
        off_buf.copy_from_slice(&self.mmap[start..start + OFF_W]);
        let mut pos_buf = [0u8; POS_W];
        pos_buf.copy_from_slice(&self.mmap[start + OFF_W..start + ENT_W]);
        Ok((u32::from_be_bytes(off_buf), u64::from_be_bytes(pos_buf)))
    }

    /// Flushes the mapping, fsyncs the file, then truncates it down to the
    /// valid prefix (`size` bytes) so its on-disk length reflects the number
    /// of entries rather than the over-provisioned mapping window.
    pub fn close(&mut self) -> Result<(), Error> {
        self.mmap.flush()?;
        self.file.sync_all()?;
        self.file.set_len(self.size)?;
        Ok(())
    }
}

/// Translates an `UnexpectedEof` into the public `OffsetOutOfRange` kind; a
/// thin helper so `Segment`/`Log` never have to match on `io::ErrorKind`
/// directly at every call site.
pub(crate) fn map_eof_to_range(err: Error) -> Error {
    match err {
        Error::Io(e) if is_eof(&e) => Error::OffsetOutOfRange,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let mut idx = Index::open(dir.path().join("0.index"), 1200).unwrap();
        idx.write(0, 0).unwrap();
        idx.write(1, 19).unwrap();
        idx.write(2, 38).unwrap();
        assert_eq!(idx.read(0).unwrap(), (0, 0));
        assert_eq!(idx.read(1).unwrap(), (1, 19));
        assert_eq!(idx.read(-1).unwrap(), (2, 38));
    }

    #[test]
    fn empty_index_read_is_eof() {
        let dir = tempdir().unwrap();
        let idx = Index::open(dir.path().join("0.index"), 1200).unwrap();
        assert!(idx.read(-1).is_err());
        assert!(idx.read(0).is_err());
    }

    #[test]
    fn write_past_capacity_is_eof() {
        let dir = tempdir().unwrap();
        let mut idx = Index::open(dir.path().join("0.index"), ENT_W as u64).unwrap();
        idx.write(0, 0).unwrap();
        assert!(idx.write(1, 19).is_err());
    }

    #[test]
    fn max_index_bytes_not_a_multiple_rounds_down() {
        let dir = tempdir().unwrap();
        let idx = Index::open(dir.path().join("0.index"), 37).unwrap();
        assert_eq!(idx.mmap.len(), 36);
    }

    #[test]
    fn close_truncates_file_to_valid_prefix_and_reopen_recovers_last_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("0.index");
        {
            let mut idx = Index::open(&path, 1200).unwrap();
            idx.write(0, 0).unwrap();
            idx.write(1, 19).unwrap();
            idx.write(2, 38).unwrap();
            idx.close().unwrap();
        }
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 36);

        let reopened = Index::open(&path, 1200).unwrap();
        assert_eq!(reopened.size(), 36);
        assert_eq!(reopened.read(-1).unwrap(), (2, 38));
    }
}
