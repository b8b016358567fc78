use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, trace};

use crate::error::{eof, Error};

/// Width, in bytes, of the big-endian length prefix in front of every frame.
pub const LEN_WIDTH: u64 = 8;

struct Inner {
    writer: BufWriter<File>,
    size: u64,
}

/// A single append-only, length-framed byte file.
///
/// Appends are buffered and amortise syscalls; every read flushes the
/// buffer first so that a read always observes every prior append made
/// through this `Store` (read-your-writes within the process). The store is
/// opened for read+write rather than relying on `O_APPEND`, since reads need
/// positional access to the same file description — see `Store::open`.
pub struct Store {
    path: PathBuf,
    inner: Mutex<Inner>,
}

impl Store {
    /// Opens (creating if absent) the store file at `path`. Existing
    /// content, if any, is respected: the cached size is taken from the
    /// file's current length, not reset to zero.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;
        let size = file.metadata()?.len();
        debug!(path = %path.display(), size, "store opened");
        Ok(Store {
            path,
            inner: Mutex::new(Inner {
                writer: BufWriter::new(file),
                size,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current size of the store in bytes, including every length prefix
    /// written so far.
    pub fn size(&self) -> u64 {
        self.inner.lock().unwrap().size
    }

    /// Appends `data` as one frame: an 8-byte big-endian length, then the
    /// bytes themselves. Returns `(bytes_written, start_position)`, where
    /// `start_position` is where the length prefix began.
    pub fn append(&self, data: &[u8]) -> Result<(u64, u64), Error> {
        let mut inner = self.inner.lock().unwrap();
        let pos = inner.size;
        let len = data.len() as u64;

        inner.writer.write_all(&len.to_be_bytes())?;
        inner.writer.write_all(data)?;

        let written = LEN_WIDTH + len;
        inner.size += written;
        trace!(pos, written, "store append");
        Ok((written, pos))
    }

    /// Flushes the buffered writer, then reads the frame that begins at
    /// `pos`: the 8-byte length prefix, then that many bytes of payload.
    pub fn read(&self, pos: u64) -> Result<Vec<u8>, Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.writer.flush()?;
        let file = inner.writer.get_ref();

        if pos + LEN_WIDTH > inner.size {
            return Err(eof().into());
        }
        let mut len_buf = [0u8; LEN_WIDTH as usize];
        file.read_exact_at(&mut len_buf, pos)?;
        let len = u64::from_be_bytes(len_buf);

        if pos + LEN_WIDTH + len > inner.size {
            return Err(eof().into());
        }
        let mut data = vec![0u8; len as usize];
        file.read_exact_at(&mut data, pos + LEN_WIDTH)?;
        Ok(data)
    }

    /// Flushes the buffered writer, then performs a raw positional read of
    /// up to `buf.len()` bytes starting at `off`, for callers that want to
    /// stream the store's raw bytes rather than decode framed records.
    pub fn read_at(&self, buf: &mut [u8], off: u64) -> Result<usize, Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.writer.flush()?;
        let file = inner.writer.get_ref();
        let n = file.read_at(buf, off)?;
        Ok(n)
    }

    /// Flushes the buffered writer and closes the underlying file.
    pub fn close(&self) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.writer.flush()?;
        Ok(())
    }
}
