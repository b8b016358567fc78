use std::io;

use thiserror::Error;

/// The result type returned by every public operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the crate boundary.
///
/// Internally, `Store` and `Index` signal "no such entry" with a plain
/// `io::Error` of kind `UnexpectedEof`; that never escapes past `Segment`/
/// `Log`, which translate it into [`Error::OffsetOutOfRange`] so callers can
/// distinguish "nothing there" from a genuine I/O failure.
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("offset out of range")]
    OffsetOutOfRange,

    /// Reserved for construction-time configuration problems. A
    /// non-multiple-of-`ENT_W` `max_index_bytes` is *not* one of these —
    /// `Index::open` rounds it down rather than rejecting it, matching the
    /// original implementation's unconditional truncate.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// True if `err` is the internal "ran off the end of valid data" signal.
pub(crate) fn is_eof(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::UnexpectedEof
}

pub(crate) fn eof() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "past the end of valid data")
}
