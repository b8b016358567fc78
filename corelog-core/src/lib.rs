//! A durable, append-only commit log addressed by a monotonically
//! increasing 64-bit offset, stored on disk as a series of bounded segment
//! files (a framed "store" plus a memory-mapped "index" per segment).
//!
//! The RPC surface, transport security, authorization, and full
//! observability pipelines that would sit in front of a [`Log`] are
//! explicitly out of scope here — only the [`CommitLog`] capability they'd
//! depend on is named.

mod config;
mod error;
mod index;
mod log;
mod record;
mod segment;
mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use log::{CommitLog, Log};
pub use record::Record;
pub use segment::Segment;
pub use store::Store;

pub use index::{ENT_W, OFF_W, POS_W};
