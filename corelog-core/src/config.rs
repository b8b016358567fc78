use serde::{Deserialize, Serialize};

/// Per-log configuration, recognised by [`crate::Log::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Per-segment store size cap in bytes; triggers rollover. Zero is
    /// normalised to the test default of 1024 by [`Config::with_defaults`].
    pub max_store_bytes: u64,
    /// Per-segment index size cap in bytes; triggers rollover. Need not be a
    /// multiple of [`crate::index::ENT_W`] — [`crate::Index::open`] rounds
    /// down to the nearest entry boundary, it never rejects. Zero is
    /// normalised to 1024.
    pub max_index_bytes: u64,
    /// Base offset of the first segment when opening an empty directory.
    pub initial_offset: u64,
}

impl Config {
    /// Test/default sizing used when a field is left at zero.
    const DEFAULT_MAX_STORE_BYTES: u64 = 1024;
    const DEFAULT_MAX_INDEX_BYTES: u64 = 1024;

    /// Replaces zero-valued size caps with their defaults. Operators
    /// constructing a `Config` for production use are expected to set both
    /// explicitly to realistic MB/GB values; zero exists only so tests can
    /// rely on `Config::default()`.
    pub fn with_defaults(mut self) -> Self {
        if self.max_store_bytes == 0 {
            self.max_store_bytes = Self::DEFAULT_MAX_STORE_BYTES;
        }
        if self.max_index_bytes == 0 {
            self.max_index_bytes = Self::DEFAULT_MAX_INDEX_BYTES;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_store_bytes: 0,
            max_index_bytes: 0,
            initial_offset: 0,
        }
    }
}
