use serde::{Deserialize, Serialize};

/// An opaque payload plus the 64-bit offset the log assigned it.
///
/// Only `value` is ever written to a store frame — `offset` is derived on
/// read from the segment's base offset plus the index entry's relative
/// offset, never from the frame bytes themselves. The wire schema of
/// `value` is entirely the caller's business: whatever bytes go in at
/// `append` come back unchanged at `read`, plus the offset the log
/// assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub offset: u64,
    pub value: Vec<u8>,
}

impl Record {
    /// Builds a record for a not-yet-appended payload; `offset` is stamped
    /// in by [`crate::Segment::append`] and should be ignored until then.
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Record {
            offset: 0,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stamps_a_placeholder_offset() {
        let rec = Record::new(&b"hello world"[..]);
        assert_eq!(rec.offset, 0);
        assert_eq!(rec.value, b"hello world");
    }
}
