//! Shared validation for length- and count-governed payload fields.
//!
//! Every dialect decoder routes its bookkeeping through these checks so
//! that a buffer whose declared lengths disagree with its actual size is
//! rejected before any record past the inconsistency is materialized.

use crate::error::{IenaError, Result};
use crate::header::{END_FIELD, END_FIELD_SIZE};

/// Check that a record needing `needed` more bytes fits in `remaining`.
pub(crate) fn ensure_record(offset: usize, needed: usize, remaining: usize) -> Result<()> {
    if needed > remaining {
        return Err(IenaError::CorruptRecord {
            offset,
            needed,
            remaining,
        });
    }
    Ok(())
}

/// Split a post-header remainder into payload body and end marker.
///
/// The marker occupies the final two bytes and must be `0xDEAD`; a
/// mismatch means the buffer is not an IENA packet and decoding aborts.
pub(crate) fn split_end_field(rest: &[u8]) -> Result<(&[u8], u16)> {
    if rest.len() < END_FIELD_SIZE {
        return Err(IenaError::TruncatedBuffer {
            needed: END_FIELD_SIZE,
            got: rest.len(),
        });
    }
    let (body, marker) = rest.split_at(rest.len() - END_FIELD_SIZE);
    let endfield = u16::from_be_bytes([marker[0], marker[1]]);
    if endfield != END_FIELD {
        return Err(IenaError::InvalidEndField { found: endfield });
    }
    Ok((body, endfield))
}
