//! Codec for the IENA telemetry packet family.
//!
//! IENA packets are binary records carried as UDP payloads on flight-test
//! instrumentation networks. Five dialects share a 14-byte big-endian
//! header and a fixed `0xDEAD` end marker but diverge in payload structure:
//!
//! - [`Iena`]: the payload is an opaque byte blob
//! - [`IenaM`]: variable-length dataset records with a per-record delay
//! - [`IenaN`]: fixed-shape data-word records
//! - [`IenaD`]: data-word records with a per-record delay
//! - [`IenaQ`]: variable-length dataset records without a delay
//!
//! Decoding expects exactly the bytes of a UDP payload (lower network
//! layers already stripped by the caller); encoding produces bytes meant
//! to be placed verbatim into a UDP payload. The codec is stateless and
//! synchronous, so independent buffers may be processed from any number
//! of threads.

pub mod base;
pub mod dparam;
pub mod error;
mod guard;
pub mod header;
pub mod mparam;
pub mod nparam;
pub mod qparam;
pub mod time;

pub use base::Iena;
pub use dparam::{DParameter, IenaD};
pub use error::{IenaError, Result};
pub use header::{PacketHeader, END_FIELD, END_FIELD_SIZE, HEADER_SIZE, MAX_PAYLOAD};
pub use mparam::{IenaM, MParameter};
pub use nparam::{IenaN, NParameter};
pub use qparam::{IenaQ, QParameter};
pub use time::{pack_time, unpack_time};
