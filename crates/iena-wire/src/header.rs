use bytes::{Buf, BufMut, BytesMut};

use crate::error::{IenaError, Result};
use crate::time;

/// Fixed header: key (2) + size (2) + time-high (2) + time-low (4) +
/// keystatus (1) + status (1) + sequence (2) = 14 bytes.
pub const HEADER_SIZE: usize = 14;

/// End marker terminating every encoded packet.
pub const END_FIELD: u16 = 0xDEAD;

/// Wire width of the end marker.
pub const END_FIELD_SIZE: usize = 2;

/// Largest payload the 16-bit word-counted size field can describe.
pub const MAX_PAYLOAD: usize = u16::MAX as usize * 2 - HEADER_SIZE - END_FIELD_SIZE;

/// Common header shared by all IENA dialects.
///
/// Every field starts unset; a legitimate zero is distinct from "never
/// assigned". Encoding fails with [`IenaError::MissingField`] while
/// `key`, `keystatus`, `status` or `sequence` remains unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketHeader {
    /// Packet identifier. Also addressable as `streamid`.
    pub key: Option<u16>,
    /// Packet length in 16-bit words, header and end marker included.
    /// Computed during encode, read back on decode.
    pub size: Option<u16>,
    /// Microseconds since the reference instant (40 bits on the wire).
    pub timestamp: Option<u64>,
    pub keystatus: Option<u8>,
    pub status: Option<u8>,
    /// Monotonically assigned by the producer; the codec enforces no
    /// wraparound semantics.
    pub sequence: Option<u16>,
}

impl PacketHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// `streamid` and `key` name the same storage cell.
    pub fn streamid(&self) -> Option<u16> {
        self.key
    }

    pub fn set_streamid(&mut self, streamid: u16) {
        self.key = Some(streamid);
    }

    /// Set the timestamp from a (seconds, microseconds) instant.
    ///
    /// The stored value is already bounded to the wire's 40-bit range so
    /// that [`time_usec`](Self::time_usec) reports what a decoder will see.
    pub fn set_packet_time(&mut self, seconds: u64, microseconds: u32) {
        let (high, low) = time::pack_time(seconds, microseconds);
        self.timestamp = Some(time::unpack_time(high, low));
    }

    /// The logical microsecond timestamp, if set.
    pub fn time_usec(&self) -> Option<u64> {
        self.timestamp
    }

    /// Serialize the header, computing the size field from `payload_len`.
    ///
    /// An unset timestamp encodes as zero; the four identity fields must
    /// be assigned or this fails with [`IenaError::MissingField`].
    pub fn encode(&self, payload_len: usize, dst: &mut BytesMut) -> Result<()> {
        let key = self.key.ok_or(IenaError::MissingField { field: "key" })?;
        let keystatus = self
            .keystatus
            .ok_or(IenaError::MissingField { field: "keystatus" })?;
        let status = self
            .status
            .ok_or(IenaError::MissingField { field: "status" })?;
        let sequence = self
            .sequence
            .ok_or(IenaError::MissingField { field: "sequence" })?;

        if payload_len > MAX_PAYLOAD {
            return Err(IenaError::PayloadTooLarge {
                size: payload_len,
                max: MAX_PAYLOAD,
            });
        }
        let size = ((HEADER_SIZE + payload_len + END_FIELD_SIZE) / 2) as u16;
        let (high, low) = time::split_usec(self.timestamp.unwrap_or(0));

        dst.reserve(HEADER_SIZE);
        dst.put_u16(key);
        dst.put_u16(size);
        dst.put_u16(u16::from(high));
        dst.put_u32(low);
        dst.put_u8(keystatus);
        dst.put_u8(status);
        dst.put_u16(sequence);
        Ok(())
    }

    /// Deserialize the fixed header, returning it plus the remaining bytes.
    pub fn decode(buf: &[u8]) -> Result<(Self, &[u8])> {
        if buf.len() < HEADER_SIZE {
            return Err(IenaError::TruncatedBuffer {
                needed: HEADER_SIZE,
                got: buf.len(),
            });
        }
        let (mut fixed, rest) = buf.split_at(HEADER_SIZE);
        let key = fixed.get_u16();
        let size = fixed.get_u16();
        let high = fixed.get_u16();
        let low = fixed.get_u32();
        let keystatus = fixed.get_u8();
        let status = fixed.get_u8();
        let sequence = fixed.get_u16();

        let header = PacketHeader {
            key: Some(key),
            size: Some(size),
            // Only the low byte of the high word carries timestamp data.
            timestamp: Some(time::unpack_time(high as u8, low)),
            keystatus: Some(keystatus),
            status: Some(status),
            sequence: Some(sequence),
        };
        Ok((header, rest))
    }
}
