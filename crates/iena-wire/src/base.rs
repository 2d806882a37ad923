use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::Result;
use crate::guard;
use crate::header::{PacketHeader, END_FIELD, END_FIELD_SIZE, HEADER_SIZE};

/// Base IENA dialect: the payload is an opaque byte blob.
///
/// This is the dialect to use when the parameter layout is unknown or
/// handled elsewhere: the codec moves the payload bytes verbatim and
/// only interprets the header and end marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iena {
    pub header: PacketHeader,
    /// Trailing marker; `0xDEAD` on construction and after any
    /// successful decode.
    pub endfield: u16,
    pub payload: Bytes,
}

impl Default for Iena {
    fn default() -> Self {
        Self::new()
    }
}

impl Iena {
    pub fn new() -> Self {
        Self {
            header: PacketHeader::new(),
            endfield: END_FIELD,
            payload: Bytes::new(),
        }
    }

    /// Total wire length: header + payload + end marker.
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len() + END_FIELD_SIZE
    }

    /// Encode into a buffer ready to be sent as a UDP payload.
    pub fn encode(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        self.header.encode(self.payload.len(), &mut buf)?;
        buf.put_slice(&self.payload);
        buf.put_u16(self.endfield);
        Ok(buf.freeze())
    }

    /// Decode a UDP payload as a base IENA packet.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let (header, rest) = PacketHeader::decode(buf)?;
        let (body, endfield) = guard::split_end_field(rest)?;
        Ok(Self {
            header,
            endfield,
            payload: Bytes::copy_from_slice(body),
        })
    }
}

impl fmt::Display for Iena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IENAP: KEY=0X{:X} SEQ={} TIMEUS={}",
            self.header.key.unwrap_or(0),
            self.header.sequence.unwrap_or(0),
            self.header.time_usec().unwrap_or(0),
        )
    }
}
