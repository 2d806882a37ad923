use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::Result;
use crate::guard;
use crate::header::{PacketHeader, END_FIELD, END_FIELD_SIZE, HEADER_SIZE};

/// Wire width of one data word.
pub(crate) const WORD_SIZE: usize = 2;

/// One N-parameter record: a paramid and its 16-bit data words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NParameter {
    pub paramid: u16,
    pub dwords: Vec<u16>,
}

impl NParameter {
    pub fn new(paramid: u16, dwords: Vec<u16>) -> Self {
        Self { paramid, dwords }
    }
}

/// IENA-N dialect: fixed-shape data-word records.
///
/// The wire carries no per-record word count, so the record shape is
/// decoder configuration (`words_per_param`); the final record absorbs
/// however many whole words remain in the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IenaN {
    pub header: PacketHeader,
    pub endfield: u16,
    pub parameters: Vec<NParameter>,
    /// Data words the decoder reads per record. Encode is unaffected;
    /// each record serializes the words it actually holds.
    pub words_per_param: usize,
}

impl Default for IenaN {
    fn default() -> Self {
        Self::new()
    }
}

impl IenaN {
    pub const DEFAULT_WORDS_PER_PARAM: usize = 1;

    pub fn new() -> Self {
        Self {
            header: PacketHeader::new(),
            endfield: END_FIELD,
            parameters: Vec::new(),
            words_per_param: Self::DEFAULT_WORDS_PER_PARAM,
        }
    }

    /// Container length for the N dialect: the total data-word count
    /// across all records, not the record count.
    pub fn len(&self) -> usize {
        self.parameters.iter().map(|p| p.dwords.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NParameter> {
        self.parameters.iter()
    }

    /// Encode header, records in sequence order, and end marker.
    pub fn encode(&self) -> Result<Bytes> {
        let payload_len: usize = self
            .parameters
            .iter()
            .map(|p| WORD_SIZE + p.dwords.len() * WORD_SIZE)
            .sum();
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload_len + END_FIELD_SIZE);
        self.header.encode(payload_len, &mut buf)?;
        for param in &self.parameters {
            buf.put_u16(param.paramid);
            for word in &param.dwords {
                buf.put_u16(*word);
            }
        }
        buf.put_u16(self.endfield);
        Ok(buf.freeze())
    }

    /// Decode a UDP payload with the default record shape.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        Self::decode_with(buf, Self::DEFAULT_WORDS_PER_PARAM)
    }

    /// Decode a UDP payload reading `words_per_param` words per record.
    pub fn decode_with(buf: &[u8], words_per_param: usize) -> Result<Self> {
        let words_per_param = words_per_param.max(1);
        let (header, rest) = PacketHeader::decode(buf)?;
        let (body, endfield) = guard::split_end_field(rest)?;

        let mut parameters = Vec::new();
        let mut rest = body;
        while !rest.is_empty() {
            let offset = body.len() - rest.len();
            // A record is a paramid plus at least one whole data word.
            guard::ensure_record(offset, 2 * WORD_SIZE, rest.len())?;
            let paramid = rest.get_u16();
            let count = words_per_param.min(rest.len() / WORD_SIZE);
            let mut dwords = Vec::with_capacity(count);
            for _ in 0..count {
                dwords.push(rest.get_u16());
            }
            parameters.push(NParameter { paramid, dwords });
        }
        tracing::trace!(
            records = parameters.len(),
            words_per_param,
            "decoded IENA-N parameter list"
        );
        Ok(Self {
            header,
            endfield,
            parameters,
            words_per_param,
        })
    }
}

impl<'a> IntoIterator for &'a IenaN {
    type Item = &'a NParameter;
    type IntoIter = std::slice::Iter<'a, NParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

impl fmt::Display for IenaN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IENAN: KEY=0X{:X} SEQ={} TIMEUS={} NUM_DPARAM={}",
            self.header.key.unwrap_or(0),
            self.header.sequence.unwrap_or(0),
            self.header.time_usec().unwrap_or(0),
            self.len(),
        )
    }
}
