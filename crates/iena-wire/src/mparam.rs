use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{IenaError, Result};
use crate::guard;
use crate::header::{PacketHeader, END_FIELD, END_FIELD_SIZE, HEADER_SIZE};

/// Fixed prefix of an M record: paramid + delay + dataset length.
const RECORD_FIXED: usize = 6;

/// One M-parameter record: a length-prefixed dataset with a delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MParameter {
    pub paramid: u16,
    pub delay: u16,
    /// Dataset bytes; the length is explicit on the wire because it
    /// varies per record and cannot be inferred from context.
    pub dataset: Bytes,
}

impl MParameter {
    pub fn new(paramid: u16, delay: u16, dataset: impl Into<Bytes>) -> Self {
        Self {
            paramid,
            delay,
            dataset: dataset.into(),
        }
    }

    fn wire_size(&self) -> usize {
        RECORD_FIXED + self.dataset.len()
    }
}

/// IENA-M dialect: a variable count of variable-length dataset records.
///
/// The record count is not stored on the wire; the decoder walks records
/// until the payload is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IenaM {
    pub header: PacketHeader,
    pub endfield: u16,
    pub parameters: Vec<MParameter>,
}

impl Default for IenaM {
    fn default() -> Self {
        Self::new()
    }
}

impl IenaM {
    pub fn new() -> Self {
        Self {
            header: PacketHeader::new(),
            endfield: END_FIELD,
            parameters: Vec::new(),
        }
    }

    /// Container length for the M dialect: the number of records.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MParameter> {
        self.parameters.iter()
    }

    /// Encode header, records in sequence order, and end marker.
    pub fn encode(&self) -> Result<Bytes> {
        let payload_len: usize = self.parameters.iter().map(MParameter::wire_size).sum();
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload_len + END_FIELD_SIZE);
        self.header.encode(payload_len, &mut buf)?;
        for (index, param) in self.parameters.iter().enumerate() {
            if param.dataset.len() > usize::from(u16::MAX) {
                return Err(IenaError::DatasetTooLarge {
                    index,
                    size: param.dataset.len(),
                });
            }
            buf.put_u16(param.paramid);
            buf.put_u16(param.delay);
            buf.put_u16(param.dataset.len() as u16);
            buf.put_slice(&param.dataset);
        }
        buf.put_u16(self.endfield);
        Ok(buf.freeze())
    }

    /// Decode a UDP payload as an IENA-M packet.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let (header, rest) = PacketHeader::decode(buf)?;
        let (body, endfield) = guard::split_end_field(rest)?;

        let mut parameters = Vec::new();
        let mut rest = body;
        while !rest.is_empty() {
            let offset = body.len() - rest.len();
            guard::ensure_record(offset, RECORD_FIXED, rest.len())?;
            let paramid = rest.get_u16();
            let delay = rest.get_u16();
            let dataset_len = rest.get_u16() as usize;
            guard::ensure_record(offset + RECORD_FIXED, dataset_len, rest.len())?;
            let dataset = Bytes::copy_from_slice(&rest[..dataset_len]);
            rest.advance(dataset_len);
            parameters.push(MParameter {
                paramid,
                delay,
                dataset,
            });
        }
        tracing::trace!(records = parameters.len(), "decoded IENA-M parameter list");
        Ok(Self {
            header,
            endfield,
            parameters,
        })
    }
}

impl<'a> IntoIterator for &'a IenaM {
    type Item = &'a MParameter;
    type IntoIter = std::slice::Iter<'a, MParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

impl fmt::Display for IenaM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "IENAM: KEY=0X{:X} SEQ={} TIMEUS={} NUM_MPARAM={}",
            self.header.key.unwrap_or(0),
            self.header.sequence.unwrap_or(0),
            self.header.time_usec().unwrap_or(0),
            self.len(),
        )?;
        for (index, param) in self.parameters.iter().enumerate() {
            writeln!(
                f,
                " M-Param #{}:ParamID=0X{:X} Delay={} Dataset Length={}",
                index,
                param.paramid,
                param.delay,
                param.dataset.len(),
            )?;
        }
        Ok(())
    }
}
