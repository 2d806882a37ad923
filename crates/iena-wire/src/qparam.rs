use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{IenaError, Result};
use crate::guard;
use crate::header::{PacketHeader, END_FIELD, END_FIELD_SIZE, HEADER_SIZE};

/// Fixed prefix of a Q record: paramid + dataset length.
const RECORD_FIXED: usize = 4;

/// One Q-parameter record: a length-prefixed dataset, no delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QParameter {
    pub paramid: u16,
    pub dataset: Bytes,
}

impl QParameter {
    pub fn new(paramid: u16, dataset: impl Into<Bytes>) -> Self {
        Self {
            paramid,
            dataset: dataset.into(),
        }
    }

    fn wire_size(&self) -> usize {
        RECORD_FIXED + self.dataset.len()
    }
}

/// IENA-Q dialect: variable-length dataset records without a delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IenaQ {
    pub header: PacketHeader,
    pub endfield: u16,
    pub parameters: Vec<QParameter>,
}

impl Default for IenaQ {
    fn default() -> Self {
        Self::new()
    }
}

impl IenaQ {
    pub fn new() -> Self {
        Self {
            header: PacketHeader::new(),
            endfield: END_FIELD,
            parameters: Vec::new(),
        }
    }

    /// Container length for the Q dialect: the number of records.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QParameter> {
        self.parameters.iter()
    }

    /// Encode header, records in sequence order, and end marker.
    pub fn encode(&self) -> Result<Bytes> {
        let payload_len: usize = self.parameters.iter().map(QParameter::wire_size).sum();
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
            buf.put_u16(param.dataset.len() as u16);
            buf.put_slice(&param.dataset);
        }
        buf.put_u16(self.endfield);
        Ok(buf.freeze())
    }

    /// Decode a UDP payload as an IENA-Q packet.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let (header, rest) = PacketHeader::decode(buf)?;
        let (body, endfield) = guard::split_end_field(rest)?;

        let mut parameters = Vec::new();
        let mut rest = body;
        while !rest.is_empty() {
            let offset = body.len() - rest.len();
            guard::ensure_record(offset, RECORD_FIXED, rest.len())?;
            let paramid = rest.get_u16();
            let dataset_len = rest.get_u16() as usize;
            guard::ensure_record(offset + RECORD_FIXED, dataset_len, rest.len())?;
            let dataset = Bytes::copy_from_slice(&rest[..dataset_len]);
            rest.advance(dataset_len);
            parameters.push(QParameter { paramid, dataset });
        }
        tracing::trace!(records = parameters.len(), "decoded IENA-Q parameter list");
        Ok(Self {
            header,
            endfield,
            parameters,
        })
    }
}

impl<'a> IntoIterator for &'a IenaQ {
    type Item = &'a QParameter;
    type IntoIter = std::slice::Iter<'a, QParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

impl fmt::Display for IenaQ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "IENAQ: KEY=0X{:X} SEQ={} TIMEUS={} NUM_QPARAM={}",
            self.header.key.unwrap_or(0),
            self.header.sequence.unwrap_or(0),
            self.header.time_usec().unwrap_or(0),
            self.len(),
        )?;
        for (index, param) in self.parameters.iter().enumerate() {
            writeln!(
                f,
                " Q-Param #{}:ParamID=0X{:X} Dataset Length={}",
                index,
                param.paramid,
                param.dataset.len(),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_header(key: u16, sequence: u16) -> PacketHeader {
        let mut header = PacketHeader::new();
        header.key = Some(key);
        header.keystatus = Some(0);
        header.status = Some(0);
        header.sequence = Some(sequence);
        header
    }

    fn dataset(seed: u16, len: usize) -> Vec<u8> {
        (0..len).map(|i| (seed as usize * 17 + i) as u8).collect()
    }

    #[test]
    fn builds_and_round_trips_five_records() {
        let mut packet = IenaQ::new();
        packet.header = filled_header(0xDC, 2);
        for id in 10u16..15 {
            packet
                .parameters
                .push(QParameter::new(id, dataset(id, id as usize + 5)));
        }

        let wire = packet.encode().unwrap();
        let decoded = IenaQ::decode(&wire).unwrap();

        assert_eq!(decoded.header.sequence, Some(2));
        assert_eq!(decoded.len(), 5);
        for (index, param) in decoded.iter().enumerate() {
            let id = index as u16 + 10;
            assert_eq!(param.paramid, id);
            assert_eq!(param.dataset.len(), index + 15);
            assert_eq!(param.dataset, dataset(id, index + 15));
        }
    }

    #[test]
    fn declared_length_past_buffer_is_corrupt() {
        let mut packet = IenaQ::new();
        packet.header = filled_header(1, 1);
        packet.parameters.push(QParameter::new(9, vec![0xCD; 8]));
        let mut wire = packet.encode().unwrap().to_vec();
        // Record claims 200 dataset bytes; only 8 are present.
        wire[HEADER_SIZE + 3] = 200;

        let err = IenaQ::decode(&wire).unwrap_err();
        assert!(matches!(
            err,
            crate::error::IenaError::CorruptRecord {
                offset: 4,
                needed: 200,
                remaining: 8
            }
        ));
    }

    #[test]
    fn record_prefix_past_buffer_is_corrupt() {
        let mut buf = BytesMut::new();
        filled_header(1, 1).encode(2, &mut buf).unwrap();
        buf.put_slice(&[0x00, 0x01]); // half a record prefix
        buf.put_u16(END_FIELD);

        let err = IenaQ::decode(&buf).unwrap_err();
        assert!(matches!(
            err,
            crate::error::IenaError::CorruptRecord { offset: 0, .. }
        ));
    }

    #[test]
    fn display_lists_each_record() {
        let mut packet = IenaQ::new();
        packet.header = filled_header(0xDC, 2);
        packet.header.timestamp = Some(0);
        packet.parameters.push(QParameter::new(10, vec![0u8; 15]));

        assert_eq!(
            packet.to_string(),
            "IENAQ: KEY=0XDC SEQ=2 TIMEUS=0 NUM_QPARAM=1\n \
             Q-Param #0:ParamID=0XA Dataset Length=15\n"
        );
    }
}
