use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::Result;
use crate::guard;
use crate::header::{PacketHeader, END_FIELD, END_FIELD_SIZE, HEADER_SIZE};
use crate::nparam::WORD_SIZE;

/// Fixed prefix of a D record: paramid + delay.
const RECORD_FIXED: usize = 4;

/// One D-parameter record: like an N record with an added delay field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DParameter {
    pub paramid: u16,
    pub delay: u16,
    pub dwords: Vec<u16>,
}

impl DParameter {
    pub fn new(paramid: u16, delay: u16, dwords: Vec<u16>) -> Self {
        Self {
            paramid,
            delay,
            dwords,
        }
    }
}

/// IENA-D dialect: data-word records carrying a per-record delay.
///
/// Record shape discovery follows the N dialect: `words_per_param` is
/// decoder configuration and the final record absorbs the remaining
/// whole words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IenaD {
    pub header: PacketHeader,
    pub endfield: u16,
    pub parameters: Vec<DParameter>,
    pub words_per_param: usize,
}

impl Default for IenaD {
    fn default() -> Self {
        Self::new()
    }
}

impl IenaD {
    pub const DEFAULT_WORDS_PER_PARAM: usize = 2;

    pub fn new() -> Self {
        Self {
            header: PacketHeader::new(),
            endfield: END_FIELD,
            parameters: Vec::new(),
            words_per_param: Self::DEFAULT_WORDS_PER_PARAM,
        }
    }

    /// Container length for the D dialect: the total data-word count
    /// across all records, not the record count.
    pub fn len(&self) -> usize {
        self.parameters.iter().map(|p| p.dwords.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DParameter> {
        self.parameters.iter()
    }

    /// Encode header, records in sequence order, and end marker.
    pub fn encode(&self) -> Result<Bytes> {
        let payload_len: usize = self
            .parameters
            .iter()
            .map(|p| RECORD_FIXED + p.dwords.len() * WORD_SIZE)
            .sum();
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload_len + END_FIELD_SIZE);
        self.header.encode(payload_len, &mut buf)?;
        for param in &self.parameters {
            buf.put_u16(param.paramid);
            buf.put_u16(param.delay);
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
            // A record is paramid + delay plus at least one whole word.
            guard::ensure_record(offset, RECORD_FIXED + WORD_SIZE, rest.len())?;
            let paramid = rest.get_u16();
            let delay = rest.get_u16();
            let count = words_per_param.min(rest.len() / WORD_SIZE);
            let mut dwords = Vec::with_capacity(count);
            for _ in 0..count {
                dwords.push(rest.get_u16());
            }
            parameters.push(DParameter {
                paramid,
                delay,
                dwords,
            });
        }
        tracing::trace!(
            records = parameters.len(),
            words_per_param,
            "decoded IENA-D parameter list"
        );
        Ok(Self {
            header,
            endfield,
            parameters,
            words_per_param,
        })
    }
}

impl<'a> IntoIterator for &'a IenaD {
    type Item = &'a DParameter;
    type IntoIter = std::slice::Iter<'a, DParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

impl fmt::Display for IenaD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IENAD: KEY=0X{:X} SEQ={} TIMEUS={} NUM_DPARAM={}",
            self.header.key.unwrap_or(0),
            self.header.sequence.unwrap_or(0),
            self.header.time_usec().unwrap_or(0),
            self.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IenaError;

    fn filled_header(key: u16, sequence: u16) -> PacketHeader {
        let mut header = PacketHeader::new();
        header.key = Some(key);
        header.keystatus = Some(0);
        header.status = Some(0);
        header.sequence = Some(sequence);
        header
    }

    #[test]
    fn round_trips_uniform_records() {
        let mut packet = IenaD::new();
        packet.header = filled_header(0x2CFA, 0);
        packet
            .parameters
            .push(DParameter::new(0xFFFF, 0, vec![0xFED1, 0x7CFE]));
        packet
            .parameters
            .push(DParameter::new(0x0001, 4, vec![0x1111, 0x2222]));

        let wire = packet.encode().unwrap();
        let decoded = IenaD::decode(&wire).unwrap();

        assert_eq!(decoded.len(), 4);
        assert_eq!(decoded.parameters, packet.parameters);
    }

    #[test]
    fn final_record_absorbs_remaining_words() {
        let mut packet = IenaD::new();
        packet.header = filled_header(0x2CFA, 0);
        packet.header.timestamp = Some(1837);
        for id in 0u16..5 {
            packet
                .parameters
                .push(DParameter::new(id, 0, vec![id, id + 1]));
        }
        // Final short record: one word only.
        packet.parameters.push(DParameter::new(5, 0, vec![0x9999]));

        let wire = packet.encode().unwrap();
        let decoded = IenaD::decode(&wire).unwrap();

        assert_eq!(decoded.len(), 11);
        assert_eq!(decoded.parameters.len(), 6);
        assert_eq!(decoded.parameters[5].dwords, [0x9999]);
    }

    #[test]
    fn truncated_record_prefix_is_corrupt() {
        let mut buf = BytesMut::new();
        filled_header(0x2CFA, 0).encode(12, &mut buf).unwrap();
        buf.put_slice(&[0xFF, 0xFF, 0x00, 0x00, 0xFE, 0xD1, 0x7C, 0xFE]); // full record
        buf.put_slice(&[0x00, 0x01, 0x00, 0x00]); // prefix with no data words
        buf.put_u16(END_FIELD);

        let err = IenaD::decode(&buf).unwrap_err();
        assert!(matches!(
            err,
            IenaError::CorruptRecord {
                offset: 8,
                needed: 6,
                remaining: 4
            }
        ));
    }

    #[test]
    fn no_partial_container_escapes_on_corruption() {
        let mut buf = BytesMut::new();
        filled_header(1, 1).encode(10, &mut buf).unwrap();
        buf.put_slice(&[0x00, 0x01, 0x00, 0x00, 0xAA, 0xAA, 0xBB, 0xBB]);
        buf.put_slice(&[0x00, 0x02]); // torn record
        buf.put_u16(END_FIELD);

        assert!(IenaD::decode(&buf).is_err());
    }

    #[test]
    fn display_reports_summed_word_count() {
        let mut packet = IenaD::new();
        packet.header = filled_header(0x2CFA, 0);
        packet.header.timestamp = Some(1837);
        for id in 0u16..5 {
            packet
                .parameters
                .push(DParameter::new(id, 0, vec![0, 0]));
        }
        packet.parameters.push(DParameter::new(5, 0, vec![0]));

        assert_eq!(
            packet.to_string(),
            "IENAD: KEY=0X2CFA SEQ=0 TIMEUS=1837 NUM_DPARAM=11"
        );
    }
}
