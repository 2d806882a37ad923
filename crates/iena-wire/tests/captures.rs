//! Decoding checks against captured UDP payloads.
//!
//! The buffers below are byte-for-byte copies of reference captures: one
//! 48-byte packet that is readable as base IENA, IENA-M, and IENA-N, and
//! one IENA-D packet whose final record is a single word. The corrupt
//! variant is the same D packet torn mid-record.

use iena_wire::{Iena, IenaD, IenaError, IenaM, IenaN, END_FIELD};

#[rustfmt::skip]
const CAPTURE: [u8; 48] = [
    // header: key=0x1A size=24 time=0x1_D102_F800 keystatus=1 status=1 seq=195
    0x00, 0x1A, 0x00, 0x18, 0x00, 0x01, 0xD1, 0x02, 0xF8, 0x00, 0x01, 0x01, 0x00, 0xC3,
    // one M record: paramid=0xDC delay=16 dataset length=26
    0x00, 0xDC, 0x00, 0x10, 0x00, 0x1A,
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C,
    0x0D, 0x0E, 0x0F, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19,
    0xDE, 0xAD,
];

#[rustfmt::skip]
const CAPTURE_D: [u8; 62] = [
    // header: key=0x2CFA size=31 time=1837us keystatus=0 status=0 seq=0
    0x2C, 0xFA, 0x00, 0x1F, 0x00, 0x00, 0x00, 0x00, 0x07, 0x2D, 0x00, 0x00, 0x00, 0x00,
    // five 2-word records and a final 1-word record
    0xFF, 0xFF, 0x00, 0x00, 0xFE, 0xD1, 0x7C, 0xFE,
    0x00, 0x01, 0x00, 0x00, 0x11, 0x11, 0x22, 0x22,
    0x00, 0x02, 0x00, 0x00, 0x33, 0x33, 0x44, 0x44,
    0x00, 0x03, 0x00, 0x00, 0x55, 0x55, 0x66, 0x66,
    0x00, 0x04, 0x00, 0x00, 0x77, 0x77, 0x88, 0x88,
    0x00, 0x05, 0x00, 0x00, 0x99, 0x99,
    0xDE, 0xAD,
];

#[test]
fn capture_decodes_as_base_iena() {
    let packet = Iena::decode(&CAPTURE).unwrap();

    assert_eq!(packet.header.key, Some(0x1A));
    assert_eq!(packet.header.size, Some(24));
    assert_eq!(packet.header.status, Some(1));
    assert_eq!(packet.header.keystatus, Some(1));
    assert_eq!(packet.header.sequence, Some(195));
    assert_eq!(packet.header.time_usec(), Some(0x1_D102_F800));
    assert_eq!(packet.endfield, END_FIELD);
    assert_eq!(packet.wire_size(), 48);
    assert_eq!(
        packet.to_string(),
        "IENAP: KEY=0X1A SEQ=195 TIMEUS=7801600000"
    );
}

#[test]
fn capture_decodes_as_ienam() {
    let packet = IenaM::decode(&CAPTURE).unwrap();

    assert_eq!(packet.header.key, Some(0x1A));
    assert_eq!(packet.len(), 1);
    for mparam in &packet {
        assert_eq!(mparam.paramid, 0xDC);
        assert_eq!(mparam.delay, 16);
        assert_eq!(mparam.dataset.len(), 26);
    }
    assert_eq!(
        packet.to_string(),
        "IENAM: KEY=0X1A SEQ=195 TIMEUS=7801600000 NUM_MPARAM=1\n \
         M-Param #0:ParamID=0XDC Delay=16 Dataset Length=26\n"
    );
}

#[test]
fn capture_decodes_as_ienan() {
    let packet = IenaN::decode(&CAPTURE).unwrap();

    assert_eq!(packet.header.key, Some(0x1A));
    assert_eq!(packet.len(), 8);
    assert_eq!(packet.parameters[0].paramid, 0xDC);
    assert_eq!(packet.parameters[0].dwords, [0x10]);
    assert_eq!(
        packet.to_string(),
        "IENAN: KEY=0X1A SEQ=195 TIMEUS=7801600000 NUM_DPARAM=8"
    );
}

#[test]
fn d_capture_decodes_with_short_final_record() {
    let packet = IenaD::decode(&CAPTURE_D).unwrap();

    assert_eq!(packet.header.key, Some(0x2CFA));
    assert_eq!(packet.parameters[0].paramid, 0xFFFF);
    assert_eq!(packet.parameters[0].delay, 0);
    assert_eq!(packet.parameters[0].dwords, [0xFED1, 0x7CFE]);
    assert_eq!(packet.len(), 11);
    assert_eq!(
        packet.to_string(),
        "IENAD: KEY=0X2CFA SEQ=0 TIMEUS=1837 NUM_DPARAM=11"
    );
}

#[test]
fn torn_d_capture_is_rejected() {
    let mut torn = Vec::new();
    torn.extend_from_slice(&CAPTURE_D[..14]); // header
    torn.extend_from_slice(&[0xFF, 0xFF, 0x00, 0x00, 0xFE]); // torn record
    torn.extend_from_slice(&[0xDE, 0xAD]);

    let err = IenaD::decode(&torn).unwrap_err();
    assert!(matches!(err, IenaError::CorruptRecord { .. }));
}

#[test]
fn decode_then_encode_reproduces_the_capture() {
    let wire = Iena::decode(&CAPTURE).unwrap().encode().unwrap();
    assert_eq!(wire.as_ref(), CAPTURE);

    let wire = IenaM::decode(&CAPTURE).unwrap().encode().unwrap();
    assert_eq!(wire.as_ref(), CAPTURE);

    let wire = IenaD::decode(&CAPTURE_D).unwrap().encode().unwrap();
    assert_eq!(wire.as_ref(), CAPTURE_D);
}
