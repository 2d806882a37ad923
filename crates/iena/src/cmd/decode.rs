use std::fs;

use iena_wire::{Iena, IenaD, IenaM, IenaN, IenaQ, PacketHeader};

use crate::cmd::{DecodeArgs, Dialect};
use crate::exit::{codec_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{hex_string, print_packet, OutputFormat, PacketOutput, RecordOutput};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = read_input(&args)?;
    let (packet, pretty, raw) = decode_payload(args.dialect, args.words_per_param, &bytes)?;
    print_packet(&packet, &pretty, &raw, format);
    Ok(SUCCESS)
}

fn read_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(hex) = &args.hex {
        return parse_hex(hex);
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Err(CliError::new(USAGE, "provide a payload file or --hex"))
}

pub(crate) fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if let Some(bad) = cleaned.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(CliError::new(USAGE, format!("invalid hex digit `{bad}`")));
    }
    if cleaned.len() % 2 != 0 {
        return Err(CliError::new(
            USAGE,
            "hex payload must have an even number of digits",
        ));
    }
    // Every char is an ASCII hex digit, so byte indexing stays on char
    // boundaries and the radix parse cannot fail.
    Ok((0..cleaned.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&cleaned[i..i + 2], 16).unwrap_or_default())
        .collect())
}

fn decode_payload(
    dialect: Dialect,
    words_per_param: Option<usize>,
    bytes: &[u8],
) -> CliResult<(PacketOutput, String, Vec<u8>)> {
    let failed = |err| codec_error("decode failed", err);
    match dialect {
        Dialect::Iena => {
            let packet = Iena::decode(bytes).map_err(failed)?;
            tracing::debug!(dialect = "IENA", bytes = packet.wire_size(), "decoded packet");
            let mut out = header_output("IENA", &packet.header, packet.endfield);
            out.length = packet.wire_size();
            out.payload_hex = Some(hex_string(&packet.payload));
            Ok((out, packet.to_string(), packet.payload.to_vec()))
        }
        Dialect::Ienam => {
            let packet = IenaM::decode(bytes).map_err(failed)?;
            tracing::debug!(dialect = "IENA-M", records = packet.len(), "decoded packet");
            let mut out = header_output("IENA-M", &packet.header, packet.endfield);
            out.length = packet.len();
            out.records = packet
                .iter()
                .map(|p| RecordOutput {
                    paramid: p.paramid,
                    delay: Some(p.delay),
                    dataset_hex: Some(hex_string(&p.dataset)),
                    dwords: None,
                })
                .collect();
            Ok((out, packet.to_string(), bytes.to_vec()))
        }
        Dialect::Ienan => {
            let words = words_per_param.unwrap_or(IenaN::DEFAULT_WORDS_PER_PARAM);
            let packet = IenaN::decode_with(bytes, words).map_err(failed)?;
            tracing::debug!(dialect = "IENA-N", words = packet.len(), "decoded packet");
            let mut out = header_output("IENA-N", &packet.header, packet.endfield);
            out.length = packet.len();
            out.records = packet
                .iter()
                .map(|p| RecordOutput {
                    paramid: p.paramid,
                    delay: None,
                    dataset_hex: None,
                    dwords: Some(p.dwords.clone()),
                })
                .collect();
            Ok((out, packet.to_string(), bytes.to_vec()))
        }
        Dialect::Ienad => {
            let words = words_per_param.unwrap_or(IenaD::DEFAULT_WORDS_PER_PARAM);
            let packet = IenaD::decode_with(bytes, words).map_err(failed)?;
            tracing::debug!(dialect = "IENA-D", words = packet.len(), "decoded packet");
            let mut out = header_output("IENA-D", &packet.header, packet.endfield);
            out.length = packet.len();
            out.records = packet
                .iter()
                .map(|p| RecordOutput {
                    paramid: p.paramid,
                    delay: Some(p.delay),
                    dataset_hex: None,
                    dwords: Some(p.dwords.clone()),
                })
                .collect();
            Ok((out, packet.to_string(), bytes.to_vec()))
        }
        Dialect::Ienaq => {
            let packet = IenaQ::decode(bytes).map_err(failed)?;
            tracing::debug!(dialect = "IENA-Q", records = packet.len(), "decoded packet");
            let mut out = header_output("IENA-Q", &packet.header, packet.endfield);
            out.length = packet.len();
            out.records = packet
                .iter()
                .map(|p| RecordOutput {
                    paramid: p.paramid,
                    delay: None,
                    dataset_hex: Some(hex_string(&p.dataset)),
                    dwords: None,
                })
                .collect();
            Ok((out, packet.to_string(), bytes.to_vec()))
        }
    }
}

fn header_output(dialect: &'static str, header: &PacketHeader, endfield: u16) -> PacketOutput {
    PacketOutput {
        dialect,
        key: header.key,
        size: header.size,
        time_usec: header.time_usec(),
        keystatus: header.keystatus,
        status: header.status,
        sequence: header.sequence,
        endfield,
        length: 0,
        records: Vec::new(),
        payload_hex: None,
    }
}
