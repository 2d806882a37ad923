use std::fs;
use std::io::Write;

use bytes::Bytes;
use iena_wire::Iena;

use crate::cmd::decode::parse_hex;
use crate::cmd::EncodeArgs;
use crate::exit::{codec_error, io_error, CliResult, SUCCESS};

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;

    let mut packet = Iena::new();
    packet.header.key = Some(args.key);
    packet.header.keystatus = Some(args.keystatus);
    packet.header.status = Some(args.status);
    packet.header.sequence = Some(args.sequence);
    packet.header.set_packet_time(args.time_sec, args.time_usec);
    packet.payload = Bytes::from(payload);

    let wire = packet.encode().map_err(|err| codec_error("encode failed", err))?;
    tracing::debug!(bytes = wire.len(), "encoded packet");

    match &args.out {
        Some(path) => {
            fs::write(path, &wire)
                .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))?;
        }
        None => {
            let mut stdout = std::io::stdout();
            stdout
                .write_all(&wire)
                .and_then(|()| stdout.flush())
                .map_err(|err| io_error("failed writing packet to stdout", err))?;
        }
    }
    Ok(SUCCESS)
}

fn resolve_payload(args: &EncodeArgs) -> CliResult<Vec<u8>> {
    if let Some(hex) = &args.data_hex {
        return parse_hex(hex);
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Vec::new())
}
