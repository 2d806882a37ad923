use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a captured UDP payload.
    Decode(DecodeArgs),
    /// Build a base IENA packet and emit its wire bytes.
    Encode(EncodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args),
        Command::Version(args) => version::run(args),
    }
}

/// The IENA payload dialects the decoder can be pointed at.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Dialect {
    Iena,
    Ienam,
    Ienan,
    Ienad,
    Ienaq,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File holding the raw UDP payload bytes.
    pub file: Option<PathBuf>,
    /// Payload as a hex string (whitespace ignored).
    #[arg(long, conflicts_with = "file")]
    pub hex: Option<String>,
    /// Payload dialect to decode as.
    #[arg(long, short = 'd', default_value = "iena")]
    pub dialect: Dialect,
    /// Data words per record for the N and D dialects.
    #[arg(long, value_name = "N")]
    pub words_per_param: Option<usize>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Packet key (streamid).
    #[arg(long)]
    pub key: u16,
    #[arg(long, default_value = "0")]
    pub keystatus: u8,
    #[arg(long, default_value = "0")]
    pub status: u8,
    #[arg(long, default_value = "0")]
    pub sequence: u16,
    /// Packet time: seconds since the reference instant.
    #[arg(long, default_value = "0")]
    pub time_sec: u64,
    /// Packet time: microsecond part.
    #[arg(long, default_value = "0")]
    pub time_usec: u32,
    /// Payload as a hex string.
    #[arg(long, conflicts_with = "file")]
    pub data_hex: Option<String>,
    /// Read the payload from a file.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Write the packet here instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
