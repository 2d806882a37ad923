use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// A decoded packet flattened for output.
#[derive(Debug, Serialize)]
pub struct PacketOutput {
    pub dialect: &'static str,
    pub key: Option<u16>,
    pub size: Option<u16>,
    pub time_usec: Option<u64>,
    pub keystatus: Option<u8>,
    pub status: Option<u8>,
    pub sequence: Option<u16>,
    pub endfield: u16,
    /// Dialect length rule: record count for M/Q, summed word count for
    /// N/D, wire byte count for the base dialect.
    pub length: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<RecordOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_hex: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordOutput {
    pub paramid: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dwords: Option<Vec<u16>>,
}

pub fn print_packet(packet: &PacketOutput, pretty: &str, raw: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(packet).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["DIALECT", "KEY", "SIZE", "SEQ", "TIMEUS", "LENGTH"])
                .add_row(vec![
                    packet.dialect.to_string(),
                    opt_hex(packet.key),
                    opt_num(packet.size),
                    opt_num(packet.sequence),
                    opt_num(packet.time_usec),
                    packet.length.to_string(),
                ]);
            println!("{table}");

            if !packet.records.is_empty() {
                let mut records = Table::new();
                records
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["#", "PARAMID", "DELAY", "CONTENT"]);
                for (index, record) in packet.records.iter().enumerate() {
                    records.add_row(vec![
                        index.to_string(),
                        format!("0x{:X}", record.paramid),
                        record
                            .delay
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        record_content(record),
                    ]);
                }
                println!("{records}");
            }
        }
        OutputFormat::Pretty => {
            // Parameter-list reprs already end in a newline.
            if pretty.ends_with('\n') {
                print!("{pretty}");
            } else {
                println!("{pretty}");
            }
        }
        OutputFormat::Raw => {
            print_raw(raw);
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn hex_string(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}

fn record_content(record: &RecordOutput) -> String {
    if let Some(dwords) = &record.dwords {
        return dwords
            .iter()
            .map(|w| format!("0x{w:04X}"))
            .collect::<Vec<_>>()
            .join(" ");
    }
    match &record.dataset_hex {
        Some(hex) => format!("{} bytes: {hex}", hex.len() / 2),
        None => String::new(),
    }
}

fn opt_num<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn opt_hex(value: Option<u16>) -> String {
    value
        .map(|v| format!("0x{v:X}"))
        .unwrap_or_else(|| "-".to_string())
}
