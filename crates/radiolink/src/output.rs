use std::io::IsTerminal;

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

/// One captured on-air frame, decoded for display.
#[derive(Serialize)]
pub struct FrameView {
    pub seq: u8,
    pub more: bool,
    pub len: usize,
    pub hex: String,
}

/// Result of a `send` run against the loopback device.
#[derive(Serialize)]
pub struct TransmitReport {
    pub device: String,
    pub server: String,
    pub payload_bytes: usize,
    pub frame_count: usize,
    pub frames: Vec<FrameView>,
}

pub fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub fn print_report(report: &TransmitReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            println!(
                "sent {} payload bytes to {} via {} in {} frame(s)",
                report.payload_bytes, report.server, report.device, report.frame_count
            );
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SEQ", "MORE", "LEN", "FRAME"]);
            for frame in &report.frames {
                table.add_row(vec![
                    frame.seq.to_string(),
                    frame.more.to_string(),
                    frame.len.to_string(),
                    frame.hex.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "device={} server={} payload_bytes={} frames={}",
                report.device, report.server, report.payload_bytes, report.frame_count
            );
            for frame in &report.frames {
                println!(
                    "  seq={} more={} len={} hex={}",
                    frame.seq, frame.more, frame.len, frame.hex
                );
            }
        }
        OutputFormat::Raw => {
            for frame in &report.frames {
                println!("{}", frame.hex);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_string_formats_bytes() {
        assert_eq!(hex_string(&[0x52, 0x46, 0x00, 0xff]), "524600ff");
        assert_eq!(hex_string(&[]), "");
    }

    #[test]
    fn report_serializes() {
        let report = TransmitReport {
            device: "loop0".to_string(),
            server: "0xab01:5683".to_string(),
            payload_bytes: 5,
            frame_count: 1,
            frames: vec![FrameView {
                seq: 0,
                more: false,
                len: 5,
                hex: "dead".to_string(),
            }],
        };

        let json = serde_json::to_string(&report).expect("report should serialize");
        assert!(json.contains("\"frame_count\":1"));
        assert!(json.contains("\"seq\":0"));
    }
}
