use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod envinfo;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Drive a register-and-transmit cycle through a loopback radio.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Print build and environment diagnostics.
    Envinfo(EnvinfoArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Envinfo(args) => envinfo::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Server radio address as HOST:PORT (host hex like 0xAB01 or decimal).
    #[arg(long, default_value = "0xAB01:5683")]
    pub server: String,

    /// Frame budget of the loopback device, in bytes.
    #[arg(long, default_value_t = 32)]
    pub frame_len: usize,

    /// Payload as a UTF-8 string.
    #[arg(long, conflicts_with = "hex")]
    pub data: Option<String>,

    /// Payload as hex bytes.
    #[arg(long)]
    pub hex: Option<String>,

    /// Upper-protocol header bytes as hex. Reserved storage only;
    /// never transmitted over the air.
    #[arg(long, default_value = "00000000")]
    pub header: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Print extended build information.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug)]
pub struct EnvinfoArgs {}
