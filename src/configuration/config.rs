use clap::Parser;
use std::path::PathBuf;

use crate::capture::types::SniffMode;
use crate::error_handling::types::ConfigError;

/// Command-line configuration for one tap run.
///
/// The argument set mirrors the tool's workflow: name the real port and its
/// baud rate, pick which directions to record, and optionally mirror the
/// console output into a file.
#[derive(Parser, Debug, Clone)]
#[command(name = "serialtap")]
#[command(version = "0.1.0")]
#[command(about = "Transparent serial port tap: relay a device through a proxy pty and log the traffic")]
pub struct SniffArgs {
    /// Serial port to sniff
    pub port: String,

    /// Baudrate of the serial port to sniff
    pub baudrate: u32,

    /// Sniff incoming (from host to serial device) transfers
    ///
    /// # Command Line
    /// Use `--incoming` or `-i`. Without direction flags only outgoing
    /// traffic is recorded.
    #[arg(short, long)]
    pub incoming: bool,

    /// Sniff outgoing (from serial device to host) transfers
    ///
    /// # Command Line
    /// Use `--outgoing` or `-o`. Combined with `--incoming` the tap records
    /// both directions.
    #[arg(short, long)]
    pub outgoing: bool,

    /// File to write the sniffed transfers to
    ///
    /// The file receives exactly the text printed to the console, appended.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// How many columns of characters to display per line
    #[arg(long, default_value_t = 8)]
    pub columns: usize,
}

impl SniffArgs {
    /// Rejects configurations the endpoint layer could only fail on later,
    /// so a bad invocation dies before anything is opened.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port.trim().is_empty() {
            return Err(ConfigError::EmptyPortName);
        }
        if self.baudrate == 0 {
            return Err(ConfigError::UnsupportedBaudRate(self.baudrate));
        }
        if self.columns == 0 {
            return Err(ConfigError::InvalidColumnCount(self.columns));
        }
        Ok(())
    }

    /// Sniff mode resolved from the two direction flags.
    pub fn mode(&self) -> SniffMode {
        SniffMode::from_flags(self.incoming, self.outgoing)
    }
}
