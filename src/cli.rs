use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use ps_core::TransportKind;

/// pos-setup - first-run onboarding for a point-of-sale terminal
#[derive(Parser)]
#[command(name = "pos-setup")]
#[command(about = "Configure language, administrator, store, logo and default printer")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (default: <config_dir>/pos-setup/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive setup wizard (default)
    Run,
    /// Printer discovery and diagnostics
    Printers {
        #[command(subcommand)]
        command: PrinterCommands,
    },
    /// Inspect the stored setup configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Ask the host for peripheral (bluetooth) access
    RequestAccess,
}

#[derive(Subcommand)]
pub enum PrinterCommands {
    /// List bonded bluetooth printers and attached usb printers
    List,
    /// Send the diagnostic test page to a printer
    Test {
        /// Transport the printer is reachable through
        #[arg(short, long, value_enum)]
        kind: KindArg,
        /// Hardware address (bluetooth) or vendor:product (usb)
        #[arg(short, long)]
        address: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the stored record as JSON
    Show,
    /// Print the location of the stored record
    Path,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Bluetooth,
    Usb,
}

impl From<KindArg> for TransportKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Bluetooth => TransportKind::Wireless,
            KindArg::Usb => TransportKind::Wired,
        }
    }
}
