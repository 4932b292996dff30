// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Command-line definition. Selector strings are parsed later, against
//! the catalog, once the namespace (transport/vendor) is known.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sdparm",
    version,
    disable_version_flag = true,
    about = "Read and tune SCSI mode pages and VPD pages",
    long_about = "Reads and optionally modifies SCSI mode page fields, and decodes \
                  INQUIRY VPD pages, on any device speaking the SCSI command set \
                  (SAS, FC, iSCSI, SATA via SAT, USB, ...)."
)]
pub struct Cli {
    /// Use 6 byte MODE SENSE/SELECT CDBs (default 10 byte)
    #[arg(short = '6', long = "six")]
    pub six: bool,

    /// List all known fields, not only the common ones; twice with
    /// --inquiry: decode every supported VPD page
    #[arg(short = 'a', long = "all", action = clap::ArgAction::Count)]
    pub all: u8,

    /// Clear the listed fields (to 0 unless =value given)
    #[arg(short = 'c', long = "clear", value_name = "STR")]
    pub clear: Option<String>,

    /// Restore default values (with --page: that page; alone: whole device)
    #[arg(short = 'd', long = "defaults")]
    pub defaults: bool,

    /// Disable block descriptors in MODE SENSE
    #[arg(short = 'D', long = "dbd")]
    pub dbd: bool,

    /// Enumerate from the catalog, no device access
    #[arg(short = 'e', long = "enumerate")]
    pub enumerate: bool,

    /// Probe every mode page code for presence
    #[arg(short = 'E', long = "examine")]
    pub examine: bool,

    /// Demote warnings about malformed or oversized pages
    #[arg(short = 'f', long = "flexible")]
    pub flexible: bool,

    /// Read the listed fields
    #[arg(short = 'g', long = "get", value_name = "STR")]
    pub get: Option<String>,

    /// Print pages in hex (repeat for rawer modes)
    #[arg(short = 'H', long = "hex", action = clap::ArgAction::Count)]
    pub hex: u8,

    /// Decode VPD pages instead of mode pages
    #[arg(short = 'i', long = "inquiry")]
    pub inquiry: bool,

    /// Read pages from a hex-dump file instead of a device
    #[arg(short = 'I', long = "inhex", value_name = "FILE")]
    pub inhex: Option<PathBuf>,

    /// Structured JSON output
    #[arg(short = 'j', long = "json")]
    pub json: bool,

    /// Attach per-page-control raw bytes to the JSON output
    #[arg(long = "inner-hex")]
    pub inner_hex: bool,

    /// Set LLBAA in MODE SENSE(10)
    #[arg(long = "llbaa")]
    pub llbaa: bool,

    /// Verbose decoded output
    #[arg(short = 'l', long = "long")]
    pub long: bool,

    /// Print the number of descriptors in the page
    #[arg(short = 'n', long = "num-desc")]
    pub num_desc: bool,

    /// Address a page by acronym or number (PG[,SUBPG])
    #[arg(short = 'p', long = "page", value_name = "PG[,SUBPG]")]
    pub page: Option<String>,

    /// Compact output: bare values, no headings
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Open the device read-only and refuse write operations
    #[arg(short = 'r', long = "readonly")]
    pub readonly: bool,

    /// Set the listed fields
    #[arg(short = 's', long = "set", value_name = "STR")]
    pub set: Option<String>,

    /// Persist changes via MODE SELECT's save bit
    #[arg(short = 'S', long = "save")]
    pub save: bool,

    /// Transport-specific namespace (name or protocol number)
    #[arg(short = 't', long = "transport", value_name = "TN")]
    pub transport: Option<String>,

    /// Vendor-specific namespace (name or number)
    #[arg(short = 'V', long = "vendor", value_name = "VN")]
    pub vendor: Option<String>,

    /// Hex-dump what MODE SELECT would send, without sending it
    #[arg(long = "dummy")]
    pub dummy: bool,

    /// Raise the diagnostic level (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print version and exit
    #[arg(long = "version", action = clap::ArgAction::Version, value_parser = clap::value_parser!(bool))]
    pub version: Option<bool>,

    /// Device node(s), e.g. /dev/sg1 or /dev/sda
    #[arg(value_name = "DEVICE")]
    pub devices: Vec<PathBuf>,
}
