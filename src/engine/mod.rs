// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Mode-page orchestration: read-modify-write sequencing, page printing,
//! descriptor handling, defaults restoration, and the inhex replay path.

/// Write paths: set/clear, restore defaults, global RTD.
pub mod change;
/// Descriptor-region arithmetic.
pub mod descriptors;
/// The error taxonomy and exit codes.
pub mod error;
/// Catalog listing and whole-device page probing.
pub mod enumerate;
/// Replay of captured MODE SENSE responses.
pub mod inhex_replay;
/// Device I/O sequencing (MODE SENSE/SELECT, INQUIRY) with fallbacks.
pub mod pageio;
/// Field streaming and page rendering.
pub mod print;

use crate::catalog::{TransportId, VendorId, pdt};

/// Engine-level options distilled from the CLI.
#[derive(Debug, Clone, Copy)]
pub struct ModeOpts {
    pub pdt: i8,
    pub transport: Option<TransportId>,
    pub vendor: Option<VendorId>,
    /// Demote malformed-page conditions to warnings.
    pub flexible: bool,
    /// Show every known field, not only the common set.
    pub all: bool,
    pub long: bool,
    /// Print descriptor counts instead of fields.
    pub num_desc: bool,
    /// Hex-dump the MODE SELECT payload instead of sending it.
    pub dummy: bool,
    /// Request the save bit on MODE SELECT.
    pub save: bool,
}

impl Default for ModeOpts {
    fn default() -> Self {
        ModeOpts {
            pdt: pdt::ANY,
            transport: None,
            vendor: None,
            flexible: false,
            all: false,
            long: false,
            num_desc: false,
            dummy: false,
            save: false,
        }
    }
}
