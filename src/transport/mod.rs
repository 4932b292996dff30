// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The narrow boundary to the SCSI pass-through: a device trait, the
//! Linux SG_IO implementation, and sense-data decoding. Everything above
//! this module works purely on CDBs and response buffers.

/// Hex-dump replay input ("inhex" files).
pub mod inhex;
/// Sense-data parsing and ASC/ASCQ description strings.
pub mod sense;
/// Linux SG_IO pass-through.
#[cfg(target_os = "linux")]
pub mod sg;

use thiserror::Error;

use crate::transport::sense::SenseData;

/// Outcome category of one completed SCSI command, used for fallback
/// decisions and exit-code policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdCategory {
    Good,
    /// Device does not implement this CDB (sense 5/20,00).
    InvalidOpcode,
    /// Illegal field in CDB or parameter list (sense key 5).
    IllegalRequest,
    NotReady,
    UnitAttention,
    AbortedCommand,
    Other,
}

#[derive(Error, Debug)]
pub enum ScsiError {
    #[error("check condition: {0}")]
    Sense(SenseData),
    #[error("transport I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

impl ScsiError {
    pub fn category(&self) -> CmdCategory {
        match self {
            ScsiError::Sense(s) => s.category(),
            _ => CmdCategory::Other,
        }
    }
}

/// A device handle able to execute CDBs. Implemented by the SG_IO
/// pass-through; tests substitute scripted fakes.
pub trait ScsiDevice {
    /// Execute a data-in command; returns the number of bytes the device
    /// actually transferred (request length minus residual).
    fn data_in(&mut self, cdb: &[u8], buf: &mut [u8]) -> Result<usize, ScsiError>;

    /// Execute a data-out (or no-data when `data` is empty) command.
    fn data_out(&mut self, cdb: &[u8], data: &[u8]) -> Result<(), ScsiError>;

    /// Human-readable device designation for diagnostics.
    fn designation(&self) -> &str;
}
