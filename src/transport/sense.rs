// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! SCSI sense data: fixed (0x70/0x71) and descriptor (0x72/0x73) formats,
//! categorization, and ASC/ASCQ description strings.

use core::fmt;
use std::collections::HashMap;

use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;

use crate::transport::CmdCategory;

pub const FIXED_MIN_LEN: usize = 18;

#[derive(Default, Clone, PartialEq, Eq)]
pub struct SenseData {
    pub response_code: u8,
    pub sense_key: u8,
    pub asc: u8,
    pub ascq: u8,
    /// Raw sense payload, for `--verbose` hex dumps.
    pub raw: Vec<u8>,
}

impl SenseData {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.is_empty() {
            return Err(anyhow!("empty sense buffer"));
        }
        let response_code = buf[0] & 0x7F;
        match response_code {
            0x70 | 0x71 => Self::parse_fixed(buf),
            0x72 | 0x73 => Self::parse_descriptor(buf),
            other => Err(anyhow!("unknown sense response code 0x{other:02x}")),
        }
    }

    fn parse_fixed(sense: &[u8]) -> Result<Self> {
        if sense.len() < 14 {
            return Err(anyhow!("fixed sense too small: {}", sense.len()));
        }
        Ok(SenseData {
            response_code: sense[0] & 0x7F,
            sense_key: sense[2] & 0x0F,
            asc: sense[12],
            ascq: sense[13],
            raw: sense.to_vec(),
        })
    }

    fn parse_descriptor(sense: &[u8]) -> Result<Self> {
        if sense.len() < 8 {
            return Err(anyhow!("descriptor sense too small: {}", sense.len()));
        }
        Ok(SenseData {
            response_code: sense[0] & 0x7F,
            sense_key: sense[1] & 0x0F,
            asc: sense[2],
            ascq: sense[3],
            raw: sense.to_vec(),
        })
    }

    /// Sense-key (refined by ASC for the opcode case) to outcome category.
    pub fn category(&self) -> CmdCategory {
        match self.sense_key {
            0x0 | 0x1 => CmdCategory::Good,
            0x2 => CmdCategory::NotReady,
            0x5 => {
                if self.asc == 0x20 && self.ascq == 0x00 {
                    CmdCategory::InvalidOpcode
                } else {
                    CmdCategory::IllegalRequest
                }
            },
            0x6 => CmdCategory::UnitAttention,
            0xb => CmdCategory::AbortedCommand,
            _ => CmdCategory::Other,
        }
    }

    pub fn key_str(&self) -> &'static str {
        match self.sense_key {
            0x0 => "No sense",
            0x1 => "Recovered error",
            0x2 => "Not ready",
            0x3 => "Medium error",
            0x4 => "Hardware error",
            0x5 => "Illegal request",
            0x6 => "Unit attention",
            0x7 => "Data protect",
            0x8 => "Blank check",
            0xa => "Copy aborted",
            0xb => "Aborted command",
            0xd => "Volume overflow",
            0xe => "Miscompare",
            _ => "Reserved",
        }
    }
}

impl fmt::Display for SenseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} [asc=0x{:02x}, ascq=0x{:02x}]",
            self.key_str(),
            asc_ascq_to_str(self.asc, self.ascq),
            self.asc,
            self.ascq
        )
    }
}

impl fmt::Debug for SenseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenseData")
            .field("response_code", &format_args!("{:#04x}", self.response_code))
            .field("sense_key", &format_args!("{:#x}", self.sense_key))
            .field("asc", &format_args!("{:#04x}", self.asc))
            .field("ascq", &format_args!("{:#04x}", self.ascq))
            .field("description", &asc_ascq_to_str(self.asc, self.ascq))
            .finish()
    }
}

struct Entry {
    code: u16,
    desc: &'static str,
}

const fn e(asc: u8, ascq: u8, desc: &'static str) -> Entry {
    Entry {
        code: ((asc as u16) << 8) | ascq as u16,
        desc,
    }
}

/// The additional-sense codes this tool can provoke, plus the common
/// hardware set. Vendor pairs fall through to a generic string.
static ASC_ASCQ: &[Entry] = &[
    e(0x00, 0x00, "No additional sense information"),
    e(0x04, 0x00, "Logical unit not ready, cause not reportable"),
    e(0x04, 0x01, "Logical unit is in process of becoming ready"),
    e(0x04, 0x02, "Logical unit not ready, initializing command required"),
    e(0x04, 0x03, "Logical unit not ready, manual intervention required"),
    e(0x04, 0x04, "Logical unit not ready, format in progress"),
    e(0x04, 0x11, "Logical unit not ready, notify (enable spinup) required"),
    e(0x0b, 0x00, "Warning"),
    e(0x0b, 0x01, "Warning - specified temperature exceeded"),
    e(0x15, 0x00, "Random positioning error"),
    e(0x1a, 0x00, "Parameter list length error"),
    e(0x20, 0x00, "Invalid command operation code"),
    e(0x21, 0x00, "Logical block address out of range"),
    e(0x24, 0x00, "Invalid field in CDB"),
    e(0x25, 0x00, "Logical unit not supported"),
    e(0x26, 0x00, "Invalid field in parameter list"),
    e(0x26, 0x01, "Parameter not supported"),
    e(0x26, 0x02, "Parameter value invalid"),
    e(0x26, 0x03, "Threshold parameters not supported"),
    e(0x27, 0x00, "Write protected"),
    e(0x28, 0x00, "Not ready to ready change, medium may have changed"),
    e(0x29, 0x00, "Power on, reset, or bus device reset occurred"),
    e(0x29, 0x01, "Power on occurred"),
    e(0x29, 0x02, "SCSI bus reset occurred"),
    e(0x2a, 0x00, "Parameters changed"),
    e(0x2a, 0x01, "Mode parameters changed"),
    e(0x2f, 0x00, "Commands cleared by another initiator"),
    e(0x31, 0x00, "Medium format corrupted"),
    e(0x35, 0x00, "Enclosure services failure"),
    e(0x3a, 0x00, "Medium not present"),
    e(0x3f, 0x01, "Microcode has been changed"),
    e(0x44, 0x00, "Internal target failure"),
    e(0x47, 0x00, "SCSI parity error"),
    e(0x4b, 0x00, "Data phase error"),
    e(0x4e, 0x00, "Overlapped commands attempted"),
    e(0x53, 0x02, "Medium removal prevented"),
    e(0x5d, 0x00, "Failure prediction threshold exceeded"),
];

static ASC_ASCQ_MAP: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    let mut m: HashMap<u16, &'static str> = HashMap::with_capacity(ASC_ASCQ.len());
    for entry in ASC_ASCQ {
        m.insert(entry.code, entry.desc);
    }
    m
});

/// Human-readable description for an ASC/ASCQ pair. Falls back to a
/// generic message if the pair is not listed (vendor-specific).
#[inline]
pub fn asc_ascq_to_str(asc: u8, ascq: u8) -> &'static str {
    let k = ((asc as u16) << 8) | (ascq as u16);
    ASC_ASCQ_MAP
        .get(&k)
        .copied()
        .unwrap_or("UNSPECIFIED / vendor specific")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_illegal_request() {
        let mut raw = [0u8; FIXED_MIN_LEN];
        raw[0] = 0x70;
        raw[2] = 0x05;
        raw[7] = 10;
        raw[12] = 0x24;
        let s = SenseData::parse(&raw).expect("WTF");
        assert_eq!(s.category(), CmdCategory::IllegalRequest);
        assert_eq!(asc_ascq_to_str(s.asc, s.ascq), "Invalid field in CDB");
    }

    #[test]
    fn fixed_invalid_opcode() {
        let mut raw = [0u8; FIXED_MIN_LEN];
        raw[0] = 0x70;
        raw[2] = 0x05;
        raw[12] = 0x20;
        let s = SenseData::parse(&raw).expect("WTF");
        assert_eq!(s.category(), CmdCategory::InvalidOpcode);
    }

    #[test]
    fn descriptor_unit_attention() {
        let raw = [0x72u8, 0x06, 0x29, 0x00, 0, 0, 0, 0];
        let s = SenseData::parse(&raw).expect("WTF");
        assert_eq!(s.category(), CmdCategory::UnitAttention);
        assert_eq!(s.sense_key, 0x6);
        assert_eq!(
            asc_ascq_to_str(s.asc, s.ascq),
            "Power on, reset, or bus device reset occurred"
        );
    }

    #[test]
    fn vendor_pair_falls_back() {
        assert_eq!(asc_ascq_to_str(0x80, 0x13), "UNSPECIFIED / vendor specific");
    }
}
