// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Vendor-specific overlay tables. Vendor pages reuse low page codes, so
//! they live behind an explicit `--vendor` selection and never shadow the
//! generic namespace.

use core::fmt;

use anyhow::{Result, bail};

use super::{FieldDescriptor, FieldFlags, ModePageName, fld, mpn, pdt::ANY, pdt::DISK};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorId {
    Seagate,
    Hitachi,
}

impl VendorId {
    pub fn parse(s: &str) -> Result<Self> {
        if let Ok(n) = crate::select::parse_num(s) {
            return match n {
                0 => Ok(VendorId::Seagate),
                1 => Ok(VendorId::Hitachi),
                other => bail!("unknown vendor number: {other}"),
            };
        }
        Ok(match s.to_ascii_lowercase().as_str() {
            "sea" | "seagate" => VendorId::Seagate,
            "hit" | "hitachi" | "hgst" | "wdc" => VendorId::Hitachi,
            other => bail!("unknown vendor: {other}"),
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            VendorId::Seagate => "Seagate",
            VendorId::Hitachi => "Hitachi/HGST",
        }
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const NF: FieldFlags = FieldFlags::empty();
const CM: FieldFlags = FieldFlags::COMMON;
const TC: FieldFlags = FieldFlags::TWOS_COMP;

static SEAGATE_MPAGE_NAMES: &[ModePageName] = &[
    mpn(0x00, 0x00, ANY, "uac", "Unit attention condition (Seagate)"),
];

static SEAGATE_FIELDS: &[FieldDescriptor] = &[
    fld("PM", 0x00, 0, ANY, 2, 7, 1, CM, "Performance mode"),
    fld("SSM", 0x00, 0, ANY, 2, 6, 1, NF, "Synchronous select mode (SPI)"),
    fld("IL", 0x00, 0, ANY, 2, 5, 1, NF, "Inquiry length"),
    fld("UA", 0x00, 0, ANY, 2, 4, 1, CM, "Unit attention"),
    fld("DFLT", 0x00, 0, ANY, 2, 3, 1, NF, "Default reporting of power-on conditions"),
    fld("TAC", 0x00, 0, ANY, 2, 2, 1, NF, "Truncate actual count"),
    fld("SSEEK", 0x00, 0, ANY, 2, 1, 1, NF, "Self seek (low power audible drive activity)"),
    fld("JIT", 0x00, 0, DISK, 3, 3, 4, NF, "Just in time seek speed tier"),
    fld("TOFF", 0x00, 0, DISK, 4, 7, 8, TC, "Temperature offset from reference (C)"),
];

static HITACHI_MPAGE_NAMES: &[ModePageName] = &[
    mpn(0x00, 0x00, ANY, "vup", "Vendor unique parameters (Hitachi)"),
];

static HITACHI_FIELDS: &[FieldDescriptor] = &[
    fld("MRG", 0x00, 0, ANY, 2, 4, 1, NF, "Merge glist into plist (format)"),
    fld("VGMDE", 0x00, 0, ANY, 3, 3, 1, CM, "Veggie mode (random seeks when idle)"),
    fld("RRNDE", 0x00, 0, ANY, 3, 1, 1, NF, "Report recovered non data errors"),
    fld("FDD", 0x00, 0, ANY, 4, 4, 1, NF, "Format degraded disable (of unit attention)"),
    fld("CAEN", 0x00, 0, ANY, 4, 1, 1, CM, "Command aging enable"),
    fld("USN", 0x00, 0, ANY, 5, 0, 1, NF, "Unit serial number (enable in inquiry response)"),
];

pub fn fields(v: VendorId) -> &'static [FieldDescriptor] {
    match v {
        VendorId::Seagate => SEAGATE_FIELDS,
        VendorId::Hitachi => HITACHI_FIELDS,
    }
}

pub fn mpage_names(v: VendorId) -> &'static [ModePageName] {
    match v {
        VendorId::Seagate => SEAGATE_MPAGE_NAMES,
        VendorId::Hitachi => HITACHI_MPAGE_NAMES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_parse() {
        assert_eq!(VendorId::parse("SEA").expect("WTF"), VendorId::Seagate);
        assert_eq!(VendorId::parse("1").expect("WTF"), VendorId::Hitachi);
        assert!(VendorId::parse("quantum").is_err());
    }
}
