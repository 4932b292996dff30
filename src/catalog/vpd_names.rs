// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! VPD page-name table. Codes 0xb0..0xba are PDT-dependent; the
//! `subvalue` field keeps distinct acronyms addressable when several
//! device types share one code.

use super::{
    VpdPageName,
    pdt::{ADC, ANY, DISK, MCHANGER, OSD, TAPE, ZBC},
};

const fn vpd(
    page_code: u8,
    subvalue: u8,
    pdt: i8,
    acronym: &'static str,
    name: &'static str,
) -> VpdPageName {
    VpdPageName {
        page_code,
        subvalue,
        pdt,
        acronym,
        name,
    }
}

pub static VPD_PAGE_NAMES: &[VpdPageName] = &[
    vpd(0x00, 0, ANY, "sv", "Supported VPD pages"),
    vpd(0x80, 0, ANY, "sn", "Unit serial number"),
    vpd(0x83, 0, ANY, "di", "Device identification"),
    vpd(0x84, 0, ANY, "si", "Software interface identification"),
    vpd(0x85, 0, ANY, "mna", "Management network addresses"),
    vpd(0x86, 0, ANY, "ei", "Extended inquiry data"),
    vpd(0x87, 0, ANY, "mpp", "Mode page policy"),
    vpd(0x88, 0, ANY, "sp", "SCSI ports"),
    vpd(0x89, 0, ANY, "ai", "ATA information"),
    vpd(0x8a, 0, ANY, "pc", "Power condition"),
    vpd(0x8b, 0, ANY, "dc", "Device constituents"),
    vpd(0x8c, 0, ANY, "cfa", "CFA profile information"),
    vpd(0x8d, 0, ANY, "psm", "Power consumption"),
    vpd(0x8f, 0, ANY, "tpc", "Third party copy"),
    vpd(0x90, 0, ANY, "pslu", "Protocol specific logical unit information"),
    vpd(0x91, 0, ANY, "pspo", "Protocol specific port information"),
    vpd(0x92, 0, ANY, "sfs", "SCSI feature sets"),
    // 0xb0..0xba, PDT-dependent
    vpd(0xb0, 0, DISK, "bl", "Block limits"),
    vpd(0xb0, 1, TAPE, "sad", "Sequential access device capabilities"),
    vpd(0xb0, 2, OSD, "oi", "OSD information"),
    vpd(0xb1, 0, DISK, "bdc", "Block device characteristics"),
    vpd(0xb1, 1, TAPE, "masn", "Manufactured assigned serial number"),
    vpd(0xb1, 2, OSD, "st", "Security token"),
    vpd(0xb2, 0, DISK, "lbpv", "Logical block provisioning"),
    vpd(0xb2, 1, TAPE, "tas", "TapeAlert supported flags"),
    vpd(0xb3, 0, DISK, "ref", "Referrals"),
    vpd(0xb3, 1, TAPE, "adsn", "Automation device serial number"),
    vpd(0xb4, 0, DISK, "sbl", "Supported block lengths and protection types"),
    vpd(0xb4, 1, TAPE, "dtde", "Data transfer device element address"),
    vpd(0xb5, 0, DISK, "bdce", "Block device characteristics extension"),
    vpd(0xb5, 1, TAPE, "lbpro", "Logical block protection"),
    vpd(0xb6, 0, ZBC, "zbdc", "Zoned block device characteristics"),
    vpd(0xb7, 0, DISK, "ble", "Block limits extension"),
    vpd(0xb8, 0, DISK, "fp", "Format presets"),
    vpd(0xb9, 0, DISK, "cpr", "Concurrent positioning ranges"),
    vpd(0xba, 0, DISK, "cap", "Capacity/product identification mapping"),
    // Seen on automation interfaces; listed so the name resolves.
    vpd(0xb3, 2, ADC, "tproc", "Automation device serial number (ADC)"),
    vpd(0xb4, 2, MCHANGER, "mcel", "Data transfer device element address (changer)"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{find_vpd_name, pdt, vpd_by_acronym};

    #[test]
    fn pdt_dependent_resolution() {
        let bl = find_vpd_name(0xb0, 0, pdt::DISK).expect("WTF");
        assert_eq!(bl.acronym, "bl");
        let sad = find_vpd_name(0xb0, 1, pdt::TAPE).expect("WTF");
        assert_eq!(sad.acronym, "sad");
        // Fallback: any-PDT request finds the first matching code.
        assert!(find_vpd_name(0x83, 0, pdt::ANY).is_some());
    }

    #[test]
    fn acronym_lookup() {
        assert_eq!(vpd_by_acronym("di").expect("WTF").page_code, 0x83);
        assert_eq!(vpd_by_acronym("ZBDC").expect("WTF").page_code, 0xb6);
        assert!(vpd_by_acronym("nope").is_none());
    }
}
