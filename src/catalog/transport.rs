// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Transport-specific overlay tables, selected by the 4-bit SCSI transport
//! protocol identifier carried in protocol-specific pages and designators.

use core::fmt;

use anyhow::{Result, bail};

use super::{
    DescriptorShape, FieldDescriptor, FieldFlags, ModeDescriptorLayout, ModePageName,
    fld, mpn,
    pdt::ANY,
};

/// SCSI transport protocol identifiers (SPC-5 table; 4 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TransportId {
    Fcp = 0x0,
    Spi = 0x1,
    Ssa = 0x2,
    Sbp = 0x3,
    Srp = 0x4,
    Iscsi = 0x5,
    Sas = 0x6,
    Adt = 0x7,
    Ata = 0x8,
    Uas = 0x9,
    Sop = 0xa,
    PcieOther = 0xb,
    None = 0xf,
}

impl TransportId {
    pub fn from_protocol_id(id: u8) -> Option<Self> {
        Some(match id & 0xf {
            0x0 => TransportId::Fcp,
            0x1 => TransportId::Spi,
            0x2 => TransportId::Ssa,
            0x3 => TransportId::Sbp,
            0x4 => TransportId::Srp,
            0x5 => TransportId::Iscsi,
            0x6 => TransportId::Sas,
            0x7 => TransportId::Adt,
            0x8 => TransportId::Ata,
            0x9 => TransportId::Uas,
            0xa => TransportId::Sop,
            0xb => TransportId::PcieOther,
            0xf => TransportId::None,
            _ => return None,
        })
    }

    /// Accepts a protocol number (decimal or hex) or a protocol name.
    pub fn parse(s: &str) -> Result<Self> {
        if let Ok(n) = crate::select::parse_num(s) {
            if n > 0xf {
                bail!("transport identifier {n} exceeds 15");
            }
            return TransportId::from_protocol_id(n as u8)
                .ok_or_else(|| anyhow::anyhow!("reserved transport identifier {n}"));
        }
        Ok(match s.to_ascii_lowercase().as_str() {
            "fcp" | "fc" => TransportId::Fcp,
            "spi" => TransportId::Spi,
            "ssa" => TransportId::Ssa,
            "sbp" | "1394" => TransportId::Sbp,
            "srp" => TransportId::Srp,
            "iscsi" => TransportId::Iscsi,
            "sas" | "spl" => TransportId::Sas,
            "adt" => TransportId::Adt,
            "ata" | "acs" | "sata" => TransportId::Ata,
            "uas" => TransportId::Uas,
            "sop" => TransportId::Sop,
            "none" => TransportId::None,
            other => bail!("unknown transport: {other}"),
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            TransportId::Fcp => "Fibre channel (FCP)",
            TransportId::Spi => "SCSI parallel interface (SPI)",
            TransportId::Ssa => "Serial storage architecture (SSA)",
            TransportId::Sbp => "IEEE 1394 (SBP)",
            TransportId::Srp => "SCSI RDMA protocol (SRP)",
            TransportId::Iscsi => "Internet SCSI (iSCSI)",
            TransportId::Sas => "Serial attached SCSI (SAS/SPL)",
            TransportId::Adt => "Automation/drive interface (ADT)",
            TransportId::Ata => "ATA attachment (SATA)",
            TransportId::Uas => "USB attached SCSI (UAS)",
            TransportId::Sop => "SCSI over PCIe (SOP)",
            TransportId::PcieOther => "PCIe (other)",
            TransportId::None => "No specific protocol",
        }
    }
}

impl fmt::Display for TransportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const NF: FieldFlags = FieldFlags::empty();
const CM: FieldFlags = FieldFlags::COMMON;
const HX: FieldFlags = FieldFlags::HEX;
const CM_HX: FieldFlags = CM.union(HX);

/// SAS (SPL) overlay.
static SAS_MPAGE_NAMES: &[ModePageName] = &[
    mpn(0x18, 0x00, ANY, "pl", "Protocol specific logical unit (SAS)"),
    mpn(0x19, 0x00, ANY, "pp", "Protocol specific port (SAS)"),
    ModePageName {
        page_code: 0x19,
        subpage_code: 0x01,
        pdt: ANY,
        acronym: "pcd",
        name: "Phy control and discover (SAS)",
        layout: Some(ModeDescriptorLayout {
            first_desc_off: 8,
            shape: DescriptorShape::Counted {
                num_off: 7,
                num_bytes: 1,
                inc: 0,
                desc_len: 48,
            },
            have_desc_id: false,
            name: "SAS phy",
        }),
    },
    mpn(0x19, 0x02, ANY, "spc", "Shared port control (SAS)"),
    ModePageName {
        page_code: 0x19,
        subpage_code: 0x03,
        pdt: ANY,
        acronym: "epc",
        name: "Enhanced phy control (SAS)",
        layout: Some(ModeDescriptorLayout {
            first_desc_off: 8,
            shape: DescriptorShape::Counted {
                num_off: 7,
                num_bytes: 1,
                inc: 0,
                desc_len: 20,
            },
            have_desc_id: false,
            name: "SAS enhanced phy",
        }),
    },
];

static SAS_FIELDS: &[FieldDescriptor] = &[
    // Protocol specific logical unit [0x18]
    fld("LUPID", 0x18, 0, ANY, 2, 3, 4, HX, "Logical unit's (transport) protocol identifier"),
    fld("TLR", 0x18, 0, ANY, 2, 4, 1, NF, "Transport layer retries"),
    // Protocol specific port [0x19]
    fld("PPID", 0x19, 0, ANY, 2, 3, 4, HX, "Port's (transport) protocol identifier"),
    fld("CAWT", 0x19, 0, ANY, 2, 7, 1, NF, "Continue arbitration wait timer"),
    fld("BAE", 0x19, 0, ANY, 2, 5, 1, NF, "Broadcast asynchronous event"),
    fld("I_T_NLT", 0x19, 0, ANY, 4, 7, 16, CM, "I_T nexus loss time (ms)"),
    fld("IRT", 0x19, 0, ANY, 6, 7, 16, CM, "Initiator response timeout (ms)"),
    fld("RTOL", 0x19, 0, ANY, 8, 7, 16, NF, "Reject to open limit (10 us units)"),
    // Phy control and discover [0x19,0x01]; descriptors of 48 bytes from
    // byte 8, offsets below address the first phy descriptor.
    fld("GENC", 0x19, 1, ANY, 6, 7, 8, NF, "Generation code"),
    fld("NOP", 0x19, 1, ANY, 7, 7, 8, CM, "Number of phys"),
    fld("PHY_ID", 0x19, 1, ANY, 12, 7, 8, CM, "Phy identifier"),
    fld("ADT", 0x19, 1, ANY, 16, 6, 3, NF, "Attached device type"),
    fld("AREAS", 0x19, 1, ANY, 16, 3, 4, NF, "Attached reason (other end did link reset)"),
    fld("REAS", 0x19, 1, ANY, 17, 7, 4, NF, "Reason (for starting phy link reset)"),
    fld("NPLR", 0x19, 1, ANY, 17, 3, 4, NF, "Negotiated physical link rate"),
    fld("ASIP", 0x19, 1, ANY, 18, 3, 1, NF, "Attached SSP initiator port"),
    fld("ATIP", 0x19, 1, ANY, 18, 2, 1, NF, "Attached STP initiator port"),
    fld("AMIP", 0x19, 1, ANY, 18, 1, 1, NF, "Attached SMP initiator port"),
    fld("ASTP", 0x19, 1, ANY, 19, 3, 1, NF, "Attached SSP target port"),
    fld("ATTP", 0x19, 1, ANY, 19, 2, 1, NF, "Attached STP target port"),
    fld("AMTP", 0x19, 1, ANY, 19, 1, 1, NF, "Attached SMP target port"),
    fld("SAS_ADDR", 0x19, 1, ANY, 20, 7, 64, CM_HX, "SAS address"),
    fld("ATT_SAS_ADDR", 0x19, 1, ANY, 28, 7, 64, CM_HX, "Attached SAS address"),
    fld("ATT_PHY_ID", 0x19, 1, ANY, 36, 7, 8, NF, "Attached phy identifier"),
    fld("PMILR", 0x19, 1, ANY, 44, 7, 4, NF, "Programmed minimum link rate"),
    fld("HMILR", 0x19, 1, ANY, 44, 3, 4, NF, "Hardware minimum link rate"),
    fld("PMALR", 0x19, 1, ANY, 45, 7, 4, NF, "Programmed maximum link rate"),
    fld("HMALR", 0x19, 1, ANY, 45, 3, 4, NF, "Hardware maximum link rate"),
    // Shared port control [0x19,0x02]
    fld("PLT", 0x19, 2, ANY, 6, 7, 16, NF, "Power loss timeout (ms)"),
    // Enhanced phy control [0x19,0x03]; 20-byte descriptors from byte 8.
    fld("EPHY_ID", 0x19, 3, ANY, 9, 7, 8, NF, "Phy identifier"),
    fld("PPTV", 0x19, 3, ANY, 10, 3, 4, NF, "Programmed phy test pattern"),
];

/// FCP overlay.
static FCP_MPAGE_NAMES: &[ModePageName] = &[
    mpn(0x18, 0x00, ANY, "pl", "Protocol specific logical unit (FC)"),
    mpn(0x19, 0x00, ANY, "pp", "Protocol specific port (FC)"),
];

static FCP_FIELDS: &[FieldDescriptor] = &[
    fld("LUPID", 0x18, 0, ANY, 2, 3, 4, HX, "Logical unit's (transport) protocol identifier"),
    fld("EPDC", 0x18, 0, ANY, 3, 0, 1, CM, "Enable precise delivery checking"),
    fld("PPID", 0x19, 0, ANY, 2, 3, 4, HX, "Port's (transport) protocol identifier"),
    fld("DTFD", 0x19, 0, ANY, 3, 7, 1, CM, "Disable target fabric discovery"),
    fld("PLPB", 0x19, 0, ANY, 3, 6, 1, CM, "Prevent loop port bypass"),
    fld("DDIS", 0x19, 0, ANY, 3, 5, 1, NF, "Disable discovery"),
    fld("DLM", 0x19, 0, ANY, 3, 4, 1, NF, "Disable loop master"),
    fld("RHA", 0x19, 0, ANY, 3, 3, 1, NF, "Require hard address"),
    fld("ALWI", 0x19, 0, ANY, 3, 2, 1, NF, "Allow login without loop initialization"),
    fld("DTIPE", 0x19, 0, ANY, 3, 1, 1, NF, "Disable target initiated port enable"),
    fld("DTOLI", 0x19, 0, ANY, 3, 0, 1, NF, "Disable target originated loop initialization"),
    fld("RR_TOV", 0x19, 0, ANY, 7, 7, 8, NF, "Resource recovery timeout value"),
];

/// Field table of a transport namespace (empty when nothing is defined).
pub fn fields(t: TransportId) -> &'static [FieldDescriptor] {
    match t {
        TransportId::Sas => SAS_FIELDS,
        TransportId::Fcp => FCP_FIELDS,
        _ => &[],
    }
}

/// Mode-page names of a transport namespace.
pub fn mpage_names(t: TransportId) -> &'static [ModePageName] {
    match t {
        TransportId::Sas => SAS_MPAGE_NAMES,
        TransportId::Fcp => FCP_MPAGE_NAMES,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_id_round_trip() {
        for id in 0..=0xfu8 {
            if let Some(t) = TransportId::from_protocol_id(id) {
                assert_eq!(t as u8, id);
            }
        }
        assert!(TransportId::from_protocol_id(0xc).is_none());
    }

    #[test]
    fn parse_names_and_numbers() {
        assert_eq!(TransportId::parse("sas").expect("WTF"), TransportId::Sas);
        assert_eq!(TransportId::parse("6").expect("WTF"), TransportId::Sas);
        assert_eq!(TransportId::parse("0x0").expect("WTF"), TransportId::Fcp);
        assert!(TransportId::parse("16").is_err());
        assert!(TransportId::parse("nvme").is_err());
    }
}
