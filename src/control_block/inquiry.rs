// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! INQUIRY (6) — CDB fillers plus the standard-response and VPD-header
//! parsers.
//!
//! CDB layout (SPC):
//!   [0] = 0x12 (INQUIRY)
//!   [1] = EVPD (bit 0)
//!   [2] = Page Code (only when EVPD=1; else 0)
//!   [3..5] = Allocation Length (be16)
//!   [5] = Control

use anyhow::{Result, bail};

use crate::utils::trim_ascii;

pub const INQUIRY_OPCODE: u8 = 0x12;

/// Initial allocation for a VPD fetch; grown on retry when the page header
/// declares more.
pub const VPD_INITIAL_ALLOC: u16 = 252;

/// Fill a **Standard INQUIRY (EVPD=0)** CDB.
#[inline]
pub fn fill_inquiry_standard(cdb: &mut [u8; 16], allocation_len: u16) {
    cdb.fill(0);
    cdb[0] = INQUIRY_OPCODE;
    let [msb, lsb] = allocation_len.to_be_bytes();
    cdb[3] = msb;
    cdb[4] = lsb;
}

/// Fill a **VPD INQUIRY (EVPD=1)** CDB.
#[inline]
pub fn fill_inquiry_vpd(cdb: &mut [u8; 16], page_code: u8, allocation_len: u16) {
    cdb.fill(0);
    cdb[0] = INQUIRY_OPCODE;
    cdb[1] = 0x01; // EVPD=1
    cdb[2] = page_code;
    let [msb, lsb] = allocation_len.to_be_bytes();
    cdb[3] = msb;
    cdb[4] = lsb;
}

/// Parsed Standard INQUIRY (EVPD=0) response (minimum 36 bytes).
#[derive(Debug, Clone)]
pub struct InquiryStandard {
    pub peripheral_qualifier: u8, // bits 7..5 of byte0
    pub pdt: u8,                  // bits 4..0 of byte0
    pub rmb: bool,                // byte1 bit7
    pub version: u8,              // byte2
    pub response_data_format: u8, // byte3 low nibble
    pub protect: bool,            // byte5 bit0
    pub vendor_id: String,        // bytes 8..16
    pub product_id: String,       // bytes 16..32
    pub product_rev: String,      // bytes 32..36
}

impl InquiryStandard {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < 36 {
            bail!("INQUIRY buffer too short: {}", buf.len());
        }
        Ok(InquiryStandard {
            peripheral_qualifier: (buf[0] >> 5) & 0x07,
            pdt: buf[0] & 0x1F,
            rmb: buf[1] & 0x80 != 0,
            version: buf[2],
            response_data_format: buf[3] & 0x0F,
            protect: buf[5] & 0x01 != 0,
            vendor_id: trim_ascii(&buf[8..16]),
            product_id: trim_ascii(&buf[16..32]),
            product_rev: trim_ascii(&buf[32..36]),
        })
    }

    /// SPC major version claimed in byte 2 (0 if pre-SPC).
    pub fn spc_version(&self) -> u8 {
        match self.version {
            0x03 => 1,
            0x04 => 2,
            0x05 => 3,
            0x06 => 4,
            0x07 => 5,
            _ => 0,
        }
    }
}

/// Generic VPD header view: validates the 4-byte header and returns
/// `(pdt, page_code, payload)` capped at the available bytes.
pub fn vpd_payload(buf: &[u8]) -> Result<(u8, u8, &[u8])> {
    if buf.len() < 4 {
        bail!("VPD buffer too short: {}", buf.len());
    }
    let pdt = buf[0] & 0x1F;
    let page_code = buf[1];
    let len = u16::from_be_bytes([buf[2], buf[3]]) as usize;
    let avail = buf.len() - 4;
    Ok((pdt, page_code, &buf[4..4 + len.min(avail)]))
}

/// Total bytes the device wants to return for this VPD page.
pub fn vpd_declared_len(buf: &[u8]) -> Result<usize> {
    if buf.len() < 4 {
        bail!("VPD buffer too short: {}", buf.len());
    }
    Ok(4 + u16::from_be_bytes([buf[2], buf[3]]) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_std_inquiry_min() {
        let mut b = [0u8; 36];
        b[0] = 0x00; // disk
        b[2] = 0x06; // SPC-4
        b[3] = 0x02;
        b[5] = 0x01; // PROTECT
        b[8..16].copy_from_slice(b"LIO-ORG ");
        b[16..32].copy_from_slice(b"TCMU device     ");
        b[32..36].copy_from_slice(b"0020");
        let s = InquiryStandard::parse(&b).expect("WTF");
        assert_eq!(s.pdt, 0x00);
        assert!(s.protect);
        assert_eq!(s.spc_version(), 4);
        assert_eq!(s.vendor_id, "LIO-ORG");
        assert_eq!(s.product_id, "TCMU device");
        assert_eq!(s.product_rev, "0020");
    }

    #[test]
    fn vpd_header_capping() {
        // Declared length exceeds what was transferred: payload is capped.
        let b = [0x00, 0x80, 0x00, 0x10, b'1', b'2', b'3', b'4'];
        let (pdt, pc, payload) = vpd_payload(&b).expect("WTF");
        assert_eq!(pdt, 0);
        assert_eq!(pc, 0x80);
        assert_eq!(payload, b"1234");
        assert_eq!(vpd_declared_len(&b).expect("WTF"), 20);
    }

    #[test]
    fn vpd_cdb_alloc_len() {
        let mut cdb = [0u8; 16];
        fill_inquiry_vpd(&mut cdb, 0x83, 0x1000);
        assert_eq!(&cdb[..6], &[0x12, 0x01, 0x83, 0x10, 0x00, 0]);
    }
}
