// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! MODE SENSE (6 / 10) — CDB fillers that write into a provided 16-byte buffer.

pub const MODE_SENSE_6: u8 = 0x1A;
pub const MODE_SENSE_10: u8 = 0x5A;

/// Page code requesting every page (with subpage 0xff: every subpage too).
pub const ALL_MPAGES: u8 = 0x3F;
pub const ALL_SUBPAGES: u8 = 0xFF;

bitflags::bitflags! {
    /// MODE SENSE CDB byte 1 control bits.
    ///
    /// LLBAA only exists in the 10-byte form; the 6-byte filler masks it
    /// out.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct ModeSenseFlags: u8 {
        /// Long LBA accepted (10-byte only).
        const LLBAA = 0x10;
        /// Disable block descriptors.
        const DBD = 0x08;
    }
}

/// Page Control (PC) for MODE SENSE byte 2 (bits 7..6).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum PageControl {
    Current = 0b00,
    Changeable = 0b01,
    Default = 0b10,
    Saved = 0b11,
}

impl PageControl {
    pub fn label(self) -> &'static str {
        match self {
            PageControl::Current => "current",
            PageControl::Changeable => "changeable",
            PageControl::Default => "default",
            PageControl::Saved => "saved",
        }
    }
}

#[inline]
fn pc_bits(pc: PageControl) -> u8 {
    (pc as u8) << 6
}

/// Fill a MODE SENSE(6) CDB into `cdb[0..6]`.
/// Layout:
///   [0]=0x1A, [1]=DBD, [2]=PC(7..6)|PAGE(5..0), [3]=SUBPAGE, [4]=ALLOC_LEN,
///   [5]=CONTROL
#[inline]
pub fn fill_mode_sense6(
    cdb: &mut [u8; 16],
    flags: ModeSenseFlags,
    pc: PageControl,
    page_code: u8,
    subpage_code: u8,
    allocation_len: u8,
) {
    cdb.fill(0);
    cdb[0] = MODE_SENSE_6;
    cdb[1] = (flags & ModeSenseFlags::DBD).bits();
    cdb[2] = pc_bits(pc) | (page_code & 0x3F);
    cdb[3] = subpage_code;
    cdb[4] = allocation_len;
}

/// Fill a MODE SENSE(10) CDB into `cdb[0..10]`.
/// Layout:
///   [0]=0x5A, [1]=LLBAA|DBD, [2]=PC(7..6)|PAGE(5..0), [3]=SUBPAGE,
///   [4..6]=0, [7..8]=ALLOC_LEN(be), [9]=CONTROL
#[inline]
pub fn fill_mode_sense10(
    cdb: &mut [u8; 16],
    flags: ModeSenseFlags,
    pc: PageControl,
    page_code: u8,
    subpage_code: u8,
    allocation_len: u16,
) {
    cdb.fill(0);
    cdb[0] = MODE_SENSE_10;
    cdb[1] = flags.bits();
    cdb[2] = pc_bits(pc) | (page_code & 0x3F);
    cdb[3] = subpage_code;
    let [msb, lsb] = allocation_len.to_be_bytes();
    cdb[7] = msb;
    cdb[8] = lsb;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sense10_layout() {
        let mut cdb = [0xaau8; 16];
        fill_mode_sense10(
            &mut cdb,
            ModeSenseFlags::DBD,
            PageControl::Default,
            0x08,
            0,
            512,
        );
        assert_eq!(
            &cdb[..10],
            &[0x5A, 0x08, 0x88, 0x00, 0, 0, 0, 0x02, 0x00, 0]
        );
        assert_eq!(&cdb[10..], &[0u8; 6]);

        fill_mode_sense10(
            &mut cdb,
            ModeSenseFlags::LLBAA | ModeSenseFlags::DBD,
            PageControl::Current,
            0x08,
            0,
            512,
        );
        assert_eq!(cdb[1], 0x18);
    }

    #[test]
    fn sense6_page_control() {
        let mut cdb = [0u8; 16];
        fill_mode_sense6(
            &mut cdb,
            ModeSenseFlags::empty(),
            PageControl::Saved,
            0x3F,
            0xFF,
            252,
        );
        assert_eq!(&cdb[..6], &[0x1A, 0x00, 0xFF, 0xFF, 252, 0]);
    }

    #[test]
    fn sense6_masks_llbaa() {
        let mut cdb = [0u8; 16];
        fill_mode_sense6(
            &mut cdb,
            ModeSenseFlags::LLBAA | ModeSenseFlags::DBD,
            PageControl::Current,
            0x08,
            0,
            252,
        );
        assert_eq!(cdb[1], 0x08, "LLBAA has no home in the 6-byte CDB");
    }
}
