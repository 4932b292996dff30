// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! MODE SENSE / MODE SELECT / INQUIRY against a device handle: CDB
//! variant policy, page-control probing, the all-subpages and LLBAA
//! fallbacks, residual handling, and outcome counters.

use tracing::{debug, warn};

use crate::{
    control_block::{
        inquiry::{InquiryStandard, VPD_INITIAL_ALLOC, fill_inquiry_standard, fill_inquiry_vpd, vpd_declared_len},
        mode_select::{ModeSelectFlags, fill_mode_select6, fill_mode_select10},
        mode_sense::{
            ALL_MPAGES, ALL_SUBPAGES, ModeSenseFlags, PageControl, fill_mode_sense6,
            fill_mode_sense10,
        },
    },
    engine::error::SdparmError,
    pages::PageControlSet,
    transport::{CmdCategory, ScsiDevice, ScsiError},
};

/// Shortest valid MODE SENSE response.
const MIN_MODE_RESP: usize = 4;
/// Allocation for a 6-byte MODE SENSE (length field is one byte).
const MSENSE6_ALLOC: usize = 252;
/// Allocation for a 10-byte MODE SENSE of one page.
const MSENSE10_ALLOC: usize = 4096;
/// Allocation for the all-pages fetch (10-byte only).
const ALL_PAGES_ALLOC: usize = 0x8000;

/// Per-CDB-variant outcome counters, observable after a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VariantCounters {
    pub good: u32,
    pub illegal_req: u32,
    pub pc_not_sup: u32,
    pub invalid_op: u32,
    pub other: u32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IoCounters {
    pub msense6: VariantCounters,
    pub msense10: VariantCounters,
    pub mselect6: VariantCounters,
    pub mselect10: VariantCounters,
}

/// Behavioural knobs handed down from the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageIoOpts {
    /// Use MODE SENSE(6)/MODE SELECT(6) instead of the 10-byte forms.
    pub six_byte: bool,
    /// Disable block descriptors in MODE SENSE.
    pub dbd: bool,
    /// Set LLBAA in MODE SENSE(10).
    pub llbaa: bool,
    /// SPC major version the device reports (gates the all-subpages form).
    pub spc_version: u8,
}

pub struct PageIo<'a> {
    dev: &'a mut dyn ScsiDevice,
    pub opts: PageIoOpts,
    counters: IoCounters,
}

fn map_scsi_err(err: ScsiError, six_byte: bool) -> SdparmError {
    match err {
        ScsiError::Sense(s) => match s.category() {
            CmdCategory::InvalidOpcode => SdparmError::InvalidOp { six_byte },
            CmdCategory::IllegalRequest => SdparmError::IllegalRequest(s),
            CmdCategory::NotReady => SdparmError::NotReady(s),
            CmdCategory::UnitAttention => SdparmError::UnitAttention(s),
            CmdCategory::AbortedCommand => SdparmError::AbortedCommand(s),
            _ => SdparmError::Transport(s.to_string()),
        },
        ScsiError::Io(e) => SdparmError::Transport(e.to_string()),
        ScsiError::Other(msg) => SdparmError::Transport(msg),
    }
}

impl<'a> PageIo<'a> {
    pub fn new(dev: &'a mut dyn ScsiDevice, opts: PageIoOpts) -> Self {
        PageIo {
            dev,
            opts,
            counters: IoCounters::default(),
        }
    }

    pub fn counters(&self) -> &IoCounters {
        &self.counters
    }

    pub fn designation(&self) -> String {
        self.dev.designation().to_string()
    }

    fn count_sense(&mut self, six: bool, res: &Result<usize, ScsiError>) {
        let c = if six {
            &mut self.counters.msense6
        } else {
            &mut self.counters.msense10
        };
        match res {
            Ok(_) => c.good += 1,
            Err(err) => match err {
                ScsiError::Sense(s) => match s.category() {
                    CmdCategory::IllegalRequest => c.illegal_req += 1,
                    CmdCategory::InvalidOpcode => c.invalid_op += 1,
                    _ => c.other += 1,
                },
                _ => c.other += 1,
            },
        }
    }

    fn mode_sense_once(
        &mut self,
        pc: PageControl,
        page: u8,
        subpage: u8,
        llbaa: bool,
        six: bool,
        alloc: usize,
    ) -> Result<Vec<u8>, ScsiError> {
        let mut cdb = [0u8; 16];
        let mut flags = ModeSenseFlags::empty();
        flags.set(ModeSenseFlags::DBD, self.opts.dbd);
        flags.set(ModeSenseFlags::LLBAA, llbaa);
        let (cdb_len, mut buf) = if six {
            fill_mode_sense6(&mut cdb, flags, pc, page, subpage, alloc.min(252) as u8);
            (6, vec![0u8; alloc.min(252)])
        } else {
            fill_mode_sense10(&mut cdb, flags, pc, page, subpage, alloc.min(0xffff) as u16);
            (10, vec![0u8; alloc.min(0xffff)])
        };
        let res = self.dev.data_in(&cdb[..cdb_len], &mut buf);
        self.count_sense(six, &res);
        let got = res?;
        buf.truncate(got);
        Ok(buf)
    }

    /// MODE SENSE of one page for one page control, with the LLBAA
    /// fallback applied. Short responses (< 4 bytes) are malformed.
    pub fn mode_sense(
        &mut self,
        pc: PageControl,
        page: u8,
        subpage: u8,
        alloc: Option<usize>,
    ) -> Result<Vec<u8>, SdparmError> {
        let six = self.opts.six_byte;
        let alloc = alloc.unwrap_or(if six { MSENSE6_ALLOC } else { MSENSE10_ALLOC });
        let mut llbaa = self.opts.llbaa && !six;
        let buf = loop {
            match self.mode_sense_once(pc, page, subpage, llbaa, six, alloc) {
                Ok(buf) => break buf,
                Err(ScsiError::Sense(s))
                    if llbaa && s.category() == CmdCategory::IllegalRequest =>
                {
                    debug!("MODE SENSE(10) with LLBAA rejected, retrying without");
                    llbaa = false;
                },
                Err(err) => {
                    let mapped = map_scsi_err(err, six);
                    debug!("MODE SENSE({}) failed: {mapped}", if six { 6 } else { 10 });
                    return Err(mapped);
                },
            }
        };
        if buf.len() < MIN_MODE_RESP {
            return Err(SdparmError::Malformed(format!(
                "MODE SENSE response only {} bytes",
                buf.len()
            )));
        }
        Ok(buf)
    }

    /// Issue up to four MODE SENSE requests, one per page control, and
    /// record which succeeded. Illegal-request on a probe only fails the
    /// whole call when no control returned data.
    pub fn mode_sense_all_pc(
        &mut self,
        page: u8,
        subpage: u8,
    ) -> Result<PageControlSet, SdparmError> {
        let mut set = PageControlSet::new();
        let mut first_err: Option<SdparmError> = None;
        let mut probe_illegal = 0u32;
        for pc in PageControlSet::ALL {
            match self.mode_sense(pc, page, subpage, None) {
                Ok(buf) => set.put(pc, buf),
                Err(err @ SdparmError::IllegalRequest(_)) => {
                    probe_illegal += 1;
                    if first_err.is_none() {
                        first_err = Some(err);
                    }
                },
                Err(err) => return Err(err),
            }
        }
        if set.mask() == 0 {
            return Err(first_err.unwrap_or_else(|| {
                SdparmError::Transport("no page control returned data".into())
            }));
        }
        // Partial success: reclassify the probe failures.
        if probe_illegal > 0 {
            let c = if self.opts.six_byte {
                &mut self.counters.msense6
            } else {
                &mut self.counters.msense10
            };
            c.illegal_req -= probe_illegal;
            c.pc_not_sup += probe_illegal;
            debug!(
                mask = set.mask(),
                "page 0x{page:02x},0x{subpage:02x}: {probe_illegal} page control(s) not supported"
            );
        }
        Ok(set)
    }

    /// Fetch every page (and, SPC-3 onwards, every subpage) for one page
    /// control. Always uses the 10-byte form; falls back from
    /// subpage=0xff to subpage=0 on illegal request.
    pub fn fetch_all_pages(&mut self, pc: PageControl) -> Result<Vec<u8>, SdparmError> {
        let want_subpages = self.opts.spc_version >= 3;
        if want_subpages {
            match self.mode_sense_once(pc, ALL_MPAGES, ALL_SUBPAGES, false, false, ALL_PAGES_ALLOC)
            {
                Ok(buf) if buf.len() >= MIN_MODE_RESP => return Ok(buf),
                Ok(buf) => {
                    return Err(SdparmError::Malformed(format!(
                        "MODE SENSE response only {} bytes",
                        buf.len()
                    )));
                },
                Err(ScsiError::Sense(s)) if s.category() == CmdCategory::IllegalRequest => {
                    debug!("all-subpages form rejected, retrying with subpage 0");
                },
                Err(err) => return Err(map_scsi_err(err, false)),
            }
        }
        let buf = self
            .mode_sense_once(pc, ALL_MPAGES, 0, false, false, ALL_PAGES_ALLOC)
            .map_err(|e| map_scsi_err(e, false))?;
        if buf.len() < MIN_MODE_RESP {
            return Err(SdparmError::Malformed(format!(
                "MODE SENSE response only {} bytes",
                buf.len()
            )));
        }
        Ok(buf)
    }

    fn count_select(&mut self, six: bool, ok: bool, err: Option<&ScsiError>) {
        let c = if six {
            &mut self.counters.mselect6
        } else {
            &mut self.counters.mselect10
        };
        if ok {
            c.good += 1;
        } else {
            match err {
                Some(ScsiError::Sense(s)) => match s.category() {
                    CmdCategory::IllegalRequest => c.illegal_req += 1,
                    CmdCategory::InvalidOpcode => c.invalid_op += 1,
                    _ => c.other += 1,
                },
                _ => c.other += 1,
            }
        }
    }

    /// MODE SELECT with PF=1 and the caller's save bit. The payload must
    /// already have its header prepared (lengths zeroed, PS cleared).
    pub fn mode_select(&mut self, payload: &[u8], save: bool) -> Result<(), SdparmError> {
        let six = self.opts.six_byte;
        let mut cdb = [0u8; 16];
        let mut flags = ModeSelectFlags::PF;
        flags.set(ModeSelectFlags::SP, save);
        let cdb_len = if six {
            if payload.len() > u8::MAX as usize {
                return Err(SdparmError::Malformed(format!(
                    "parameter list of {} bytes does not fit MODE SELECT(6)",
                    payload.len()
                )));
            }
            fill_mode_select6(&mut cdb, flags, payload.len() as u8);
            6
        } else {
            fill_mode_select10(&mut cdb, flags, payload.len() as u16);
            10
        };
        let res = self.dev.data_out(&cdb[..cdb_len], payload);
        self.count_select(six, res.is_ok(), res.as_ref().err());
        res.map_err(|e| {
            let mapped = map_scsi_err(e, six);
            warn!("MODE SELECT({}) failed: {mapped}", if six { 6 } else { 10 });
            mapped
        })
    }

    /// Global revert-to-defaults: MODE SELECT(10) with RTD=1 and an empty
    /// parameter list. There is no 6-byte equivalent.
    pub fn mode_select_rtd(&mut self) -> Result<(), SdparmError> {
        let mut cdb = [0u8; 16];
        fill_mode_select10(&mut cdb, ModeSelectFlags::RTD, 0);
        let res = self.dev.data_out(&cdb[..10], &[]);
        self.count_select(false, res.is_ok(), res.as_ref().err());
        res.map_err(|e| map_scsi_err(e, false))
    }

    /// INQUIRY for one VPD page, growing the allocation and retrying when
    /// the declared page length exceeds the first transfer.
    pub fn inquiry_vpd(&mut self, page: u8) -> Result<Vec<u8>, SdparmError> {
        let mut alloc = VPD_INITIAL_ALLOC as usize;
        loop {
            let mut cdb = [0u8; 16];
            fill_inquiry_vpd(&mut cdb, page, alloc as u16);
            let mut buf = vec![0u8; alloc];
            let got = self
                .dev
                .data_in(&cdb[..6], &mut buf)
                .map_err(|e| map_scsi_err(e, true))?;
            buf.truncate(got);
            let declared = vpd_declared_len(&buf)
                .map_err(|e| SdparmError::Malformed(e.to_string()))?;
            if declared > got && declared <= 0xffff && declared > alloc {
                debug!(page, declared, got, "VPD page longer than allocation, re-fetching");
                alloc = declared;
                continue;
            }
            if buf[1] != page {
                return Err(SdparmError::Malformed(format!(
                    "VPD response page 0x{:02x} does not match requested 0x{page:02x}",
                    buf[1]
                )));
            }
            return Ok(buf);
        }
    }

    /// Standard INQUIRY (EVPD=0).
    pub fn std_inquiry(&mut self) -> Result<InquiryStandard, SdparmError> {
        let mut cdb = [0u8; 16];
        fill_inquiry_standard(&mut cdb, 252);
        let mut buf = vec![0u8; 252];
        let got = self
            .dev
            .data_in(&cdb[..6], &mut buf)
            .map_err(|e| map_scsi_err(e, true))?;
        buf.truncate(got);
        InquiryStandard::parse(&buf).map_err(|e| SdparmError::Malformed(e.to_string()))
    }
}

impl std::fmt::Debug for PageIo<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageIo")
            .field("designation", &self.dev.designation())
            .field("opts", &self.opts)
            .field("counters", &self.counters)
            .finish()
    }
}

/// Log the counter totals at debug level; the driver calls this in the
/// per-device epilogue.
pub fn log_counters(counters: &IoCounters) {
    let t = |v: &VariantCounters| (v.good, v.illegal_req, v.pc_not_sup, v.invalid_op, v.other);
    debug!(
        msense6 = ?t(&counters.msense6),
        msense10 = ?t(&counters.msense10),
        mselect6 = ?t(&counters.mselect6),
        mselect10 = ?t(&counters.mselect10),
        "command outcome counters (good/illegal/pc_not_sup/invalid_op/other)"
    );
}

// The interesting behaviours (LLBAA fallback, subpage fallback, counter
// bookkeeping) are exercised with scripted fake devices in
// tests/unit_tests/test_pageio.rs.
