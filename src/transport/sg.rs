// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! SG_IO pass-through for Linux SCSI device nodes (/dev/sg*, /dev/sd*,
//! /dev/st* and friends all accept the ioctl on current kernels).

use std::{
    fs::{File, OpenOptions},
    os::fd::AsRawFd,
    path::Path,
};

use tracing::debug;

use crate::transport::{ScsiDevice, ScsiError, sense::SenseData};

const SG_IO: libc::c_ulong = 0x2285;
const SG_INTERFACE_ID: libc::c_int = 'S' as libc::c_int;
const SG_DXFER_NONE: libc::c_int = -1;
const SG_DXFER_TO_DEV: libc::c_int = -2;
const SG_DXFER_FROM_DEV: libc::c_int = -3;

const SAM_STAT_CHECK_CONDITION: u8 = 0x02;
const DEFAULT_TIMEOUT_MS: u32 = 60_000;
const MAX_SENSE_LEN: usize = 64;

#[repr(C)]
struct SgIoHdr {
    interface_id: libc::c_int,
    dxfer_direction: libc::c_int,
    cmd_len: libc::c_uchar,
    mx_sb_len: libc::c_uchar,
    iovec_count: libc::c_ushort,
    dxfer_len: libc::c_uint,
    dxferp: *mut libc::c_void,
    cmdp: *const libc::c_uchar,
    sbp: *mut libc::c_uchar,
    timeout: libc::c_uint,
    flags: libc::c_uint,
    pack_id: libc::c_int,
    usr_ptr: *mut libc::c_void,
    status: libc::c_uchar,
    masked_status: libc::c_uchar,
    msg_status: libc::c_uchar,
    sb_len_wr: libc::c_uchar,
    host_status: libc::c_ushort,
    driver_status: libc::c_ushort,
    resid: libc::c_int,
    duration: libc::c_uint,
    info: libc::c_uint,
}

/// An open SCSI device node driven through the SG_IO ioctl.
pub struct SgDevice {
    file: File,
    designation: String,
}

impl SgDevice {
    /// Open a device node. With `readonly` the descriptor is opened
    /// O_RDONLY; SG_IO still works but the caller refuses write commands
    /// earlier, at the option level.
    pub fn open(path: &Path, readonly: bool) -> Result<Self, ScsiError> {
        use std::os::unix::fs::OpenOptionsExt;

        let file = OpenOptions::new()
            .read(true)
            .write(!readonly)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)?;
        Ok(SgDevice {
            file,
            designation: path.display().to_string(),
        })
    }

    fn run(
        &mut self,
        cdb: &[u8],
        direction: libc::c_int,
        data: *mut libc::c_void,
        data_len: usize,
    ) -> Result<usize, ScsiError> {
        let mut sense_buf = [0u8; MAX_SENSE_LEN];
        let mut hdr = SgIoHdr {
            interface_id: SG_INTERFACE_ID,
            dxfer_direction: direction,
            cmd_len: cdb.len() as libc::c_uchar,
            mx_sb_len: MAX_SENSE_LEN as libc::c_uchar,
            iovec_count: 0,
            dxfer_len: data_len as libc::c_uint,
            dxferp: data,
            cmdp: cdb.as_ptr(),
            sbp: sense_buf.as_mut_ptr(),
            timeout: DEFAULT_TIMEOUT_MS,
            flags: 0,
            pack_id: 0,
            usr_ptr: std::ptr::null_mut(),
            status: 0,
            masked_status: 0,
            msg_status: 0,
            sb_len_wr: 0,
            host_status: 0,
            driver_status: 0,
            resid: 0,
            duration: 0,
            info: 0,
        };

        let res = unsafe { libc::ioctl(self.file.as_raw_fd(), SG_IO, &mut hdr) };
        if res < 0 {
            return Err(ScsiError::Io(std::io::Error::last_os_error()));
        }

        if hdr.status == SAM_STAT_CHECK_CONDITION {
            let sense = SenseData::parse(&sense_buf[..hdr.sb_len_wr as usize])
                .map_err(|err| ScsiError::Other(format!("unparseable sense: {err}")))?;
            debug!(cdb0 = format_args!("0x{:02x}", cdb[0]), %sense, "check condition");
            return Err(ScsiError::Sense(sense));
        }
        if hdr.status != 0 || hdr.host_status != 0 || hdr.driver_status != 0 {
            return Err(ScsiError::Other(format!(
                "SG_IO bad status: sam=0x{:02x} host=0x{:04x} driver=0x{:04x}",
                hdr.status, hdr.host_status, hdr.driver_status
            )));
        }

        let resid = hdr.resid.max(0) as usize;
        Ok(data_len.saturating_sub(resid))
    }
}

impl ScsiDevice for SgDevice {
    fn data_in(&mut self, cdb: &[u8], buf: &mut [u8]) -> Result<usize, ScsiError> {
        self.run(
            cdb,
            SG_DXFER_FROM_DEV,
            buf.as_mut_ptr() as *mut libc::c_void,
            buf.len(),
        )
    }

    fn data_out(&mut self, cdb: &[u8], data: &[u8]) -> Result<(), ScsiError> {
        // SG_IO does not write through a const pointer on the out path,
        // but the interface takes *mut.
        let (dir, ptr, len) = if data.is_empty() {
            (SG_DXFER_NONE, std::ptr::null_mut(), 0)
        } else {
            (
                SG_DXFER_TO_DEV,
                data.as_ptr() as *mut libc::c_void,
                data.len(),
            )
        };
        self.run(cdb, dir, ptr, len).map(|_| ())
    }

    fn designation(&self) -> &str {
        &self.designation
    }
}
