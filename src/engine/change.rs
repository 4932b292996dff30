// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Write paths: `--set`/`--clear` read-modify-write, per-page restore
//! defaults, and the global revert-to-defaults.

use tracing::{debug, warn};

use crate::{
    catalog,
    control_block::{
        header::{ModeHeader, PageHeader, clear_ps, prepare_select_header},
        mode_sense::PageControl,
    },
    engine::{
        ModeOpts,
        descriptors::{enumerate_descriptors, field_offset_for_instance},
        error::SdparmError,
        pageio::PageIo,
    },
    pages::{MAX_MODE_DATA_LEN, codec},
    render::Renderer,
    select::FieldRequest,
    utils::hex_dump,
};

/// The MMC power-condition alias: old drives answer page 0x1a when the
/// obsolete 0x0d code is asked for.
fn page_code_aliased(requested: u8, got: u8) -> bool {
    requested == got || (requested == 0x0d && got == 0x1a)
}

struct FetchedPage {
    /// Full response: header, block descriptors, page.
    buf: Vec<u8>,
    page_off: usize,
    page_len: usize,
}

fn fetch_full_page(
    io: &mut PageIo<'_>,
    page: u8,
    subpage: u8,
    pc: PageControl,
    flexible: bool,
    probe_len: bool,
) -> Result<FetchedPage, SdparmError> {
    let long = !io.opts.six_byte;
    let buf = if probe_len {
        // A short probe for the mode data length, then the full fetch.
        let probe = io.mode_sense(pc, page, subpage, Some(8))?;
        let probe_hdr = ModeHeader::parse(&probe, long)
            .map_err(|e| SdparmError::Malformed(e.to_string()))?;
        let total = probe_hdr.total_len();
        if total > MAX_MODE_DATA_LEN {
            return Err(SdparmError::Malformed(format!(
                "mode data length {total} above the {MAX_MODE_DATA_LEN} limit"
            )));
        }
        io.mode_sense(pc, page, subpage, Some(total.max(8)))?
    } else {
        io.mode_sense(pc, page, subpage, None)?
    };
    let hdr =
        ModeHeader::parse(&buf, long).map_err(|e| SdparmError::Malformed(e.to_string()))?;
    let page_off = hdr.page_offset();
    if page_off + 2 > buf.len() {
        return Err(SdparmError::Malformed(format!(
            "response of {} bytes holds no page at offset {page_off}",
            buf.len()
        )));
    }
    let ph = PageHeader::parse(&buf[page_off..])
        .map_err(|e| SdparmError::Malformed(e.to_string()))?;
    if !page_code_aliased(page, ph.page_code) {
        let msg = format!(
            "device answered page 0x{:02x} to a request for 0x{page:02x}",
            ph.page_code
        );
        if flexible {
            warn!("{msg}");
        } else {
            return Err(SdparmError::Malformed(msg));
        }
    }
    let page_len = ph.full_len.min(buf.len() - page_off);
    Ok(FetchedPage {
        buf,
        page_off,
        page_len,
    })
}

/// Apply `--set=`/`--clear=` requests: one MODE SENSE read-modify cycle
/// and one MODE SELECT per invocation, all requests landing in one page.
pub fn change_fields(
    rend: &mut Renderer,
    opts: &ModeOpts,
    io: &mut PageIo<'_>,
    reqs: &[FieldRequest],
) -> Result<(), SdparmError> {
    let Some(first) = reqs.first() else {
        return Err(SdparmError::Syntax("nothing to change".into()));
    };
    let (page, subpage) = (first.desc.page_code, first.desc.subpage_code);

    let mut fetched =
        fetch_full_page(io, page, subpage, PageControl::Current, opts.flexible, true)?;
    let ph = PageHeader::parse(&fetched.buf[fetched.page_off..])
        .map_err(|e| SdparmError::Malformed(e.to_string()))?;
    if opts.save && !ph.ps {
        return Err(SdparmError::Malformed(format!(
            "page 0x{page:02x} reports it is not saveable (PS=0), refusing --save"
        )));
    }

    // Changeable mask, best effort: used only to warn about read-only bits.
    let changeable = io
        .mode_sense(PageControl::Changeable, page, subpage, Some(fetched.buf.len().max(8)))
        .ok();

    let long = !io.opts.six_byte;
    let pdt_decayed = catalog::decay_pdt(opts.pdt);
    prepare_select_header(&mut fetched.buf, long, pdt_decayed as u8);
    clear_ps(&mut fetched.buf[fetched.page_off..]);

    let name = catalog::find_mpage_name(page, subpage, opts.pdt, opts.transport, opts.vendor);
    let layout = name.and_then(|n| n.layout.as_ref());
    for req in reqs {
        let f = &req.desc;
        let page_bytes = &fetched.buf[fetched.page_off..];
        let offset_in_page = if req.desc_index > 0 {
            let Some(l) = layout else {
                return Err(SdparmError::NotFound(format!(
                    "field '{}' indexed with .{} but page 0x{page:02x} has no descriptors",
                    f.acronym, req.desc_index
                )));
            };
            let region = enumerate_descriptors(l, page_bytes)?;
            field_offset_for_instance(l, &region, f, req.desc_index)?
        } else {
            f.start_byte as usize
        };
        if offset_in_page >= fetched.page_len {
            let msg = format!(
                "field '{}' at byte {offset_in_page} outside {} byte page",
                f.acronym, fetched.page_len
            );
            if opts.flexible {
                warn!("{msg} (flexible: writing anyway)");
            } else {
                return Err(SdparmError::Malformed(msg));
            }
        }

        let value = req.value as u64;
        let mask = codec::all_ones(f.num_bits);
        if req.value >= 0 && value & !mask != 0 {
            warn!(
                "value 0x{value:x} wider than the {} bit field '{}', truncating",
                f.num_bits, f.acronym
            );
        }

        if let Some(cha) = &changeable {
            let cha_off = fetched.page_off + offset_in_page;
            if cha_off < cha.len()
                && let Ok(cha_mask) =
                    codec::get(&cha[fetched.page_off..], offset_in_page, f.start_bit, f.num_bits)
                && cha_mask == 0
                && (value & mask) != 0
            {
                warn!("field '{}' reports as not changeable", f.acronym);
            }
        }

        let abs = fetched.page_off + offset_in_page;
        debug!(
            field = f.acronym,
            offset = abs,
            value = value & mask,
            "applying field write"
        );
        codec::set(
            &mut fetched.buf[fetched.page_off..],
            offset_in_page,
            f.start_bit,
            f.num_bits,
            value,
        )
        .map_err(|e| SdparmError::Malformed(e.to_string()))?;
    }

    let payload_len = fetched.page_off + fetched.page_len;
    let payload = &fetched.buf[..payload_len.min(fetched.buf.len())];
    if opts.dummy {
        rend.hr("MODE SELECT payload (dummy, not sent):".to_string());
        rend.hr(hex_dump(payload));
        rend.kv_hex_bytes("mode_select_payload", payload);
        return Ok(());
    }
    io.mode_select(payload, opts.save)
}

/// `--defaults` with a page: fetch the default page control and write it
/// back as current (and saved when `--save`).
pub fn restore_page_defaults(
    rend: &mut Renderer,
    opts: &ModeOpts,
    io: &mut PageIo<'_>,
    page: u8,
    subpage: u8,
) -> Result<(), SdparmError> {
    let mut fetched =
        fetch_full_page(io, page, subpage, PageControl::Default, opts.flexible, false)?;
    let long = !io.opts.six_byte;
    prepare_select_header(&mut fetched.buf, long, catalog::decay_pdt(opts.pdt) as u8);
    clear_ps(&mut fetched.buf[fetched.page_off..]);
    let payload_len = (fetched.page_off + fetched.page_len).min(fetched.buf.len());
    let payload = &fetched.buf[..payload_len];
    if opts.dummy {
        rend.hr("MODE SELECT payload (dummy, not sent):".to_string());
        rend.hr(hex_dump(payload));
        rend.kv_hex_bytes("mode_select_payload", payload);
        return Ok(());
    }
    io.mode_select(payload, opts.save)
}

/// `--defaults` without a page: MODE SELECT(10) with the RTD bit.
pub fn restore_all_defaults(
    rend: &mut Renderer,
    opts: &ModeOpts,
    io: &mut PageIo<'_>,
) -> Result<(), SdparmError> {
    if io.opts.six_byte {
        return Err(SdparmError::Contradict(
            "global revert-to-defaults needs the 10 byte MODE SELECT (drop -6)".into(),
        ));
    }
    if opts.dummy {
        rend.hr("MODE SELECT(10) with RTD=1 (dummy, not sent)".to_string());
        return Ok(());
    }
    io.mode_select_rtd()
}
