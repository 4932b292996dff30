// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Decoding and rendering of fetched mode pages: field streaming across
//! the four page controls, descriptor tails, and the `--get` paths.

use tracing::warn;

use crate::{
    catalog::{self, FieldDescriptor, FieldFlags},
    control_block::{
        header::{ModeHeader, PageHeader},
        mode_sense::PageControl,
    },
    engine::{
        ModeOpts,
        descriptors::{desc_id_matches, enumerate_descriptors, field_offset_for_instance},
        error::SdparmError,
        pageio::PageIo,
    },
    pages::{MAX_MPAGE_LEN, PageControlSet, codec},
    render::{Renderer, snake},
    select::FieldRequest,
    utils::hex_dump,
};

/// Cut the mode-page bytes out of one full MODE SENSE response.
pub fn page_slice(buf: &[u8], long: bool) -> Result<&[u8], SdparmError> {
    let hdr = ModeHeader::parse(buf, long).map_err(|e| SdparmError::Malformed(e.to_string()))?;
    let off = hdr.page_offset();
    let end = hdr.total_len().min(buf.len());
    if off >= end {
        return Err(SdparmError::Malformed(format!(
            "mode response holds no page bytes (offset {off}, length {end})"
        )));
    }
    Ok(&buf[off..end])
}

/// Slice every available page control of `raw` down to page bytes.
pub fn extract_page_set(raw: &PageControlSet, long: bool) -> Result<PageControlSet, SdparmError> {
    let mut out = PageControlSet::new();
    for pc in raw.available_controls() {
        let buf = raw.get(pc).unwrap_or_default();
        out.put(pc, page_slice(buf, long)?.to_vec());
    }
    Ok(out)
}

/// Walk the concatenated pages of an all-pages response body (page bytes
/// only, header/block descriptors already stripped).
pub fn walk_pages(body: &[u8]) -> Vec<(u8, u8, std::ops::Range<usize>)> {
    let mut out = Vec::new();
    let mut off = 0usize;
    while off + 2 <= body.len() {
        let Ok(ph) = PageHeader::parse(&body[off..]) else {
            break;
        };
        if ph.full_len <= 2 && ph.page_code == 0 {
            break;
        }
        let end = (off + ph.full_len).min(body.len());
        out.push((ph.page_code, ph.subpage_code, off..end));
        if end == body.len() {
            break;
        }
        off = end;
    }
    out
}

fn render_value(f: &FieldDescriptor, v: u64, signed: bool) -> String {
    if signed || f.flags.contains(FieldFlags::TWOS_COMP) {
        return codec::format_signed(v, f.num_bits);
    }
    if f.flags.contains(FieldFlags::ALL_1S) && v == codec::all_ones(f.num_bits) {
        return "-1".to_string();
    }
    if f.flags.contains(FieldFlags::HEX) {
        return format!("0x{v:x}");
    }
    v.to_string()
}

fn json_field_key(f: &FieldDescriptor) -> String {
    if f.flags
        .intersects(FieldFlags::J_USE_DESC | FieldFlags::J_NPARAM_DESC)
    {
        snake(f.description)
    } else {
        f.acronym.to_ascii_lowercase()
    }
}

fn field_in_page(f_off: usize, f: &FieldDescriptor, page_len: usize) -> bool {
    let total = f.start_bit as usize + 1;
    let trailing = (f.num_bits as usize).saturating_sub(total);
    f_off + trailing.div_ceil(8) < page_len
}

/// Emit one field instance across the available page controls.
#[allow(clippy::too_many_arguments)]
fn emit_field(
    rend: &mut Renderer,
    opts: &ModeOpts,
    f: &FieldDescriptor,
    label: &str,
    instance: usize,
    offset: usize,
    set: &PageControlSet,
    signed: bool,
    current_only: bool,
) -> Result<u64, SdparmError> {
    let mut current = 0u64;
    let key = if instance > 0 {
        format!("{}_{instance}", json_field_key(f))
    } else {
        json_field_key(f)
    };
    rend.open_obj(&key);
    if !f.acronym.is_empty() {
        rend.kv_str("acronym", f.acronym);
    }
    if !f.description.is_empty() {
        rend.kv_str("description", f.description);
    }
    let mut parts: Vec<String> = Vec::new();
    for pc in set.available_controls() {
        if current_only && pc != PageControl::Current {
            continue;
        }
        let buf = set.get(pc).unwrap_or_default();
        let v = codec::get(buf, offset, f.start_bit, f.num_bits)
            .map_err(|e| SdparmError::Malformed(e.to_string()))?;
        match pc {
            PageControl::Current => {
                current = v;
                parts.push(render_value(f, v, signed));
            },
            PageControl::Changeable => {
                // Changeable reads as a writability mask.
                parts.push(format!("cha: {}", if v != 0 { "y" } else { "n" }));
                rend.kv_bool("changeable", v != 0);
                continue;
            },
            PageControl::Default => parts.push(format!("def: {}", render_value(f, v, signed))),
            PageControl::Saved => parts.push(format!("sav: {}", render_value(f, v, signed))),
        }
        if signed || f.flags.contains(FieldFlags::TWOS_COMP) {
            rend.kv_signed(pc.label(), codec::sign_extend(v, f.num_bits));
        } else {
            rend.kv_int(pc.label(), v, f.flags.contains(FieldFlags::HEX), None);
        }
    }
    rend.close();

    if rend.opts.quiet {
        rend.hr(parts.first().cloned().unwrap_or_default());
    } else {
        let head = parts.first().cloned().unwrap_or_default();
        let tail = if parts.len() > 1 && !current_only {
            format!("  [{}]", parts[1..].join(", "))
        } else {
            String::new()
        };
        let mut line = format!("  {label:<14}{head}{tail}");
        if opts.long && !f.description.is_empty() {
            line.push_str(&format!("  {}", f.description));
        }
        rend.hr(line);
        if opts.long && let Some(extra) = f.extra {
            for part in extra.split('\t') {
                rend.hr(format!("        {part}"));
            }
        }
    }
    Ok(current)
}

/// Print one mode page (all its known fields) from a page-bytes set.
pub fn print_mode_page(
    rend: &mut Renderer,
    opts: &ModeOpts,
    page_code: u8,
    subpage_code: u8,
    set: &PageControlSet,
) -> Result<(), SdparmError> {
    let name = catalog::find_mpage_name(page_code, subpage_code, opts.pdt, opts.transport, opts.vendor);
    let current = set
        .get(PageControl::Current)
        .or_else(|| set.available_controls().next().and_then(|pc| set.get(pc)))
        .ok_or_else(|| SdparmError::Malformed("no page control available".into()))?;
    let ph =
        PageHeader::parse(current).map_err(|e| SdparmError::Malformed(e.to_string()))?;
    let page_len = ph.full_len.min(current.len());
    if ph.full_len > current.len() {
        let msg = format!(
            "page 0x{page_code:02x},0x{subpage_code:02x} declares {} bytes, only {} fetched",
            ph.full_len,
            current.len()
        );
        if opts.flexible {
            warn!("{msg}");
        } else {
            return Err(SdparmError::Malformed(msg));
        }
    }
    if ph.full_len > MAX_MPAGE_LEN {
        warn!(
            "page 0x{page_code:02x} length {} above the {MAX_MPAGE_LEN} cap",
            ph.full_len
        );
    }

    let (title, obj_key) = match name {
        Some(n) => (
            format!("{} [{}] mode page:", n.name, n.acronym),
            snake(n.name),
        ),
        None => (
            if subpage_code != 0 {
                format!("mode page 0x{page_code:02x},0x{subpage_code:02x}:")
            } else {
                format!("mode page 0x{page_code:02x}:")
            },
            format!("mpage_0x{page_code:02x}"),
        ),
    };
    if !rend.opts.quiet {
        rend.hr(title);
    }
    rend.open_obj(&obj_key);
    if let Some(n) = name {
        rend.kv_str("acronym", n.acronym);
    }
    rend.kv_int("page_code", page_code as u64, true, None);
    if subpage_code != 0 {
        rend.kv_int("subpage_code", subpage_code as u64, true, None);
    }
    rend.kv_bool("parameters_saveable", ph.ps);

    if rend.opts.inner_hex {
        for pc in set.available_controls() {
            rend.kv_hex_bytes(pc.label(), set.get(pc).unwrap_or_default());
        }
    }
    if rend.opts.hex > 0 {
        rend.hr(hex_dump(current));
        rend.kv_hex_bytes("raw", current);
        rend.close();
        return Ok(());
    }

    let layout = name.and_then(|n| n.layout.as_ref());
    let region = match layout {
        Some(l) => Some(enumerate_descriptors(l, current)?),
        None => None,
    };
    if opts.num_desc {
        let count = region.as_ref().map(|r| r.count()).unwrap_or(0);
        rend.hr(format!("number of descriptors: {count}"));
        rend.kv_int("number_of_descriptors", count as u64, false, None);
        rend.close();
        return Ok(());
    }

    let fields: Vec<&FieldDescriptor> =
        catalog::fields_for_page(page_code, subpage_code, opts.pdt, opts.transport, opts.vendor)
            .filter(|f| opts.all || f.flags.contains(FieldFlags::COMMON))
            .collect();
    if fields.is_empty() {
        if !rend.opts.quiet {
            rend.hr(hex_dump(current));
        }
        rend.kv_hex_bytes("raw", current);
        rend.close();
        return Ok(());
    }

    let mut stop = false;
    for f in &fields {
        if !field_in_page(f.start_byte as usize, f, page_len) {
            let msg = format!(
                "field {} at byte {} outside {} byte page",
                f.acronym, f.start_byte, page_len
            );
            if opts.flexible && field_in_page(f.start_byte as usize, f, current.len()) {
                warn!("{msg} (flexible: decoding anyway)");
            } else {
                warn!("{msg}, skipping");
                continue;
            }
        }
        if let (Some(l), Some(r)) = (layout, region.as_ref())
            && !desc_id_matches(l, r, current, f, 0)
        {
            continue;
        }
        let v = emit_field(rend, opts, f, f.acronym, 0, f.start_byte as usize, set, false, false)?;
        if f.flags.contains(FieldFlags::STOP_IF_SET) && v != 0 && !opts.flexible {
            stop = true;
        }
    }

    // Descriptor tail: instances 1.. of every field inside the region.
    if let (Some(l), Some(r)) = (layout, region.as_ref())
        && !stop
    {
        'instances: for idx in 1..r.count() {
            for f in &fields {
                if (f.start_byte as usize) < l.first_desc_off as usize {
                    continue;
                }
                if !desc_id_matches(l, r, current, f, idx) {
                    continue;
                }
                let off = field_offset_for_instance(l, r, f, idx)?;
                if !field_in_page(off, f, page_len) {
                    warn!(
                        "descriptor {idx} field {} at byte {off} outside {} byte page",
                        f.acronym, page_len
                    );
                    continue;
                }
                let label = format!("{}.{idx}", f.acronym);
                let v = emit_field(rend, opts, f, &label, idx, off, set, false, false)?;
                if f.flags.contains(FieldFlags::STOP_IF_SET) && v != 0 && !opts.flexible {
                    break 'instances;
                }
            }
        }
    }
    rend.close();
    Ok(())
}

/// `--get=`: print the requested fields of pages already fetched into
/// page-bytes sets by the caller.
pub fn print_requested_fields(
    rend: &mut Renderer,
    opts: &ModeOpts,
    reqs: &[FieldRequest],
    set_for_page: &mut dyn FnMut(u8, u8) -> Result<PageControlSet, SdparmError>,
) -> Result<(), SdparmError> {
    for req in reqs {
        let f = &req.desc;
        let set = set_for_page(f.page_code, f.subpage_code)?;
        let current = set
            .get(PageControl::Current)
            .or_else(|| set.available_controls().next().and_then(|pc| set.get(pc)))
            .ok_or_else(|| SdparmError::Malformed("no page control available".into()))?;
        let name = catalog::find_mpage_name(
            f.page_code,
            f.subpage_code,
            opts.pdt,
            opts.transport,
            opts.vendor,
        );
        let layout = name.and_then(|n| n.layout.as_ref());
        let offset = if req.desc_index > 0 {
            let Some(l) = layout else {
                return Err(SdparmError::NotFound(format!(
                    "field '{}' indexed with .{} but page 0x{:02x} has no descriptors",
                    f.acronym, req.desc_index, f.page_code
                )));
            };
            let region = enumerate_descriptors(l, current)?;
            field_offset_for_instance(l, &region, f, req.desc_index)?
        } else {
            f.start_byte as usize
        };
        let ph = PageHeader::parse(current)
            .map_err(|e| SdparmError::Malformed(e.to_string()))?;
        if !field_in_page(offset, f, ph.full_len.min(current.len())) && !opts.flexible {
            return Err(SdparmError::Malformed(format!(
                "field '{}' at byte {offset} outside {} byte page",
                f.acronym,
                ph.full_len.min(current.len())
            )));
        }
        let label = if req.desc_index > 0 {
            format!("{}.{}", f.acronym, req.desc_index)
        } else {
            f.acronym.to_string()
        };
        emit_field(
            rend,
            opts,
            f,
            &label,
            req.desc_index,
            offset,
            &set,
            req.get_mode.signed(),
            req.get_mode.current_only(),
        )?;
    }
    Ok(())
}

/// Live-device `--get=`: fetch each referenced page once.
pub fn get_fields(
    rend: &mut Renderer,
    opts: &ModeOpts,
    io: &mut PageIo<'_>,
    reqs: &[FieldRequest],
) -> Result<(), SdparmError> {
    let mut cache: Vec<((u8, u8), PageControlSet)> = Vec::new();
    let long = !io.opts.six_byte;
    let mut fetch = |page: u8, subpage: u8| -> Result<PageControlSet, SdparmError> {
        if let Some((_, set)) = cache.iter().find(|((p, sp), _)| *p == page && *sp == subpage)
        {
            return Ok(set.clone());
        }
        let raw = io.mode_sense_all_pc(page, subpage)?;
        let set = extract_page_set(&raw, long)?;
        cache.push(((page, subpage), set.clone()));
        Ok(set)
    };
    print_requested_fields(rend, opts, reqs, &mut fetch)
}

/// Print one page (or, for the 0x3f pseudo page, every page) of a live
/// device.
pub fn print_pages(
    rend: &mut Renderer,
    opts: &ModeOpts,
    io: &mut PageIo<'_>,
    page_code: u8,
    subpage_code: u8,
) -> Result<(), SdparmError> {
    let long = !io.opts.six_byte;
    if page_code != crate::control_block::mode_sense::ALL_MPAGES {
        let raw = io.mode_sense_all_pc(page_code, subpage_code)?;
        let set = extract_page_set(&raw, long)?;
        return print_mode_page(rend, opts, page_code, subpage_code, &set);
    }

    // All pages: fetch each page control's concatenation, align on the
    // current view's page list.
    let mut bodies: Vec<(PageControl, Vec<u8>)> = Vec::new();
    let mut first_err = None;
    for pc in PageControlSet::ALL {
        match io.fetch_all_pages(pc) {
            Ok(buf) => {
                let body = page_slice(&buf, true)?.to_vec();
                bodies.push((pc, body));
            },
            Err(err @ SdparmError::IllegalRequest(_)) => {
                if first_err.is_none() {
                    first_err = Some(err);
                }
            },
            Err(err) => return Err(err),
        }
    }
    if bodies.is_empty() {
        return Err(first_err.unwrap_or_else(|| {
            SdparmError::Transport("no page control returned data".into())
        }));
    }
    let reference = bodies
        .iter()
        .find(|(pc, _)| *pc == PageControl::Current)
        .or(bodies.first())
        .map(|(_, b)| b.clone())
        .unwrap_or_default();
    for (page, subpage, _range) in walk_pages(&reference) {
        let mut set = PageControlSet::new();
        for (pc, body) in &bodies {
            if let Some((_, _, r)) =
                walk_pages(body).into_iter().find(|(p, sp, _)| *p == page && *sp == subpage)
            {
                set.put(*pc, body[r].to_vec());
            }
        }
        if let Err(err) = print_mode_page(rend, opts, page, subpage, &set) {
            warn!("skipping page 0x{page:02x},0x{subpage:02x}: {err}");
        }
    }
    Ok(())
}
