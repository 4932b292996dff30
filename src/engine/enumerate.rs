// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `--enumerate`: dump the catalog without touching a device.
//! `--examine`: probe every page code for presence on a device.

use tracing::warn;

use crate::{
    catalog,
    engine::{ModeOpts, error::SdparmError, pageio::PageIo, print},
    render::{Renderer, snake},
};

/// List the mode pages (and with `--all` the fields, with `--long` the
/// bit positions) of the selected namespace. With `--inquiry` the VPD
/// name table is listed instead; the driver picks.
pub fn enumerate_mode_pages(rend: &mut Renderer, opts: &ModeOpts) {
    let names = catalog::mpage_names(opts.transport, opts.vendor);
    rend.open_arr("mode_page_list");
    for n in names {
        let numeric = if n.subpage_code != 0 {
            format!("0x{:02x},0x{:02x}", n.page_code, n.subpage_code)
        } else {
            format!("0x{:02x}", n.page_code)
        };
        rend.hr(format!("  {:<6} {numeric:<12} {}", n.acronym, n.name));
        rend.open_obj("");
        rend.kv_str("acronym", n.acronym);
        rend.kv_str("name", n.name);
        rend.kv_int("page_code", n.page_code as u64, true, None);
        if n.subpage_code != 0 {
            rend.kv_int("subpage_code", n.subpage_code as u64, true, None);
        }
        rend.close();

        if !opts.all {
            continue;
        }
        for f in catalog::fields_for_page(
            n.page_code,
            n.subpage_code,
            n.pdt,
            opts.transport,
            opts.vendor,
        ) {
            if opts.long {
                rend.hr(format!(
                    "    {:<14} [0x{:02x}:{}:{}]  {}",
                    f.acronym, f.start_byte, f.start_bit, f.num_bits, f.description
                ));
            } else {
                rend.hr(format!("    {:<14} {}", f.acronym, f.description));
            }
        }
    }
    rend.close();
}

/// List the VPD page name table.
pub fn enumerate_vpd_pages(rend: &mut Renderer) {
    rend.open_arr("vpd_page_list");
    for n in catalog::vpd_names::VPD_PAGE_NAMES {
        rend.hr(format!("  {:<6} 0x{:02x}  {}", n.acronym, n.page_code, n.name));
        rend.open_obj("");
        rend.kv_str("acronym", n.acronym);
        rend.kv_str("name", n.name);
        rend.kv_int("page_code", n.page_code as u64, true, None);
        rend.close();
    }
    rend.close();
}

/// List the transport and vendor namespaces themselves.
pub fn enumerate_namespaces(rend: &mut Renderer) {
    rend.hr("transports:".to_string());
    rend.open_arr("transport_list");
    for t in [
        catalog::TransportId::Fcp,
        catalog::TransportId::Spi,
        catalog::TransportId::Ssa,
        catalog::TransportId::Sbp,
        catalog::TransportId::Srp,
        catalog::TransportId::Iscsi,
        catalog::TransportId::Sas,
        catalog::TransportId::Adt,
        catalog::TransportId::Ata,
        catalog::TransportId::Uas,
        catalog::TransportId::Sop,
    ] {
        rend.hr(format!("  0x{:x}  {}", t as u8, t.name()));
        rend.kv_str("", &format!("0x{:x} {}", t as u8, snake(t.name())));
    }
    rend.close();
    rend.hr("vendors:".to_string());
    rend.open_arr("vendor_list");
    for v in [catalog::VendorId::Seagate, catalog::VendorId::Hitachi] {
        rend.hr(format!("  {}", v.name()));
        rend.kv_str("", v.name());
    }
    rend.close();
}

/// `--examine`: try every mode page code (0x00..=0x3e, subpage 0) and
/// print those that answer. Illegal-request probes are expected and
/// silently skipped.
pub fn examine_all_pages(
    rend: &mut Renderer,
    opts: &ModeOpts,
    io: &mut PageIo<'_>,
) -> Result<(), SdparmError> {
    let long = !io.opts.six_byte;
    for page in 0x00..=0x3eu8 {
        match io.mode_sense_all_pc(page, 0) {
            Ok(raw) => {
                let set = print::extract_page_set(&raw, long)?;
                if let Err(err) = print::print_mode_page(rend, opts, page, 0, &set) {
                    warn!("page 0x{page:02x}: {err}");
                }
            },
            Err(SdparmError::IllegalRequest(_)) => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(())
}
