// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use sdparm_rs::{
    catalog::TransportId,
    control_block::mode_sense::PageControl,
    engine::{ModeOpts, print},
    pages::PageControlSet,
    render::{RenderOpts, Renderer},
    select::{Op, parse_field_list},
};
use serde_json::json;

/// SAS Phy Control And Discover page (0x19,0x01) with two 48-byte phy
/// descriptors starting at byte 8.
fn phy_page(num_phys: u8) -> Vec<u8> {
    let mut page = vec![0u8; 8 + (num_phys as usize) * 48];
    page[0] = 0x59; // PS=0, SPF=1, page 0x19
    page[1] = 0x01;
    let stored = (4 + 48 * num_phys as usize) as u16;
    page[2..4].copy_from_slice(&stored.to_be_bytes());
    page[7] = num_phys;
    for phy in 0..num_phys as usize {
        let base = 8 + phy * 48;
        page[base + 4] = phy as u8; // PHY IDENTIFIER at descriptor byte 4
        page[base + 12..base + 20]
            .copy_from_slice(&(0x5000_0000_0000_0001u64 + phy as u64).to_be_bytes());
    }
    page
}

fn sas_opts() -> ModeOpts {
    ModeOpts {
        transport: Some(TransportId::Sas),
        all: true,
        ..Default::default()
    }
}

fn current_only(page: Vec<u8>) -> PageControlSet {
    let mut set = PageControlSet::new();
    set.put(PageControl::Current, page);
    set
}

#[test]
fn phy_descriptors_enumerate_with_suffixes() -> Result<()> {
    let set = current_only(phy_page(2));
    let mut rend = Renderer::new(RenderOpts::default());
    print::print_mode_page(&mut rend, &sas_opts(), 0x19, 0x01, &set)?;
    let joined = rend.lines().join("\n");
    assert!(joined.contains("Phy control and discover"), "{joined}");
    assert!(joined.contains("PHY_ID        0"), "{joined}");
    assert!(joined.contains("PHY_ID.1      1"), "{joined}");
    assert!(joined.contains("0x5000000000000001"), "{joined}");
    assert!(joined.contains("0x5000000000000002"), "{joined}");
    Ok(())
}

#[test]
fn phy_descriptors_in_json() -> Result<()> {
    let set = current_only(phy_page(2));
    let mut rend = Renderer::new(RenderOpts {
        json: true,
        ..Default::default()
    });
    print::print_mode_page(&mut rend, &sas_opts(), 0x19, 0x01, &set)?;
    let v = rend.into_json();
    let page = &v["phy_control_and_discover_sas"];
    assert_eq!(page["nop"]["current"], json!(2));
    assert_eq!(page["phy_id"]["current"], json!(0));
    assert_eq!(page["phy_id_1"]["current"], json!(1));
    assert_eq!(
        page["sas_address_1"]["current"]["hex"],
        json!("5000000000000002")
    );
    Ok(())
}

#[test]
fn descriptor_index_resolves_offset() -> Result<()> {
    let reqs = parse_field_list("PHY_ID.1", Op::Get, None, Some(TransportId::Sas), None)?;
    assert_eq!(reqs[0].desc.start_byte, 0x0c);
    assert_eq!(reqs[0].desc_index, 1);

    let set = current_only(phy_page(2));
    let mut rend = Renderer::new(RenderOpts {
        quiet: true,
        ..Default::default()
    });
    let mut fetch = |_p: u8, _sp: u8| Ok(set.clone());
    print::print_requested_fields(&mut rend, &sas_opts(), &reqs, &mut fetch)?;
    assert_eq!(rend.lines(), ["1"]);
    Ok(())
}

#[test]
fn descriptor_index_out_of_range_is_not_found() -> Result<()> {
    let reqs = parse_field_list("PHY_ID.5", Op::Get, None, Some(TransportId::Sas), None)?;
    let set = current_only(phy_page(2));
    let mut rend = Renderer::new(RenderOpts::default());
    let mut fetch = |_p: u8, _sp: u8| Ok(set.clone());
    let err = print::print_requested_fields(&mut rend, &sas_opts(), &reqs, &mut fetch)
        .expect_err("WTF");
    assert_eq!(err.exit_code(), 1);
    Ok(())
}

#[test]
fn num_desc_prints_count() -> Result<()> {
    let set = current_only(phy_page(2));
    let opts = ModeOpts {
        num_desc: true,
        ..sas_opts()
    };
    let mut rend = Renderer::new(RenderOpts::default());
    print::print_mode_page(&mut rend, &opts, 0x19, 0x01, &set)?;
    assert!(
        rend.lines()
            .iter()
            .any(|l| l.contains("number of descriptors: 2"))
    );
    Ok(())
}
