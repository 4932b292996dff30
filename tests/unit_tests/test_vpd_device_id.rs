// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use sdparm_rs::{
    catalog::pdt,
    render::{RenderOpts, Renderer},
    vpd,
};
use serde_json::json;

use crate::unit_tests::fake::load_fixture;

#[test]
fn quiet_prints_designators_on_one_line() -> Result<()> {
    let data = load_fixture("tests/unit_tests/fixtures/vpd_device_id.hex")?;
    let mut rend = Renderer::new(RenderOpts {
        quiet: true,
        ..Default::default()
    });
    vpd::decode_vpd(&data, pdt::DISK, false, &mut rend, 0)?;
    assert_eq!(rend.lines(), ["0x5000000000000001,0x1"]);
    Ok(())
}

#[test]
fn verbose_names_types_and_associations() -> Result<()> {
    let data = load_fixture("tests/unit_tests/fixtures/vpd_device_id.hex")?;
    let mut rend = Renderer::new(RenderOpts::default());
    vpd::decode_vpd(&data, pdt::DISK, false, &mut rend, 0)?;
    let joined = rend.lines().join("\n");
    assert!(joined.contains("Device identification VPD page:"), "{joined}");
    assert!(joined.contains("NAA designator"), "{joined}");
    assert!(joined.contains("Relative target port designator"), "{joined}");
    assert!(joined.contains("addressed logical unit"), "{joined}");
    assert!(joined.contains("target port"), "{joined}");
    assert!(joined.contains("0x5000000000000001"), "{joined}");
    Ok(())
}

#[test]
fn json_tree_carries_values() -> Result<()> {
    let data = load_fixture("tests/unit_tests/fixtures/vpd_device_id.hex")?;
    let mut rend = Renderer::new(RenderOpts {
        json: true,
        ..Default::default()
    });
    vpd::decode_vpd(&data, pdt::DISK, false, &mut rend, 0)?;
    let v = rend.into_json();
    let page = &v["device_identification"];
    assert_eq!(page["acronym"], json!("di"));
    let list = page["designation_descriptor_list"]
        .as_array()
        .expect("WTF");
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["value"], json!("0x5000000000000001"));
    assert_eq!(list[0]["naa"], json!(5));
    assert_eq!(list[1]["value"], json!("0x1"));
    Ok(())
}
