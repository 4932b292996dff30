// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use sdparm_rs::{
    engine::{ModeOpts, change, inhex_replay},
    pages::codec,
    render::{RenderOpts, Renderer},
    select::{Op, parse_field_list},
};
use serde_json::json;

use crate::unit_tests::fake::{
    FakeDevice, Step, caching_page, load_fixture, msense10_response,
};

fn disk_opts() -> ModeOpts {
    ModeOpts {
        pdt: 0,
        ..Default::default()
    }
}

#[test]
fn get_wce_from_inhex_human() -> Result<()> {
    let data = load_fixture("tests/unit_tests/fixtures/caching_mpage_10.hex")?;
    let mut rend = Renderer::new(RenderOpts::default());
    inhex_replay::print_inhex(&mut rend, &disk_opts(), &data, None)?;
    let joined = rend.lines().join("\n");
    assert!(joined.contains("Caching [ca] mode page:"), "{joined}");
    assert!(joined.contains("WCE           1"), "{joined}");
    Ok(())
}

#[test]
fn get_wce_from_inhex_json() -> Result<()> {
    let data = load_fixture("tests/unit_tests/fixtures/caching_mpage_10.hex")?;
    let mut rend = Renderer::new(RenderOpts {
        json: true,
        ..Default::default()
    });
    inhex_replay::print_inhex(&mut rend, &disk_opts(), &data, None)?;
    let v = rend.into_json();
    assert_eq!(v["caching"]["wce"]["current"], json!(1));
    assert_eq!(v["caching"]["wce"]["acronym"], json!("WCE"));
    assert_eq!(v["caching"]["acronym"], json!("ca"));
    Ok(())
}

#[test]
fn get_field_request_from_inhex() -> Result<()> {
    let data = load_fixture("tests/unit_tests/fixtures/caching_mpage_10.hex")?;
    let reqs = parse_field_list("WCE", Op::Get, None, None, None)?;
    let mut rend = Renderer::new(RenderOpts {
        quiet: true,
        ..Default::default()
    });
    inhex_replay::get_inhex_fields(&mut rend, &disk_opts(), &data, &reqs)?;
    assert_eq!(rend.lines(), ["1"]);
    Ok(())
}

#[test]
fn set_wce_to_zero_builds_correct_payload() -> Result<()> {
    // Current page has byte 2 = 0x14 (WCE=1, DISC=1); clearing WCE must
    // leave 0x10, zero the header length bytes, and clear PS.
    let current = msense10_response(&caching_page(0x14, true));
    let changeable = msense10_response(&caching_page(0xff, false));
    let mut dev = FakeDevice::scripted([
        Step::In(current.clone()), // length probe
        Step::In(current),         // full fetch
        Step::In(changeable),      // changeable mask
        Step::OutOk,               // MODE SELECT
    ]);
    let mut io = sdparm_rs::engine::pageio::PageIo::new(
        &mut dev,
        sdparm_rs::engine::pageio::PageIoOpts::default(),
    );
    let reqs = parse_field_list("WCE=0", Op::Set, None, None, None)?;
    let mut rend = Renderer::new(RenderOpts::default());
    change::change_fields(&mut rend, &disk_opts(), &mut io, &reqs)?;

    let (cdb, payload) = dev.issued.last().expect("WTF");
    assert_eq!(cdb[0], 0x55, "MODE SELECT(10) expected");
    assert_eq!(cdb[1], 0x10, "PF=1, SP=0");
    assert_eq!(&payload[0..2], &[0, 0], "mode data length must be zeroed");
    assert_eq!(payload[3], 0, "device-specific byte zeroed for disks");
    assert_eq!(payload[8], 0x08, "PS bit cleared in the page header");
    assert_eq!(payload[10], 0x10, "WCE cleared, neighbours kept");
    Ok(())
}

#[test]
fn save_rejected_when_page_not_saveable() -> Result<()> {
    let current = msense10_response(&caching_page(0x14, false));
    let mut dev = FakeDevice::scripted([
        Step::In(current.clone()),
        Step::In(current),
    ]);
    let mut io = sdparm_rs::engine::pageio::PageIo::new(
        &mut dev,
        sdparm_rs::engine::pageio::PageIoOpts::default(),
    );
    let reqs = parse_field_list("WCE=0", Op::Set, None, None, None)?;
    let mut rend = Renderer::new(RenderOpts::default());
    let opts = ModeOpts {
        save: true,
        ..disk_opts()
    };
    let err = change::change_fields(&mut rend, &opts, &mut io, &reqs).expect_err("WTF");
    assert_eq!(err.exit_code(), 97);
    Ok(())
}

#[test]
fn dummy_skips_mode_select() -> Result<()> {
    let current = msense10_response(&caching_page(0x14, true));
    let mut dev = FakeDevice::scripted([
        Step::In(current.clone()),
        Step::In(current.clone()),
        Step::In(current),
    ]);
    let mut io = sdparm_rs::engine::pageio::PageIo::new(
        &mut dev,
        sdparm_rs::engine::pageio::PageIoOpts::default(),
    );
    let reqs = parse_field_list("WCE=0", Op::Set, None, None, None)?;
    let mut rend = Renderer::new(RenderOpts::default());
    let opts = ModeOpts {
        dummy: true,
        ..disk_opts()
    };
    change::change_fields(&mut rend, &opts, &mut io, &reqs)?;
    // Three MODE SENSEs issued, no MODE SELECT.
    assert_eq!(dev.issued.len(), 3);
    assert!(dev.issued.iter().all(|(cdb, _)| cdb[0] == 0x5a));
    assert!(rend.lines().iter().any(|l| l.contains("dummy")));
    Ok(())
}

#[test]
fn numeric_triple_addresses_same_bit() -> Result<()> {
    // byte 2, bit 2, width 1 is WCE; value masking must match.
    let data = load_fixture("tests/unit_tests/fixtures/caching_mpage_10.hex")?;
    let reqs = parse_field_list("2:2:1", Op::Get, Some((0x08, 0)), None, None)?;
    let mut rend = Renderer::new(RenderOpts {
        quiet: true,
        ..Default::default()
    });
    inhex_replay::get_inhex_fields(&mut rend, &disk_opts(), &data, &reqs)?;
    assert_eq!(rend.lines(), ["0x1"]);

    let page = caching_page(0x14, true);
    assert_eq!(codec::get(&page, 2, 2, 1)?, 1);
    Ok(())
}
