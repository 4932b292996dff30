// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use sdparm_rs::{
    control_block::mode_sense::PageControl,
    engine::pageio::{PageIo, PageIoOpts},
};

use crate::unit_tests::fake::{FakeDevice, Step, caching_page, msense10_response};

#[test]
fn all_subpages_falls_back_to_subpage_zero() -> Result<()> {
    // SPC-3 device rejecting the 0x3f,0xff form: one illegal request,
    // then success with subpage 0.
    let resp = msense10_response(&caching_page(0x14, true));
    let mut dev = FakeDevice::scripted([
        Step::Check {
            key: 0x05,
            asc: 0x24,
            ascq: 0x00,
        },
        Step::In(resp),
    ]);
    let mut io = PageIo::new(
        &mut dev,
        PageIoOpts {
            spc_version: 3,
            ..Default::default()
        },
    );
    let buf = io.fetch_all_pages(PageControl::Current)?;
    assert!(buf.len() >= 8);

    assert_eq!(io.counters().msense10.illegal_req, 1);
    assert_eq!(io.counters().msense10.good, 1);

    assert_eq!(dev.issued[0].0[3], 0xff, "first try asks all subpages");
    assert_eq!(dev.issued[1].0[3], 0x00, "fallback asks subpage 0");
    Ok(())
}

#[test]
fn spc2_device_skips_subpage_form() -> Result<()> {
    let resp = msense10_response(&caching_page(0x14, true));
    let mut dev = FakeDevice::scripted([Step::In(resp)]);
    let mut io = PageIo::new(
        &mut dev,
        PageIoOpts {
            spc_version: 2,
            ..Default::default()
        },
    );
    io.fetch_all_pages(PageControl::Current)?;
    assert_eq!(dev.issued.len(), 1);
    assert_eq!(dev.issued[0].0[3], 0x00);
    Ok(())
}

#[test]
fn llbaa_fallback_retries_without_the_bit() -> Result<()> {
    let resp = msense10_response(&caching_page(0x14, true));
    let mut dev = FakeDevice::scripted([
        Step::Check {
            key: 0x05,
            asc: 0x24,
            ascq: 0x00,
        },
        Step::In(resp),
    ]);
    let mut io = PageIo::new(
        &mut dev,
        PageIoOpts {
            llbaa: true,
            ..Default::default()
        },
    );
    io.mode_sense(PageControl::Current, 0x08, 0, None)?;
    assert_eq!(dev.issued[0].0[1] & 0x10, 0x10, "LLBAA set on first try");
    assert_eq!(dev.issued[1].0[1] & 0x10, 0x00, "LLBAA dropped on retry");
    Ok(())
}

#[test]
fn page_control_probing_reclassifies_partial_failures() -> Result<()> {
    // Current and default answer; changeable and saved are refused.
    let resp = msense10_response(&caching_page(0x14, true));
    let ill = Step::Check {
        key: 0x05,
        asc: 0x24,
        ascq: 0x00,
    };
    let mut dev = FakeDevice::scripted([
        Step::In(resp.clone()),
        ill.clone(),
        Step::In(resp),
        ill,
    ]);
    let mut io = PageIo::new(&mut dev, PageIoOpts::default());
    let set = io.mode_sense_all_pc(0x08, 0)?;
    assert!(set.is_available(PageControl::Current));
    assert!(set.is_available(PageControl::Default));
    assert!(!set.is_available(PageControl::Changeable));
    assert!(!set.is_available(PageControl::Saved));

    let c = io.counters().msense10;
    assert_eq!(c.good, 2);
    assert_eq!(c.pc_not_sup, 2, "probe failures are not illegal requests");
    assert_eq!(c.illegal_req, 0);
    Ok(())
}

#[test]
fn all_controls_refused_is_an_error() {
    let ill = Step::Check {
        key: 0x05,
        asc: 0x24,
        ascq: 0x00,
    };
    let mut dev = FakeDevice::scripted([ill.clone(), ill.clone(), ill.clone(), ill]);
    let mut io = PageIo::new(&mut dev, PageIoOpts::default());
    let err = io.mode_sense_all_pc(0x30, 0).expect_err("WTF");
    assert_eq!(err.exit_code(), 5);
    assert!(err.is_suppressible());
}

#[test]
fn invalid_opcode_reported_with_variant_hint() {
    let mut dev = FakeDevice::scripted([Step::Check {
        key: 0x05,
        asc: 0x20,
        ascq: 0x00,
    }]);
    let mut io = PageIo::new(
        &mut dev,
        PageIoOpts {
            six_byte: true,
            ..Default::default()
        },
    );
    let err = io
        .mode_sense(PageControl::Current, 0x08, 0, None)
        .expect_err("WTF");
    assert_eq!(err.exit_code(), 3);
    assert!(err.to_string().contains('6'), "{err}");
}

#[test]
fn short_response_is_malformed() {
    let mut dev = FakeDevice::scripted([Step::In(vec![0x00, 0x02])]);
    let mut io = PageIo::new(&mut dev, PageIoOpts::default());
    let err = io
        .mode_sense(PageControl::Current, 0x08, 0, None)
        .expect_err("WTF");
    assert_eq!(err.exit_code(), 97);
}
