// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use sdparm_rs::{
    engine::{
        ModeOpts, change,
        pageio::{PageIo, PageIoOpts},
    },
    render::{RenderOpts, Renderer},
};

use crate::unit_tests::fake::{FakeDevice, Step, caching_page, msense10_response};

#[test]
fn per_page_defaults_is_one_sense_one_select() -> Result<()> {
    let default_resp = msense10_response(&caching_page(0x00, true));
    let mut dev = FakeDevice::scripted([Step::In(default_resp), Step::OutOk]);
    let mut io = PageIo::new(&mut dev, PageIoOpts::default());
    let mut rend = Renderer::new(RenderOpts::default());
    let opts = ModeOpts {
        pdt: 0,
        ..Default::default()
    };
    change::restore_page_defaults(&mut rend, &opts, &mut io, 0x08, 0)?;

    assert_eq!(dev.issued.len(), 2, "exactly one MODE SENSE + one MODE SELECT");
    let (sense_cdb, _) = &dev.issued[0];
    assert_eq!(sense_cdb[0], 0x5a);
    assert_eq!(sense_cdb[2], 0x80 | 0x08, "PC=default, page 0x08");
    let (select_cdb, payload) = &dev.issued[1];
    assert_eq!(select_cdb[0], 0x55);
    assert_eq!(&payload[0..2], &[0, 0], "header length bytes zeroed");
    assert_eq!(payload[8] & 0x80, 0, "PS cleared");
    assert_eq!(payload[8] & 0x3f, 0x08);
    Ok(())
}

#[test]
fn defaults_with_save_sets_sp_bit() -> Result<()> {
    let default_resp = msense10_response(&caching_page(0x00, true));
    let mut dev = FakeDevice::scripted([Step::In(default_resp), Step::OutOk]);
    let mut io = PageIo::new(&mut dev, PageIoOpts::default());
    let mut rend = Renderer::new(RenderOpts::default());
    let opts = ModeOpts {
        pdt: 0,
        save: true,
        ..Default::default()
    };
    change::restore_page_defaults(&mut rend, &opts, &mut io, 0x08, 0)?;
    let (select_cdb, _) = &dev.issued[1];
    assert_eq!(select_cdb[1], 0x11, "PF=1, SP=1");
    Ok(())
}

#[test]
fn global_rtd_is_zero_length_select10() -> Result<()> {
    let mut dev = FakeDevice::scripted([Step::OutOk]);
    let mut io = PageIo::new(&mut dev, PageIoOpts::default());
    let mut rend = Renderer::new(RenderOpts::default());
    let opts = ModeOpts::default();
    change::restore_all_defaults(&mut rend, &opts, &mut io)?;

    assert_eq!(dev.issued.len(), 1);
    let (cdb, payload) = &dev.issued[0];
    assert_eq!(cdb[0], 0x55);
    assert_eq!(cdb[1], 0x02, "RTD=1, PF=0, SP=0");
    assert_eq!(&cdb[7..9], &[0, 0], "no parameter list");
    assert!(payload.is_empty());
    Ok(())
}

#[test]
fn global_rtd_refused_with_six_byte_cdbs() {
    let mut dev = FakeDevice::scripted([]);
    let mut io = PageIo::new(
        &mut dev,
        PageIoOpts {
            six_byte: true,
            ..Default::default()
        },
    );
    let mut rend = Renderer::new(RenderOpts::default());
    let err = change::restore_all_defaults(&mut rend, &ModeOpts::default(), &mut io)
        .expect_err("WTF");
    assert_eq!(err.exit_code(), 1);
}
