// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use sdparm_rs::{
    engine::{
        ModeOpts, inhex_replay,
        pageio::{PageIo, PageIoOpts},
        print,
    },
    render::{RenderOpts, Renderer},
    transport::inhex::parse_hex_text,
};

use crate::unit_tests::fake::{FakeDevice, Step, caching_page, load_fixture, msense10_response};

fn disk_opts() -> ModeOpts {
    ModeOpts {
        pdt: 0,
        ..Default::default()
    }
}

#[test]
fn inhex_and_live_decode_identically() -> Result<()> {
    // The same response bytes must produce the same event stream whether
    // they came from a file or a device.
    let resp = msense10_response(&caching_page(0x14, true));

    let mut rend_file = Renderer::new(RenderOpts::default());
    inhex_replay::print_inhex(&mut rend_file, &disk_opts(), &resp, Some((0x08, 0)))?;

    let ill = Step::Check {
        key: 0x05,
        asc: 0x24,
        ascq: 0x00,
    };
    let mut dev = FakeDevice::scripted([
        Step::In(resp.clone()),
        ill.clone(),
        ill.clone(),
        ill,
    ]);
    let mut io = PageIo::new(&mut dev, PageIoOpts::default());
    let mut rend_live = Renderer::new(RenderOpts::default());
    print::print_pages(&mut rend_live, &disk_opts(), &mut io, 0x08, 0)?;

    assert_eq!(rend_file.lines(), rend_live.lines());
    Ok(())
}

#[test]
fn four_replicas_fill_all_page_controls() -> Result<()> {
    let mut stream = Vec::new();
    for byte2 in [0x14u8, 0xff, 0x10, 0x14] {
        stream.extend_from_slice(&msense10_response(&caching_page(byte2, true)));
    }
    let split = inhex_replay::split_mode_responses(&stream)?;
    assert_eq!(split.replicas.len(), 4);
    let sets = inhex_replay::page_sets(&split)?;
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].2.mask(), 0b1111);

    // Rendering now shows changeable/default/saved annotations.
    let mut rend = Renderer::new(RenderOpts::default());
    inhex_replay::print_inhex(&mut rend, &disk_opts(), &stream, None)?;
    let joined = rend.lines().join("\n");
    assert!(joined.contains("[cha: y, def: 0, sav: 1]"), "{joined}");
    Ok(())
}

#[test]
fn declared_length_beyond_stream_is_malformed() {
    // Header claims 0x40 mode data bytes, stream holds far fewer.
    let mut data = vec![0u8; 16];
    data[1] = 0x40;
    let err = inhex_replay::split_mode_responses(&data).expect_err("WTF");
    assert_eq!(err.exit_code(), 97);
}

#[test]
fn fixture_file_round_trips_through_text_parser() -> Result<()> {
    let data = load_fixture("tests/unit_tests/fixtures/caching_mpage_10.hex")?;
    let text = std::fs::read_to_string("tests/unit_tests/fixtures/caching_mpage_10.hex")?;
    assert_eq!(parse_hex_text(&text)?, data);
    Ok(())
}

#[test]
fn unknown_page_filter_is_not_found() {
    let resp = msense10_response(&caching_page(0x14, true));
    let mut rend = Renderer::new(RenderOpts::default());
    let err = inhex_replay::print_inhex(&mut rend, &disk_opts(), &resp, Some((0x1c, 0)))
        .expect_err("WTF");
    assert_eq!(err.exit_code(), 1);
}
