// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use sdparm_rs::pages::codec;

/// Pseudo-random but deterministic values; the codec has no width left
/// untested between 1 and 64.
fn patterns(num_bits: u8) -> Vec<u64> {
    let ones = codec::all_ones(num_bits);
    vec![
        0,
        1,
        ones,
        ones >> 1,
        0xa5a5_a5a5_a5a5_a5a5 & ones,
        0x0123_4567_89ab_cdef & ones,
    ]
}

#[test]
fn set_then_get_round_trips_every_width_and_bit() -> Result<()> {
    for num_bits in 1..=64u8 {
        for start_bit in 0..=7u8 {
            for v in patterns(num_bits) {
                let mut buf = [0u8; 12];
                codec::set(&mut buf, 2, start_bit, num_bits, v)?;
                assert_eq!(
                    codec::get(&buf, 2, start_bit, num_bits)?,
                    v,
                    "width {num_bits} start_bit {start_bit} value 0x{v:x}"
                );
            }
        }
    }
    Ok(())
}

#[test]
fn set_truncates_to_field_width() -> Result<()> {
    for num_bits in 1..=63u8 {
        let mut buf = [0u8; 12];
        codec::set(&mut buf, 2, 7, num_bits, u64::MAX)?;
        assert_eq!(codec::get(&buf, 2, 7, num_bits)?, codec::all_ones(num_bits));
    }
    Ok(())
}

#[test]
fn surrounding_bits_survive_writes() -> Result<()> {
    for num_bits in 1..=16u8 {
        for start_bit in 0..=7u8 {
            let mut buf = [0xffu8; 6];
            codec::set(&mut buf, 1, start_bit, num_bits, 0)?;
            codec::set(&mut buf, 1, start_bit, num_bits, codec::all_ones(num_bits))?;
            assert_eq!(buf, [0xffu8; 6], "width {num_bits} start_bit {start_bit}");
        }
    }
    Ok(())
}

#[test]
fn all_ones_sentinel_uniform_across_widths() -> Result<()> {
    // 16-, 32- and 64-bit sentinels, plus an odd width.
    let buf = [0xffu8; 12];
    for num_bits in [7u8, 16, 32, 64] {
        let (v, ones) = codec::get_checked(&buf, 1, 7, num_bits)?;
        assert!(ones, "width {num_bits}");
        assert_eq!(v, codec::all_ones(num_bits));
    }
    let mut buf = [0xffu8; 12];
    codec::set(&mut buf, 1, 7, 16, 0xfffe)?;
    let (_, ones) = codec::get_checked(&buf, 1, 7, 16)?;
    assert!(!ones);
    Ok(())
}

#[test]
fn last_field_flush_with_buffer_end() -> Result<()> {
    // A field ending exactly at the last byte decodes; one byte further
    // is an error, not a panic.
    let buf = [0u8, 0, 0, 0x12, 0x34];
    assert_eq!(codec::get(&buf, 3, 7, 16)?, 0x1234);
    assert!(codec::get(&buf, 4, 7, 16).is_err());
    Ok(())
}

#[test]
fn sixty_four_bit_field_with_low_start_bit_spans_nine_bytes() -> Result<()> {
    let mut buf = [0u8; 16];
    let v = 0xfedc_ba98_7654_3210u64;
    codec::set(&mut buf, 4, 2, 64, v)?;
    assert_eq!(codec::get(&buf, 4, 2, 64)?, v);
    // The five bits above the field's msb stay clear.
    assert_eq!(buf[4] & 0xf8, 0);
    // And a write of all ones flags the sentinel.
    codec::set(&mut buf, 4, 2, 64, u64::MAX)?;
    let (_, ones) = codec::get_checked(&buf, 4, 2, 64)?;
    assert!(ones);
    Ok(())
}
