// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fmt::Write;

/// Printable-ASCII projection of a fixed-width field, trimmed of padding.
pub fn trim_ascii(bytes: &[u8]) -> String {
    let s: String = bytes
        .iter()
        .map(|&b| if b.is_ascii() && b != 0 { b as char } else { ' ' })
        .collect();
    s.trim().to_string()
}

/// Classic 16-bytes-per-row hex dump with an offset column, one string per
/// call. Used by `--hex`, `--dummy` and verbose sense reporting.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 4);
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let _ = write!(&mut out, " {:02x}", row * 16);
        for (i, b) in chunk.iter().enumerate() {
            let sep = if i == 8 { "  " } else { " " };
            let _ = write!(&mut out, "{sep}{b:02x}");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_padding_and_nuls() {
        assert_eq!(trim_ascii(b"SEAGATE "), "SEAGATE");
        assert_eq!(trim_ascii(b"ST373455SS\x00\x00"), "ST373455SS");
    }

    #[test]
    fn dump_rows() {
        let bytes: Vec<u8> = (0u8..18).collect();
        let dump = hex_dump(&bytes);
        let mut lines = dump.lines();
        let first = lines.next().expect("WTF");
        assert!(first.starts_with(" 00"));
        assert!(first.contains("07  08"));
        let second = lines.next().expect("WTF");
        assert!(second.starts_with(" 10"));
    }
}
