// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! "inhex" input: a text dump of hex byte pairs replayed as if a device
//! had returned it. Whitespace and commas separate bytes; `#` starts a
//! line comment; a leading offset column ("00:", "010:") is tolerated.

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};

/// Parse inhex text into the raw byte stream.
pub fn parse_hex_text(text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() / 3);
    for (lineno, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("");
        for (idx, token) in line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .enumerate()
        {
            // A first token ending in ':' is an offset column, not data.
            if idx == 0 && token.ends_with(':') {
                continue;
            }
            let token = token.strip_prefix("0x").unwrap_or(token);
            if token.len() > 2 {
                bail!("line {}: token '{token}' is not a hex byte", lineno + 1);
            }
            let b = u8::from_str_radix(token, 16)
                .with_context(|| format!("line {}: bad hex byte '{token}'", lineno + 1))?;
            out.push(b);
        }
    }
    if out.is_empty() {
        bail!("no hex bytes found in input");
    }
    Ok(out)
}

/// Read and parse an inhex file.
pub fn read_hex_file(path: &Path) -> Result<Vec<u8>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read inhex file {}", path.display()))?;
    parse_hex_text(&text).with_context(|| format!("while parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_offsets() {
        let text = "# caching page\n00: 08 12 14 00\n10: 00,00\n";
        assert_eq!(
            parse_hex_text(text).expect("WTF"),
            vec![0x08, 0x12, 0x14, 0, 0, 0]
        );
    }

    #[test]
    fn rejects_wide_tokens() {
        assert!(parse_hex_text("0812").is_err());
        assert!(parse_hex_text("zz").is_err());
        assert!(parse_hex_text("# only a comment\n").is_err());
    }
}
