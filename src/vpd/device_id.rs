// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Designation descriptors: the body of the Device Identification page
//! (0x83), also embedded in SCSI Ports (0x88) target port descriptors.

use std::fmt::Write as _;

use anyhow::Result;
use tracing::warn;

use crate::{
    catalog::TransportId,
    render::{Renderer, snake},
    utils::trim_ascii,
};

/// One parsed designation descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Designator<'a> {
    pub code_set: u8,
    pub piv: bool,
    pub association: u8,
    pub designator_type: u8,
    pub protocol_id: u8,
    pub value: &'a [u8],
}

pub fn association_str(assoc: u8) -> &'static str {
    match assoc {
        0 => "Addressed logical unit",
        1 => "Target port",
        2 => "Target device that contains addressed lu",
        _ => "Reserved",
    }
}

pub fn designator_type_str(dtype: u8) -> &'static str {
    match dtype {
        0x0 => "vendor specific",
        0x1 => "T10 vendor identification",
        0x2 => "EUI-64 based",
        0x3 => "NAA",
        0x4 => "Relative target port",
        0x5 => "Target port group",
        0x6 => "Logical unit group",
        0x7 => "MD5 logical unit identifier",
        0x8 => "SCSI name string",
        0x9 => "Protocol specific port identifier",
        0xa => "UUID identifier",
        _ => "Reserved",
    }
}

pub fn code_set_str(cs: u8) -> &'static str {
    match cs {
        1 => "Binary",
        2 => "ASCII",
        3 => "UTF-8",
        _ => "Reserved",
    }
}

/// Walk the descriptor array. Truncated trailing descriptors end the walk
/// with a warning rather than an error.
pub fn parse_designators(body: &[u8]) -> Vec<Designator<'_>> {
    let mut out = Vec::new();
    let mut off = 0usize;
    while off + 4 <= body.len() {
        let b0 = body[off];
        let b1 = body[off + 1];
        let len = body[off + 3] as usize;
        let start = off + 4;
        let end = start + len;
        if end > body.len() {
            warn!(
                "designation descriptor at offset {off} overruns the page ({len} byte value)"
            );
            break;
        }
        out.push(Designator {
            code_set: b0 & 0x0F,
            piv: b1 & 0x80 != 0,
            association: (b1 >> 4) & 0x03,
            designator_type: b1 & 0x0F,
            protocol_id: (b0 >> 4) & 0x0F,
            value: &body[start..end],
        });
        off = end;
    }
    out
}

fn be_bytes(v: &[u8]) -> u64 {
    v.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64)
}

/// UUID per RFC 4122: dashes after bytes 4, 6, 8 and 10.
fn format_uuid(v: &[u8]) -> String {
    let mut s = String::with_capacity(36);
    for (i, b) in v.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            s.push('-');
        }
        let _ = write!(&mut s, "{b:02x}");
    }
    s
}

/// The compact single-token rendering used by `--quiet` and as the JSON
/// `value`.
pub fn compact_value(d: &Designator<'_>) -> String {
    match d.designator_type {
        0x1 => trim_ascii(d.value),
        0x4 | 0x5 | 0x6 => {
            // 4-byte descriptors carrying a 16-bit identifier.
            let v = if d.value.len() >= 4 {
                be_bytes(&d.value[2..4])
            } else {
                be_bytes(d.value)
            };
            format!("0x{v:x}")
        },
        0x8 => String::from_utf8_lossy(d.value)
            .trim_end_matches('\0')
            .to_string(),
        0xa if d.value.len() >= 18 => format_uuid(&d.value[2..18]),
        _ => format!("0x{}", hex::encode(d.value)),
    }
}

fn emit_naa(rend: &mut Renderer, value: &[u8]) {
    if value.is_empty() {
        return;
    }
    let naa = (value[0] >> 4) & 0x0F;
    rend.kv_int("naa", naa as u64, false, None);
    match naa {
        2 if value.len() >= 8 => {
            rend.hr(format!("      NAA 2, vendor specific identifier A: 0x{:x}", value[0] as u64 & 0xf));
            rend.kv_str("vendor_specific_identifier_a", &format!("0x{:x}", be_bytes(&value[0..2]) & 0xfff));
            rend.kv_str("ieee_company_id", &format!("0x{:x}", be_bytes(&value[2..5])));
            rend.kv_str("vendor_specific_identifier_b", &format!("0x{:x}", be_bytes(&value[5..8])));
        },
        3 if value.len() >= 8 => {
            rend.hr("      NAA 3, locally assigned".to_string());
        },
        5 | 6 => {
            // Company id: 24 bits starting at the low nibble of byte 0.
            if value.len() >= 8 {
                let company = (be_bytes(&value[0..4]) >> 4) & 0xff_ffff;
                rend.kv_str("ieee_company_id", &format!("0x{company:x}"));
                let vsi = be_bytes(&value[3..8]) & 0x0f_ffff_ffff;
                rend.kv_str("vendor_specific_identifier", &format!("0x{vsi:x}"));
            }
            if naa == 6 && value.len() >= 16 {
                rend.kv_str(
                    "vendor_specific_identifier_extension",
                    &format!("0x{:x}", be_bytes(&value[8..16])),
                );
            }
        },
        _ => {},
    }
}

/// Decode one designator into renderer events (verbose form).
pub fn emit_designator(rend: &mut Renderer, d: &Designator<'_>) -> Result<()> {
    rend.hr(format!(
        "    {} designator, {}",
        designator_type_str(d.designator_type),
        association_str(d.association).to_lowercase()
    ));
    rend.kv_str("designator_type", designator_type_str(d.designator_type));
    rend.kv_str("association", association_str(d.association));
    rend.kv_str("code_set", code_set_str(d.code_set));
    if d.piv && (d.association == 1 || d.association == 2) {
        let proto = TransportId::from_protocol_id(d.protocol_id)
            .map(|t| t.name())
            .unwrap_or("Reserved");
        rend.hr(format!("      transport: {proto}"));
        rend.kv_str("protocol_identifier", proto);
    }
    let compact = compact_value(d);
    match d.designator_type {
        0x3 => emit_naa(rend, d.value),
        0x2 => {
            if !matches!(d.value.len(), 8 | 12 | 16) {
                warn!("EUI-64 designator with odd length {}", d.value.len());
            }
        },
        _ => {},
    }
    rend.hr(format!("      {compact}"));
    rend.kv_str("value", &compact);
    Ok(())
}

/// Decode the whole 0x83 page body.
pub fn decode_device_id(rend: &mut Renderer, body: &[u8]) -> Result<()> {
    let designators = parse_designators(body);
    if rend.opts.quiet {
        let compact: Vec<String> = designators.iter().map(compact_value).collect();
        rend.hr(compact.join(","));
    }
    rend.open_arr("designation_descriptor_list");
    for d in &designators {
        rend.open_obj(&snake(designator_type_str(d.designator_type)));
        if !rend.opts.quiet {
            emit_designator(rend, d)?;
        } else {
            rend.kv_str("value", &compact_value(d));
        }
        rend.close();
    }
    rend.close();
    Ok(())
}
