// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! VPD page decoding: dispatch on page code, one handler per page,
//! all emitting through the renderer's event API.

/// SBC (disk/zoned) 0xb0..0xba handlers.
pub mod block;
/// Designation descriptors (0x83, also inside 0x88).
pub mod device_id;
/// SSC (tape) 0xb0..0xb5 handlers.
pub mod tape;

use anyhow::Result;
use tracing::warn;

use crate::{
    catalog::{self, TransportId, pdt},
    control_block::inquiry::{InquiryStandard, vpd_payload},
    engine::error::SdparmError,
    render::{Renderer, snake},
    utils::{hex_dump, trim_ascii},
};

pub(crate) fn be(v: &[u8]) -> u64 {
    v.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64)
}

pub(crate) fn emit_u(rend: &mut Renderer, label: &str, v: u64) {
    rend.hr(format!("  {label}: {v}"));
    rend.kv_int(&snake(label), v, false, None);
}

pub(crate) fn emit_hex(rend: &mut Renderer, label: &str, v: u64) {
    rend.hr(format!("  {label}: 0x{v:x}"));
    rend.kv_int(&snake(label), v, true, None);
}

pub(crate) fn emit_str(rend: &mut Renderer, label: &str, s: &str) {
    rend.hr(format!("  {label}: {s}"));
    rend.kv_str(&snake(label), s);
}

pub(crate) fn emit_bytes(rend: &mut Renderer, label: &str, bytes: &[u8]) {
    rend.hr(format!("  {label}: 0x{}", hex::encode(bytes)));
    rend.kv_hex_bytes(&snake(label), bytes);
}

/// Maximum nesting for Device Constituents recursion: the standard
/// allows constituents to carry VPD pages but never another 0x8b.
const MAX_CONSTITUENT_DEPTH: u8 = 1;

/// Decode one VPD response (4-byte header plus payload) into renderer
/// events. `pdt` and `protect` come from the standard INQUIRY.
pub fn decode_vpd(
    buf: &[u8],
    pdt: i8,
    protect: bool,
    rend: &mut Renderer,
    depth: u8,
) -> Result<(), SdparmError> {
    let (resp_pdt, page_code, body) =
        vpd_payload(buf).map_err(|e| SdparmError::Malformed(e.to_string()))?;
    let pdt = if pdt == pdt::ANY { resp_pdt as i8 } else { pdt };

    let name = catalog::find_vpd_name(page_code, 0, pdt);
    let title = name.map(|n| n.name).unwrap_or("Unknown VPD page");
    if !rend.opts.quiet {
        rend.hr(format!("{title} VPD page:"));
    }
    rend.open_obj(&snake(title));
    if let Some(n) = name {
        rend.kv_str("acronym", n.acronym);
    }
    rend.kv_int("page_code", page_code as u64, true, None);

    if rend.opts.hex > 0 {
        rend.hr(hex_dump(buf));
        rend.kv_hex_bytes("raw", buf);
        rend.close();
        return Ok(());
    }

    let res = match page_code {
        0x00 => decode_supported(rend, body, pdt),
        0x80 => {
            if rend.opts.quiet {
                rend.hr(trim_ascii(body));
                rend.kv_str("unit_serial_number", &trim_ascii(body));
            } else {
                emit_str(rend, "Unit serial number", &trim_ascii(body));
            }
            Ok(())
        },
        0x83 => device_id::decode_device_id(rend, body).map_err(|e| {
            SdparmError::Malformed(format!("device identification: {e}"))
        }),
        0x84 => decode_software_interface_id(rend, body),
        0x85 => decode_management_net(rend, body),
        0x86 => decode_extended_inquiry(rend, body, protect),
        0x87 => decode_mode_page_policy(rend, body),
        0x88 => decode_scsi_ports(rend, body),
        0x89 => decode_ata_information(rend, body),
        0x8a => decode_power_condition(rend, body),
        0x8b => decode_device_constituents(rend, body, pdt, protect, depth),
        0x8c => decode_cfa_profile(rend, body),
        0x8d => decode_power_consumption(rend, body),
        0x8f => decode_third_party_copy(rend, body),
        0x90 => decode_proto_lu(rend, body),
        0x91 => decode_proto_port(rend, body),
        0x92 => decode_feature_sets(rend, body),
        0xb0..=0xba => match catalog::decay_pdt(pdt) {
            pdt::DISK | pdt::ZBC => block::decode(rend, page_code, body),
            pdt::TAPE | pdt::ADC => tape::decode(rend, page_code, body),
            _ => {
                warn!("VPD page 0x{page_code:02x} for unhandled device type {pdt}");
                emit_bytes(rend, "Raw", body);
                Ok(())
            },
        },
        other => {
            warn!("no decoder for VPD page 0x{other:02x}, dumping hex");
            rend.hr(hex_dump(body));
            rend.kv_hex_bytes("raw", body);
            Ok(())
        },
    };
    rend.close();
    res
}

/// 0x00: each payload byte is a supported page code. Returns the list so
/// `--all` can re-enter per page.
pub fn supported_codes(buf: &[u8]) -> Result<Vec<u8>, SdparmError> {
    let (_, page_code, body) =
        vpd_payload(buf).map_err(|e| SdparmError::Malformed(e.to_string()))?;
    if page_code != 0x00 {
        return Err(SdparmError::Malformed(format!(
            "expected supported-VPD page, got 0x{page_code:02x}"
        )));
    }
    Ok(body.to_vec())
}

fn decode_supported(rend: &mut Renderer, body: &[u8], pdt: i8) -> Result<(), SdparmError> {
    rend.open_arr("supported_pages");
    for &code in body {
        let label = catalog::find_vpd_name(code, 0, pdt)
            .map(|n| n.name)
            .unwrap_or("(unknown)");
        rend.hr(format!("  0x{code:02x}  {label}"));
        rend.kv_str("", &format!("0x{code:02x} {label}"));
    }
    rend.close();
    Ok(())
}

fn decode_software_interface_id(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    rend.open_arr("ieee_identifier_list");
    for id in body.chunks_exact(6) {
        rend.hr(format!("  0x{}", hex::encode(id)));
        rend.kv_str("", &format!("0x{}", hex::encode(id)));
    }
    rend.close();
    Ok(())
}

fn decode_management_net(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    rend.open_arr("network_services_descriptor_list");
    let mut off = 0usize;
    while off + 4 <= body.len() {
        let assoc = (body[off] >> 5) & 0x3;
        let service = body[off] & 0x1f;
        let len = be(&body[off + 2..off + 4]) as usize;
        let end = off + 4 + len;
        if end > body.len() {
            return Err(SdparmError::Malformed(
                "network services descriptor overruns page".into(),
            ));
        }
        rend.open_obj("");
        emit_u(rend, "Association", assoc as u64);
        emit_u(rend, "Service type", service as u64);
        emit_str(rend, "Address", &trim_ascii(&body[off + 4..end]));
        rend.close();
        off = end;
    }
    rend.close();
    Ok(())
}

fn decode_extended_inquiry(
    rend: &mut Renderer,
    body: &[u8],
    protect: bool,
) -> Result<(), SdparmError> {
    if body.len() < 10 {
        return Err(SdparmError::Malformed("extended inquiry page too short".into()));
    }
    emit_u(rend, "Activate microcode", ((body[0] >> 6) & 0x3) as u64);
    let spt = (body[0] >> 3) & 0x7;
    emit_u(rend, "Supported protection type (SPT)", spt as u64);
    if protect && !rend.opts.quiet {
        let kinds = match spt {
            0 => "type 1 only",
            1 => "types 1 and 2",
            2 => "type 2 only",
            3 => "types 1 and 3",
            4 => "type 3 only",
            5 => "types 2 and 3",
            7 => "types 1, 2 and 3",
            _ => "reserved",
        };
        rend.hr(format!("    [protection enabled: {kinds}]"));
    }
    emit_u(rend, "Guard check (GRD_CHK)", (body[0] >> 2 & 1) as u64);
    emit_u(rend, "Application tag check (APP_CHK)", (body[0] >> 1 & 1) as u64);
    emit_u(rend, "Reference tag check (REF_CHK)", (body[0] & 1) as u64);
    emit_u(rend, "Unit attention sense key supported (UASK_SUP)", (body[1] >> 5 & 1) as u64);
    emit_u(rend, "Grouping function supported (GROUP_SUP)", (body[1] >> 4 & 1) as u64);
    emit_u(rend, "Priority supported (PRIOR_SUP)", (body[1] >> 3 & 1) as u64);
    emit_u(rend, "Head of queue supported (HEADSUP)", (body[1] >> 2 & 1) as u64);
    emit_u(rend, "Ordered supported (ORDSUP)", (body[1] >> 1 & 1) as u64);
    emit_u(rend, "Simple supported (SIMPSUP)", (body[1] & 1) as u64);
    emit_u(rend, "Write uncorrectable supported (WU_SUP)", (body[2] >> 3 & 1) as u64);
    emit_u(rend, "Correction disable supported (CRD_SUP)", (body[2] >> 2 & 1) as u64);
    emit_u(rend, "Non-volatile cache supported (NV_SUP)", (body[2] >> 1 & 1) as u64);
    emit_u(rend, "Volatile cache supported (V_SUP)", (body[2] & 1) as u64);
    emit_u(rend, "No PI checking (NO_PI_CHK)", (body[3] >> 5 & 1) as u64);
    emit_u(rend, "Protection information interval supported (P_I_I_SUP)", (body[3] >> 4 & 1) as u64);
    emit_u(rend, "Logical unit I_T nexus clear (LUICLR)", (body[3] & 1) as u64);
    emit_u(rend, "Referrals supported (R_SUP)", (body[4] >> 4 & 1) as u64);
    emit_u(rend, "Revert to defaults supported (RTD_SUP)", (body[4] >> 3 & 1) as u64);
    emit_u(rend, "History snapshots release effective (HSSRELEF)", (body[4] >> 1 & 1) as u64);
    emit_u(rend, "Capability-based command security (CBCS)", (body[4] & 1) as u64);
    emit_u(rend, "Multi I_T nexus microcode download", (body[5] & 0xf) as u64);
    emit_u(rend, "Extended self-test completion minutes", be(&body[6..8]));
    emit_u(rend, "Power on activation supported (POA_SUP)", (body[8] >> 7 & 1) as u64);
    emit_u(rend, "Hard reset activation supported (HRA_SUP)", (body[8] >> 6 & 1) as u64);
    emit_u(rend, "Vendor specific activation supported (VSA_SUP)", (body[8] >> 5 & 1) as u64);
    emit_u(rend, "Maximum supported sense data length", body[9] as u64);
    Ok(())
}

fn decode_mode_page_policy(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    rend.open_arr("mode_page_policy_descriptor_list");
    for d in body.chunks_exact(4) {
        let page = d[0] & 0x3f;
        let subpage = d[1];
        rend.open_obj("");
        if subpage != 0 {
            emit_str(rend, "Page and subpage", &format!("0x{page:02x},0x{subpage:02x}"));
        } else {
            emit_str(rend, "Page", &format!("0x{page:02x}"));
        }
        emit_u(rend, "Multiple logical units share (MLUS)", (d[2] >> 7 & 1) as u64);
        let policy = d[2] & 0x3;
        emit_str(
            rend,
            "Mode page policy",
            match policy {
                0 => "shared",
                1 => "per target port",
                3 => "per I_T nexus",
                _ => "reserved",
            },
        );
        rend.close();
    }
    rend.close();
    Ok(())
}

fn decode_scsi_ports(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    rend.open_arr("scsi_ports_descriptor_list");
    let mut off = 0usize;
    while off + 8 <= body.len() {
        rend.open_obj("");
        emit_u(rend, "Relative port identifier", be(&body[off + 2..off + 4]));
        let ip_len = be(&body[off + 6..off + 8]) as usize;
        let cur = off + 8 + ip_len;
        if ip_len > 0 {
            if cur > body.len() {
                rend.close();
                rend.close();
                return Err(SdparmError::Malformed(
                    "initiator port transport id overruns page".into(),
                ));
            }
            emit_bytes(rend, "Initiator port transport id", &body[off + 8..cur]);
        }
        if cur + 4 > body.len() {
            rend.close();
            break;
        }
        let tp_len = be(&body[cur + 2..cur + 4]) as usize;
        let tp_end = cur + 4 + tp_len;
        if tp_end > body.len() {
            rend.close();
            rend.close();
            return Err(SdparmError::Malformed(
                "target port descriptors overrun page".into(),
            ));
        }
        rend.open_arr("target_port_designators");
        for d in device_id::parse_designators(&body[cur + 4..tp_end]) {
            rend.open_obj("");
            device_id::emit_designator(rend, &d)
                .map_err(|e| SdparmError::Malformed(e.to_string()))?;
            rend.close();
        }
        rend.close();
        rend.close();
        off = tp_end;
    }
    rend.close();
    Ok(())
}

fn decode_ata_information(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    if body.len() < 36 {
        return Err(SdparmError::Malformed("ATA information page too short".into()));
    }
    emit_str(rend, "SAT vendor identification", &trim_ascii(&body[4..12]));
    emit_str(rend, "SAT product identification", &trim_ascii(&body[12..28]));
    emit_str(rend, "SAT product revision level", &trim_ascii(&body[28..32]));
    if body.len() > 52 {
        emit_hex(rend, "Command code", body[52] as u64);
    }
    if rend.opts.long && body.len() >= 56 + 512 {
        rend.hr("  ATA IDENTIFY DEVICE data:".to_string());
        rend.hr(hex_dump(&body[56..56 + 512]));
        rend.kv_hex_bytes("identify_device_data", &body[56..56 + 512]);
    }
    Ok(())
}

fn decode_power_condition(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    if body.len() < 14 {
        return Err(SdparmError::Malformed("power condition page too short".into()));
    }
    emit_u(rend, "Standby_y supported", (body[0] >> 1 & 1) as u64);
    emit_u(rend, "Standby_z supported", (body[0] & 1) as u64);
    emit_u(rend, "Idle_c supported", (body[1] >> 2 & 1) as u64);
    emit_u(rend, "Idle_b supported", (body[1] >> 1 & 1) as u64);
    emit_u(rend, "Idle_a supported", (body[1] & 1) as u64);
    emit_u(rend, "Stopped condition recovery time (ms)", be(&body[2..4]));
    emit_u(rend, "Standby_z condition recovery time (ms)", be(&body[4..6]));
    emit_u(rend, "Standby_y condition recovery time (ms)", be(&body[6..8]));
    emit_u(rend, "Idle_a condition recovery time (ms)", be(&body[8..10]));
    emit_u(rend, "Idle_b condition recovery time (ms)", be(&body[10..12]));
    emit_u(rend, "Idle_c condition recovery time (ms)", be(&body[12..14]));
    Ok(())
}

fn decode_device_constituents(
    rend: &mut Renderer,
    body: &[u8],
    pdt: i8,
    protect: bool,
    depth: u8,
) -> Result<(), SdparmError> {
    rend.open_arr("constituent_descriptor_list");
    let mut off = 0usize;
    while off + 8 <= body.len() {
        let ctype = be(&body[off..off + 2]);
        let cdt = body[off + 2] & 0x1f;
        let desc_len = be(&body[off + 6..off + 8]) as usize;
        let end = off + 8 + desc_len;
        if end > body.len() {
            rend.close();
            return Err(SdparmError::Malformed(
                "constituent descriptor overruns page".into(),
            ));
        }
        rend.open_obj("");
        emit_u(rend, "Constituent type", ctype);
        emit_u(rend, "Constituent device type", cdt as u64);
        let mut cur = off + 8;
        while cur + 4 <= end {
            let stype = body[cur];
            let slen = be(&body[cur + 2..cur + 4]) as usize;
            let send = cur + 4 + slen;
            if send > end {
                rend.close();
                rend.close();
                return Err(SdparmError::Malformed(
                    "constituent specific descriptor overruns its record".into(),
                ));
            }
            if stype == 1 {
                // Embedded VPD page. Never recurse into another Device
                // Constituents page.
                let inner = &body[cur + 4..send];
                let inner_code = inner.get(1).copied().unwrap_or(0);
                if inner_code == 0x8b || depth >= MAX_CONSTITUENT_DEPTH {
                    warn!(
                        "suppressing constituent recursion into page 0x{inner_code:02x}"
                    );
                } else {
                    rend.open_obj("constituent_vpd");
                    decode_vpd(inner, pdt, protect, rend, depth + 1)?;
                    rend.close();
                }
            } else {
                emit_bytes(rend, "Constituent specific descriptor", &body[cur + 4..send]);
            }
            cur = send;
        }
        rend.close();
        off = end;
    }
    rend.close();
    Ok(())
}

fn decode_cfa_profile(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    rend.open_arr("cfa_profile_descriptor_list");
    for d in body.chunks_exact(4) {
        rend.hr(format!("  profile: 0x{}", hex::encode(d)));
        rend.kv_str("", &format!("0x{}", hex::encode(d)));
    }
    rend.close();
    Ok(())
}

fn decode_power_consumption(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    rend.open_arr("power_consumption_descriptor_list");
    for d in body.chunks_exact(4) {
        rend.open_obj("");
        emit_u(rend, "Power consumption identifier", d[0] as u64);
        let units = d[1] & 0x7;
        let unit_str = match units {
            0 => "gigawatts",
            1 => "megawatts",
            2 => "kilowatts",
            3 => "hundred watts",
            4 => "watts",
            5 => "hundred milliwatts",
            6 => "milliwatts",
            _ => "reserved",
        };
        emit_u(rend, "Power consumption value", be(&d[2..4]));
        emit_str(rend, "Power consumption units", unit_str);
        rend.close();
    }
    rend.close();
    Ok(())
}

fn decode_third_party_copy(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    rend.open_arr("third_party_copy_descriptor_list");
    let mut off = 0usize;
    while off + 4 <= body.len() {
        let dtype = be(&body[off..off + 2]);
        let len = be(&body[off + 2..off + 4]) as usize;
        let end = off + 4 + len;
        if end > body.len() {
            rend.close();
            return Err(SdparmError::Malformed(
                "third party copy descriptor overruns page".into(),
            ));
        }
        rend.open_obj("");
        emit_hex(rend, "Descriptor type", dtype);
        emit_bytes(rend, "Descriptor data", &body[off + 4..end]);
        rend.close();
        off = end;
    }
    rend.close();
    Ok(())
}

fn decode_proto_specific(
    rend: &mut Renderer,
    body: &[u8],
    arr_key: &str,
) -> Result<(), SdparmError> {
    rend.open_arr(arr_key);
    let mut off = 0usize;
    while off + 6 <= body.len() {
        let rel_port = be(&body[off..off + 2]);
        let proto = body[off + 2] & 0xf;
        let len = be(&body[off + 4..off + 6]) as usize;
        let end = off + 6 + len;
        if end > body.len() {
            rend.close();
            return Err(SdparmError::Malformed(
                "protocol specific descriptor overruns page".into(),
            ));
        }
        rend.open_obj("");
        emit_u(rend, "Relative port identifier", rel_port);
        let pname = TransportId::from_protocol_id(proto)
            .map(|t| t.name())
            .unwrap_or("Reserved");
        emit_str(rend, "Protocol identifier", pname);
        if len > 0 {
            emit_bytes(rend, "Protocol specific data", &body[off + 6..end]);
        }
        rend.close();
        off = end;
    }
    rend.close();
    Ok(())
}

fn decode_proto_lu(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    decode_proto_specific(rend, body, "logical_unit_information_descriptor_list")
}

fn decode_proto_port(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    decode_proto_specific(rend, body, "port_information_descriptor_list")
}

fn feature_set_str(code: u16) -> &'static str {
    match code {
        0x0001 => "SPC Discovery 2016",
        0x0101 => "SBC Base 2010",
        0x0102 => "SBC Base 2016",
        0x0103 => "SBC Basic provisioning 2016",
        0x0104 => "SBC Drive maintenance 2016",
        0x0105 => "SBC Zoned 2021",
        0x0201 => "SSC Tape drive 2016",
        _ => "Reserved or vendor",
    }
}

fn decode_feature_sets(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    rend.open_arr("feature_set_code_list");
    for d in body.chunks_exact(2) {
        let code = be(d) as u16;
        rend.hr(format!("  0x{code:04x}  {}", feature_set_str(code)));
        rend.kv_str("", &format!("0x{code:04x} {}", feature_set_str(code)));
    }
    rend.close();
    Ok(())
}

/// Decode the standard INQUIRY response (no page selector under
/// `--inquiry`).
pub fn decode_std_inquiry(rend: &mut Renderer, inq: &InquiryStandard) {
    if rend.opts.quiet {
        rend.hr(format!(
            "    {}  {}  {}",
            inq.vendor_id, inq.product_id, inq.product_rev
        ));
    } else {
        rend.hr("standard INQUIRY:".to_string());
    }
    rend.open_obj("standard_inquiry");
    emit_u(rend, "PQual", inq.peripheral_qualifier as u64);
    emit_u(rend, "Device type", inq.pdt as u64);
    emit_u(rend, "RMB", inq.rmb as u64);
    emit_hex(rend, "Version", inq.version as u64);
    emit_u(rend, "Protect", inq.protect as u64);
    emit_str(rend, "Vendor identification", &inq.vendor_id);
    emit_str(rend, "Product identification", &inq.product_id);
    emit_str(rend, "Product revision level", &inq.product_rev);
    rend.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderOpts;
    use serde_json::json;

    fn wrap(page: u8, body: &[u8]) -> Vec<u8> {
        let mut v = vec![0x00, page];
        v.extend_from_slice(&(body.len() as u16).to_be_bytes());
        v.extend_from_slice(body);
        v
    }

    #[test]
    fn supported_pages_listing() {
        let buf = wrap(0x00, &[0x00, 0x80, 0x83]);
        let mut rend = Renderer::new(RenderOpts::default());
        decode_vpd(&buf, pdt::DISK, false, &mut rend, 0).expect("WTF");
        assert!(rend.lines().iter().any(|l| l.contains("Unit serial number")));
        assert_eq!(supported_codes(&buf).expect("WTF"), vec![0x00, 0x80, 0x83]);
    }

    #[test]
    fn serial_number_json() {
        let buf = wrap(0x80, b"  XYZ123 ");
        let mut rend = Renderer::new(RenderOpts {
            json: true,
            ..Default::default()
        });
        decode_vpd(&buf, pdt::DISK, false, &mut rend, 0).expect("WTF");
        let v = rend.into_json();
        assert_eq!(v["unit_serial_number"]["unit_serial_number"], json!("XYZ123"));
        assert_eq!(v["unit_serial_number"]["acronym"], json!("sn"));
    }

    #[test]
    fn constituents_do_not_recurse_into_themselves() {
        // A constituent embedding another Device Constituents page.
        let inner = wrap(0x8b, &[]);
        let mut cspec = vec![0x01, 0x00];
        cspec.extend_from_slice(&(inner.len() as u16).to_be_bytes());
        cspec.extend_from_slice(&inner);
        let mut desc = vec![0x00, 0x01, 0x00, 0x00, 0x00, 0x00];
        desc.extend_from_slice(&(cspec.len() as u16).to_be_bytes());
        desc.extend_from_slice(&cspec);
        let buf = wrap(0x8b, &desc);
        let mut rend = Renderer::new(RenderOpts::default());
        decode_vpd(&buf, pdt::DISK, false, &mut rend, 0).expect("WTF");
    }

    #[test]
    fn mode_page_policy_decodes() {
        let body = [0x08, 0x00, 0x81, 0x00, 0x0a, 0x01, 0x00, 0x00];
        let buf = wrap(0x87, &body);
        let mut rend = Renderer::new(RenderOpts::default());
        decode_vpd(&buf, pdt::DISK, false, &mut rend, 0).expect("WTF");
        let joined = rend.lines().join("\n");
        assert!(joined.contains("0x08"));
        assert!(joined.contains("per target port"));
        assert!(joined.contains("shared"));
    }
}
