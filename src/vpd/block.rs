// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! SBC/ZBC decoders for the PDT-dependent 0xb0..0xba range on
//! direct-access and zoned block devices.

use crate::{
    engine::error::SdparmError,
    render::Renderer,
    vpd::{be, emit_bytes, emit_hex, emit_str, emit_u},
};

pub fn decode(rend: &mut Renderer, page_code: u8, body: &[u8]) -> Result<(), SdparmError> {
    match page_code {
        0xb0 => block_limits(rend, body),
        0xb1 => block_device_characteristics(rend, body),
        0xb2 => logical_block_provisioning(rend, body),
        0xb3 => referrals(rend, body),
        0xb4 => supported_block_lengths(rend, body),
        0xb5 => block_device_characteristics_ext(rend, body),
        0xb6 => zoned_characteristics(rend, body),
        0xb7 => block_limits_ext(rend, body),
        0xb8 => format_presets(rend, body),
        0xb9 => concurrent_positioning(rend, body),
        0xba => capacity_product_id(rend, body),
        other => Err(SdparmError::Malformed(format!(
            "page 0x{other:02x} routed to the block decoder"
        ))),
    }
}

fn block_limits(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    if body.len() < 12 {
        return Err(SdparmError::Malformed("block limits page too short".into()));
    }
    emit_u(rend, "Write same non-zero (WSNZ)", (body[0] & 1) as u64);
    emit_u(rend, "Maximum compare and write length", body[1] as u64);
    emit_u(rend, "Optimal transfer length granularity", be(&body[2..4]));
    emit_u(rend, "Maximum transfer length", be(&body[4..8]));
    emit_u(rend, "Optimal transfer length", be(&body[8..12]));
    if body.len() < 60 {
        return Ok(());
    }
    emit_u(rend, "Maximum prefetch length", be(&body[12..16]));
    emit_u(rend, "Maximum unmap LBA count", be(&body[16..20]));
    emit_u(rend, "Maximum unmap block descriptor count", be(&body[20..24]));
    emit_u(rend, "Optimal unmap granularity", be(&body[24..28]));
    let ugav = (body[28] >> 7) & 1;
    emit_u(rend, "Unmap granularity alignment valid (UGAVALID)", ugav as u64);
    emit_u(
        rend,
        "Unmap granularity alignment",
        be(&body[28..32]) & 0x7fff_ffff,
    );
    emit_u(rend, "Maximum write same length", be(&body[32..40]));
    emit_u(rend, "Maximum atomic transfer length", be(&body[40..44]));
    emit_u(rend, "Atomic alignment", be(&body[44..48]));
    emit_u(rend, "Atomic transfer length granularity", be(&body[48..52]));
    emit_u(
        rend,
        "Maximum atomic transfer length with atomic boundary",
        be(&body[52..56]),
    );
    emit_u(rend, "Maximum atomic boundary size", be(&body[56..60]));
    Ok(())
}

fn rotation_rate_str(rate: u64) -> Option<&'static str> {
    match rate {
        0 => Some("not reported"),
        1 => Some("non-rotating (solid state)"),
        _ => None,
    }
}

fn block_device_characteristics(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    if body.len() < 8 {
        return Err(SdparmError::Malformed(
            "block device characteristics page too short".into(),
        ));
    }
    let rate = be(&body[0..2]);
    match rotation_rate_str(rate) {
        Some(s) => emit_str(rend, "Medium rotation rate", s),
        None => emit_u(rend, "Medium rotation rate (rpm)", rate),
    }
    emit_u(rend, "Product type", body[2] as u64);
    emit_u(rend, "WABEREQ", ((body[3] >> 6) & 0x3) as u64);
    emit_u(rend, "WACEREQ", ((body[3] >> 4) & 0x3) as u64);
    emit_u(rend, "Nominal form factor", (body[3] & 0xf) as u64);
    emit_u(rend, "ZONED (obsolete)", ((body[4] >> 4) & 0x3) as u64);
    emit_u(rend, "Background operation control supported (BOCS)", ((body[4] >> 2) & 1) as u64);
    emit_u(rend, "Force unit access behaviour (FUAB)", ((body[4] >> 1) & 1) as u64);
    emit_u(rend, "Verify byte check unmapped LBA supported (VBULS)", (body[4] & 1) as u64);
    if body.len() >= 12 {
        emit_u(rend, "Depopulation time (seconds)", be(&body[8..12]));
    }
    Ok(())
}

fn logical_block_provisioning(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    if body.len() < 4 {
        return Err(SdparmError::Malformed(
            "logical block provisioning page too short".into(),
        ));
    }
    emit_u(rend, "Threshold exponent", body[0] as u64);
    emit_u(rend, "Unmap command supported (LBPU)", ((body[1] >> 7) & 1) as u64);
    emit_u(rend, "Write same (16) with unmap supported (LBPWS)", ((body[1] >> 6) & 1) as u64);
    emit_u(rend, "Write same (10) with unmap supported (LBPWS10)", ((body[1] >> 5) & 1) as u64);
    emit_u(rend, "Logical block provisioning read zeros (LBPRZ)", ((body[1] >> 2) & 0x7) as u64);
    emit_u(rend, "Anchored LBAs supported (ANC_SUP)", ((body[1] >> 1) & 1) as u64);
    emit_u(rend, "Descriptor present (DP)", (body[1] & 1) as u64);
    emit_u(rend, "Minimum percentage", ((body[2] >> 3) & 0x1f) as u64);
    let ptype = body[2] & 0x7;
    emit_str(
        rend,
        "Provisioning type",
        match ptype {
            0 => "not reported",
            1 => "resource provisioned",
            2 => "thin provisioned",
            _ => "reserved",
        },
    );
    emit_u(rend, "Threshold percentage", body[3] as u64);
    Ok(())
}

fn referrals(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    if body.len() < 12 {
        return Err(SdparmError::Malformed("referrals page too short".into()));
    }
    emit_u(rend, "User data segment size", be(&body[4..8]));
    emit_u(rend, "User data segment multiplier", be(&body[8..12]));
    Ok(())
}

fn supported_block_lengths(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    rend.open_arr("logical_block_length_descriptor_list");
    for d in body.chunks_exact(8) {
        rend.open_obj("");
        emit_u(rend, "Logical block length", be(&d[0..4]));
        emit_u(rend, "P_I_I_SUP", ((d[4] >> 6) & 1) as u64);
        emit_u(rend, "NO_PI_CHK", ((d[4] >> 3) & 1) as u64);
        emit_u(rend, "GRD_CHK", ((d[4] >> 2) & 1) as u64);
        emit_u(rend, "APP_CHK", ((d[4] >> 1) & 1) as u64);
        emit_u(rend, "REF_CHK", (d[4] & 1) as u64);
        emit_u(rend, "T3PS", ((d[5] >> 3) & 1) as u64);
        emit_u(rend, "T2PS", ((d[5] >> 2) & 1) as u64);
        emit_u(rend, "T1PS", ((d[5] >> 1) & 1) as u64);
        emit_u(rend, "T0PS", (d[5] & 1) as u64);
        rend.close();
    }
    rend.close();
    Ok(())
}

fn block_device_characteristics_ext(
    rend: &mut Renderer,
    body: &[u8],
) -> Result<(), SdparmError> {
    if body.len() < 8 {
        return Err(SdparmError::Malformed(
            "block device characteristics extension page too short".into(),
        ));
    }
    emit_u(rend, "Utilization type", body[1] as u64);
    emit_u(rend, "Utilization units", body[2] as u64);
    emit_u(rend, "Utilization interval", body[3] as u64);
    emit_u(rend, "Utilization B", be(&body[4..8]));
    if body.len() >= 12 {
        emit_u(rend, "Utilization A", be(&body[8..12]));
    }
    Ok(())
}

fn zoned_characteristics(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    if body.len() < 16 {
        return Err(SdparmError::Malformed(
            "zoned block device characteristics page too short".into(),
        ));
    }
    emit_u(rend, "Unrestricted read in sequential write required zone (URSWRZ)", (body[0] & 1) as u64);
    emit_u(rend, "Optimal number of open sequential write preferred zones", be(&body[4..8]));
    emit_u(
        rend,
        "Optimal number of non-sequentially written sequential write preferred zones",
        be(&body[8..12]),
    );
    emit_u(rend, "Maximum number of open sequential write required zones", be(&body[12..16]));
    if body.len() >= 20 {
        let zdef = (body[16] >> 4) & 0xf;
        emit_str(
            rend,
            "Zoned behaviour",
            match zdef {
                0 => "not reported",
                1 => "host aware",
                2 => "host managed",
                _ => "reserved",
            },
        );
    }
    Ok(())
}

fn block_limits_ext(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    if body.len() < 12 {
        return Err(SdparmError::Malformed(
            "block limits extension page too short".into(),
        ));
    }
    emit_u(rend, "Maximum number of streams", be(&body[4..6]));
    emit_u(rend, "Optimal stream write size", be(&body[6..8]));
    emit_u(rend, "Stream granularity size", be(&body[8..12]));
    Ok(())
}

fn format_presets(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    rend.open_arr("format_preset_descriptor_list");
    for d in body.chunks_exact(64) {
        rend.open_obj("");
        emit_u(rend, "Preset identifier", be(&d[0..4]));
        emit_u(rend, "Block size", be(&d[8..12]));
        emit_u(rend, "Number of logical blocks", be(&d[16..24]));
        emit_hex(rend, "Protection field usage", (d[12] & 0x7) as u64);
        rend.close();
    }
    rend.close();
    Ok(())
}

fn concurrent_positioning(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    rend.open_arr("lba_range_descriptor_list");
    if body.len() < 4 {
        rend.close();
        return Err(SdparmError::Malformed(
            "concurrent positioning ranges page too short".into(),
        ));
    }
    for d in body[4..].chunks_exact(32) {
        rend.open_obj("");
        emit_u(rend, "LBA range number", d[0] as u64);
        emit_u(rend, "Number of storage elements", d[1] as u64);
        emit_u(rend, "Lowest LBA", be(&d[8..16]));
        emit_u(rend, "Number of LBAs", be(&d[16..24]));
        rend.close();
    }
    rend.close();
    Ok(())
}

fn capacity_product_id(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    rend.open_arr("capacity_product_identification_list");
    for d in body.chunks_exact(48) {
        rend.open_obj("");
        emit_u(rend, "Capacity (units of 500 GB)", be(&d[0..4]));
        emit_bytes(rend, "Product identification", &d[4..20]);
        rend.close();
    }
    rend.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderOpts;
    use serde_json::json;

    #[test]
    fn block_limits_short_form() {
        // 16-byte SBC-2 era page body: only the first five fields.
        let mut body = vec![0u8; 12];
        body[0] = 0x01; // WSNZ
        body[2..4].copy_from_slice(&8u16.to_be_bytes());
        body[4..8].copy_from_slice(&0xffffu32.to_be_bytes());
        body[8..12].copy_from_slice(&128u32.to_be_bytes());
        let mut rend = Renderer::new(RenderOpts {
            json: true,
            ..Default::default()
        });
        decode(&mut rend, 0xb0, &body).expect("WTF");
        let v = rend.into_json();
        assert_eq!(v["write_same_non_zero_wsnz"], json!(1));
        assert_eq!(v["maximum_transfer_length"], json!(0xffff));
        assert_eq!(v["optimal_transfer_length"], json!(128));
    }

    #[test]
    fn bdc_ssd_rotation() {
        let mut body = vec![0u8; 8];
        body[0..2].copy_from_slice(&1u16.to_be_bytes());
        let mut rend = Renderer::new(RenderOpts::default());
        decode(&mut rend, 0xb1, &body).expect("WTF");
        assert!(
            rend.lines()
                .iter()
                .any(|l| l.contains("non-rotating (solid state)"))
        );
    }

    #[test]
    fn lbp_thin() {
        let body = [31, 0b1110_0100, 0x02, 10];
        let mut rend = Renderer::new(RenderOpts::default());
        decode(&mut rend, 0xb2, &body).expect("WTF");
        let joined = rend.lines().join("\n");
        assert!(joined.contains("(LBPU): 1"));
        assert!(joined.contains("thin provisioned"));
    }

    #[test]
    fn zbdc_host_managed() {
        let mut body = vec![0u8; 20];
        body[0] = 0x01;
        body[12..16].copy_from_slice(&64u32.to_be_bytes());
        body[16] = 0x20;
        let mut rend = Renderer::new(RenderOpts::default());
        decode(&mut rend, 0xb6, &body).expect("WTF");
        let joined = rend.lines().join("\n");
        assert!(joined.contains("(URSWRZ): 1"));
        assert!(joined.contains("host managed"));
    }

    #[test]
    fn truncated_pages_error() {
        let mut rend = Renderer::new(RenderOpts::default());
        assert!(decode(&mut rend, 0xb0, &[0u8; 4]).is_err());
        assert!(decode(&mut rend, 0xb3, &[0u8; 4]).is_err());
    }
}
