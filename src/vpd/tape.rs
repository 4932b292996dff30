// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! SSC/ADC decoders for the PDT-dependent 0xb0..0xb5 range on tape and
//! automation devices.

use crate::{
    engine::error::SdparmError,
    render::Renderer,
    utils::trim_ascii,
    vpd::{be, emit_bytes, emit_str, emit_u},
};

pub fn decode(rend: &mut Renderer, page_code: u8, body: &[u8]) -> Result<(), SdparmError> {
    match page_code {
        0xb0 => sequential_access_capabilities(rend, body),
        0xb1 => {
            emit_str(rend, "Manufacturer-assigned serial number", &trim_ascii(body));
            Ok(())
        },
        0xb2 => tapealert_supported_flags(rend, body),
        0xb3 => {
            emit_str(rend, "Automation device serial number", &trim_ascii(body));
            Ok(())
        },
        0xb4 => {
            emit_bytes(rend, "Data transfer device element address", body);
            Ok(())
        },
        0xb5 => logical_block_protection(rend, body),
        other => Err(SdparmError::Malformed(format!(
            "page 0x{other:02x} routed to the tape decoder"
        ))),
    }
}

fn sequential_access_capabilities(
    rend: &mut Renderer,
    body: &[u8],
) -> Result<(), SdparmError> {
    if body.is_empty() {
        return Err(SdparmError::Malformed(
            "sequential access capabilities page empty".into(),
        ));
    }
    emit_u(rend, "Worm media supported (TSMC)", ((body[0] >> 1) & 1) as u64);
    emit_u(rend, "Worm media (WORM)", (body[0] & 1) as u64);
    Ok(())
}

fn tapealert_supported_flags(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    if body.len() < 8 {
        return Err(SdparmError::Malformed(
            "TapeAlert supported flags page too short".into(),
        ));
    }
    let flags = be(&body[0..8]);
    rend.hr(format!("  TapeAlert supported flags: 0x{flags:016x}"));
    rend.kv_str("tapealert_supported_flags", &format!("0x{flags:016x}"));
    if rend.opts.long {
        for bit in 0..64u64 {
            if flags & (1 << (63 - bit)) != 0 {
                rend.hr(format!("    flag {:02}: supported", bit + 1));
            }
        }
    }
    Ok(())
}

fn logical_block_protection(rend: &mut Renderer, body: &[u8]) -> Result<(), SdparmError> {
    rend.open_arr("logical_block_protection_method_list");
    for d in body.chunks_exact(4) {
        rend.open_obj("");
        emit_u(rend, "Protection method", d[0] as u64);
        emit_u(rend, "Protection information length", (d[1] & 0x3f) as u64);
        emit_u(rend, "Protection during write (LBP_W)", ((d[2] >> 7) & 1) as u64);
        emit_u(rend, "Protection during read (LBP_R)", ((d[2] >> 6) & 1) as u64);
        emit_u(rend, "Recover buffered data protected (RBDP)", ((d[2] >> 5) & 1) as u64);
        rend.close();
    }
    rend.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderOpts;

    #[test]
    fn worm_flags() {
        let body = [0x03u8, 0, 0, 0];
        let mut rend = Renderer::new(RenderOpts::default());
        decode(&mut rend, 0xb0, &body).expect("WTF");
        let joined = rend.lines().join("\n");
        assert!(joined.contains("(TSMC): 1"));
        assert!(joined.contains("(WORM): 1"));
    }

    #[test]
    fn tapealert_bits() {
        let mut body = [0u8; 8];
        body[0] = 0x80; // flag 1
        let mut rend = Renderer::new(RenderOpts {
            long: true,
            ..Default::default()
        });
        decode(&mut rend, 0xb2, &body).expect("WTF");
        let joined = rend.lines().join("\n");
        assert!(joined.contains("0x8000000000000000"));
        assert!(joined.contains("flag 01: supported"));
    }
}
