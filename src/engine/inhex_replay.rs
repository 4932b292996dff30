// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Replay of MODE SENSE responses captured into an inhex file: the same
//! page walk and field streaming as the live path, fed from bytes.

use tracing::{debug, warn};

use crate::{
    control_block::header::ModeHeader,
    engine::{ModeOpts, error::SdparmError, print},
    pages::PageControlSet,
    render::Renderer,
    select::FieldRequest,
};

/// How an inhex byte stream splits into MODE SENSE responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InhexModeData {
    pub long: bool,
    /// One full response per present page control, wire order.
    pub replicas: Vec<Vec<u8>>,
}

/// Auto-detect the header flavour from the mode-data-length field: the
/// flavour whose declared total divides the stream evenly wins, 10-byte
/// preferred.
pub fn split_mode_responses(data: &[u8]) -> Result<InhexModeData, SdparmError> {
    for long in [true, false] {
        let min = if long { 8 } else { 4 };
        if data.len() < min {
            continue;
        }
        let Ok(hdr) = ModeHeader::parse(data, long) else {
            continue;
        };
        let total = hdr.total_len();
        if total < min || total > data.len() || data.len() % total != 0 {
            continue;
        }
        let replicas = data.len() / total;
        if replicas > 4 {
            continue;
        }
        debug!(long, total, replicas, "inhex split");
        return Ok(InhexModeData {
            long,
            replicas: data.chunks(total).map(<[u8]>::to_vec).collect(),
        });
    }
    Err(SdparmError::Malformed(format!(
        "inhex stream of {} bytes does not match a MODE SENSE(6/10) response",
        data.len()
    )))
}

/// Build a page-bytes control set from the split replicas. One replica is
/// current only; 2..4 fill current, changeable, default, saved in order.
pub fn page_sets(inhex: &InhexModeData) -> Result<Vec<(u8, u8, PageControlSet)>, SdparmError> {
    let mut bodies = Vec::with_capacity(inhex.replicas.len());
    for replica in &inhex.replicas {
        bodies.push(print::page_slice(replica, inhex.long)?.to_vec());
    }
    let reference = &bodies[0];
    let mut out = Vec::new();
    for (page, subpage, range) in print::walk_pages(reference) {
        let mut set = PageControlSet::new();
        for (idx, body) in bodies.iter().enumerate() {
            let pc = PageControlSet::ALL[idx];
            if body.len() >= range.end {
                set.put(pc, body[range.clone()].to_vec());
            } else {
                warn!(
                    "inhex replica {idx} shorter than page at {}..{}",
                    range.start, range.end
                );
            }
        }
        out.push((page, subpage, set));
    }
    Ok(out)
}

/// Print every page found in the inhex stream (or only `page_filter`).
pub fn print_inhex(
    rend: &mut Renderer,
    opts: &ModeOpts,
    data: &[u8],
    page_filter: Option<(u8, u8)>,
) -> Result<(), SdparmError> {
    let inhex = split_mode_responses(data)?;
    let mut matched = false;
    for (page, subpage, set) in page_sets(&inhex)? {
        if let Some((p, sp)) = page_filter
            && (p != page || sp != subpage)
        {
            continue;
        }
        matched = true;
        print::print_mode_page(rend, opts, page, subpage, &set)?;
    }
    if !matched {
        return Err(SdparmError::NotFound(match page_filter {
            Some((p, sp)) => format!("page 0x{p:02x},0x{sp:02x} not present in inhex data"),
            None => "no mode pages in inhex data".to_string(),
        }));
    }
    Ok(())
}

/// `--get=` against inhex data.
pub fn get_inhex_fields(
    rend: &mut Renderer,
    opts: &ModeOpts,
    data: &[u8],
    reqs: &[FieldRequest],
) -> Result<(), SdparmError> {
    let inhex = split_mode_responses(data)?;
    let sets = page_sets(&inhex)?;
    let mut lookup = |page: u8, subpage: u8| -> Result<PageControlSet, SdparmError> {
        sets.iter()
            .find(|(p, sp, _)| *p == page && *sp == subpage)
            .map(|(_, _, s)| s.clone())
            .ok_or_else(|| {
                SdparmError::NotFound(format!(
                    "page 0x{page:02x},0x{subpage:02x} not present in inhex data"
                ))
            })
    };
    print::print_requested_fields(rend, opts, reqs, &mut lookup)
}

#[cfg(test)]
mod tests {
    use super::*;

    // MODE SENSE(10) response holding a caching page, twice (current +
    // changeable).
    fn two_replica_stream() -> Vec<u8> {
        let mut one = vec![0u8; 8 + 20];
        one[0..2].copy_from_slice(&(8 + 20u16 - 2).to_be_bytes());
        one[8] = 0x08;
        one[9] = 0x12;
        one[10] = 0x14;
        let mut data = one.clone();
        let mut cha = one;
        cha[10] = 0xff;
        data.extend_from_slice(&cha);
        data
    }

    #[test]
    fn split_detects_long_and_replicas() {
        let data = two_replica_stream();
        let inhex = split_mode_responses(&data).expect("WTF");
        assert!(inhex.long);
        assert_eq!(inhex.replicas.len(), 2);
    }

    #[test]
    fn split_rejects_garbage() {
        assert!(split_mode_responses(&[0xde, 0xad]).is_err());
        // Declared length not dividing the stream.
        let mut data = two_replica_stream();
        data.push(0);
        assert!(split_mode_responses(&data).is_err());
    }

    #[test]
    fn sets_carry_page_controls_in_order() {
        let data = two_replica_stream();
        let inhex = split_mode_responses(&data).expect("WTF");
        let sets = page_sets(&inhex).expect("WTF");
        assert_eq!(sets.len(), 1);
        let (page, subpage, set) = &sets[0];
        assert_eq!((*page, *subpage), (0x08, 0));
        assert_eq!(set.mask(), 0b0011);
        assert_eq!(
            set.get(crate::control_block::mode_sense::PageControl::Current)
                .expect("WTF")[2],
            0x14
        );
    }
}
