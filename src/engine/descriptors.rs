// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Descriptor-region arithmetic: turning a page's `ModeDescriptorLayout`
//! plus live page bytes into instance offsets.

use tracing::warn;

use crate::{
    catalog::{DescriptorShape, FieldDescriptor, FieldFlags, ModeDescriptorLayout},
    engine::error::SdparmError,
};

/// Cap on one variable-length descriptor's encoded length.
const MAX_VARLEN_DESC: usize = 1024;

fn be(v: &[u8]) -> u64 {
    v.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64)
}

/// Byte offsets (within the page, header included) of each descriptor
/// instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorRegion {
    pub offsets: Vec<usize>,
}

impl DescriptorRegion {
    pub fn count(&self) -> usize {
        self.offsets.len()
    }
}

/// Work out where each descriptor instance starts.
pub fn enumerate_descriptors(
    layout: &ModeDescriptorLayout,
    page: &[u8],
) -> Result<DescriptorRegion, SdparmError> {
    let first = layout.first_desc_off as usize;
    let mut offsets = Vec::new();
    match layout.shape {
        DescriptorShape::Counted {
            num_off,
            num_bytes,
            inc,
            desc_len,
        } => {
            let (num_off, num_bytes) = (num_off as usize, num_bytes as usize);
            if num_off + num_bytes > page.len() {
                return Err(SdparmError::Malformed(format!(
                    "descriptor count field at {num_off} outside {} byte page",
                    page.len()
                )));
            }
            let stored = be(&page[num_off..num_off + num_bytes]) as i64;
            let count = (stored + inc as i64).max(0) as usize;
            for i in 0..count {
                let off = first + i * desc_len as usize;
                if off >= page.len() {
                    warn!(
                        "descriptor {i} at offset {off} beyond {} byte page, stopping",
                        page.len()
                    );
                    break;
                }
                offsets.push(off);
            }
        },
        DescriptorShape::Bounded {
            num_off,
            num_bytes,
            desc_len,
        } => {
            let (num_off, num_bytes) = (num_off as usize, num_bytes as usize);
            if num_off + num_bytes > page.len() {
                return Err(SdparmError::Malformed(format!(
                    "descriptor bound field at {num_off} outside {} byte page",
                    page.len()
                )));
            }
            let stored = be(&page[num_off..num_off + num_bytes]) as usize;
            let lead = first - num_off - num_bytes;
            let count = stored.saturating_sub(lead) / desc_len as usize;
            for i in 0..count {
                let off = first + i * desc_len as usize;
                if off >= page.len() {
                    break;
                }
                offsets.push(off);
            }
        },
        DescriptorShape::VarLen { len_off, len_bytes } => {
            let (len_off, len_bytes) = (len_off as usize, len_bytes as usize);
            let mut off = first;
            while off + len_off + len_bytes <= page.len() {
                let encoded = be(&page[off + len_off..off + len_off + len_bytes]) as usize;
                if encoded > MAX_VARLEN_DESC {
                    warn!(
                        "descriptor at offset {off} declares {encoded} bytes (cap {MAX_VARLEN_DESC}), aborting walk"
                    );
                    break;
                }
                offsets.push(off);
                off += len_off + len_bytes + encoded;
            }
        },
    }
    Ok(DescriptorRegion { offsets })
}

/// Recompute a field's start byte for descriptor instance `idx`. Instance
/// 0 is the catalog offset itself.
pub fn field_offset_for_instance(
    layout: &ModeDescriptorLayout,
    region: &DescriptorRegion,
    field: &FieldDescriptor,
    idx: usize,
) -> Result<usize, SdparmError> {
    if idx == 0 {
        return Ok(field.start_byte as usize);
    }
    let Some(inst_off) = region.offsets.get(idx) else {
        return Err(SdparmError::NotFound(format!(
            "descriptor index {idx} out of range (page has {})",
            region.count()
        )));
    };
    let within = field.start_byte as usize - layout.first_desc_off as usize;
    Ok(inst_off + within)
}

/// For a `CLASH_OK` field, whether descriptor instance `idx` carries the
/// matching 4-bit type id (low nibble of the descriptor's first byte).
pub fn desc_id_matches(
    layout: &ModeDescriptorLayout,
    region: &DescriptorRegion,
    page: &[u8],
    field: &FieldDescriptor,
    idx: usize,
) -> bool {
    if !field.flags.contains(FieldFlags::CLASH_OK) {
        return true;
    }
    let Some(want) = field.desc_id else {
        return true;
    };
    if !layout.have_desc_id {
        return true;
    }
    region
        .offsets
        .get(idx)
        .and_then(|off| page.get(*off))
        .map(|b| b & 0x0f == want)
        .unwrap_or(false)
}
