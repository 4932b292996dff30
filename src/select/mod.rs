// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Command-line selector expressions: comma lists of
//! `acronym[.desc_idx][=value]` or `byte:bit:width[=value]`, and page
//! selectors (`acronym` or `number[,subnumber]`).

use anyhow::{Result, anyhow};

use crate::{
    catalog::{
        self, FieldDescriptor, FieldFlags, ModePageName, TransportId, VendorId, VpdPageName,
    },
    engine::error::SdparmError,
};

/// Parse an unsigned number: decimal, `0x` prefixed hex, or trailing-`h`
/// hex (`1ch`).
pub fn parse_num(s: &str) -> Result<u64> {
    let s = s.trim();
    if let Some(hexpart) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return Ok(u64::from_str_radix(hexpart, 16)?);
    }
    if let Some(hexpart) = s.strip_suffix('h').or_else(|| s.strip_suffix('H')) {
        return Ok(u64::from_str_radix(hexpart, 16)?);
    }
    Ok(s.parse::<u64>()?)
}

/// Parse a possibly-negative value (`-1` is the all-ones shorthand).
pub fn parse_signed_num(s: &str) -> Result<i64> {
    let s = s.trim();
    if let Some(rest) = s.strip_prefix('-') {
        return Ok(-(parse_num(rest)? as i64));
    }
    Ok(parse_num(s)? as i64)
}

/// What to do with the selected fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Get,
    Set,
    Clear,
}

/// Display mode attached to a `--get` item's `=value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GetMode {
    /// 0: every available page control.
    #[default]
    AllControls,
    /// 1: current only, unsigned.
    Current,
    /// 2: current only, signed.
    CurrentSigned,
    /// 3: every available page control, signed.
    AllControlsSigned,
}

impl GetMode {
    fn from_value(v: i64) -> Result<Self, SdparmError> {
        Ok(match v {
            0 => GetMode::AllControls,
            1 => GetMode::Current,
            2 => GetMode::CurrentSigned,
            3 => GetMode::AllControlsSigned,
            other => {
                return Err(SdparmError::Syntax(format!(
                    "--get value must be 0..=3, got {other}"
                )));
            },
        })
    }

    pub fn signed(self) -> bool {
        matches!(self, GetMode::CurrentSigned | GetMode::AllControlsSigned)
    }

    pub fn current_only(self) -> bool {
        matches!(self, GetMode::Current | GetMode::CurrentSigned)
    }
}

/// One parsed selector item, resolved against the catalog.
#[derive(Debug, Clone)]
pub struct FieldRequest {
    /// Catalog entry, or a synthesized descriptor for a numeric triple.
    pub desc: FieldDescriptor,
    /// 0 = first descriptor instance.
    pub desc_index: usize,
    /// Set/clear: value to write (`-1` = all ones). Get: unused.
    pub value: i64,
    /// Whether `=value` was present at all.
    pub value_given: bool,
    pub get_mode: GetMode,
    pub op: Op,
}

/// A numeric triple gets a descriptor with an empty acronym, attributed
/// to the page the `--page` option named.
fn synth_numeric(page: u8, subpage: u8, sb: u64, bit: u64, width: u64) -> Result<FieldDescriptor, SdparmError> {
    if bit > 7 {
        return Err(SdparmError::Syntax(format!(
            "start bit {bit} out of range 0..=7"
        )));
    }
    if !(1..=64).contains(&width) {
        return Err(SdparmError::Syntax(format!(
            "bit width {width} out of range 1..=64"
        )));
    }
    if sb > u16::MAX as u64 {
        return Err(SdparmError::Syntax(format!("byte offset {sb} too large")));
    }
    Ok(FieldDescriptor {
        acronym: "",
        page_code: page,
        subpage_code: subpage,
        pdt: catalog::pdt::ANY,
        start_byte: sb as u16,
        start_bit: bit as u8,
        num_bits: width as u8,
        flags: FieldFlags::HEX,
        desc_id: None,
        description: "",
        extra: None,
    })
}

/// Resolve one acronym against the catalog, preferring an entry on
/// `want_page` when acronyms collide across pages.
fn resolve_acronym(
    acron: &str,
    want_page: Option<(u8, u8)>,
    transport: Option<TransportId>,
    vendor: Option<VendorId>,
) -> Result<FieldDescriptor, SdparmError> {
    let hits = catalog::fields_by_acronym(acron, transport, vendor);
    if hits.is_empty() {
        return Err(SdparmError::NotFound(format!(
            "acronym '{acron}' not found in {} namespace",
            match (transport, vendor) {
                (_, Some(v)) => v.name(),
                (Some(t), _) => t.name(),
                _ => "the generic",
            }
        )));
    }
    match want_page {
        Some((p, sp)) => hits
            .iter()
            .find(|f| f.page_code == p && f.subpage_code == sp)
            .map(|f| **f)
            .ok_or_else(|| {
                SdparmError::NotFound(format!(
                    "acronym '{acron}' exists but not in page 0x{p:02x},0x{sp:02x}"
                ))
            }),
        None => Ok(*hits[0]),
    }
}

/// Parse one comma list for `--get=`, `--set=` or `--clear=`.
///
/// `page` is the `--page` selection when given; numeric triples require
/// it, and acronym resolution prefers it. For set/clear every item must
/// land on one single page: the first resolved item pins the page and
/// later acronym collisions are searched for an entry on that page.
pub fn parse_field_list(
    list: &str,
    op: Op,
    page: Option<(u8, u8)>,
    transport: Option<TransportId>,
    vendor: Option<VendorId>,
) -> Result<Vec<FieldRequest>, SdparmError> {
    let mut out: Vec<FieldRequest> = Vec::new();
    let mut pinned = page;
    for raw_item in list.split(',') {
        let item = raw_item.trim();
        if item.is_empty() {
            return Err(SdparmError::Syntax(format!(
                "empty item in selector list '{list}'"
            )));
        }
        let (lhs, rhs) = match item.split_once('=') {
            Some((l, r)) => (l.trim(), Some(r.trim())),
            None => (item, None),
        };
        let value = match rhs {
            Some(r) => parse_signed_num(r)
                .map_err(|e| SdparmError::Syntax(format!("bad value in '{item}': {e}")))?,
            None => match op {
                // Write all-ones when no value is given; reads default to
                // showing every page control.
                Op::Set => -1,
                Op::Get | Op::Clear => 0,
            },
        };

        let colon_parts: Vec<&str> = lhs.split(':').collect();
        let (desc, desc_index) = if colon_parts.len() == 3 {
            let Some((p, sp)) = pinned else {
                return Err(SdparmError::Syntax(format!(
                    "numeric field '{lhs}' requires --page="
                )));
            };
            let nums: Result<Vec<u64>> = colon_parts
                .iter()
                .map(|t| parse_num(t).map_err(|e| anyhow!("bad number '{t}': {e}")))
                .collect();
            let nums = nums.map_err(|e| SdparmError::Syntax(e.to_string()))?;
            (synth_numeric(p, sp, nums[0], nums[1], nums[2])?, 0)
        } else if colon_parts.len() != 1 {
            return Err(SdparmError::Syntax(format!(
                "'{lhs}' is neither an acronym nor byte:bit:width"
            )));
        } else {
            let (acron, idx) = match lhs.rsplit_once('.') {
                Some((a, i)) if i.chars().all(|c| c.is_ascii_digit()) && !i.is_empty() => (
                    a,
                    i.parse::<usize>()
                        .map_err(|e| SdparmError::Syntax(format!("bad descriptor index: {e}")))?,
                ),
                _ => (lhs, 0),
            };
            (resolve_acronym(acron, pinned, transport, vendor)?, idx)
        };

        // Writes within one invocation must hit a single page.
        if matches!(op, Op::Set | Op::Clear) && pinned.is_none() {
            pinned = Some((desc.page_code, desc.subpage_code));
        }
        if let Some((p, sp)) = pinned
            && matches!(op, Op::Set | Op::Clear)
            && (desc.page_code != p || desc.subpage_code != sp)
        {
            return Err(SdparmError::Contradict(format!(
                "'{item}' is in page 0x{:02x},0x{:02x} but this invocation writes page 0x{p:02x},0x{sp:02x}",
                desc.page_code, desc.subpage_code
            )));
        }

        let get_mode = if op == Op::Get {
            GetMode::from_value(value)?
        } else {
            GetMode::default()
        };

        out.push(FieldRequest {
            desc,
            desc_index,
            value,
            value_given: rhs.is_some(),
            get_mode,
            op,
        });
    }
    Ok(out)
}

/// A `--page=` selection: mode-page acronym or `number[,subnumber]`.
#[derive(Debug, Clone, Copy)]
pub struct PageSelection {
    pub page_code: u8,
    pub subpage_code: u8,
    pub name: Option<&'static ModePageName>,
}

pub fn parse_mode_page(
    s: &str,
    pdt: i8,
    transport: Option<TransportId>,
    vendor: Option<VendorId>,
) -> Result<PageSelection, SdparmError> {
    let s = s.trim();
    let (first, second) = match s.split_once(',') {
        Some((a, b)) => (a.trim(), Some(b.trim())),
        None => (s, None),
    };
    if let Ok(page) = parse_num(first) {
        if page > 0x3e {
            return Err(SdparmError::Syntax(format!(
                "page code 0x{page:x} exceeds 0x3e"
            )));
        }
        let subpage = match second {
            Some(sp) => {
                let v = parse_num(sp)
                    .map_err(|e| SdparmError::Syntax(format!("bad subpage '{sp}': {e}")))?;
                if v > 0xfe {
                    return Err(SdparmError::Syntax(format!(
                        "subpage code 0x{v:x} exceeds 0xfe"
                    )));
                }
                v as u8
            },
            None => 0,
        };
        let name =
            catalog::find_mpage_name(page as u8, subpage, pdt, transport, vendor);
        return Ok(PageSelection {
            page_code: page as u8,
            subpage_code: subpage,
            name,
        });
    }
    if second.is_some() {
        return Err(SdparmError::Syntax(format!(
            "subpage may only follow a numeric page: '{s}'"
        )));
    }
    let name = catalog::mpage_by_acronym(first, transport, vendor).ok_or_else(|| {
        SdparmError::NotFound(format!("mode page acronym '{first}' not known"))
    })?;
    Ok(PageSelection {
        page_code: name.page_code,
        subpage_code: name.subpage_code,
        name: Some(name),
    })
}

/// A `--page=` selection under `--inquiry`: VPD acronym or page number.
#[derive(Debug, Clone, Copy)]
pub struct VpdSelection {
    pub page_code: u8,
    pub name: Option<&'static VpdPageName>,
}

pub fn parse_vpd_page(s: &str, pdt: i8) -> Result<VpdSelection, SdparmError> {
    let s = s.trim();
    if let Ok(code) = parse_num(s) {
        if code > 0xff {
            return Err(SdparmError::Syntax(format!(
                "VPD page code 0x{code:x} exceeds 0xff"
            )));
        }
        return Ok(VpdSelection {
            page_code: code as u8,
            name: catalog::find_vpd_name(code as u8, 0, pdt),
        });
    }
    let name = catalog::vpd_by_acronym(s)
        .ok_or_else(|| SdparmError::NotFound(format!("VPD page acronym '{s}' not known")))?;
    Ok(VpdSelection {
        page_code: name.page_code,
        name: Some(name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(parse_num("42").expect("WTF"), 42);
        assert_eq!(parse_num("0x1c").expect("WTF"), 0x1c);
        assert_eq!(parse_num("1ch").expect("WTF"), 0x1c);
        assert_eq!(parse_signed_num("-1").expect("WTF"), -1);
        assert!(parse_num("0x").is_err());
        assert!(parse_num("forty").is_err());
    }

    #[test]
    fn acronym_get_list() {
        let reqs =
            parse_field_list("WCE,RCD=1", Op::Get, None, None, None).expect("WTF");
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].desc.acronym, "WCE");
        assert_eq!(reqs[0].get_mode, GetMode::AllControls);
        assert_eq!(reqs[1].get_mode, GetMode::Current);
    }

    #[test]
    fn set_defaults_to_all_ones() {
        let reqs = parse_field_list("WCE", Op::Set, None, None, None).expect("WTF");
        assert_eq!(reqs[0].value, -1);
        assert!(!reqs[0].value_given);
    }

    #[test]
    fn cross_page_set_rejected() {
        // WCE is caching [0x08], DCE is tape compression [0x0f].
        let err = parse_field_list("WCE=1,DCE=0", Op::Set, None, None, None)
            .expect_err("WTF");
        assert!(matches!(err, SdparmError::Contradict(_)));
    }

    #[test]
    fn descriptor_index_suffix() {
        let reqs = parse_field_list(
            "PHY_ID.1",
            Op::Get,
            None,
            Some(TransportId::Sas),
            None,
        )
        .expect("WTF");
        assert_eq!(reqs[0].desc_index, 1);
        assert_eq!(reqs[0].desc.acronym, "PHY_ID");
    }

    #[test]
    fn numeric_triple_needs_page() {
        let err =
            parse_field_list("2:2:1=1", Op::Set, None, None, None).expect_err("WTF");
        assert!(matches!(err, SdparmError::Syntax(_)));
        let reqs = parse_field_list("2:2:1=1", Op::Set, Some((0x08, 0)), None, None)
            .expect("WTF");
        assert_eq!(reqs[0].desc.start_byte, 2);
        assert_eq!(reqs[0].desc.start_bit, 2);
        assert_eq!(reqs[0].desc.num_bits, 1);
        assert!(reqs[0].desc.flags.contains(FieldFlags::HEX));
    }

    #[test]
    fn numeric_triple_range_checks() {
        assert!(parse_field_list("2:8:1", Op::Get, Some((8, 0)), None, None).is_err());
        assert!(parse_field_list("2:7:65", Op::Get, Some((8, 0)), None, None).is_err());
        assert!(parse_field_list("2:7", Op::Get, Some((8, 0)), None, None).is_err());
    }

    #[test]
    fn page_selectors() {
        let ps = parse_mode_page("ca", catalog::pdt::DISK, None, None).expect("WTF");
        assert_eq!(ps.page_code, 0x08);
        let ps = parse_mode_page("0x19,1", catalog::pdt::ANY, Some(TransportId::Sas), None)
            .expect("WTF");
        assert_eq!((ps.page_code, ps.subpage_code), (0x19, 1));
        assert!(ps.name.expect("WTF").layout.is_some());
        assert!(parse_mode_page("0x3f", catalog::pdt::ANY, None, None).is_ok());
        assert!(parse_mode_page("0x40", catalog::pdt::ANY, None, None).is_err());
        assert!(parse_mode_page("nosuch", catalog::pdt::ANY, None, None).is_err());
    }

    #[test]
    fn vpd_selectors() {
        let vs = parse_vpd_page("di", catalog::pdt::ANY).expect("WTF");
        assert_eq!(vs.page_code, 0x83);
        let vs = parse_vpd_page("0xb0", catalog::pdt::DISK).expect("WTF");
        assert_eq!(vs.name.expect("WTF").acronym, "bl");
    }
}
