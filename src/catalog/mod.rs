// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Static page-field catalog: every named field of every known mode page
//! and VPD page, across the generic, transport-specific and vendor-specific
//! namespaces.
//!
//! The tables are flat `&'static` slices; an acronym index over the generic
//! namespace is built lazily on first use.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Generic (SPC/SBC/SSC/MMC/SMC) field and name tables.
pub mod generic;
/// Per-transport overlay tables (FC, SAS).
pub mod transport;
/// Per-vendor overlay tables.
pub mod vendor;
/// VPD page-name table.
pub mod vpd_names;

pub use transport::TransportId;
pub use vendor::VendorId;

/// Peripheral device type codes (SPC byte 0, bits 4..0).
pub mod pdt {
    pub const DISK: i8 = 0x00;
    pub const TAPE: i8 = 0x01;
    pub const PROCESSOR: i8 = 0x03;
    pub const WO: i8 = 0x04;
    pub const MMC: i8 = 0x05;
    pub const OPTICAL: i8 = 0x07;
    pub const MCHANGER: i8 = 0x08;
    pub const SAC: i8 = 0x0c;
    pub const SES: i8 = 0x0d;
    pub const RBC: i8 = 0x0e;
    pub const OSD: i8 = 0x11;
    pub const ADC: i8 = 0x12;
    pub const ZBC: i8 = 0x14;
    /// Wildcard: the entry applies to every device type.
    pub const ANY: i8 = -1;
}

bitflags::bitflags! {
    /// Behavioural flags of a catalog field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldFlags: u16 {
        /// Show in the un-flagged summary listing.
        const COMMON = 1 << 0;
        /// Render the value in hex.
        const HEX = 1 << 1;
        /// Two's-complement signed value.
        const TWOS_COMP = 1 << 2;
        /// An all-ones value is a "-1" sentinel, not a number.
        const ALL_1S = 1 << 3;
        /// JSON naming hint: prefer the description over the acronym.
        const J_USE_DESC = 1 << 4;
        /// JSON naming hint: description carries no parameter name.
        const J_NPARAM_DESC = 1 << 5;
        /// Field overlaps others in the same byte range; selected by the
        /// runtime descriptor type id.
        const CLASH_OK = 1 << 6;
        /// Non-zero current value stops enumeration of descriptor siblings.
        const STOP_IF_SET = 1 << 7;
    }
}

/// One named bit field inside a mode page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub acronym: &'static str,
    pub page_code: u8,
    pub subpage_code: u8,
    /// Applicable device type, `pdt::ANY` for all.
    pub pdt: i8,
    pub start_byte: u16,
    /// Most significant bit of the field within its byte, 0..=7.
    pub start_bit: u8,
    /// Field width, 1..=64, may span bytes big-endian.
    pub num_bits: u8,
    pub flags: FieldFlags,
    /// Required descriptor type id for `CLASH_OK` fields.
    pub desc_id: Option<u8>,
    pub description: &'static str,
    /// Optional multiline annotation, tab-separated lines.
    pub extra: Option<&'static str>,
}

pub(crate) const fn fld(
    acronym: &'static str,
    page_code: u8,
    subpage_code: u8,
    pdt: i8,
    start_byte: u16,
    start_bit: u8,
    num_bits: u8,
    flags: FieldFlags,
    description: &'static str,
) -> FieldDescriptor {
    FieldDescriptor {
        acronym,
        page_code,
        subpage_code,
        pdt,
        start_byte,
        start_bit,
        num_bits,
        flags,
        desc_id: None,
        description,
        extra: None,
    }
}

/// How the repeating descriptor region of a page is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorShape {
    /// A count field at `(num_off, num_bytes)`, adjusted by `inc`, with
    /// fixed-length descriptors.
    Counted {
        num_off: u16,
        num_bytes: u8,
        inc: i8,
        desc_len: u16,
    },
    /// The stored value bounds the descriptor region in bytes:
    /// `count = (stored - (first_desc_off - num_off - num_bytes)) / desc_len`.
    Bounded {
        num_off: u16,
        num_bytes: u8,
        desc_len: u16,
    },
    /// Each descriptor carries its own length field at `(len_off,
    /// len_bytes)` relative to the descriptor start; total descriptor size
    /// is `len_off + len_bytes + encoded_length`.
    VarLen { len_off: u16, len_bytes: u8 },
}

/// Descriptor-region metadata for pages holding a repeating record array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeDescriptorLayout {
    pub first_desc_off: u16,
    pub shape: DescriptorShape,
    /// Descriptors start with a 4-bit type id consulted by `CLASH_OK`
    /// fields.
    pub have_desc_id: bool,
    pub name: &'static str,
}

/// Display metadata of one mode page within a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModePageName {
    pub page_code: u8,
    pub subpage_code: u8,
    pub pdt: i8,
    pub acronym: &'static str,
    pub name: &'static str,
    pub layout: Option<ModeDescriptorLayout>,
}

pub(crate) const fn mpn(
    page_code: u8,
    subpage_code: u8,
    pdt: i8,
    acronym: &'static str,
    name: &'static str,
) -> ModePageName {
    ModePageName {
        page_code,
        subpage_code,
        pdt,
        acronym,
        name,
        layout: None,
    }
}

/// Display metadata of one VPD page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VpdPageName {
    pub page_code: u8,
    /// Disambiguates PDT-dependent reuse of the same code (0 = default).
    pub subvalue: u8,
    pub pdt: i8,
    pub acronym: &'static str,
    pub name: &'static str,
}

/// Collapse write-once and optical-memory devices onto the disk command
/// set; their pages are disk pages.
pub fn decay_pdt(pdt: i8) -> i8 {
    match pdt {
        pdt::WO | pdt::OPTICAL => pdt::DISK,
        other => other,
    }
}

/// "Equals, or either side is wildcard" with PDT decay applied.
pub fn pdt_matches(entry_pdt: i8, pdt: i8) -> bool {
    entry_pdt == pdt::ANY || pdt == pdt::ANY || decay_pdt(entry_pdt) == decay_pdt(pdt)
}

fn field_namespace(
    transport: Option<TransportId>,
    vendor: Option<VendorId>,
) -> &'static [FieldDescriptor] {
    if let Some(v) = vendor {
        vendor::fields(v)
    } else if let Some(t) = transport {
        transport::fields(t)
    } else {
        generic::FIELDS
    }
}

fn mpage_namespace(
    transport: Option<TransportId>,
    vendor: Option<VendorId>,
) -> &'static [ModePageName] {
    if let Some(v) = vendor {
        vendor::mpage_names(v)
    } else if let Some(t) = transport {
        transport::mpage_names(t)
    } else {
        generic::MPAGE_NAMES
    }
}

/// Look up the display entry for a mode page. The PDT match is "equals, or
/// entry marked any"; transport/vendor select the overlay table.
pub fn find_mpage_name(
    page_code: u8,
    subpage_code: u8,
    pdt: i8,
    transport: Option<TransportId>,
    vendor: Option<VendorId>,
) -> Option<&'static ModePageName> {
    mpage_namespace(transport, vendor)
        .iter()
        .find(|n| n.page_code == page_code && n.subpage_code == subpage_code && pdt_matches(n.pdt, pdt))
}

/// Resolve a mode-page acronym within a namespace.
pub fn mpage_by_acronym(
    acronym: &str,
    transport: Option<TransportId>,
    vendor: Option<VendorId>,
) -> Option<&'static ModePageName> {
    mpage_namespace(transport, vendor)
        .iter()
        .find(|n| n.acronym.eq_ignore_ascii_case(acronym))
}

/// All mode-page names of a namespace (for `--enumerate`).
pub fn mpage_names(
    transport: Option<TransportId>,
    vendor: Option<VendorId>,
) -> &'static [ModePageName] {
    mpage_namespace(transport, vendor)
}

/// Look up the display entry for a VPD page.
pub fn find_vpd_name(page_code: u8, subvalue: u8, pdt: i8) -> Option<&'static VpdPageName> {
    let names = vpd_names::VPD_PAGE_NAMES;
    names
        .iter()
        .find(|n| n.page_code == page_code && n.subvalue == subvalue && pdt_matches(n.pdt, pdt))
        .or_else(|| {
            names
                .iter()
                .find(|n| n.page_code == page_code && pdt_matches(n.pdt, pdt))
        })
}

/// Resolve a VPD-page acronym.
pub fn vpd_by_acronym(acronym: &str) -> Option<&'static VpdPageName> {
    vpd_names::VPD_PAGE_NAMES
        .iter()
        .find(|n| n.acronym.eq_ignore_ascii_case(acronym))
}

static GENERIC_ACRONYMS: Lazy<HashMap<&'static str, Vec<&'static FieldDescriptor>>> =
    Lazy::new(|| {
        let mut m: HashMap<&'static str, Vec<&'static FieldDescriptor>> =
            HashMap::with_capacity(generic::FIELDS.len());
        for f in generic::FIELDS {
            m.entry(f.acronym).or_default().push(f);
        }
        m
    });

/// Every field matching an acronym, in table order. Acronyms recur across
/// pages; the caller filters by the page it is operating on.
pub fn fields_by_acronym(
    acronym: &str,
    transport: Option<TransportId>,
    vendor: Option<VendorId>,
) -> Vec<&'static FieldDescriptor> {
    if transport.is_none() && vendor.is_none() {
        let key = acronym.to_ascii_uppercase();
        return GENERIC_ACRONYMS
            .get(key.as_str())
            .cloned()
            .unwrap_or_default();
    }
    field_namespace(transport, vendor)
        .iter()
        .filter(|f| f.acronym.eq_ignore_ascii_case(acronym))
        .collect()
}

/// Fields of one `(page, subpage)` applicable to a device type, in table
/// order (which is wire order for descriptor pages).
pub fn fields_for_page(
    page_code: u8,
    subpage_code: u8,
    pdt: i8,
    transport: Option<TransportId>,
    vendor: Option<VendorId>,
) -> impl Iterator<Item = &'static FieldDescriptor> {
    field_namespace(transport, vendor).iter().filter(move |f| {
        f.page_code == page_code
            && f.subpage_code == subpage_code
            && pdt_matches(f.pdt, pdt)
    })
}
