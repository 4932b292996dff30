// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Generic-namespace tables: SPC plus the device-type command sets
//! (SBC disks, SSC tapes, MMC cd/dvd, SMC changers, ZBC zoned disks).
//!
//! Field order within a page follows wire order; for descriptor pages the
//! offsets describe the first descriptor instance.

use super::{
    DescriptorShape, FieldDescriptor, FieldFlags, ModeDescriptorLayout, ModePageName,
    fld, mpn,
    pdt::{ANY, DISK, MCHANGER, MMC, TAPE},
};

const NF: FieldFlags = FieldFlags::empty();
const CM: FieldFlags = FieldFlags::COMMON;
const HX: FieldFlags = FieldFlags::HEX;
const A1: FieldFlags = FieldFlags::ALL_1S;

/// Mode-page display names, generic namespace.
pub static MPAGE_NAMES: &[ModePageName] = &[
    mpn(0x01, 0x00, ANY, "rw", "Read write error recovery"),
    mpn(0x02, 0x00, ANY, "dr", "Disconnect-reconnect"),
    mpn(0x03, 0x00, DISK, "fo", "Format (obsolete)"),
    mpn(0x04, 0x00, DISK, "ge", "Rigid disk geometry (obsolete)"),
    mpn(0x05, 0x00, MMC, "wp", "Write parameters"),
    mpn(0x07, 0x00, DISK, "ve", "Verify error recovery"),
    mpn(0x08, 0x00, ANY, "ca", "Caching"),
    mpn(0x0a, 0x00, ANY, "co", "Control"),
    mpn(0x0a, 0x01, ANY, "coe", "Control extension"),
    mpn(0x0a, 0x02, DISK, "atag", "Application tag"),
    ModePageName {
        page_code: 0x0a,
        subpage_code: 0x03,
        pdt: DISK,
        acronym: "cdla",
        name: "Command duration limit A",
        layout: Some(ModeDescriptorLayout {
            first_desc_off: 8,
            shape: DescriptorShape::Bounded {
                num_off: 2,
                num_bytes: 2,
                desc_len: 32,
            },
            have_desc_id: false,
            name: "command duration limit T2A",
        }),
    },
    ModePageName {
        page_code: 0x0a,
        subpage_code: 0x04,
        pdt: DISK,
        acronym: "cdlb",
        name: "Command duration limit B",
        layout: Some(ModeDescriptorLayout {
            first_desc_off: 8,
            shape: DescriptorShape::Bounded {
                num_off: 2,
                num_bytes: 2,
                desc_len: 32,
            },
            have_desc_id: false,
            name: "command duration limit T2B",
        }),
    },
    mpn(0x0e, 0x00, MMC, "cd", "CD audio control"),
    mpn(0x0f, 0x00, TAPE, "dac", "Data compression"),
    mpn(0x10, 0x00, DISK, "xo", "XOR control (obsolete)"),
    mpn(0x10, 0x00, TAPE, "dc", "Device configuration"),
    mpn(0x18, 0x00, ANY, "pl", "Protocol specific logical unit"),
    mpn(0x19, 0x00, ANY, "pp", "Protocol specific port"),
    mpn(0x1a, 0x00, ANY, "po", "Power condition"),
    mpn(0x1a, 0x01, ANY, "ps", "Power consumption"),
    mpn(0x1c, 0x00, ANY, "ie", "Informational exceptions control"),
    mpn(0x1c, 0x01, DISK, "bc", "Background control"),
    ModePageName {
        page_code: 0x1c,
        subpage_code: 0x02,
        pdt: DISK,
        acronym: "lbp",
        name: "Logical block provisioning",
        layout: Some(ModeDescriptorLayout {
            first_desc_off: 16,
            shape: DescriptorShape::Bounded {
                num_off: 2,
                num_bytes: 2,
                desc_len: 8,
            },
            have_desc_id: false,
            name: "threshold descriptor",
        }),
    },
    mpn(0x1d, 0x00, MMC, "tp", "Timeout and protect"),
    mpn(0x1d, 0x00, MCHANGER, "eaa", "Element address assignment"),
    mpn(0x2a, 0x00, MMC, "mp", "MM capabilities and mechanical status"),
];

/// Field table, generic namespace.
pub static FIELDS: &[FieldDescriptor] = &[
    // Read write error recovery [0x01]
    fld("AWRE", 0x01, 0, DISK, 2, 7, 1, CM, "Automatic write reallocation enabled"),
    fld("ARRE", 0x01, 0, DISK, 2, 6, 1, CM, "Automatic read reallocation enabled"),
    fld("TB", 0x01, 0, DISK, 2, 5, 1, NF, "Transfer block"),
    fld("RC", 0x01, 0, DISK, 2, 4, 1, NF, "Read continuous"),
    fld("EER", 0x01, 0, DISK, 2, 3, 1, NF, "Enable early recovery"),
    fld("PER", 0x01, 0, ANY, 2, 2, 1, CM, "Post error"),
    fld("DTE", 0x01, 0, ANY, 2, 1, 1, NF, "Data terminate on error"),
    fld("DCR", 0x01, 0, ANY, 2, 0, 1, NF, "Disable correction"),
    fld("RRC", 0x01, 0, ANY, 3, 7, 8, NF, "Read retry count"),
    fld("WRC", 0x01, 0, DISK, 8, 7, 8, NF, "Write retry count"),
    fld("RTL", 0x01, 0, DISK, 10, 7, 16, NF, "Recovery time limit (ms)"),
    // Disconnect-reconnect [0x02]
    fld("BFR", 0x02, 0, ANY, 2, 7, 8, NF, "Buffer full ratio"),
    fld("BER", 0x02, 0, ANY, 3, 7, 8, NF, "Buffer empty ratio"),
    fld("BITL", 0x02, 0, ANY, 4, 7, 16, NF, "Bus inactivity time limit"),
    fld("DTL", 0x02, 0, ANY, 6, 7, 16, NF, "Disconnect time limit"),
    fld("CTL", 0x02, 0, ANY, 8, 7, 16, NF, "Connect time limit"),
    fld("MBS", 0x02, 0, ANY, 10, 7, 16, CM, "Maximum burst size (512 byte units)"),
    fld("EMDP", 0x02, 0, ANY, 12, 7, 1, NF, "Enable modify data pointers"),
    fld("FA", 0x02, 0, ANY, 12, 6, 3, NF, "Fair arbitration"),
    fld("DIMM", 0x02, 0, ANY, 12, 3, 1, NF, "Disconnect immediate"),
    fld("DTDC", 0x02, 0, ANY, 12, 2, 3, NF, "Data transfer disconnect control"),
    fld("FBS", 0x02, 0, ANY, 14, 7, 16, NF, "First burst size (512 byte units)"),
    // Format [0x03]
    fld("TPZ", 0x03, 0, DISK, 2, 7, 16, NF, "Tracks per zone"),
    fld("ASPZ", 0x03, 0, DISK, 4, 7, 16, NF, "Alternate sectors per zone"),
    fld("ATPZ", 0x03, 0, DISK, 6, 7, 16, NF, "Alternate tracks per zone"),
    fld("ATLU", 0x03, 0, DISK, 8, 7, 16, NF, "Alternate tracks per logical unit"),
    fld("SPT", 0x03, 0, DISK, 10, 7, 16, NF, "Sectors per track"),
    fld("DBPPS", 0x03, 0, DISK, 12, 7, 16, NF, "Data bytes per physical sector"),
    fld("INTLV", 0x03, 0, DISK, 14, 7, 16, NF, "Interleave"),
    fld("TSF", 0x03, 0, DISK, 16, 7, 16, NF, "Track skew factor"),
    fld("CSF", 0x03, 0, DISK, 18, 7, 16, NF, "Cylinder skew factor"),
    fld("SSEC", 0x03, 0, DISK, 20, 7, 1, NF, "Soft sector formatting"),
    fld("HSEC", 0x03, 0, DISK, 20, 6, 1, NF, "Hard sector formatting"),
    fld("RMB", 0x03, 0, DISK, 20, 5, 1, NF, "Removable medium"),
    fld("SURF", 0x03, 0, DISK, 20, 4, 1, NF, "Surface"),
    // Rigid disk geometry [0x04]
    fld("NOC", 0x04, 0, DISK, 2, 7, 24, NF, "Number of cylinders"),
    fld("NOH", 0x04, 0, DISK, 5, 7, 8, NF, "Number of heads"),
    fld("SCWP", 0x04, 0, DISK, 6, 7, 24, NF, "Starting cylinder for write precompensation"),
    fld("SCRWC", 0x04, 0, DISK, 9, 7, 24, NF, "Starting cylinder for reduced write current"),
    fld("DSR", 0x04, 0, DISK, 12, 7, 16, NF, "Device step rate"),
    fld("LZC", 0x04, 0, DISK, 14, 7, 24, NF, "Landing zone cylinder"),
    fld("RPL", 0x04, 0, DISK, 17, 1, 2, NF, "Rotational position locking"),
    fld("ROTO", 0x04, 0, DISK, 18, 7, 8, NF, "Rotational offset"),
    fld("MRR", 0x04, 0, DISK, 20, 7, 16, NF, "Medium rotation rate (rpm)"),
    // Write parameters [0x05] (cd/dvd)
    fld("BUFE", 0x05, 0, MMC, 2, 6, 1, CM, "Buffer underrun free recording enable"),
    fld("LS_V", 0x05, 0, MMC, 2, 5, 1, NF, "Link size valid"),
    fld("TST_W", 0x05, 0, MMC, 2, 4, 1, NF, "Test write"),
    fld("WR_T", 0x05, 0, MMC, 2, 3, 4, CM, "Write type"),
    fld("MULTI_S", 0x05, 0, MMC, 3, 7, 2, CM, "Multi session"),
    fld("FP", 0x05, 0, MMC, 3, 5, 1, NF, "Fixed packet type"),
    fld("COPY", 0x05, 0, MMC, 3, 4, 1, NF, "Serial copy management system"),
    fld("TRACK_M", 0x05, 0, MMC, 3, 3, 4, NF, "Track mode"),
    fld("DBT", 0x05, 0, MMC, 4, 3, 4, NF, "Data block type"),
    fld("LINK_S", 0x05, 0, MMC, 5, 7, 8, NF, "Link size"),
    fld("SESS_F", 0x05, 0, MMC, 8, 5, 6, NF, "Session format"),
    fld("PACK_S", 0x05, 0, MMC, 10, 7, 32, NF, "Packet size"),
    fld("APL", 0x05, 0, MMC, 14, 7, 16, NF, "Audio pause length (blocks)"),
    // Verify error recovery [0x07]
    fld("V_EER", 0x07, 0, DISK, 2, 3, 1, NF, "Enable early recovery"),
    fld("V_PER", 0x07, 0, DISK, 2, 2, 1, NF, "Post error"),
    fld("V_DTE", 0x07, 0, DISK, 2, 1, 1, NF, "Data terminate on error"),
    fld("V_DCR", 0x07, 0, DISK, 2, 0, 1, NF, "Disable correction"),
    fld("V_RC", 0x07, 0, DISK, 3, 7, 8, NF, "Verify retry count"),
    fld("V_RTL", 0x07, 0, DISK, 10, 7, 16, NF, "Verify recovery time limit (ms)"),
    // Caching [0x08]
    fld("IC", 0x08, 0, DISK, 2, 7, 1, NF, "Initiator control"),
    fld("ABPF", 0x08, 0, DISK, 2, 6, 1, NF, "Abort pre-fetch"),
    fld("CAP", 0x08, 0, DISK, 2, 5, 1, NF, "Caching analysis permitted"),
    fld("DISC", 0x08, 0, DISK, 2, 4, 1, NF, "Discontinuity"),
    fld("SIZE", 0x08, 0, DISK, 2, 3, 1, NF, "Size enable"),
    fld("WCE", 0x08, 0, DISK, 2, 2, 1, CM, "Write cache enable"),
    fld("MF", 0x08, 0, DISK, 2, 1, 1, NF, "Multiplication factor"),
    fld("RCD", 0x08, 0, DISK, 2, 0, 1, CM, "Read cache disable"),
    fld("DRRP", 0x08, 0, DISK, 3, 7, 4, NF, "Demand read retention priority"),
    fld("WRP", 0x08, 0, DISK, 3, 3, 4, NF, "Write retention priority"),
    fld("DPTL", 0x08, 0, DISK, 4, 7, 16, NF, "Disable pre-fetch transfer length"),
    fld("MIPF", 0x08, 0, DISK, 6, 7, 16, NF, "Minimum pre-fetch"),
    fld("MAPF", 0x08, 0, DISK, 8, 7, 16, NF, "Maximum pre-fetch"),
    fld("MAPFC", 0x08, 0, DISK, 10, 7, 16, NF, "Maximum pre-fetch ceiling"),
    fld("FSW", 0x08, 0, DISK, 12, 7, 1, NF, "Force sequential write"),
    fld("LBCSS", 0x08, 0, DISK, 12, 6, 1, NF, "Logical block cache segment size"),
    fld("DRA", 0x08, 0, DISK, 12, 5, 1, NF, "Disable read ahead"),
    fld("SYNC_PROG", 0x08, 0, DISK, 12, 1, 2, NF, "Synchronous cache progress indication"),
    fld("NV_DIS", 0x08, 0, DISK, 12, 0, 1, NF, "Non-volatile cache disable"),
    fld("NCS", 0x08, 0, DISK, 13, 7, 8, NF, "Number of cache segments"),
    fld("CSS", 0x08, 0, DISK, 14, 7, 16, NF, "Cache segment size"),
    // Control [0x0a]
    fld("TST", 0x0a, 0, ANY, 2, 7, 3, NF, "Task set type"),
    fld("TMF_ONLY", 0x0a, 0, ANY, 2, 4, 1, NF, "Task management functions only"),
    fld("DPICZ", 0x0a, 0, ANY, 2, 3, 1, NF, "Disable protection information check if protect field zero"),
    fld("D_SENSE", 0x0a, 0, ANY, 2, 2, 1, NF, "Descriptor format sense data"),
    fld("GLTSD", 0x0a, 0, ANY, 2, 1, 1, NF, "Global logging target save disable"),
    fld("RLEC", 0x0a, 0, ANY, 2, 0, 1, NF, "Report log exception condition"),
    fld("QAM", 0x0a, 0, ANY, 3, 7, 4, NF, "Queue algorithm modifier"),
    fld("NUAR", 0x0a, 0, ANY, 3, 3, 1, NF, "No unit attention on release"),
    fld("QERR", 0x0a, 0, ANY, 3, 2, 2, NF, "Queue error management"),
    fld("RAC", 0x0a, 0, ANY, 4, 6, 1, NF, "Report a check"),
    fld("UA_INTLCK", 0x0a, 0, ANY, 4, 5, 2, NF, "Unit attention interlocks control"),
    fld("SWP", 0x0a, 0, ANY, 4, 3, 1, CM, "Software write protect"),
    fld("ATO", 0x0a, 0, DISK, 5, 7, 1, NF, "Application tag owner"),
    fld("TAS", 0x0a, 0, ANY, 5, 6, 1, NF, "Task aborted status"),
    fld("ATMPE", 0x0a, 0, ANY, 5, 5, 1, NF, "Application tag mode page enabled"),
    fld("RWWP", 0x0a, 0, ANY, 5, 4, 1, NF, "Reject write without protection"),
    fld("AUTOLOAD", 0x0a, 0, ANY, 5, 2, 3, NF, "Autoload mode"),
    fld("BTP", 0x0a, 0, ANY, 8, 7, 16, A1, "Busy timeout period (100 ms units)"),
    fld("ESTCT", 0x0a, 0, ANY, 10, 7, 16, NF, "Extended self test completion time (sec)"),
    // Control extension [0x0a,0x01]
    fld("TCMOS", 0x0a, 1, ANY, 4, 2, 1, NF, "Timestamp changeable by methods outside standard"),
    fld("SCSIP", 0x0a, 1, ANY, 4, 1, 1, NF, "SCSI timestamp commands take precedence"),
    fld("IALUAE", 0x0a, 1, ANY, 4, 0, 1, NF, "Implicit asymmetric logical unit access enabled"),
    fld("ICP", 0x0a, 1, ANY, 5, 3, 4, NF, "Initial command priority"),
    fld("MSDL", 0x0a, 1, ANY, 6, 7, 8, NF, "Maximum sense data length"),
    // CD audio control [0x0e]
    fld("IMMED", 0x0e, 0, MMC, 2, 2, 1, NF, "Immediate"),
    fld("SOTC", 0x0e, 0, MMC, 2, 1, 1, NF, "Stop on track crossing"),
    fld("P0_CH", 0x0e, 0, MMC, 8, 3, 4, NF, "Port 0 channel selection"),
    fld("P0_VOL", 0x0e, 0, MMC, 9, 7, 8, NF, "Port 0 volume"),
    fld("P1_CH", 0x0e, 0, MMC, 10, 3, 4, NF, "Port 1 channel selection"),
    fld("P1_VOL", 0x0e, 0, MMC, 11, 7, 8, NF, "Port 1 volume"),
    // Data compression [0x0f] (tape)
    fld("DCE", 0x0f, 0, TAPE, 2, 7, 1, CM, "Data compression enable"),
    fld("DCC", 0x0f, 0, TAPE, 2, 6, 1, NF, "Data compression capable"),
    fld("DDE", 0x0f, 0, TAPE, 3, 7, 1, NF, "Data decompression enable"),
    fld("RED", 0x0f, 0, TAPE, 3, 6, 2, NF, "Report exception on decompression"),
    fld("COMPR_A", 0x0f, 0, TAPE, 4, 7, 32, HX, "Compression algorithm"),
    fld("DCOMPR_A", 0x0f, 0, TAPE, 8, 7, 32, HX, "Decompression algorithm"),
    // XOR control [0x10] (disk)
    fld("XORDIS", 0x10, 0, DISK, 2, 1, 1, NF, "XOR disable"),
    fld("MXWS", 0x10, 0, DISK, 4, 7, 32, NF, "Maximum XOR write size (blocks)"),
    // Device configuration [0x10] (tape)
    fld("CAP", 0x10, 0, TAPE, 2, 6, 1, NF, "Change active partition"),
    fld("CAF", 0x10, 0, TAPE, 2, 5, 1, NF, "Change active format"),
    fld("ACTIVE_F", 0x10, 0, TAPE, 2, 4, 5, NF, "Active format"),
    fld("WRITE_DELAY", 0x10, 0, TAPE, 6, 7, 8, NF, "Write delay time (100 ms units)"),
    fld("LOIS", 0x10, 0, TAPE, 8, 7, 1, NF, "Logical block identifiers supported"),
    fld("RSMK", 0x10, 0, TAPE, 8, 5, 1, NF, "Report setmarks (obsolete)"),
    fld("AVC", 0x10, 0, TAPE, 8, 4, 1, NF, "Automatic velocity control"),
    fld("SOCF", 0x10, 0, TAPE, 8, 3, 2, NF, "Stop on consecutive filemarks"),
    fld("ROBO", 0x10, 0, TAPE, 8, 1, 1, NF, "Recover buffer order"),
    fld("REW", 0x10, 0, TAPE, 8, 0, 1, NF, "Report early warning"),
    fld("EOD_D", 0x10, 0, TAPE, 10, 7, 3, NF, "EOD defined"),
    fld("EEG", 0x10, 0, TAPE, 10, 4, 1, NF, "Enable EOD generation"),
    fld("SEW", 0x10, 0, TAPE, 10, 3, 1, NF, "Synchronize early warning"),
    fld("SELECT_DC", 0x10, 0, TAPE, 14, 7, 8, NF, "Select data compression algorithm"),
    fld("BAML", 0x10, 0, TAPE, 15, 1, 1, NF, "Block address mode lock"),
    fld("BAM", 0x10, 0, TAPE, 15, 0, 1, NF, "Block address mode"),
    // Protocol specific logical unit [0x18]
    fld("LUPID", 0x18, 0, ANY, 2, 3, 4, HX, "Logical unit's (transport) protocol identifier"),
    // Protocol specific port [0x19]
    fld("PPID", 0x19, 0, ANY, 2, 3, 4, HX, "Port's (transport) protocol identifier"),
    // Power condition [0x1a]
    fld("PM_BG", 0x1a, 0, ANY, 2, 7, 2, NF, "Power management, background functions precedence"),
    fld("STANDBY_Y", 0x1a, 0, ANY, 2, 0, 1, NF, "Standby_y timer enable"),
    fld("IDLE_C", 0x1a, 0, ANY, 3, 3, 1, NF, "Idle_c timer enable"),
    fld("IDLE_B", 0x1a, 0, ANY, 3, 2, 1, NF, "Idle_b timer enable"),
    fld("IDLE_A", 0x1a, 0, ANY, 3, 1, 1, CM, "Idle_a timer enable"),
    fld("STANDBY_Z", 0x1a, 0, ANY, 3, 0, 1, CM, "Standby_z timer enable"),
    fld("IACT", 0x1a, 0, ANY, 4, 7, 32, A1, "Idle_a condition timer (100 ms units)"),
    fld("SZCT", 0x1a, 0, ANY, 8, 7, 32, A1, "Standby_z condition timer (100 ms units)"),
    fld("IBCT", 0x1a, 0, ANY, 12, 7, 32, A1, "Idle_b condition timer (100 ms units)"),
    fld("ICCT", 0x1a, 0, ANY, 16, 7, 32, A1, "Idle_c condition timer (100 ms units)"),
    fld("SYCT", 0x1a, 0, ANY, 20, 7, 32, A1, "Standby_y condition timer (100 ms units)"),
    fld("CCF_IDLE", 0x1a, 0, ANY, 39, 7, 2, NF, "Check condition from idle_c"),
    fld("CCF_STAND", 0x1a, 0, ANY, 39, 5, 2, NF, "Check condition from standby_y"),
    fld("CCF_STOPP", 0x1a, 0, ANY, 39, 3, 2, NF, "Check condition from stopped"),
    // Power consumption [0x1a,0x01]
    fld("ACT_LEV", 0x1a, 1, ANY, 6, 1, 2, NF, "Active level"),
    fld("PC_ID", 0x1a, 1, ANY, 7, 7, 8, NF, "Power consumption identifier"),
    // Informational exceptions control [0x1c]
    fld("PERF", 0x1c, 0, ANY, 2, 7, 1, NF, "Performance (impact of ie operations)"),
    fld("EBF", 0x1c, 0, ANY, 2, 5, 1, NF, "Enable background function"),
    fld("EWASC", 0x1c, 0, ANY, 2, 4, 1, CM, "Enable warning"),
    fld("DEXCPT", 0x1c, 0, ANY, 2, 3, 1, CM, "Disable exceptions"),
    fld("TEST", 0x1c, 0, ANY, 2, 2, 1, NF, "Test (simulate device failure)"),
    fld("EBACKERR", 0x1c, 0, ANY, 2, 1, 1, NF, "Enable background (scan + self test) error reporting"),
    fld("LOGERR", 0x1c, 0, ANY, 2, 0, 1, NF, "Log informational exception errors"),
    FieldDescriptor {
        acronym: "MRIE",
        page_code: 0x1c,
        subpage_code: 0,
        pdt: ANY,
        start_byte: 3,
        start_bit: 3,
        num_bits: 4,
        flags: CM,
        desc_id: None,
        description: "Method of reporting informational exceptions",
        extra: Some(
            "0: no reporting\t2: generate unit attention\t3: conditionally generate recovered error\t4: unconditionally generate recovered error\t5: generate no sense\t6: report on request",
        ),
    },
    fld("INTT", 0x1c, 0, ANY, 4, 7, 32, A1, "Interval timer (100 ms units)"),
    fld("REPC", 0x1c, 0, ANY, 8, 7, 32, A1, "Report count (or test flag number)"),
    // Background control [0x1c,0x01]
    fld("S_L_FULL", 0x1c, 1, DISK, 4, 2, 1, NF, "Suspend on log full"),
    fld("LOWIR", 0x1c, 1, DISK, 4, 1, 1, NF, "Log only when intervention required"),
    fld("EN_BMS", 0x1c, 1, DISK, 4, 0, 1, NF, "Enable background medium scan"),
    fld("EN_PS", 0x1c, 1, DISK, 5, 0, 1, NF, "Enable pre-scan"),
    fld("BMS_I", 0x1c, 1, DISK, 6, 7, 16, NF, "Background medium scan interval time (hour)"),
    fld("BPS_TL", 0x1c, 1, DISK, 8, 7, 16, NF, "Background pre-scan time limit (hour)"),
    fld("MIN_IDLE", 0x1c, 1, DISK, 10, 7, 16, NF, "Minimum idle time before background scan (ms)"),
    fld("MAX_SUSP", 0x1c, 1, DISK, 12, 7, 16, NF, "Maximum time to suspend background scan (ms)"),
    // Logical block provisioning [0x1c,0x02]
    fld("SITUA", 0x1c, 2, DISK, 4, 0, 1, NF, "Single initiator threshold unit attention"),
    fld("THRESH_EN", 0x1c, 2, DISK, 16, 7, 1, NF, "Threshold enabled"),
    fld("THRESH_ARM", 0x1c, 2, DISK, 16, 5, 3, NF, "Threshold arming"),
    fld("THRESH_TYPE", 0x1c, 2, DISK, 16, 2, 3, NF, "Threshold type"),
    fld("THRESH_RSC", 0x1c, 2, DISK, 17, 7, 8, NF, "Threshold resource"),
    fld("THRESH_CNT", 0x1c, 2, DISK, 20, 7, 32, NF, "Threshold count"),
    // Timeout and protect [0x1d] (cd/dvd)
    fld("G3E", 0x1d, 0, MMC, 4, 3, 1, NF, "Group 3 timeout capability enable"),
    fld("TMOE", 0x1d, 0, MMC, 4, 2, 1, NF, "Timeout enable"),
    fld("DISP", 0x1d, 0, MMC, 4, 1, 1, NF, "Disable (unavailable) until power cycle"),
    fld("SWPP", 0x1d, 0, MMC, 4, 0, 1, NF, "Software write protect until power cycle"),
    fld("G1_MIN", 0x1d, 0, MMC, 6, 7, 16, NF, "Group 1 minimum timeout (sec)"),
    fld("G2_MIN", 0x1d, 0, MMC, 8, 7, 16, NF, "Group 2 minimum timeout (sec)"),
    // Element address assignment [0x1d] (media changer)
    fld("FMTEA", 0x1d, 0, MCHANGER, 2, 7, 16, NF, "First medium transport element address"),
    fld("NMTE", 0x1d, 0, MCHANGER, 4, 7, 16, NF, "Number of medium transport elements"),
    fld("FSEA", 0x1d, 0, MCHANGER, 6, 7, 16, NF, "First storage element address"),
    fld("NSE", 0x1d, 0, MCHANGER, 8, 7, 16, NF, "Number of storage elements"),
    fld("FIEEA", 0x1d, 0, MCHANGER, 10, 7, 16, NF, "First import/export element address"),
    fld("NIEE", 0x1d, 0, MCHANGER, 12, 7, 16, NF, "Number of import/export elements"),
    fld("FDTEA", 0x1d, 0, MCHANGER, 14, 7, 16, NF, "First data transfer element address"),
    fld("NDTE", 0x1d, 0, MCHANGER, 16, 7, 16, NF, "Number of data transfer elements"),
    // MM capabilities and mechanical status [0x2a] (cd/dvd, read-only)
    fld("D_RAM_R", 0x2a, 0, MMC, 2, 5, 1, NF, "DVD-RAM read"),
    fld("D_R_R", 0x2a, 0, MMC, 2, 4, 1, NF, "DVD-R read"),
    fld("D_ROM_R", 0x2a, 0, MMC, 2, 3, 1, NF, "DVD-ROM read"),
    fld("CD_RW_R", 0x2a, 0, MMC, 2, 1, 1, NF, "CD-RW read"),
    fld("CD_R_R", 0x2a, 0, MMC, 2, 0, 1, NF, "CD-R read"),
    fld("D_RAM_W", 0x2a, 0, MMC, 3, 5, 1, NF, "DVD-RAM write"),
    fld("D_R_W", 0x2a, 0, MMC, 3, 4, 1, NF, "DVD-R write"),
    fld("CD_RW_W", 0x2a, 0, MMC, 3, 1, 1, NF, "CD-RW write"),
    fld("CD_R_W", 0x2a, 0, MMC, 3, 0, 1, NF, "CD-R write"),
    fld("AUDIO_PLAY", 0x2a, 0, MMC, 4, 0, 1, NF, "Audio play"),
    fld("LOADING_MT", 0x2a, 0, MMC, 6, 7, 3, NF, "Loading mechanism type"),
    fld("EJECT", 0x2a, 0, MMC, 6, 3, 1, NF, "Eject (individual or magazine)"),
    fld("MAX_R_SPD", 0x2a, 0, MMC, 8, 7, 16, NF, "Maximum read speed (kBps)"),
    fld("NUM_VOL_L", 0x2a, 0, MMC, 10, 7, 16, NF, "Number of volume levels supported"),
    fld("BUF_SIZE", 0x2a, 0, MMC, 12, 7, 16, NF, "Buffer size supported (1024 bytes)"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_order_is_wire_order_per_page() {
        let mut last: Option<(u8, u8, u16, u8)> = None;
        for f in FIELDS.iter().filter(|f| f.page_code == 0x08) {
            let key = (f.page_code, f.subpage_code, f.start_byte, 7 - f.start_bit);
            if let Some(prev) = last {
                assert!(prev <= key, "caching page out of order at {}", f.acronym);
            }
            last = Some(key);
        }
    }
}
