// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! CDB fillers and wire-format views for the commands this tool issues.

/// Mode parameter header and mode page header views.
pub mod header;
/// INQUIRY CDBs, standard-response and VPD-header parsing.
pub mod inquiry;
/// MODE SELECT(6/10) CDBs.
pub mod mode_select;
/// MODE SENSE(6/10) CDBs and the page-control enum.
pub mod mode_sense;
