// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

#![allow(clippy::all)]

mod unit_tests {
    pub mod fake;

    pub mod test_caching_page;
    pub mod test_codec_props;
    pub mod test_defaults;
    pub mod test_inhex;
    pub mod test_pageio;
    pub mod test_phy_page;
    pub mod test_vpd_device_id;
}
