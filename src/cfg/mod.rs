// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Command-line surface.
pub mod cli;
/// Tracing subscriber setup.
pub mod logger;
