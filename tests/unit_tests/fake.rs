// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! A scripted stand-in for the SG_IO pass-through: each issued command
//! pops the next step; everything sent is recorded for assertions.

use std::{collections::VecDeque, fs};

use anyhow::Result;
use hex::FromHex;
use sdparm_rs::transport::{ScsiDevice, ScsiError, sense::SenseData};

pub fn load_fixture(path: &str) -> Result<Vec<u8>> {
    let s = fs::read_to_string(path)?;
    let cleaned = s.trim().replace(|c: char| c.is_whitespace(), "");
    Ok(Vec::from_hex(&cleaned)?)
}

/// Fixed-format sense bytes for one key/asc/ascq triple.
pub fn fixed_sense(key: u8, asc: u8, ascq: u8) -> Vec<u8> {
    let mut raw = vec![0u8; 18];
    raw[0] = 0x70;
    raw[2] = key;
    raw[7] = 10;
    raw[12] = asc;
    raw[13] = ascq;
    raw
}

#[derive(Debug, Clone)]
pub enum Step {
    /// data_in succeeds with these response bytes.
    In(Vec<u8>),
    /// data_out succeeds.
    OutOk,
    /// Either direction fails with a check condition.
    Check { key: u8, asc: u8, ascq: u8 },
}

#[derive(Debug, Default)]
pub struct FakeDevice {
    pub script: VecDeque<Step>,
    /// Every issued command: (cdb, data_out payload).
    pub issued: Vec<(Vec<u8>, Vec<u8>)>,
}

impl FakeDevice {
    pub fn scripted(steps: impl IntoIterator<Item = Step>) -> Self {
        FakeDevice {
            script: steps.into_iter().collect(),
            issued: Vec::new(),
        }
    }

    fn next_step(&mut self) -> Step {
        self.script.pop_front().unwrap_or(Step::Check {
            key: 0x05,
            asc: 0x20,
            ascq: 0x00,
        })
    }
}

impl ScsiDevice for FakeDevice {
    fn data_in(&mut self, cdb: &[u8], buf: &mut [u8]) -> Result<usize, ScsiError> {
        self.issued.push((cdb.to_vec(), Vec::new()));
        match self.next_step() {
            Step::In(resp) => {
                let n = resp.len().min(buf.len());
                buf[..n].copy_from_slice(&resp[..n]);
                Ok(n)
            },
            Step::Check { key, asc, ascq } => {
                let sense = SenseData::parse(&fixed_sense(key, asc, ascq))
                    .expect("sense fixture must parse");
                Err(ScsiError::Sense(sense))
            },
            Step::OutOk => Err(ScsiError::Other("script expected data-out".into())),
        }
    }

    fn data_out(&mut self, cdb: &[u8], data: &[u8]) -> Result<(), ScsiError> {
        self.issued.push((cdb.to_vec(), data.to_vec()));
        match self.next_step() {
            Step::OutOk => Ok(()),
            Step::Check { key, asc, ascq } => {
                let sense = SenseData::parse(&fixed_sense(key, asc, ascq))
                    .expect("sense fixture must parse");
                Err(ScsiError::Sense(sense))
            },
            Step::In(_) => Err(ScsiError::Other("script expected data-in".into())),
        }
    }

    fn designation(&self) -> &str {
        "fake"
    }
}

/// Wrap page bytes into a MODE SENSE(10) response (8-byte header, no
/// block descriptors).
pub fn msense10_response(pages: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; 8];
    let mdl = (pages.len() + 8 - 2) as u16;
    out[0..2].copy_from_slice(&mdl.to_be_bytes());
    out.extend_from_slice(pages);
    out
}

/// Caching mode page (0x08, 20 bytes) with the given byte 2.
pub fn caching_page(byte2: u8, ps: bool) -> Vec<u8> {
    let mut page = vec![0u8; 20];
    page[0] = if ps { 0x88 } else { 0x08 };
    page[1] = 0x12;
    page[2] = byte2;
    page
}
