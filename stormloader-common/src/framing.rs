// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Receive-side COBS frame reassembly.
//!
//! Bytes arrive in arbitrary chunks. The accumulator collects them up to the
//! 0x00 delimiter and decodes the frame with postcard. Frames longer than
//! `MAX_FRAME_SIZE` are dropped whole, delimiter included, without a result.

use heapless::Vec;
use serde::de::DeserializeOwned;

use crate::protocol::MAX_FRAME_SIZE;

#[derive(Debug, Default)]
pub struct FrameAccumulator {
    frame: Vec<u8, MAX_FRAME_SIZE>,
    discarding: bool,
}

impl FrameAccumulator {
    pub const fn new() -> Self {
        Self {
            frame: Vec::new(),
            discarding: false,
        }
    }

    /// Feed one byte. Returns the decode result when it completes a frame.
    pub fn push<T: DeserializeOwned>(&mut self, byte: u8) -> Option<postcard::Result<T>> {
        if byte == 0x00 {
            if core::mem::take(&mut self.discarding) || self.frame.is_empty() {
                self.frame.clear();
                return None;
            }
            let result = postcard::from_bytes_cobs::<T>(&mut self.frame);
            self.frame.clear();
            return Some(result);
        }

        if self.discarding {
            return None;
        }
        if self.frame.push(byte).is_err() {
            self.frame.clear();
            self.discarding = true;
        }
        None
    }

    /// Feed bytes until one frame completes.
    ///
    /// `bytes` is advanced past everything consumed; bytes following a
    /// completed frame stay in the slice for the next call.
    pub fn feed<T: DeserializeOwned>(&mut self, bytes: &mut &[u8]) -> Option<postcard::Result<T>> {
        while let Some((&byte, rest)) = bytes.split_first() {
            *bytes = rest;
            if let Some(result) = self.push(byte) {
                return Some(result);
            }
        }
        None
    }

    /// True while the bytes of an oversized frame are being skipped.
    pub fn is_discarding(&self) -> bool {
        self.discarding
    }
}
