// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Host link protocol for the bootloader session.
//!
//! Messages are postcard-serialized and COBS-framed (0x00 delimiter) in both
//! directions. The types work in `no_std` and `std` builds alike.

use serde::{Deserialize, Serialize};

/// Bootloader protocol version reported by `GetInfo`.
pub const PROTOCOL_VERSION: u16 = 1;

/// Largest encoded frame, delimiter included.
pub const MAX_FRAME_SIZE: usize = 64;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Ping,
    GetInfo,
    Reboot,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    Pong,
    Ack(AckStatus),
    Info {
        version: u16,
        app_addr: u32,
        sample_count: u32,
        /// Votes seen at reset; zero when the entry policy skipped sampling.
        tally_asserted: u32,
        tally_not_asserted: u32,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckStatus {
    Ok,
    BadCommand,
}
