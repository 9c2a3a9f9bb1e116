// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Common types and utilities for the StormLoader bootloader.
//!
//! This crate supports both `no_std` (embedded) and `std` (host) environments:
//! - Default: `no_std` mode for embedded targets
//! - `std` feature: Enables `std` support for host tools
//! - `defmt` feature: Derives `defmt::Format` on the boot-mode types

#![cfg_attr(not(feature = "std"), no_std)]

pub mod boot_mode;
pub mod framing;
pub mod layout;
pub mod protocol;
pub mod sampler;

// Re-export commonly used types
pub use boot_mode::{
    boot, classify, dispatch, run_bootloader, ApplicationEntry, BootloaderEntry, Decision,
    EntryPolicy, Verdict,
};
pub use framing::FrameAccumulator;
pub use layout::{APP_FLASH_ADDR, DEFAULT_SAMPLE_COUNT, FLASH_BASE, SELECT_PIN};
pub use protocol::{AckStatus, Command, Response, MAX_FRAME_SIZE, PROTOCOL_VERSION};
pub use sampler::{sample, ActiveLowPin, PinLevel, PinReader, SampleTally};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Blink an LED a specified number of times.
pub fn blink(led: &mut impl OutputPin, timer: &mut impl DelayNs, count: u32, period_ms: u32) {
    for _ in 0..count {
        led.set_high().ok();
        timer.delay_ms(period_ms);
        led.set_low().ok();
        timer.delay_ms(period_ms);
    }
}
