// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Flash layout and board constants shared by the bootloader and host tools.

use core::num::NonZeroU32;

pub const FLASH_BASE: u32 = 0x1000_0000;

/// Application vector table, right after the 64KB bootloader region.
pub const APP_FLASH_ADDR: u32 = 0x1001_0000;

pub const BOOTLOADER_REGION_SIZE: u32 = APP_FLASH_ADDR - FLASH_BASE;

/// GPIO number of the active-low bootloader select pin (GP2).
pub const SELECT_PIN: u8 = 2;

/// Number of select pin reads taken per boot.
pub const DEFAULT_SAMPLE_COUNT: NonZeroU32 = match NonZeroU32::new(10_000) {
    Some(n) => n,
    None => panic!("sample count must be non-zero"),
};
