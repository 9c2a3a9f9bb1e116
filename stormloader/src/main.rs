// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! StormLoader boot stage for RP2040.
//!
//! On every reset the active-low select pin (GP2) is sampled and a strict
//! majority vote picks between the USB CDC bootloader session and a jump
//! into the application at `APP_FLASH_ADDR`.

#![no_std]
#![no_main]

#[cfg(all(feature = "always-bootloader", feature = "just-jump"))]
compile_error!("features `always-bootloader` and `just-jump` are mutually exclusive");

mod boot;
mod peripherals;
mod session;
mod usb_transport;

use defmt_rtt as _;
use panic_probe as _;
use stormloader_common::layout::BOOTLOADER_REGION_SIZE;
use stormloader_common::{ActiveLowPin, EntryPolicy, APP_FLASH_ADDR, DEFAULT_SAMPLE_COUNT};

defmt::timestamp!("{=u64:us}", { 0 });

use cortex_m_rt::entry;

// memory.x: BOOT2 (0x100) + FLASH (64K - 0x100) must end where the application starts.
const _: () = assert!(BOOTLOADER_REGION_SIZE == 64 * 1024);

#[unsafe(link_section = ".boot2")]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_GENERIC_03H;

const ENTRY_POLICY: EntryPolicy = if cfg!(feature = "just-jump") {
    EntryPolicy::AlwaysApplication
} else if cfg!(feature = "always-bootloader") {
    EntryPolicy::AlwaysBootloader
} else {
    EntryPolicy::SelectPin {
        samples: DEFAULT_SAMPLE_COUNT,
    }
};

#[entry]
fn main() -> ! {
    defmt::println!("Bootloader init");

    let p = peripherals::init();

    let mut select = ActiveLowPin::new(p.select);
    let verdict = ENTRY_POLICY.evaluate(&mut select);
    if let Some(tally) = verdict.tally {
        defmt::println!(
            "Select pin votes: asserted={}, not_asserted={}",
            tally.asserted,
            tally.not_asserted
        );
    }
    defmt::println!("Boot decision: {}", verdict.decision);

    let session = session::UsbSession::new(p.led_pin, p.timer, p.usb, &ENTRY_POLICY, &verdict);
    let application = boot::ApplicationJump::new(APP_FLASH_ADDR);

    stormloader_common::dispatch(verdict.decision, session, application)
}
