// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Bootloader command session over USB CDC.
//!
//! Commands:
//! - Ping: liveness check
//! - GetInfo: protocol version, application address, reset-time pin votes
//! - Reboot: acknowledge and reset the device

use crate::peripherals::{self, LedPin, UsbPeripherals};
use crate::usb_transport::UsbTransport;
use embedded_hal::digital::OutputPin;
use rp2040_hal as hal;
use stormloader_common::protocol::{AckStatus, Command, Response, PROTOCOL_VERSION};
use stormloader_common::{BootloaderEntry, EntryPolicy, Verdict, APP_FLASH_ADDR};
use usb_device::class_prelude::UsbBusAllocator;

/// Polls spent flushing the reboot ACK before resetting.
const REBOOT_FLUSH_POLLS: u32 = 50_000;

pub struct UsbSession {
    led_pin: LedPin,
    timer: hal::Timer,
    usb: Option<UsbPeripherals>,
    transport: Option<UsbTransport>,
    info: Response,
}

impl UsbSession {
    /// Collect the resources for the session. Hardware is untouched until `setup`.
    pub fn new(
        led_pin: LedPin,
        timer: hal::Timer,
        usb: UsbPeripherals,
        policy: &EntryPolicy,
        verdict: &Verdict,
    ) -> Self {
        let sample_count = match policy {
            EntryPolicy::SelectPin { samples } => samples.get(),
            EntryPolicy::AlwaysBootloader | EntryPolicy::AlwaysApplication => 0,
        };
        let tally = verdict.tally.unwrap_or_default();

        Self {
            led_pin,
            timer,
            usb: Some(usb),
            transport: None,
            info: Response::Info {
                version: PROTOCOL_VERSION,
                app_addr: APP_FLASH_ADDR,
                sample_count,
                tally_asserted: tally.asserted,
                tally_not_asserted: tally.not_asserted,
            },
        }
    }

    fn handle_command(&mut self, cmd: Command) {
        defmt::println!("Command: {}", cmd);
        let Some(transport) = self.transport.as_mut() else {
            return;
        };

        match cmd {
            Command::Ping => transport.send(&Response::Pong),
            Command::GetInfo => transport.send(&self.info),
            Command::Reboot => {
                transport.send(&Response::Ack(AckStatus::Ok));
                for _ in 0..REBOOT_FLUSH_POLLS {
                    transport.poll();
                }
                cortex_m::peripheral::SCB::sys_reset();
            }
        }
    }
}

impl BootloaderEntry for UsbSession {
    fn setup(&mut self) {
        let Some(mut usb) = self.usb.take() else {
            return;
        };

        stormloader_common::blink(&mut self.led_pin, &mut self.timer, 10, 50);

        let usb_bus = peripherals::store_usb_bus(UsbBusAllocator::new(hal::usb::UsbBus::new(
            usb.regs,
            usb.dpram,
            usb.clock,
            true,
            &mut usb.resets,
        )));
        self.transport = Some(UsbTransport::new(usb_bus));

        defmt::println!("USB CDC initialized, entering command loop");
        self.led_pin.set_high().ok();
    }

    fn poll_once(&mut self) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        transport.poll();

        match transport.try_receive() {
            Some(Ok(cmd)) => self.handle_command(cmd),
            Some(Err(_)) => transport.send(&Response::Ack(AckStatus::BadCommand)),
            None => {}
        }
    }
}
