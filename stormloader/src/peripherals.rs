// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Board bring-up: system clock, bootloader select pin, status LED.

use rp2040_hal as hal;
use rp2040_hal::usb::UsbBus;
use stormloader_common::SELECT_PIN;
use usb_device::class_prelude::UsbBusAllocator;

const XOSC_CRYSTAL_FREQ: u32 = 12_000_000;

pub type LedPin =
    hal::gpio::Pin<hal::gpio::bank0::Gpio25, hal::gpio::FunctionSioOutput, hal::gpio::PullDown>;
/// Active-low bootloader select input (GP2).
pub type SelectPin =
    hal::gpio::Pin<hal::gpio::bank0::Gpio2, hal::gpio::FunctionSioInput, hal::gpio::PullUp>;

const _: () = assert!(SELECT_PIN == 2, "SelectPin is bound to Gpio2");

/// Static storage for UsbBusAllocator (required by usb-device for 'static lifetime).
static mut USB_BUS: Option<UsbBusAllocator<UsbBus>> = None;

/// Move the bus allocator into static storage and hand back the `'static` reference.
pub fn store_usb_bus(bus: UsbBusAllocator<UsbBus>) -> &'static UsbBusAllocator<UsbBus> {
    unsafe { (*core::ptr::addr_of_mut!(USB_BUS)).insert(bus) }
}

pub struct Peripherals {
    pub led_pin: LedPin,
    pub select: SelectPin,
    pub timer: hal::Timer,
    pub usb: UsbPeripherals,
}

pub struct UsbPeripherals {
    pub regs: hal::pac::USBCTRL_REGS,
    pub dpram: hal::pac::USBCTRL_DPRAM,
    pub clock: hal::clocks::UsbClock,
    pub resets: hal::pac::RESETS,
}

/// Bring the clocks up and configure the select pin as a pulled-up input
/// with the pad Schmitt trigger as glitch filter.
///
/// A clock failure is fatal; there is nothing to report it to yet.
pub fn init() -> Peripherals {
    let mut pac = unsafe { hal::pac::Peripherals::steal() };

    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);
    let Ok(clocks) = hal::clocks::init_clocks_and_plls(
        XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    ) else {
        defmt::panic!("Clock init failed");
    };

    let timer = hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
    let sio = hal::Sio::new(pac.SIO);
    let pins = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let mut select: SelectPin = pins.gpio2.into_pull_up_input();
    select.set_schmitt_enabled(true);

    Peripherals {
        led_pin: pins.gpio25.into_push_pull_output(),
        select,
        timer,
        usb: UsbPeripherals {
            regs: pac.USBCTRL_REGS,
            dpram: pac.USBCTRL_DPRAM,
            clock: clocks.usb_clock,
            resets: pac.RESETS,
        },
    }
}
