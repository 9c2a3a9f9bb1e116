// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Select pin sampling - majority vote over a fixed number of busy-polled reads.
//!
//! The pin is read through the [`PinReader`] capability so the vote can run
//! against real hardware ([`ActiveLowPin`]) or a scripted sequence in tests.

use core::num::NonZeroU32;

use embedded_hal::digital::InputPin;

/// Instantaneous level of the bootloader select pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinLevel {
    /// Bootloader requested (pin pulled low).
    Asserted,
    /// Run the application (pin idle high).
    NotAsserted,
}

/// Source of select pin reads.
pub trait PinReader {
    fn read(&mut self) -> PinLevel;
}

impl<F: FnMut() -> PinLevel> PinReader for F {
    fn read(&mut self) -> PinLevel {
        self()
    }
}

/// Adapts an `embedded-hal` input to the active-low select convention:
/// logic-low is [`PinLevel::Asserted`], logic-high is [`PinLevel::NotAsserted`].
pub struct ActiveLowPin<P> {
    pin: P,
}

impl<P: InputPin> ActiveLowPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin> PinReader for ActiveLowPin<P> {
    fn read(&mut self) -> PinLevel {
        // A failed read votes for the application.
        if self.pin.is_low().unwrap_or(false) {
            PinLevel::Asserted
        } else {
            PinLevel::NotAsserted
        }
    }
}

/// Vote counters for one boot-mode decision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleTally {
    pub asserted: u32,
    pub not_asserted: u32,
}

impl SampleTally {
    pub fn record(&mut self, level: PinLevel) {
        match level {
            PinLevel::Asserted => self.asserted += 1,
            PinLevel::NotAsserted => self.not_asserted += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.asserted + self.not_asserted
    }
}

/// Read the pin `samples` times back to back and count the levels seen.
///
/// Blocks for `samples` reads; there is no delay, timeout or early exit.
pub fn sample<P: PinReader>(pin: &mut P, samples: NonZeroU32) -> SampleTally {
    let mut tally = SampleTally::default();
    for _ in 0..samples.get() {
        tally.record(pin.read());
    }
    tally
}
