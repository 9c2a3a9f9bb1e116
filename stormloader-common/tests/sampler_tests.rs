// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for select pin sampling.

use core::convert::Infallible;
use core::num::NonZeroU32;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};
use stormloader_common::sampler::{sample, ActiveLowPin, PinLevel, PinReader, SampleTally};
use stormloader_common::DEFAULT_SAMPLE_COUNT;

fn samples(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

/// Reader that replays a fixed pattern, wrapping around at the end.
struct Scripted<'a> {
    levels: &'a [PinLevel],
    pos: usize,
    reads: u32,
}

impl<'a> Scripted<'a> {
    fn new(levels: &'a [PinLevel]) -> Self {
        Self {
            levels,
            pos: 0,
            reads: 0,
        }
    }
}

impl PinReader for Scripted<'_> {
    fn read(&mut self) -> PinLevel {
        let level = self.levels[self.pos % self.levels.len()];
        self.pos += 1;
        self.reads += 1;
        level
    }
}

/// Electrical pin model: `true` means logic-high.
struct FakeInput {
    high: bool,
}

impl ErrorType for FakeInput {
    type Error = Infallible;
}

impl InputPin for FakeInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }
}

struct BrokenInput;

impl ErrorType for BrokenInput {
    type Error = ErrorKind;
}

impl InputPin for BrokenInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Err(ErrorKind::Other)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Err(ErrorKind::Other)
    }
}

// =============================================================================
// SampleTally tests
// =============================================================================

#[test]
fn test_tally_starts_empty() {
    let tally = SampleTally::default();
    assert_eq!(tally.asserted, 0);
    assert_eq!(tally.not_asserted, 0);
    assert_eq!(tally.total(), 0);
}

#[test]
fn test_tally_record_counts_each_level() {
    let mut tally = SampleTally::default();
    tally.record(PinLevel::Asserted);
    tally.record(PinLevel::Asserted);
    tally.record(PinLevel::NotAsserted);

    assert_eq!(tally.asserted, 2);
    assert_eq!(tally.not_asserted, 1);
    assert_eq!(tally.total(), 3);
}

// =============================================================================
// sample tests
// =============================================================================

#[test]
fn test_sample_reads_exactly_budget() {
    let mut pin = Scripted::new(&[PinLevel::Asserted, PinLevel::NotAsserted]);
    let tally = sample(&mut pin, samples(7));

    assert_eq!(pin.reads, 7);
    assert_eq!(tally.total(), 7);
}

#[test]
fn test_sample_counts_sum_to_budget_for_default() {
    let mut pin = Scripted::new(&[
        PinLevel::NotAsserted,
        PinLevel::Asserted,
        PinLevel::NotAsserted,
    ]);
    let tally = sample(&mut pin, DEFAULT_SAMPLE_COUNT);

    assert_eq!(tally.total(), DEFAULT_SAMPLE_COUNT.get());
    assert_eq!(tally.asserted, 3333);
    assert_eq!(tally.not_asserted, 6667);
}

#[test]
fn test_sample_single_read() {
    let mut pin = Scripted::new(&[PinLevel::Asserted]);
    let tally = sample(&mut pin, samples(1));

    assert_eq!(
        tally,
        SampleTally {
            asserted: 1,
            not_asserted: 0
        }
    );
}

#[test]
fn test_sample_seven_three_split() {
    let levels = [
        PinLevel::Asserted,
        PinLevel::Asserted,
        PinLevel::NotAsserted,
        PinLevel::Asserted,
        PinLevel::Asserted,
        PinLevel::NotAsserted,
        PinLevel::Asserted,
        PinLevel::Asserted,
        PinLevel::NotAsserted,
        PinLevel::Asserted,
    ];
    let mut pin = Scripted::new(&levels);
    let tally = sample(&mut pin, samples(10));

    assert_eq!(tally.asserted, 7);
    assert_eq!(tally.not_asserted, 3);
}

#[test]
fn test_sample_accepts_closure_reader() {
    let mut n = 0u32;
    let mut reader = || {
        n += 1;
        if n % 4 == 0 {
            PinLevel::Asserted
        } else {
            PinLevel::NotAsserted
        }
    };
    let tally = sample(&mut reader, samples(100));

    assert_eq!(tally.asserted, 25);
    assert_eq!(tally.not_asserted, 75);
}

// =============================================================================
// ActiveLowPin tests
// =============================================================================

#[test]
fn test_active_low_pin_low_is_asserted() {
    let mut pin = ActiveLowPin::new(FakeInput { high: false });
    assert_eq!(pin.read(), PinLevel::Asserted);
}

#[test]
fn test_active_low_pin_high_is_not_asserted() {
    let mut pin = ActiveLowPin::new(FakeInput { high: true });
    assert_eq!(pin.read(), PinLevel::NotAsserted);
}

#[test]
fn test_active_low_pin_read_error_is_not_asserted() {
    let mut pin = ActiveLowPin::new(BrokenInput);
    assert_eq!(pin.read(), PinLevel::NotAsserted);
}

#[test]
fn test_active_low_pin_idle_pull_up_samples_not_asserted() {
    let mut pin = ActiveLowPin::new(FakeInput { high: true });
    let tally = sample(&mut pin, samples(1000));

    assert_eq!(tally.asserted, 0);
    assert_eq!(tally.not_asserted, 1000);
}

#[test]
fn test_active_low_pin_into_inner_returns_pin() {
    let pin = ActiveLowPin::new(FakeInput { high: true });
    assert!(pin.into_inner().high);
}
