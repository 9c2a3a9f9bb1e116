// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Boot mode selection and dispatch - pure logic without hardware dependencies.
//!
//! After reset the bootloader is in a `Deciding` state. It produces exactly one
//! [`Decision`] and hands control to exactly one of two terminal continuations:
//!
//! - `BootloaderActive`: [`BootloaderEntry::setup`] once, then
//!   [`BootloaderEntry::poll_once`] forever.
//! - `ApplicationActive`: [`ApplicationEntry::jump`], which never returns.
//!
//! Neither continuation returns, so nothing after [`dispatch`] can run.

use core::num::NonZeroU32;

use crate::layout::DEFAULT_SAMPLE_COUNT;
use crate::sampler::{self, PinReader, SampleTally};

/// Which continuation to run after reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decision {
    EnterBootloader,
    EnterApplication,
}

/// Classify a completed tally.
///
/// Strict majority: the bootloader wins only with more asserted reads than
/// not-asserted reads. A tie boots the application.
pub fn classify(tally: SampleTally) -> Decision {
    if tally.asserted > tally.not_asserted {
        Decision::EnterBootloader
    } else {
        Decision::EnterApplication
    }
}

/// How the bootloader decides whether to stay resident.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntryPolicy {
    /// Majority vote over `samples` reads of the select pin.
    SelectPin { samples: NonZeroU32 },
    /// Never leave the bootloader.
    AlwaysBootloader,
    /// Null bootloader: jump straight to the application.
    AlwaysApplication,
}

impl Default for EntryPolicy {
    fn default() -> Self {
        EntryPolicy::SelectPin {
            samples: DEFAULT_SAMPLE_COUNT,
        }
    }
}

/// Outcome of running an [`EntryPolicy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Verdict {
    pub decision: Decision,
    /// Votes behind the decision; `None` when the policy never read the pin.
    pub tally: Option<SampleTally>,
}

impl EntryPolicy {
    /// Run the policy. Only [`EntryPolicy::SelectPin`] touches the pin.
    pub fn evaluate<P: PinReader>(&self, pin: &mut P) -> Verdict {
        match *self {
            EntryPolicy::SelectPin { samples } => {
                let tally = sampler::sample(pin, samples);
                Verdict {
                    decision: classify(tally),
                    tally: Some(tally),
                }
            }
            EntryPolicy::AlwaysBootloader => Verdict {
                decision: Decision::EnterBootloader,
                tally: None,
            },
            EntryPolicy::AlwaysApplication => Verdict {
                decision: Decision::EnterApplication,
                tally: None,
            },
        }
    }

    pub fn decide<P: PinReader>(&self, pin: &mut P) -> Decision {
        self.evaluate(pin).decision
    }
}

/// The resident command session.
pub trait BootloaderEntry {
    /// One-time initialization, called once before the first poll.
    fn setup(&mut self);

    /// Service the host link once. Expected to never return, but the
    /// dispatcher calls it again if it does.
    fn poll_once(&mut self);
}

/// Hand-off to the application image.
pub trait ApplicationEntry {
    /// Transfer control to the application. The caller's stack and context
    /// are abandoned.
    fn jump(self) -> !;
}

/// Run the bootloader session forever.
pub fn run_bootloader<B: BootloaderEntry>(mut bootloader: B) -> ! {
    bootloader.setup();
    loop {
        bootloader.poll_once();
    }
}

/// Enter the continuation selected by `decision`.
pub fn dispatch<B, A>(decision: Decision, bootloader: B, application: A) -> !
where
    B: BootloaderEntry,
    A: ApplicationEntry,
{
    match decision {
        Decision::EnterBootloader => run_bootloader(bootloader),
        Decision::EnterApplication => application.jump(),
    }
}

/// Decide once and dispatch.
pub fn boot<P, B, A>(policy: &EntryPolicy, pin: &mut P, bootloader: B, application: A) -> !
where
    P: PinReader,
    B: BootloaderEntry,
    A: ApplicationEntry,
{
    let decision = policy.decide(pin);
    dispatch(decision, bootloader, application)
}
