// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Build driver and host link tool for the StormLoader bootloader.
//!
//! Usage:
//!   stormloader-tool build-release --platform rp2040
//!   stormloader-tool -v disassembly-listing
//!   stormloader-tool info --port /dev/ttyACM0
//!
//! Packaging targets exit with the failing toolchain command's exit status.

mod cli;
mod commands;
mod config;
mod plan;
mod runner;
mod transport;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<ExitCode> {
    let args = cli::Cli::parse();
    cli::run(args)
}
