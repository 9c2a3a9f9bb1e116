// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command implementations: packaging targets and bootloader link requests.

use anyhow::{bail, Result};

use stormloader_common::protocol::{AckStatus, Command, Response};

use crate::config::BuildConfig;
use crate::plan::{self, BuildTarget};
use crate::runner;
use crate::transport::Link;

/// Run a packaging target. Returns the toolchain's exit code.
pub fn build(target: BuildTarget, config: &BuildConfig, verbose: bool) -> Result<u8> {
    if verbose {
        println!("{}", config);
        println!();
    }

    let steps = plan::plan(target, config);
    let code = runner::execute(&steps, verbose)?;
    if code != 0 {
        eprintln!("{:?} failed with exit status {}", target, code);
    }
    Ok(code)
}

/// Check that the bootloader session answers.
pub fn ping(link: &mut Link) -> Result<()> {
    match link.request(&Command::Ping)? {
        Response::Pong => {
            println!("Bootloader on {} is alive", link.port_name());
            Ok(())
        }
        other => bail!("Unexpected response: {:?}", other),
    }
}

/// Show what the bootloader saw at reset.
pub fn info(link: &mut Link) -> Result<()> {
    match link.request(&Command::GetInfo)? {
        Response::Info {
            version,
            app_addr,
            sample_count,
            tally_asserted,
            tally_not_asserted,
        } => {
            println!("Bootloader Info:");
            println!("  Protocol version: {}", version);
            println!("  Application:      0x{:08x}", app_addr);
            if sample_count == 0 {
                println!("  Select pin:       not sampled (fixed entry policy)");
            } else {
                println!(
                    "  Select pin:       {} of {} reads asserted ({} not asserted)",
                    tally_asserted, sample_count, tally_not_asserted
                );
            }
            Ok(())
        }
        other => bail!("Unexpected response: {:?}", other),
    }
}

/// Reset the device. With the select pin released it boots the application.
pub fn reboot(link: &mut Link) -> Result<()> {
    match link.request(&Command::Reboot)? {
        Response::Ack(AckStatus::Ok) => {
            println!("Rebooting device... OK");
            Ok(())
        }
        Response::Ack(status) => bail!("Reboot failed: {:?}", status),
        other => bail!("Unexpected response: {:?}", other),
    }
}
