// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Executes planned build steps and reports the toolchain's exit status.

use std::fs::{self, File};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};
use crc::{Crc, CRC_32_ISO_HDLC};

use crate::plan::{Invocation, Step};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Exit status reported when a tool was killed without an exit code.
const SIGNALLED_EXIT_CODE: u8 = 1;

/// Run `steps` in order. Returns 0, or the exit code of the first tool that failed.
pub fn execute(steps: &[Step], verbose: bool) -> Result<u8> {
    for step in steps {
        let code = match step {
            Step::Run(inv) => {
                let status = command(inv, verbose)
                    .status()
                    .with_context(|| format!("Failed to run {}", inv.program.display()))?;
                exit_code(status)
            }
            Step::RunToFile(inv, path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                let status = command(inv, verbose)
                    .stdout(Stdio::from(file))
                    .status()
                    .with_context(|| format!("Failed to run {}", inv.program.display()))?;
                if status.success() {
                    println!("Listing: {}", path.display());
                }
                exit_code(status)
            }
            Step::CreateDir(dir) => {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
                0
            }
            Step::Checksum(path) => {
                report_checksum(path)?;
                0
            }
        };

        if code != 0 {
            return Ok(code);
        }
    }
    Ok(0)
}

fn command(inv: &Invocation, verbose: bool) -> Command {
    if verbose {
        println!("+ {}", inv);
    }
    let mut cmd = Command::new(&inv.program);
    cmd.args(&inv.args);
    cmd
}

/// Map a child's status to our exit code, passing the code through unchanged.
///
/// Process exit codes are a byte on Unix. Elsewhere a code outside `0..=255`
/// cannot be passed through and maps to 1, as a signal termination does.
pub fn exit_code(status: ExitStatus) -> u8 {
    match status.code() {
        Some(0) => 0,
        Some(code) => u8::try_from(code).unwrap_or(SIGNALLED_EXIT_CODE),
        None => SIGNALLED_EXIT_CODE,
    }
}

fn report_checksum(path: &Path) -> Result<()> {
    let image = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    println!(
        "Image: {} ({} bytes, CRC32: 0x{:08x})",
        path.display(),
        image.len(),
        CRC32.checksum(&image)
    );
    Ok(())
}
