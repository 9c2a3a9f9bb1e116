// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command-line interface definitions.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands;
use crate::config::BuildConfig;
use crate::plan::BuildTarget;
use crate::transport::{Link, DEFAULT_TIMEOUT_MS};

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "stormloader-tool")]
#[command(about = "Build driver and host link tool for the StormLoader bootloader")]
pub struct Cli {
    /// Print the resolved build configuration and each tool invocation
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Build the release image and extract a raw binary
    BuildRelease(BuildArgs),

    /// Build the debug image and extract a raw binary
    BuildDebug(BuildArgs),

    /// Type-check the firmware without producing an image
    Check(BuildArgs),

    /// Remove build artifacts
    Clean(BuildArgs),

    /// Build the release image and write a disassembly listing
    DisassemblyListing(BuildArgs),

    /// Check that the bootloader session answers
    Ping(LinkArgs),

    /// Show bootloader info and the select pin votes seen at reset
    Info(LinkArgs),

    /// Reboot the device
    Reboot(LinkArgs),
}

/// Toolchain and platform selection.
#[derive(Args)]
pub struct BuildArgs {
    /// Rust target triple
    #[arg(long, env = "STORMLOADER_TARGET", default_value = "thumbv6m-none-eabi")]
    pub target: String,

    /// Platform name used in artifact names
    #[arg(long, env = "STORMLOADER_PLATFORM", default_value = "rp2040")]
    pub platform: String,

    /// Firmware features, e.g. `just-jump` or `always-bootloader`
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Cargo executable
    #[arg(long, env = "CARGO", default_value = "cargo")]
    pub cargo: PathBuf,

    /// objcopy used for binary extraction
    #[arg(long, env = "STORMLOADER_OBJCOPY", default_value = "rust-objcopy")]
    pub objcopy: PathBuf,

    /// objdump used for the disassembly listing
    #[arg(long, env = "STORMLOADER_OBJDUMP", default_value = "rust-objdump")]
    pub objdump: PathBuf,

    /// Cargo target directory
    #[arg(long, env = "CARGO_TARGET_DIR", default_value = "target")]
    pub target_dir: PathBuf,

    /// Directory for extracted binaries and listings
    #[arg(long, default_value = "target/stormloader")]
    pub out_dir: PathBuf,
}

impl From<BuildArgs> for BuildConfig {
    fn from(args: BuildArgs) -> Self {
        BuildConfig {
            target: args.target,
            platform: args.platform,
            features: args.features,
            cargo: args.cargo,
            objcopy: args.objcopy,
            objdump: args.objdump,
            target_dir: args.target_dir,
            out_dir: args.out_dir,
        }
    }
}

/// Serial port selection.
#[derive(Args)]
pub struct LinkArgs {
    /// Serial port (e.g., /dev/ttyACM0)
    #[arg(short, long)]
    pub port: String,

    /// Response timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,
}

impl LinkArgs {
    fn open(&self) -> Result<Link> {
        Link::open(&self.port, self.timeout_ms)
    }
}

/// Execute the parsed CLI command.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let verbose = cli.verbose;
    let build = |target: BuildTarget, args: BuildArgs| -> Result<ExitCode> {
        let code = commands::build(target, &args.into(), verbose)?;
        Ok(ExitCode::from(code))
    };

    match cli.command {
        Commands::BuildRelease(args) => build(BuildTarget::BuildRelease, args),
        Commands::BuildDebug(args) => build(BuildTarget::BuildDebug, args),
        Commands::Check(args) => build(BuildTarget::Check, args),
        Commands::Clean(args) => build(BuildTarget::Clean, args),
        Commands::DisassemblyListing(args) => build(BuildTarget::DisassemblyListing, args),
        Commands::Ping(args) => commands::ping(&mut args.open()?).map(|()| ExitCode::SUCCESS),
        Commands::Info(args) => commands::info(&mut args.open()?).map(|()| ExitCode::SUCCESS),
        Commands::Reboot(args) => commands::reboot(&mut args.open()?).map(|()| ExitCode::SUCCESS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn packaging_subcommand_names() {
        for name in [
            "build-release",
            "build-debug",
            "check",
            "clean",
            "disassembly-listing",
        ] {
            let cli = Cli::try_parse_from(["stormloader-tool", name, "--platform", "pico"])
                .unwrap_or_else(|e| panic!("{name}: {e}"));
            assert!(!cli.verbose);
        }
    }

    #[test]
    fn verbose_and_features_parse() {
        let cli = Cli::try_parse_from([
            "stormloader-tool",
            "check",
            "-v",
            "--features",
            "just-jump,always-bootloader",
            "--objcopy",
            "/opt/arm/bin/arm-none-eabi-objcopy",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        let config = BuildConfig::from(args);
        assert_eq!(config.features, ["just-jump", "always-bootloader"]);
        assert_eq!(
            config.objcopy,
            PathBuf::from("/opt/arm/bin/arm-none-eabi-objcopy")
        );
    }

    #[test]
    fn link_commands_require_port() {
        assert!(Cli::try_parse_from(["stormloader-tool", "ping"]).is_err());
        assert!(Cli::try_parse_from(["stormloader-tool", "info", "-p", "/dev/ttyACM0"]).is_ok());
    }
}
