// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Build targets and the toolchain steps each one runs.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{BuildConfig, Profile, FIRMWARE_PACKAGE};

/// Packaging targets exposed on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildTarget {
    BuildRelease,
    BuildDebug,
    Check,
    Clean,
    DisassemblyListing,
}

/// A program and its arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    fn new(program: &Path) -> Self {
        Self {
            program: program.to_path_buf(),
            args: Vec::new(),
        }
    }

    fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn path_arg(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// One step of a build target. Steps run in order; the first failure stops the target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Run a tool with inherited stdio.
    Run(Invocation),
    /// Run a tool and capture its stdout into a file.
    RunToFile(Invocation, PathBuf),
    /// Create a directory and its parents.
    CreateDir(PathBuf),
    /// Print size and CRC32 of a produced image.
    Checksum(PathBuf),
}

fn cargo(config: &BuildConfig, subcommand: &str) -> Invocation {
    Invocation::new(&config.cargo)
        .arg(subcommand)
        .arg("--target-dir")
        .path_arg(&config.target_dir)
}

fn cargo_firmware(config: &BuildConfig, subcommand: &str, profile: Profile) -> Invocation {
    let mut inv = cargo(config, subcommand);
    if profile == Profile::Release {
        inv = inv.arg("--release");
    }
    inv = inv
        .arg("--target")
        .arg(config.target.as_str())
        .arg("-p")
        .arg(FIRMWARE_PACKAGE);
    if !config.features.is_empty() {
        inv = inv.arg("--features").arg(config.features.join(","));
    }
    inv
}

fn image_steps(config: &BuildConfig, profile: Profile) -> Vec<Step> {
    let bin = config.bin_path(profile);
    vec![
        Step::Run(cargo_firmware(config, "build", profile)),
        Step::CreateDir(config.out_dir.clone()),
        Step::Run(
            Invocation::new(&config.objcopy)
                .arg("-O")
                .arg("binary")
                .path_arg(&config.elf_path(profile))
                .path_arg(&bin),
        ),
        Step::Checksum(bin),
    ]
}

/// Steps for `target` under `config`.
pub fn plan(target: BuildTarget, config: &BuildConfig) -> Vec<Step> {
    match target {
        BuildTarget::BuildRelease => image_steps(config, Profile::Release),
        BuildTarget::BuildDebug => image_steps(config, Profile::Debug),
        BuildTarget::Check => vec![Step::Run(cargo_firmware(config, "check", Profile::Debug))],
        BuildTarget::Clean => vec![Step::Run(cargo(config, "clean"))],
        BuildTarget::DisassemblyListing => vec![
            Step::Run(cargo_firmware(config, "build", Profile::Release)),
            Step::CreateDir(config.out_dir.clone()),
            Step::RunToFile(
                Invocation::new(&config.objdump)
                    .arg("-d")
                    .arg("-S")
                    .arg("--demangle")
                    .path_arg(&config.elf_path(Profile::Release)),
                config.listing_path(),
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BuildConfig {
        BuildConfig {
            target: "thumbv6m-none-eabi".to_string(),
            platform: "rp2040".to_string(),
            features: Vec::new(),
            cargo: PathBuf::from("cargo"),
            objcopy: PathBuf::from("rust-objcopy"),
            objdump: PathBuf::from("rust-objdump"),
            target_dir: PathBuf::from("target"),
            out_dir: PathBuf::from("out"),
        }
    }

    fn args(step: &Step) -> Vec<&str> {
        match step {
            Step::Run(inv) | Step::RunToFile(inv, _) => {
                inv.args.iter().map(String::as_str).collect()
            }
            other => panic!("not a tool step: {:?}", other),
        }
    }

    #[test]
    fn release_builds_then_extracts_binary() {
        let cfg = config();
        let steps = plan(BuildTarget::BuildRelease, &cfg);

        assert_eq!(steps.len(), 4);
        assert_eq!(
            args(&steps[0]),
            [
                "build",
                "--target-dir",
                "target",
                "--release",
                "--target",
                "thumbv6m-none-eabi",
                "-p",
                "stormloader"
            ]
        );
        assert_eq!(steps[1], Step::CreateDir(PathBuf::from("out")));
        assert_eq!(
            steps[2],
            Step::Run(Invocation {
                program: PathBuf::from("rust-objcopy"),
                args: vec![
                    "-O".to_string(),
                    "binary".to_string(),
                    cfg.elf_path(Profile::Release).display().to_string(),
                    cfg.bin_path(Profile::Release).display().to_string(),
                ],
            })
        );
        assert_eq!(steps[3], Step::Checksum(cfg.bin_path(Profile::Release)));
    }

    #[test]
    fn debug_build_has_no_release_flag() {
        let steps = plan(BuildTarget::BuildDebug, &config());
        assert!(!args(&steps[0]).contains(&"--release"));
        assert_eq!(
            steps[3],
            Step::Checksum(PathBuf::from("out").join("stormloader-rp2040-debug.bin"))
        );
    }

    #[test]
    fn check_does_not_produce_an_image() {
        let steps = plan(BuildTarget::Check, &config());
        assert_eq!(steps.len(), 1);
        assert_eq!(args(&steps[0])[0], "check");
    }

    #[test]
    fn clean_runs_cargo_clean() {
        let steps = plan(BuildTarget::Clean, &config());
        assert_eq!(args(&steps[0]), ["clean", "--target-dir", "target"]);
    }

    #[test]
    fn listing_captures_objdump_output() {
        let cfg = config();
        let steps = plan(BuildTarget::DisassemblyListing, &cfg);

        assert!(args(&steps[0]).contains(&"--release"));
        match &steps[2] {
            Step::RunToFile(inv, path) => {
                assert_eq!(inv.program, PathBuf::from("rust-objdump"));
                assert_eq!(inv.args[..3], ["-d", "-S", "--demangle"]);
                assert_eq!(path, &PathBuf::from("out").join("stormloader-rp2040.lst"));
            }
            other => panic!("expected objdump step, got {:?}", other),
        }
    }

    #[test]
    fn features_are_forwarded_to_cargo() {
        let mut cfg = config();
        cfg.features = vec!["just-jump".to_string()];

        let steps = plan(BuildTarget::Check, &cfg);
        let a = args(&steps[0]);
        assert_eq!(a[a.len() - 2..], ["--features", "just-jump"]);
    }

    #[test]
    fn elf_path_follows_cargo_layout() {
        assert_eq!(
            config().elf_path(Profile::Release),
            PathBuf::from("target/thumbv6m-none-eabi/release/stormloader")
        );
    }

    #[test]
    fn config_display_names_toolchain() {
        let text = config().to_string();
        assert!(text.contains("Architecture: thumbv6m"));
        assert!(text.contains("Platform:     rp2040"));
        assert!(text.contains("Objcopy:      rust-objcopy"));
        assert!(text.contains("Objdump:      rust-objdump"));
    }

    #[test]
    fn invocation_display_joins_arguments() {
        let inv = Invocation::new(&PathBuf::from("cargo")).arg("clean");
        assert_eq!(inv.to_string(), "cargo clean");
    }
}
