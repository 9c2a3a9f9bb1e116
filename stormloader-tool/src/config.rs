// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Resolved build configuration for the firmware image.

use std::fmt;
use std::path::PathBuf;

/// Cargo package that produces the bootloader image.
pub const FIRMWARE_PACKAGE: &str = "stormloader";

/// Cargo build profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    Release,
    Debug,
}

impl Profile {
    /// Directory name cargo uses under `target/<triple>/`.
    pub fn dir_name(self) -> &'static str {
        match self {
            Profile::Release => "release",
            Profile::Debug => "debug",
        }
    }
}

/// Everything needed to drive the toolchain for one platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildConfig {
    /// Rust target triple, e.g. `thumbv6m-none-eabi`.
    pub target: String,
    /// Board/platform name used in artifact names.
    pub platform: String,
    /// Extra cargo features for the firmware crate.
    pub features: Vec<String>,
    pub cargo: PathBuf,
    pub objcopy: PathBuf,
    pub objdump: PathBuf,
    pub target_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl BuildConfig {
    /// Architecture component of the target triple.
    pub fn arch(&self) -> &str {
        self.target.split('-').next().unwrap_or(&self.target)
    }

    pub fn elf_path(&self, profile: Profile) -> PathBuf {
        self.target_dir
            .join(&self.target)
            .join(profile.dir_name())
            .join(FIRMWARE_PACKAGE)
    }

    pub fn bin_path(&self, profile: Profile) -> PathBuf {
        let name = match profile {
            Profile::Release => format!("{}-{}.bin", FIRMWARE_PACKAGE, self.platform),
            Profile::Debug => format!("{}-{}-debug.bin", FIRMWARE_PACKAGE, self.platform),
        };
        self.out_dir.join(name)
    }

    pub fn listing_path(&self) -> PathBuf {
        self.out_dir
            .join(format!("{}-{}.lst", FIRMWARE_PACKAGE, self.platform))
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Build configuration:")?;
        writeln!(f, "  Architecture: {}", self.arch())?;
        writeln!(f, "  Target:       {}", self.target)?;
        writeln!(f, "  Platform:     {}", self.platform)?;
        if !self.features.is_empty() {
            writeln!(f, "  Features:     {}", self.features.join(","))?;
        }
        writeln!(f, "  Cargo:        {}", self.cargo.display())?;
        writeln!(f, "  Objcopy:      {}", self.objcopy.display())?;
        writeln!(f, "  Objdump:      {}", self.objdump.display())?;
        writeln!(f, "  Target dir:   {}", self.target_dir.display())?;
        write!(f, "  Output dir:   {}", self.out_dir.display())
    }
}
