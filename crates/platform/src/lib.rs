// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt::Display;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub static PLATFORM_INFO: Lazy<PlatformInfo> = Lazy::new(PlatformInfo::new);

/// Represents the high-level operating system family.
///
/// This is an abstraction over detailed OS types (e.g., Ubuntu, Windows 10) to group
/// them by family: Windows, Linux, or macOS. The `Display` form is the name the
/// vendor's version metadata uses in platform rules.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OsFamily {
    /// Microsoft Windows OS family
    Windows,

    /// Linux-based distributions (e.g., Ubuntu, Arch, Debian)
    Linux,

    /// Apple macOS family, named "osx" in version metadata
    Macos,
}

impl Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::Linux => write!(f, "linux"),
            Self::Macos => write!(f, "osx"),
        }
    }
}

/// Contains detailed platform-related information, such as architecture,
/// OS family, version and pointer width.
///
/// Used by the rule interpreter, the native library classifier and the JVM
/// distribution selector.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PlatformInfo {
    /// The CPU family the way version metadata rules spell it
    /// (e.g., "x86", "x86_64", "arm64").
    pub arch: String,

    /// The pointer width of the CPU, `"64"` or `"32"`, if known.
    ///
    /// Substituted for `${arch}` in native library classifiers.
    pub arch_bits: Option<String>,

    /// The general OS family classification (Windows/Linux/macOS).
    pub os_family: OsFamily,

    /// The version string of the OS (e.g., "10.0.19045", "6.8.0").
    ///
    /// Version metadata rules match a regex against this string.
    pub os_version: String,
}

/// The classpath separator character.
///
/// On Windows, this is `";"`, and on other systems it is `":"`.
#[cfg(windows)]
pub const DELIMITER: &str = ";";
#[cfg(not(windows))]
pub const DELIMITER: &str = ":";

impl PlatformInfo {
    /// Constructs a new [`PlatformInfo`] instance using compile-time and runtime system data.
    ///
    /// - Detects architecture and pointer width using `cfg!(target_arch)` / `cfg!(target_pointer_width)`
    /// - Detects OS family using `cfg!(target_os)`
    /// - Uses `os_info` crate to get the detailed version string
    ///
    /// # Panics
    /// Panics if the OS is not supported by the program.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let os_family = if cfg!(target_os = "windows") {
            OsFamily::Windows
        } else if cfg!(target_os = "linux") {
            OsFamily::Linux
        } else if cfg!(target_os = "macos") {
            OsFamily::Macos
        } else {
            panic!("Sorry, but this program does not support your system!")
        };
        let os_info = os_info::get();
        Self {
            os_family,
            os_version: os_info.version().to_string(),
            arch: if cfg!(target_arch = "x86_64") {
                "x86_64"
            } else if cfg!(target_arch = "x86") {
                "x86"
            } else if cfg!(target_arch = "aarch64") {
                "arm64"
            } else {
                "unknown"
            }
            .to_string(),
            arch_bits: if cfg!(target_pointer_width = "64") {
                Some("64".to_string())
            } else if cfg!(target_pointer_width = "32") {
                Some("32".to_string())
            } else {
                None
            },
        }
    }

    /// Returns the vendor's JVM distribution key for this platform, if one exists.
    ///
    /// The vendor publishes JVM builds per platform under keys like "linux",
    /// "linux-i386", "mac-os" or "windows-x64".
    pub fn jvm_platform(&self) -> Option<&'static str> {
        match self.os_family {
            OsFamily::Macos => match self.arch.as_str() {
                "x86_64" => Some("mac-os"),
                "arm64" => Some("mac-os-arm64"),
                _ => None,
            },
            OsFamily::Linux => match self.arch.as_str() {
                "x86" => Some("linux-i386"),
                "x86_64" => Some("linux"),
                _ => None,
            },
            OsFamily::Windows => match self.arch.as_str() {
                "x86" => Some("windows-x86"),
                "x86_64" => Some("windows-x64"),
                "arm64" => Some("windows-arm64"),
                _ => None,
            },
        }
    }
}
