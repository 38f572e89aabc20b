// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

//! The game folders parser

use std::{
    ffi::OsStr,
    fmt::Display,
    path::{Path, PathBuf},
};

use platform::{OsFamily, PLATFORM_INFO};
use shared::LAUNCHER_NAME;

/// The Minecraft folder structure. All methods return a path related to a minecraft
/// root like `.minecraft`. This is the launcher's read-mostly store: versions,
/// assets, libraries and downloaded JVM distributions.
#[derive(Debug, Clone)]
pub struct MinecraftLocation {
    pub root: PathBuf,
    pub libraries: PathBuf,
    pub assets: PathBuf,
    pub versions: PathBuf,
    pub jvm: PathBuf,
}

impl MinecraftLocation {
    pub fn new<S: AsRef<OsStr> + ?Sized>(root: &S) -> MinecraftLocation {
        let root = Path::new(root);
        MinecraftLocation {
            root: root.to_path_buf(),
            assets: root.join("assets"),
            libraries: root.join("libraries"),
            versions: root.join("versions"),
            jvm: root.join("jvm"),
        }
    }

    pub fn get_version_root<P: AsRef<Path>>(&self, version_id: P) -> PathBuf {
        self.versions.join(version_id)
    }

    pub fn get_version_json<P: AsRef<Path> + Display>(&self, version_id: P) -> PathBuf {
        self.get_version_root(&version_id)
            .join(format!("{version_id}.json"))
    }

    pub fn get_version_jar<P: AsRef<Path> + Display>(&self, version_id: P) -> PathBuf {
        self.get_version_root(&version_id)
            .join(format!("{version_id}.jar"))
    }

    pub fn get_library_by_path<P: AsRef<Path>>(&self, library_path: P) -> PathBuf {
        self.libraries.join(library_path)
    }

    pub fn get_assets_index(&self, assets_id: &str) -> PathBuf {
        self.assets
            .join("indexes")
            .join(format!("{assets_id}.json"))
    }

    /// The content-addressed store: `assets/objects/<first two hex chars>/<hash>`.
    pub fn get_assets_object(&self, hash: &str) -> PathBuf {
        self.assets.join("objects").join(&hash[0..2]).join(hash)
    }

    /// The root of the by-name asset tree used by pre-1.7.2 clients.
    pub fn get_assets_virtual_root(&self, assets_id: &str) -> PathBuf {
        self.assets.join("virtual").join(assets_id)
    }

    pub fn get_log_config(&self, file_id: &str) -> PathBuf {
        self.assets.join("log_configs").join(file_id)
    }

    /// The launcher-rewritten variant of a vendor logger config, stored as a
    /// sibling of the vendor file.
    pub fn get_rewritten_log_config(&self, file_id: &str) -> PathBuf {
        self.assets
            .join("log_configs")
            .join(format!("{LAUNCHER_NAME}-{file_id}"))
    }

    pub fn get_jvm_root(&self, component: &str) -> PathBuf {
        self.jvm.join(component)
    }

    pub fn get_jvm_executable(&self, component: &str) -> PathBuf {
        let executable = if PLATFORM_INFO.os_family == OsFamily::Windows {
            "javaw.exe"
        } else {
            "java"
        };
        self.get_jvm_root(component).join("bin").join(executable)
    }
}

/// The working directory structure: where the game runs and stores saves,
/// screenshots, per-run native binaries and the session database.
#[derive(Debug, Clone)]
pub struct WorkLocation {
    pub root: PathBuf,
    pub bin: PathBuf,
    pub resources: PathBuf,
}

impl WorkLocation {
    pub fn new<S: AsRef<OsStr> + ?Sized>(root: &S) -> WorkLocation {
        let root = Path::new(root);
        WorkLocation {
            root: root.to_path_buf(),
            bin: root.join("bin"),
            resources: root.join("resources"),
        }
    }

    /// The per-run scratch directory native archives are unpacked into.
    pub fn get_natives_root(&self, run_id: &str) -> PathBuf {
        self.bin.join(run_id)
    }

    /// By-name asset destination for clients that read `resources/` literally.
    pub fn get_resource(&self, asset_id: &str) -> PathBuf {
        self.resources.join(asset_id)
    }

    pub fn get_session_file(&self) -> PathBuf {
        self.root.join(format!("{LAUNCHER_NAME}_auth.json"))
    }

    pub fn get_legacy_session_file(&self) -> PathBuf {
        self.root.join(format!("{LAUNCHER_NAME}_tokens"))
    }
}

/// Returns the platform-canonical game directory, the same one the vendor
/// launcher uses, or `None` when the home directory cannot be determined.
pub fn default_main_dir() -> Option<PathBuf> {
    let home = std::env::home_dir()?;
    Some(match PLATFORM_INFO.os_family {
        OsFamily::Linux => home.join(".minecraft"),
        OsFamily::Windows => home.join("AppData").join("Roaming").join(".minecraft"),
        OsFamily::Macos => home
            .join("Library")
            .join("Application Support")
            .join("minecraft"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minecraft_layout() {
        let location = MinecraftLocation::new("/tmp/mc");
        assert_eq!(
            location.get_version_json("1.20.1"),
            PathBuf::from("/tmp/mc/versions/1.20.1/1.20.1.json")
        );
        assert_eq!(
            location.get_version_jar("1.20.1"),
            PathBuf::from("/tmp/mc/versions/1.20.1/1.20.1.jar")
        );
        assert_eq!(
            location.get_assets_object("00aabbcc"),
            PathBuf::from("/tmp/mc/assets/objects/00/00aabbcc")
        );
        assert_eq!(
            location.get_assets_index("1.20"),
            PathBuf::from("/tmp/mc/assets/indexes/1.20.json")
        );
        assert_eq!(
            location.get_rewritten_log_config("client-1.12.xml"),
            PathBuf::from("/tmp/mc/assets/log_configs/slingshot-client-1.12.xml")
        );
        assert_eq!(
            location.get_jvm_root("jre-legacy"),
            PathBuf::from("/tmp/mc/jvm/jre-legacy")
        );
    }

    #[test]
    fn work_layout() {
        let work = WorkLocation::new("/tmp/work");
        assert_eq!(
            work.get_natives_root("abc"),
            PathBuf::from("/tmp/work/bin/abc")
        );
        assert_eq!(
            work.get_session_file(),
            PathBuf::from("/tmp/work/slingshot_auth.json")
        );
        assert_eq!(
            work.get_legacy_session_file(),
            PathBuf::from("/tmp/work/slingshot_tokens")
        );
    }
}
