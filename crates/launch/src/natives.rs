// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::{
    io,
    path::{Path, PathBuf},
};

use log::{info, warn};
use uuid::Uuid;
use zip::ZipArchive;

use folder::WorkLocation;

use crate::error::*;

/// The per-run scratch directory native archives are unpacked into,
/// removed again when the guard is dropped.
///
/// The directory lives under `workDir/bin/<random uuid>` so concurrent runs
/// never collide, and the game finds its dynamic libraries through the
/// `natives_directory` substitution.
pub struct NativesDirectory {
    path: PathBuf,
}

impl NativesDirectory {
    /// Unpacks every native archive, skipping signing material and version
    /// control leftovers.
    pub fn extract(work: &WorkLocation, native_libs: &[PathBuf]) -> Result<Self> {
        let path = work.get_natives_root(&Uuid::new_v4().to_string());
        std::fs::create_dir_all(&path)?;
        info!("Extracting natives to {}", path.display());
        for native_lib in native_libs {
            let file = std::fs::File::open(native_lib)?;
            let mut archive = ZipArchive::new(file)?;
            for i in 0..archive.len() {
                let mut entry = archive.by_index(i)?;
                if entry.is_dir() || !can_extract_native(entry.name()) {
                    continue;
                }
                let Some(relative) = entry.enclosed_name() else {
                    warn!("Skipping unsafe archive entry {}", entry.name());
                    continue;
                };
                let target = path.join(relative);
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                io::copy(&mut entry, &mut std::fs::File::create(&target)?)?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for NativesDirectory {
    fn drop(&mut self) {
        if self.path.is_dir()
            && let Err(err) = std::fs::remove_dir_all(&self.path)
        {
            warn!("Could not remove natives directory: {err}");
        }
    }
}

/// Signing material and version control leftovers never reach the scratch
/// directory.
pub fn can_extract_native(filename: &str) -> bool {
    !filename.starts_with("META-INF") && !filename.ends_with(".git") && !filename.ends_with(".sha1")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_native_archive(path: &Path) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in [
            ("liblwjgl.so", b"elf".as_slice()),
            ("META-INF/MANIFEST.MF", b"manifest".as_slice()),
            ("liblwjgl.so.sha1", b"digest".as_slice()),
            ("module.git", b"gitfile".as_slice()),
            ("subdir/libopenal.so", b"elf2".as_slice()),
        ] {
            writer.start_file(name, options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn exclusion_filter() {
        assert!(can_extract_native("liblwjgl.so"));
        assert!(can_extract_native("subdir/libopenal.so"));
        assert!(!can_extract_native("META-INF/MANIFEST.MF"));
        assert!(!can_extract_native("liblwjgl.so.sha1"));
        assert!(!can_extract_native("module.git"));
    }

    #[test]
    fn extraction_applies_the_filter_and_cleanup_runs_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let work = WorkLocation::new(dir.path());
        let archive_path = dir.path().join("natives.jar");
        write_native_archive(&archive_path);

        let natives = NativesDirectory::extract(&work, &[archive_path]).unwrap();
        let scratch = natives.path().to_path_buf();
        assert!(scratch.starts_with(&work.bin));
        assert!(scratch.join("liblwjgl.so").is_file());
        assert!(scratch.join("subdir/libopenal.so").is_file());
        assert!(!scratch.join("META-INF").exists());
        assert!(!scratch.join("liblwjgl.so.sha1").exists());
        assert!(!scratch.join("module.git").exists());

        drop(natives);
        assert!(!scratch.exists());
    }
}
