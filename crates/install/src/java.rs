// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::{collections::HashMap, path::PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use download::{DownloadEntry, DownloadPlan};
use folder::MinecraftLocation;
use platform::PLATFORM_INFO;

use crate::error::*;

const JVM_META_URL: &str = "https://launchermeta.mojang.com/v1/products/java-runtime/2ec0cc96c44e5a76b9c8b7c39df7210883d12871/all.json";

/// Contains metadata for downloading a Java runtime manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ManifestDownloadInfo {
    sha1: String,
    size: u64,
    url: String,
}

/// Contains the name and release date of a Java runtime version.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RuntimeVersion {
    name: String,
    released: String,
}

/// Holds all data required to download one vendor-provided Java runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct JavaRuntimeInfo {
    manifest: ManifestDownloadInfo,
    version: RuntimeVersion,
}

/// Raw (uncompressed) file metadata used in the Java runtime manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct JavaFileRaw {
    sha1: String,
    size: u64,
    url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JavaFileDownloads {
    raw: JavaFileRaw,
}

/// Enum describing the type and metadata of each Java runtime file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum JavaFileInfo {
    #[serde(rename = "file")]
    File {
        downloads: JavaFileDownloads,
        #[serde(default)]
        executable: bool,
    },
    #[serde(rename = "directory")]
    Directory,
    #[serde(rename = "link")]
    Link { target: String },
}

/// Represents the complete manifest structure for a Java runtime version.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct JavaManifest {
    files: HashMap<String, JavaFileInfo>,
}

/// Ensures a vendor JVM distribution matching this platform and the given
/// component (e.g. "jre-legacy", "java-runtime-gamma") is installed under
/// `jvm/<component>`, enqueueing every missing file.
///
/// Executable files are collected and a finalizer marks them executable
/// once the whole plan has succeeded. Returns the runtime's version name
/// and the path of its `java` executable.
pub async fn ensure_jvm(
    location: &MinecraftLocation,
    component: &str,
    plan: &mut DownloadPlan,
) -> Result<(String, PathBuf)> {
    let platform_key = PLATFORM_INFO
        .jvm_platform()
        .ok_or(Error::JvmLoading(JvmLoadingKind::NotFound))?;
    let all_jvm_meta: Value = shared::json_simple_request(JVM_META_URL).await?;
    let platform_meta = &all_jvm_meta[platform_key];
    if !platform_meta.is_object() {
        return Err(Error::JvmLoading(JvmLoadingKind::UnsupportedJvmArch));
    }
    let runtimes: Vec<JavaRuntimeInfo> =
        serde_json::from_value(platform_meta[component].clone()).unwrap_or_default();
    let runtime = runtimes
        .first()
        .ok_or(Error::JvmLoading(JvmLoadingKind::UnsupportedJvmVersion))?;
    info!(
        "Selected JVM {} for platform {platform_key}",
        runtime.version.name
    );

    let manifest: JavaManifest =
        serde_json::from_value(shared::json_simple_request(&runtime.manifest.url).await?)?;
    let jvm_dir = location.get_jvm_root(component);
    let jvm_executable = location.get_jvm_executable(component);

    if !jvm_executable.is_file() {
        let mut executable_files = Vec::new();
        for (file_path, file_info) in manifest.files {
            if let JavaFileInfo::File {
                downloads,
                executable,
            } = file_info
            {
                let target = jvm_dir.join(&file_path);
                plan.push(DownloadEntry {
                    url: downloads.raw.url,
                    file: target.clone(),
                    size: Some(downloads.raw.size),
                    sha1: Some(downloads.raw.sha1),
                    name: file_path,
                })?;
                if executable {
                    executable_files.push(target);
                }
            }
        }
        plan.add_callback(Box::new(move || {
            mark_executable(&executable_files)?;
            Ok(())
        }));
    }

    Ok((runtime.version.name.clone(), jvm_executable))
}

#[cfg(not(windows))]
fn mark_executable(files: &[PathBuf]) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    for file in files {
        let mut permissions = std::fs::metadata(file)?.permissions();
        permissions.set_mode(0o777);
        std::fs::set_permissions(file, permissions)?;
    }
    Ok(())
}

#[cfg(windows)]
fn mark_executable(_files: &[PathBuf]) -> std::io::Result<()> {
    Ok(())
}
