// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::{collections::HashMap, path::PathBuf};

use log::warn;
use serde_json::Value;

use download::{DownloadEntry, DownloadPlan};
use folder::MinecraftLocation;
use platform::PLATFORM_INFO;
use version::rules::interpret_rules;

use crate::error::*;

/// Selects the libraries that apply to this platform, classifies each into
/// a classpath entry or a native archive, and enqueues whatever is missing
/// or has the wrong size.
///
/// Classification per entry, after the rule gate:
/// 1. `natives` lists the current OS: the classifier template is resolved
///    (`${arch}` is the pointer width) and the matching `classifiers`
///    download is a native archive.
/// 2. otherwise `downloads.artifact` is a classpath entry.
/// 3. otherwise the Maven-style path is derived from `name`; entries with a
///    `url` are downloaded from `url + path`, entries without are expected
///    to be pre-installed and are skipped silently when they are not.
pub fn ensure_libraries(
    location: &MinecraftLocation,
    version_meta: &Value,
    plan: &mut DownloadPlan,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let libraries = version_meta["libraries"]
        .as_array()
        .ok_or_else(|| Error::InvalidVersionJson("libraries".to_string()))?;
    let mut classpath_libs = Vec::new();
    let mut native_libs = Vec::new();

    for library in libraries {
        if let Some(rules) = library["rules"].as_array()
            && !interpret_rules(rules, &HashMap::new())
        {
            continue;
        }
        let mut library_name = library["name"]
            .as_str()
            .ok_or_else(|| Error::InvalidVersionJson("libraries.name".to_string()))?
            .to_string();

        let native_classifier = library["natives"][PLATFORM_INFO.os_family.to_string()]
            .as_str()
            .map(|template| match &PLATFORM_INFO.arch_bits {
                Some(bits) => template.replace("${arch}", bits),
                None => template.to_string(),
            });

        if let Some(classifier) = native_classifier {
            library_name.push_str(&format!(":{classifier}"));
            let download_info = &library["downloads"]["classifiers"][&classifier];
            if !download_info.is_object() {
                warn!("No native download for library {library_name}");
                continue;
            }
            let library_path =
                library_path_from_info(location, download_info, &library_name)?;
            enqueue_if_stale(plan, download_info, &library_path, &library_name)?;
            native_libs.push(library_path);
        } else if library["downloads"]["artifact"].is_object() {
            let download_info = &library["downloads"]["artifact"];
            let library_path =
                library_path_from_info(location, download_info, &library_name)?;
            enqueue_if_stale(plan, download_info, &library_path, &library_name)?;
            classpath_libs.push(library_path);
        } else {
            // No download descriptor, derive the path from the Maven
            // coordinates. Custom metadata (e.g. mod loaders) uses this with
            // a repository `url`; without one the file must already exist.
            let parts: Vec<&str> = library_name.split(':').collect();
            if parts.len() < 3 {
                warn!("Cannot parse library coordinates {library_name}");
                continue;
            }
            let (group, artifact, library_version) = (parts[0], parts[1], parts[2]);
            let relative = format!(
                "{}/{artifact}/{library_version}/{artifact}-{library_version}.jar",
                group.replace('.', "/"),
            );
            let library_path = location.get_library_by_path(&relative);
            if !library_path.is_file() {
                match library["url"].as_str() {
                    Some(repository) => {
                        plan.push(DownloadEntry::new(
                            format!("{repository}{relative}"),
                            library_path.clone(),
                            Some(library_name),
                        ))?;
                    }
                    None => continue,
                }
            }
            classpath_libs.push(library_path);
        }
    }

    Ok((classpath_libs, native_libs))
}

fn library_path_from_info(
    location: &MinecraftLocation,
    download_info: &Value,
    library_name: &str,
) -> Result<PathBuf> {
    let path = download_info["path"]
        .as_str()
        .ok_or_else(|| Error::InvalidVersionJson(format!("library path of {library_name}")))?;
    Ok(location.get_library_by_path(path))
}

fn enqueue_if_stale(
    plan: &mut DownloadPlan,
    download_info: &Value,
    library_path: &std::path::Path,
    library_name: &str,
) -> Result<()> {
    let declared_size = download_info["size"].as_u64();
    let present = std::fs::metadata(library_path)
        .is_ok_and(|meta| declared_size.is_none_or(|size| meta.len() == size));
    if !present
        && let Some(entry) = DownloadEntry::from_meta_info(
            download_info,
            library_path.to_path_buf(),
            Some(library_name.to_string()),
        )
    {
        plan.push(entry)?;
    }
    Ok(())
}
