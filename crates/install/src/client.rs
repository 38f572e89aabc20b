// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use serde_json::Value;

use download::{DownloadEntry, DownloadPlan};
use folder::MinecraftLocation;

use crate::error::*;

/// Ensures the game archive of a version exists, enqueueing its download
/// when absent. A version whose metadata has no client download cannot be
/// launched and is reported as not found.
pub fn ensure_client_jar(
    location: &MinecraftLocation,
    version_id: &str,
    version_meta: &Value,
    plan: &mut DownloadPlan,
) -> Result<PathBuf> {
    let version_jar = location.get_version_jar(version_id);
    if !version_jar.is_file() {
        let client = &version_meta["downloads"]["client"];
        let entry = DownloadEntry::from_meta_info(
            client,
            version_jar.clone(),
            Some(format!("{version_id}.jar")),
        )
        .ok_or_else(|| {
            Error::Version(version::Error::VersionNotFound(version_id.to_string()))
        })?;
        plan.push(entry)?;
    }
    Ok(version_jar)
}
