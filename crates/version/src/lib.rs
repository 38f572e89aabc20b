// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

//! Version metadata resolution.
//!
//! A version is described by a JSON document the vendor publishes per
//! version id. Documents may extend a parent through `inheritsFrom`; the
//! resolver follows that chain and merges child into parent until a
//! self-contained document remains.

use std::collections::HashSet;

use log::{info, warn};
use once_cell::sync::OnceCell;
use serde_json::Value;

use folder::MinecraftLocation;

pub mod argument;
mod error;
pub mod manifest;
pub mod rules;

pub use argument::*;
pub use error::*;
pub use manifest::*;

/// Fetches, caches and merges version metadata documents.
///
/// The manifest is only fetched when a version is not already cached, so a
/// fully provisioned installation resolves offline.
pub struct VersionResolver {
    location: MinecraftLocation,
    manifest: OnceCell<VersionManifest>,
}

impl VersionResolver {
    pub fn new(location: MinecraftLocation) -> Self {
        Self {
            location,
            manifest: OnceCell::new(),
        }
    }

    pub async fn manifest(&self) -> Result<&VersionManifest> {
        if let Some(manifest) = self.manifest.get() {
            return Ok(manifest);
        }
        let manifest = VersionManifest::fetch().await?;
        Ok(self.manifest.get_or_init(|| manifest))
    }

    /// Resolves a single metadata document, without following inheritance.
    ///
    /// A cached document is authoritative when it parses, even if stale; a
    /// cached document that fails to parse is treated as absent and
    /// refetched. Freshly fetched documents are persisted before return.
    pub async fn resolve(&self, version_id: &str) -> Result<Value> {
        let version_json_path = self.location.get_version_json(version_id);
        if let Ok(data) = std::fs::read_to_string(&version_json_path) {
            match serde_json::from_str::<Value>(&data) {
                Ok(content) => return Ok(content),
                Err(_) => warn!("Could not parse cached metadata of {version_id}, refetching"),
            }
        }
        let manifest = self.manifest().await?;
        let version_info = manifest
            .get_version(version_id)
            .ok_or_else(|| Error::VersionNotFound(version_id.to_string()))?;
        info!("Fetching version metadata of {version_id}");
        let content = shared::json_simple_request(&version_info.url).await?;
        if let Some(parent) = version_json_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&version_json_path, serde_json::to_string_pretty(&content)?)?;
        Ok(content)
    }

    /// Resolves a metadata document and merges its whole `inheritsFrom`
    /// chain, child winning over parent. The chain is a list, not a DAG: a
    /// version that is seen twice means a cycle and is rejected as not
    /// found.
    pub async fn resolve_recursive(&self, version_id: &str) -> Result<Value> {
        let mut version_meta = self.resolve(version_id).await?;
        let mut visited = HashSet::from([version_id.to_string()]);
        while let Some(parent_id) = version_meta["inheritsFrom"].as_str().map(str::to_string) {
            if !visited.insert(parent_id.clone()) {
                warn!("Version {parent_id} inherits from itself");
                return Err(Error::VersionNotFound(parent_id));
            }
            let mut parent_meta = self.resolve(&parent_id).await?;
            if let Some(object) = version_meta.as_object_mut() {
                object.remove("inheritsFrom");
            }
            merge_metadata(&mut parent_meta, version_meta);
            version_meta = parent_meta;
        }
        Ok(version_meta)
    }
}

/// Merges `other` into `dst`: maps merge recursively, lists concatenate
/// `dst` first, anything else is overwritten by `other`.
pub fn merge_metadata(dst: &mut Value, other: Value) {
    match (dst, other) {
        (Value::Object(dst), Value::Object(other)) => {
            for (key, value) in other {
                match dst.get_mut(&key) {
                    Some(existing) => merge_metadata(existing, value),
                    None => {
                        dst.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(dst), Value::Array(other)) => {
            dst.extend(other);
        }
        (dst, other) => *dst = other,
    }
}

/// Scans the local `versions` directory for installed versions whose id
/// contains `search` (any id when `None`), keeping only versions that have
/// their game archive in place.
pub fn search_local_versions(
    location: &MinecraftLocation,
    search: Option<&str>,
) -> Vec<(String, std::time::SystemTime)> {
    let mut found = Vec::new();
    let Ok(dir) = std::fs::read_dir(&location.versions) else {
        return found;
    };
    for dir_entry in dir.flatten() {
        let version_id = dir_entry.file_name().to_string_lossy().to_string();
        if let Some(search) = search
            && !version_id.contains(search)
        {
            continue;
        }
        let jar = location.get_version_jar(&version_id);
        if let Ok(meta) = std::fs::metadata(&jar) {
            let modified = meta.modified().unwrap_or(std::time::UNIX_EPOCH);
            found.push((version_id, modified));
        }
    }
    found
}
