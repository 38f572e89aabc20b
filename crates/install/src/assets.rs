// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use log::{info, warn};
use serde_json::Value;

use download::{DownloadEntry, DownloadPlan};
use folder::{MinecraftLocation, WorkLocation};

use crate::error::*;

const ASSET_BASE_URL: &str = "https://resources.download.minecraft.net";

/// What the asset provisioner learned about the version's asset tree.
pub struct AssetsInfo {
    pub id: String,
    /// Root of the by-name tree used by legacy clients, whether or not this
    /// version populates it.
    pub virtual_dir: PathBuf,
    pub count: usize,
}

/// Ensures the asset index and every object it references exist, enqueueing
/// whatever is missing or has the wrong size.
///
/// Legacy indexes flag `map_to_resources` (the game reads
/// `workDir/resources/<name>`) or `virtual` (the game reads
/// `assets/virtual/<index>/<name>`); for those a finalizer copies the
/// freshly verified objects to their by-name location once the whole plan
/// has succeeded.
pub async fn ensure_assets(
    location: &MinecraftLocation,
    work: &WorkLocation,
    version_meta: &Value,
    plan: &mut DownloadPlan,
) -> Result<AssetsInfo> {
    let assets_id = version_meta["assets"]
        .as_str()
        .ok_or_else(|| Error::InvalidVersionJson("assets".to_string()))?
        .to_string();
    let index_file = location.get_assets_index(&assets_id);

    let mut index: Option<Value> = None;
    if let Ok(data) = std::fs::read_to_string(&index_file) {
        match serde_json::from_str(&data) {
            Ok(parsed) => index = Some(parsed),
            Err(_) => warn!("Could not parse cached asset index {assets_id}, refetching"),
        }
    }
    let index = match index {
        Some(index) => index,
        None => {
            let url = version_meta["assetIndex"]["url"]
                .as_str()
                .ok_or_else(|| Error::InvalidVersionJson("assetIndex.url".to_string()))?;
            info!("Fetching asset index {assets_id}");
            let index = shared::json_simple_request(url).await?;
            if let Some(parent) = index_file.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&index_file, serde_json::to_string(&index)?)?;
            index
        }
    };

    let objects = index["objects"]
        .as_object()
        .ok_or_else(|| Error::InvalidVersionJson("assetIndex.objects".to_string()))?;
    let map_to_resources = index["map_to_resources"].as_bool().unwrap_or(false);
    let assets_virtual = index["virtual"].as_bool().unwrap_or(false);
    let virtual_dir = location.get_assets_virtual_root(&assets_id);

    let mut by_name: Vec<(String, PathBuf)> = Vec::new();
    for (asset_id, asset_obj) in objects {
        let hash = asset_obj["hash"]
            .as_str()
            .ok_or_else(|| Error::InvalidVersionJson("assetIndex.objects.hash".to_string()))?;
        let size = asset_obj["size"].as_u64();
        let asset_file = location.get_assets_object(hash);
        let present = std::fs::metadata(&asset_file)
            .is_ok_and(|meta| size.is_none_or(|size| meta.len() == size));
        if !present {
            plan.push(DownloadEntry {
                url: format!("{ASSET_BASE_URL}/{}/{hash}", &hash[0..2]),
                file: asset_file.clone(),
                size,
                sha1: Some(hash.to_string()),
                name: asset_id.clone(),
            })?;
        }
        if map_to_resources || assets_virtual {
            by_name.push((asset_id.clone(), asset_file));
        }
    }

    let count = objects.len();
    if map_to_resources || assets_virtual {
        let resources_root = work.resources.clone();
        let virtual_root = virtual_dir.clone();
        plan.add_callback(Box::new(move || {
            for (asset_id, asset_file) in by_name {
                if map_to_resources {
                    copy_if_absent(&asset_file, &resources_root.join(&asset_id))?;
                }
                if assets_virtual {
                    copy_if_absent(&asset_file, &virtual_root.join(&asset_id))?;
                }
            }
            Ok(())
        }));
    }

    Ok(AssetsInfo {
        id: assets_id,
        virtual_dir,
        count,
    })
}

fn copy_if_absent(from: &std::path::Path, to: &std::path::Path) -> download::Result<()> {
    if !to.is_file() {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(from, to)?;
    }
    Ok(())
}
