// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

//! The provisioning pipeline.
//!
//! Each provisioner checks what is already on disk and appends the missing
//! pieces to one shared [`DownloadPlan`]; the executor then drains the plan
//! and runs the deferred finalizers. Nothing is downloaded twice: integrity
//! is re-checked on every run, so an interrupted run simply resumes.

use std::path::PathBuf;

use log::info;
use serde_json::Value;

use config::Config;
use download::{DownloadPlan, execute_plan, task::Progress};
use folder::{MinecraftLocation, WorkLocation};
use version::VersionResolver;

pub mod assets;
pub mod client;
mod error;
pub mod java;
pub mod libraries;
pub mod logger;

pub use assets::{AssetsInfo, ensure_assets};
pub use client::ensure_client_jar;
pub use error::*;
pub use java::ensure_jvm;
pub use libraries::ensure_libraries;
pub use logger::ensure_logger;

/// Everything the launch stage needs once a version is provisioned.
pub struct Prepared {
    /// The resolved version id, after `latest` alias resolution.
    pub version_id: String,
    pub version_type: String,
    /// The fully merged metadata document, `inheritsFrom`-free.
    pub version_meta: Value,
    pub version_jar: PathBuf,
    pub assets_id: String,
    pub assets_virtual_dir: PathBuf,
    /// Classpath entries, the game archive last.
    pub classpath_libs: Vec<PathBuf>,
    /// Native archives to unpack into the per-run scratch directory.
    pub native_libs: Vec<PathBuf>,
    /// The ready-to-substitute logging JVM argument, when the version has one.
    pub logging_argument: Option<String>,
    /// The provisioned JVM executable, `None` when the caller brings its own.
    pub jvm_executable: Option<PathBuf>,
    pub jvm_version: Option<String>,
}

/// Resolves a version and runs every provisioner against one shared plan.
///
/// The returned plan has not been drained yet; callers hand it to
/// [`download::execute_plan`] themselves when they want to control progress
/// reporting, or use [`install`] for the packaged flow. Set `provision_jvm`
/// to `false` when launching with a caller-supplied JVM.
pub async fn prepare_version(
    location: &MinecraftLocation,
    work: &WorkLocation,
    version: &str,
    config: &Config,
    provision_jvm: bool,
) -> Result<(Prepared, DownloadPlan)> {
    let resolver = VersionResolver::new(location.clone());
    let (version_id, _was_alias) = resolver.manifest().await?.filter_latest(version);
    let version_meta = resolver.resolve_recursive(&version_id).await?;
    let version_type = version_meta["type"]
        .as_str()
        .ok_or_else(|| Error::InvalidVersionJson("type".to_string()))?
        .to_string();
    info!("Provisioning {version_type} {version_id}");

    let mut plan = DownloadPlan::new();
    let version_jar = ensure_client_jar(location, &version_id, &version_meta, &mut plan)?;
    let assets = ensure_assets(location, work, &version_meta, &mut plan).await?;
    info!("Checked {} assets", assets.count);
    let logging_argument = ensure_logger(
        location,
        &version_meta,
        &mut plan,
        config.launch.better_logging,
    )?;
    let (mut classpath_libs, native_libs) =
        ensure_libraries(location, &version_meta, &mut plan)?;
    info!(
        "Selected {} libraries ({} native)",
        classpath_libs.len() + native_libs.len(),
        native_libs.len()
    );
    classpath_libs.push(version_jar.clone());

    let (jvm_version, jvm_executable) = if provision_jvm {
        let component = version_meta["javaVersion"]["component"]
            .as_str()
            .unwrap_or("jre-legacy");
        let (jvm_version, jvm_executable) = ensure_jvm(location, component, &mut plan).await?;
        (Some(jvm_version), Some(jvm_executable))
    } else {
        (None, None)
    };

    Ok((
        Prepared {
            version_id,
            version_type,
            version_meta,
            version_jar,
            assets_id: assets.id,
            assets_virtual_dir: assets.virtual_dir,
            classpath_libs,
            native_libs,
            logging_argument,
            jvm_executable,
            jvm_version,
        },
        plan,
    ))
}

/// The packaged flow: provision, drain the plan, run the finalizers.
pub async fn install(
    location: &MinecraftLocation,
    work: &WorkLocation,
    version: &str,
    config: &Config,
    provision_jvm: bool,
    progress: &Progress,
) -> Result<Prepared> {
    let (prepared, plan) = prepare_version(location, work, version, config, provision_jvm).await?;
    info!(
        "Downloading {} files ({} bytes)",
        plan.count, plan.size
    );
    execute_plan(plan, progress, &config.download).await?;
    Ok(prepared)
}
