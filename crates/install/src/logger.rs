// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use log::info;
use serde_json::Value;

use download::{DownloadEntry, DownloadPlan};
use folder::MinecraftLocation;

use crate::error::*;

/// What the rewritten logger config replaces the XML console layouts with,
/// so console output is one readable line per event.
const LOGGING_CONSOLE_REPLACEMENT: &str =
    "<PatternLayout pattern=\"%d{HH:mm:ss.SSS} [%t] %-5level %logger{36} - %msg%n\"/>";

/// Ensures the version's logger configuration exists and returns the
/// ready-to-substitute JVM argument from the metadata, or `None` when the
/// version declares no client logging.
///
/// With `better_logging`, a finalizer produces a sibling config whose XML
/// console layouts are replaced by a pattern layout, and the returned
/// argument points at that rewritten file; without it the argument always
/// points at the vendor file.
pub fn ensure_logger(
    location: &MinecraftLocation,
    version_meta: &Value,
    plan: &mut DownloadPlan,
    better_logging: bool,
) -> Result<Option<String>> {
    let client_logging = &version_meta["logging"]["client"];
    if !client_logging.is_object() {
        return Ok(None);
    }
    let file_info = &client_logging["file"];
    let file_id = file_info["id"]
        .as_str()
        .ok_or_else(|| Error::InvalidVersionJson("logging.client.file.id".to_string()))?;
    let logging_file = location.get_log_config(file_id);
    let entry = DownloadEntry::from_meta_info(file_info, logging_file.clone(), Some(file_id.to_string()))
        .ok_or_else(|| Error::InvalidVersionJson("logging.client.file.url".to_string()))?;

    let declared_size = entry.size;
    let present = std::fs::metadata(&logging_file)
        .is_ok_and(|meta| declared_size.is_none_or(|size| meta.len() == size));
    let mut dirty = false;
    if !present {
        plan.push(entry)?;
        dirty = true;
    }

    let real_logging_file = if better_logging {
        location.get_rewritten_log_config(file_id)
    } else {
        logging_file.clone()
    };

    if better_logging {
        let source = logging_file;
        let target = real_logging_file.clone();
        plan.add_callback(Box::new(move || {
            if dirty || !target.is_file() {
                info!("Rewriting logger config {}", target.display());
                let raw = std::fs::read_to_string(&source)?;
                std::fs::write(
                    &target,
                    raw.replace("<XMLLayout />", LOGGING_CONSOLE_REPLACEMENT)
                        .replace("<LegacyXMLLayout />", LOGGING_CONSOLE_REPLACEMENT),
                )?;
            }
            Ok(())
        }));
    }

    let argument = client_logging["argument"]
        .as_str()
        .ok_or_else(|| Error::InvalidVersionJson("logging.client.argument".to_string()))?;
    Ok(Some(
        argument.replace("${path}", &real_logging_file.to_string_lossy()),
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const VENDOR_CONFIG: &str =
        "<Configuration><Console><XMLLayout /></Console><File><LegacyXMLLayout /></File></Configuration>";

    fn logging_meta(size: u64) -> Value {
        json!({"logging": {"client": {
            "argument": "-Dlog4j.configurationFile=${path}",
            "file": {
                "id": "client-1.12.xml",
                "url": "https://piston-data.mojang.com/v1/objects/xyz/client-1.12.xml",
                "size": size,
                "sha1": "xyz",
            },
        }}})
    }

    #[tokio::test]
    async fn better_logging_rewrites_console_layouts() {
        let dir = tempfile::tempdir().unwrap();
        let location = MinecraftLocation::new(dir.path());
        let vendor_file = location.get_log_config("client-1.12.xml");
        std::fs::create_dir_all(vendor_file.parent().unwrap()).unwrap();
        std::fs::write(&vendor_file, VENDOR_CONFIG).unwrap();
        let meta = logging_meta(VENDOR_CONFIG.len() as u64);
        let mut plan = DownloadPlan::new();
        let argument = ensure_logger(&location, &meta, &mut plan, true)
            .unwrap()
            .unwrap();
        let rewritten = location.get_rewritten_log_config("client-1.12.xml");
        assert_eq!(
            argument,
            format!("-Dlog4j.configurationFile={}", rewritten.to_string_lossy())
        );
        assert!(plan.is_empty());
        download::execute_plan(
            plan,
            &download::task::Progress::default(),
            &config::download::DownloadConfig::default(),
        )
        .await
        .unwrap();
        let content = std::fs::read_to_string(&rewritten).unwrap();
        assert!(!content.contains("<XMLLayout />"));
        assert!(!content.contains("<LegacyXMLLayout />"));
        assert_eq!(content.matches("<PatternLayout").count(), 2);
    }

    #[test]
    fn vendor_path_is_used_when_better_logging_is_off() {
        let dir = tempfile::tempdir().unwrap();
        let location = MinecraftLocation::new(dir.path());
        let vendor_file = location.get_log_config("client-1.12.xml");
        std::fs::create_dir_all(vendor_file.parent().unwrap()).unwrap();
        std::fs::write(&vendor_file, VENDOR_CONFIG).unwrap();
        let meta = logging_meta(VENDOR_CONFIG.len() as u64);
        let mut plan = DownloadPlan::new();
        let argument = ensure_logger(&location, &meta, &mut plan, false)
            .unwrap()
            .unwrap();
        assert_eq!(
            argument,
            format!(
                "-Dlog4j.configurationFile={}",
                vendor_file.to_string_lossy()
            )
        );
    }

    #[test]
    fn stale_config_is_enqueued() {
        let dir = tempfile::tempdir().unwrap();
        let location = MinecraftLocation::new(dir.path());
        let meta = logging_meta(64);
        let mut plan = DownloadPlan::new();
        ensure_logger(&location, &meta, &mut plan, true).unwrap();
        assert_eq!(plan.count, 1);
    }

    #[test]
    fn versions_without_logging_yield_no_argument() {
        let dir = tempfile::tempdir().unwrap();
        let location = MinecraftLocation::new(dir.path());
        let mut plan = DownloadPlan::new();
        let argument = ensure_logger(&location, &json!({}), &mut plan, true).unwrap();
        assert!(argument.is_none());
    }
}
