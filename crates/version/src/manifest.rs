// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::*;

pub const VERSION_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";

/// The upstream catalogue of available versions, newest first, plus the
/// `latest` channel aliases.
#[derive(Clone, Deserialize, Serialize)]
pub struct VersionManifest {
    pub latest: HashMap<String, String>,
    pub versions: Vec<VersionInfo>,
}

#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub id: String,
    pub r#type: String,
    pub url: String,
    #[serde(default)]
    pub time: Option<String>,
    pub release_time: String,
}

impl VersionManifest {
    pub async fn fetch() -> Result<VersionManifest> {
        // Not allow custom source to avoid attack
        Ok(serde_json::from_value(
            shared::json_simple_request(VERSION_MANIFEST_URL).await?,
        )?)
    }

    /// Resolves a `latest` channel alias. Returns the resolved id and
    /// whether the input was an alias; the flag later tightens searches to
    /// exact matches.
    pub fn filter_latest(&self, version: &str) -> (String, bool) {
        match self.latest.get(version) {
            Some(resolved) => (resolved.clone(), true),
            None => (version.to_string(), false),
        }
    }

    pub fn get_version(&self, version: &str) -> Option<&VersionInfo> {
        let (version, _alias) = self.filter_latest(version);
        self.versions.iter().find(|info| info.id == version)
    }

    pub fn all_versions(&self) -> &[VersionInfo] {
        &self.versions
    }

    /// Searches the catalogue: a resolved alias matches exactly, anything
    /// else matches as a substring of the version id.
    pub fn search_versions(&self, input: &str) -> Vec<&VersionInfo> {
        let (input, alias) = self.filter_latest(input);
        self.versions
            .iter()
            .filter(|info| {
                if alias {
                    info.id == input
                } else {
                    info.id.contains(&input)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> VersionManifest {
        serde_json::from_value(serde_json::json!({
            "latest": {"release": "1.20.1", "snapshot": "23w31a"},
            "versions": [
                {"id": "23w31a", "type": "snapshot", "url": "https://example/23w31a.json", "releaseTime": "2023-08-01T10:00:00+00:00"},
                {"id": "1.20.1", "type": "release", "url": "https://example/1.20.1.json", "releaseTime": "2023-06-12T13:25:51+00:00"},
                {"id": "1.20", "type": "release", "url": "https://example/1.20.json", "releaseTime": "2023-06-02T08:36:17+00:00"},
            ],
        }))
        .unwrap()
    }

    #[test]
    fn alias_resolves_to_channel_version() {
        let manifest = manifest();
        assert_eq!(
            manifest.filter_latest("release"),
            ("1.20.1".to_string(), true)
        );
        assert_eq!(manifest.filter_latest("1.20"), ("1.20".to_string(), false));
    }

    #[test]
    fn alias_search_matches_exactly() {
        let manifest = manifest();
        let found = manifest.search_versions("release");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "1.20.1");
    }

    #[test]
    fn plain_search_matches_substrings() {
        let manifest = manifest();
        let found = manifest.search_versions("1.20");
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn get_version_follows_aliases() {
        let manifest = manifest();
        assert_eq!(manifest.get_version("snapshot").unwrap().id, "23w31a");
        assert!(manifest.get_version("9.9.9").is_none());
    }
}
