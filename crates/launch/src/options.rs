// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;

use uuid::Uuid;

use auth::Session;
use config::launch::{LaunchConfig, Server};

/// The JVM arguments the front-end passes when the user supplies none.
pub const DEFAULT_JVM_ARGS: [&str; 7] = [
    "-Xmx2G",
    "-XX:+UnlockExperimentalVMOptions",
    "-XX:+UseG1GC",
    "-XX:G1NewSizePercent=20",
    "-XX:G1ReservePercent=20",
    "-XX:MaxGCPauseMillis=50",
    "-XX:G1HeapRegionSize=32M",
];

/// Everything the argument builder needs besides the provisioned version.
pub struct LaunchOptions {
    pub username: String,
    /// Dashless user id.
    pub uuid: String,
    /// Substituted for `auth_access_token`; empty when anonymous.
    pub token_argument: String,
    /// Substituted for the legacy `auth_session`; "notok" when anonymous.
    pub legacy_token_argument: String,
    pub resolution: Option<(u32, u32)>,
    pub demo: bool,
    pub disable_multiplayer: bool,
    pub disable_chat: bool,
    pub server: Option<Server>,
}

impl LaunchOptions {
    /// Builds options from the launcher configuration and, when available,
    /// an authenticated session. Without a session a random offline
    /// identity is generated.
    pub fn new(config: &LaunchConfig, session: Option<&Session>) -> Self {
        let (username, uuid) = match session {
            Some(session) => (session.username().to_string(), session.uuid().to_string()),
            None => default_identity(None, None),
        };
        Self {
            username,
            uuid,
            token_argument: session
                .map(|session| session.format_token_argument(false))
                .unwrap_or_default(),
            legacy_token_argument: session
                .map(|session| session.format_token_argument(true))
                .unwrap_or_else(|| "notok".to_string()),
            resolution: config.resolution,
            demo: config.demo,
            disable_multiplayer: config.disable_multiplayer,
            disable_chat: config.disable_chat,
            server: config.server.clone(),
        }
    }

    /// The feature flags the rule interpreter sees while flattening
    /// argument templates.
    pub fn features(&self) -> HashMap<String, bool> {
        HashMap::from([
            ("is_demo_user".to_string(), self.demo),
            (
                "has_custom_resolution".to_string(),
                self.resolution.is_some(),
            ),
        ])
    }
}

/// Completes a possibly missing identity: the uuid loses its dashes (a
/// random one is generated when absent), the username defaults to the
/// first 8 uuid characters and is capped at the game's 16 character limit.
pub fn default_identity(uuid: Option<&str>, username: Option<&str>) -> (String, String) {
    let uuid = match uuid {
        Some(uuid) => uuid.replace('-', ""),
        None => Uuid::new_v4().simple().to_string(),
    };
    let username = match username {
        Some(username) => username.chars().take(16).collect(),
        None => uuid[..8].to_string(),
    };
    (username, uuid)
}
