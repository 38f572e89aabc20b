// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Represents a Minecraft server configuration, the game will enter the
/// server automatically (since 1.6).
#[derive(Clone, Serialize, Deserialize)]
pub struct Server {
    /// The IP address or hostname of the server.
    pub ip: String,
    /// Optional port number of the server, default is 25565.
    pub port: Option<u16>,
}

/// Represents a configuration object for launching the game.
#[derive(Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Rewrite the vendor logger configuration so console output uses a
    /// readable pattern layout instead of XML events. Default is `true`.
    #[serde(default = "default_better_logging")]
    pub better_logging: bool,

    /// Optional custom window resolution `(width, height)`.
    #[serde(default)]
    pub resolution: Option<(u32, u32)>,

    /// Start the game in demo mode.
    #[serde(default)]
    pub demo: bool,

    /// Disable the multiplayer buttons (>= 1.16).
    #[serde(default)]
    pub disable_multiplayer: bool,

    /// Disable the online chat (>= 1.16).
    #[serde(default)]
    pub disable_chat: bool,

    /// Optional server to connect to when the game launches.
    #[serde(default)]
    pub server: Option<Server>,

    /// User custom additional JVM arguments, prepended by the front-end.
    #[serde(default)]
    pub extra_jvm_args: Vec<String>,

    /// User custom additional game arguments, appended by the front-end.
    #[serde(default)]
    pub extra_game_args: Vec<String>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            better_logging: default_better_logging(),
            resolution: None,
            demo: false,
            disable_multiplayer: false,
            disable_chat: false,
            server: None,
            extra_jvm_args: vec![],
            extra_game_args: vec![],
        }
    }
}

fn default_better_logging() -> bool {
    true
}
