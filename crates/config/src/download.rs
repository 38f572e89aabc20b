// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Configuration for controlling download behavior.
#[derive(Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// How many times a single download is attempted before it is recorded
    /// as failed. Default is `3`.
    #[serde(default = "default_max_tries")]
    pub max_tries: u32,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_tries: default_max_tries(),
        }
    }
}

fn default_max_tries() -> u32 {
    3
}
