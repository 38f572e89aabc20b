// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::{fmt::Display, result};

use serde::Serialize;
use serde_with::serde_as;
use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

/// Why a vendor JVM distribution could not be selected for this platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JvmLoadingKind {
    /// No distribution key exists for this platform at all.
    NotFound,
    /// The vendor index has no section for this platform key.
    UnsupportedJvmArch,
    /// The platform section has no build of the requested component.
    UnsupportedJvmVersion,
}

impl Display for JvmLoadingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::UnsupportedJvmArch => write!(f, "unsupported_jvm_arch"),
            Self::UnsupportedJvmVersion => write!(f, "unsupported_jvm_version"),
        }
    }
}

#[serde_as]
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum Error {
    #[error(transparent)]
    Io(
        #[from]
        #[serde_as(as = "serde_with::DisplayFromStr")]
        std::io::Error,
    ),

    #[error(transparent)]
    JsonParse(
        #[from]
        #[serde_as(as = "serde_with::DisplayFromStr")]
        serde_json::Error,
    ),

    #[error(transparent)]
    Request(
        #[from]
        #[serde_as(as = "serde_with::DisplayFromStr")]
        shared::Error,
    ),

    #[error(transparent)]
    Version(
        #[from]
        #[serde_as(as = "serde_with::DisplayFromStr")]
        version::Error,
    ),

    #[error(transparent)]
    Download(
        #[from]
        #[serde_as(as = "serde_with::DisplayFromStr")]
        download::Error,
    ),

    #[error("Invalid version.json, missing {0}")]
    InvalidVersionJson(String),

    #[error("Could not load a JVM for this platform: {0}")]
    JvmLoading(JvmLoadingKind),
}
