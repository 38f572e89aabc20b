// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

//! Authentication against the two upstream identity providers and the
//! durable session store.
//!
//! A [`Session`] is what a successful authentication leaves behind: an
//! access token, a stable user id and a display name, plus whatever the
//! provider needs to validate, refresh and invalidate the token later.

use serde_json::{Map, Value, json};

mod error;
pub mod listener;
pub mod microsoft;
pub mod store;
pub mod yggdrasil;

pub use error::*;
pub use microsoft::MicrosoftSession;
pub use store::AuthDatabase;
pub use yggdrasil::YggdrasilSession;

/// A durable authentication artefact, tagged by its provider.
///
/// The tag doubles as the discriminator in the on-disk session store.
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    Yggdrasil(YggdrasilSession),
    Microsoft(MicrosoftSession),
}

/// Selects a provider bucket in the session store without holding a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Yggdrasil,
    Microsoft,
}

impl SessionKind {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Yggdrasil => "yggdrasil",
            Self::Microsoft => "microsoft",
        }
    }
}

impl Session {
    pub fn kind(&self) -> SessionKind {
        match self {
            Self::Yggdrasil(_) => SessionKind::Yggdrasil,
            Self::Microsoft(_) => SessionKind::Microsoft,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.kind().tag()
    }

    pub fn username(&self) -> &str {
        match self {
            Self::Yggdrasil(session) => &session.username,
            Self::Microsoft(session) => &session.username,
        }
    }

    pub fn uuid(&self) -> &str {
        match self {
            Self::Yggdrasil(session) => &session.uuid,
            Self::Microsoft(session) => &session.uuid,
        }
    }

    pub fn access_token(&self) -> &str {
        match self {
            Self::Yggdrasil(session) => &session.access_token,
            Self::Microsoft(session) => &session.access_token,
        }
    }

    /// Formats the token the way the game expects it on the command line:
    /// the bare token, or the legacy `token:<token>:<uuid>` session string.
    pub fn format_token_argument(&self, legacy: bool) -> String {
        if legacy {
            format!("token:{}:{}", self.access_token(), self.uuid())
        } else {
            self.access_token().to_string()
        }
    }

    /// Asks the provider whether the access token is still usable.
    pub async fn validate(&mut self) -> Result<bool> {
        match self {
            Self::Yggdrasil(session) => session.validate().await,
            Self::Microsoft(session) => session.validate().await,
        }
    }

    /// Obtains a fresh access token from the provider, updating the session
    /// in place.
    pub async fn refresh(&mut self) -> Result<()> {
        match self {
            Self::Yggdrasil(session) => session.refresh().await,
            Self::Microsoft(session) => session.refresh().await,
        }
    }

    /// Tells the provider to revoke the access token. Best effort.
    pub async fn invalidate(&self) -> Result<()> {
        match self {
            Self::Yggdrasil(session) => session.invalidate().await,
            Self::Microsoft(session) => session.invalidate().await,
        }
    }

    /// Rebuilds a session from its stored field map; unknown provider tags
    /// yield `None`. Missing fields default to the empty string.
    pub(crate) fn from_fields(tag: &str, fields: &Map<String, Value>) -> Option<Session> {
        let field = |name: &str| {
            fields
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        match tag {
            "yggdrasil" => Some(Session::Yggdrasil(YggdrasilSession {
                access_token: field("access_token"),
                username: field("username"),
                uuid: field("uuid"),
                client_token: field("client_token"),
            })),
            "microsoft" => Some(Session::Microsoft(MicrosoftSession {
                access_token: field("access_token"),
                username: field("username"),
                uuid: field("uuid"),
                refresh_token: field("refresh_token"),
                client_id: field("client_id"),
                redirect_uri: field("redirect_uri"),
                pending_renamed_username: None,
            })),
            _ => None,
        }
    }

    pub(crate) fn to_fields(&self) -> Value {
        match self {
            Self::Yggdrasil(session) => json!({
                "access_token": session.access_token,
                "username": session.username,
                "uuid": session.uuid,
                "client_token": session.client_token,
            }),
            Self::Microsoft(session) => json!({
                "access_token": session.access_token,
                "username": session.username,
                "uuid": session.uuid,
                "refresh_token": session.refresh_token,
                "client_id": session.client_id,
                "redirect_uri": session.redirect_uri,
            }),
        }
    }
}
