// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use log::info;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::*;

const AUTHSERVER_URL: &str = "https://authserver.mojang.com";

/// A session against the legacy username/password authentication service.
#[derive(Debug, Clone, PartialEq)]
pub struct YggdrasilSession {
    pub access_token: String,
    pub username: String,
    /// Profile id, without dashes.
    pub uuid: String,
    pub client_token: String,
}

impl YggdrasilSession {
    /// Authenticates with an email (or legacy username) and a password,
    /// using a freshly generated client token.
    pub async fn authenticate(email_or_username: &str, password: &str) -> Result<Self> {
        info!("Authenticating {email_or_username} against the legacy service");
        let (_, response) = request(
            "authenticate",
            &json!({
                "agent": {"name": "Minecraft", "version": 1},
                "username": email_or_username,
                "password": password,
                "clientToken": Uuid::new_v4().simple().to_string(),
            }),
            true,
        )
        .await?;
        Ok(Self {
            access_token: string_field(&response, "accessToken")?,
            username: string_field(&response["selectedProfile"], "name")?,
            uuid: string_field(&response["selectedProfile"], "id")?,
            client_token: string_field(&response, "clientToken")?,
        })
    }

    /// The service answers 204 for a token that is still usable.
    pub async fn validate(&self) -> Result<bool> {
        let (status, _) = request(
            "validate",
            &json!({
                "accessToken": self.access_token,
                "clientToken": self.client_token,
            }),
            false,
        )
        .await?;
        Ok(status == 204)
    }

    pub async fn refresh(&mut self) -> Result<()> {
        let (_, response) = request(
            "refresh",
            &json!({
                "accessToken": self.access_token,
                "clientToken": self.client_token,
            }),
            true,
        )
        .await?;
        self.access_token = string_field(&response, "accessToken")?;
        // The profile name is refreshed too, in case the player renamed.
        self.username = string_field(&response["selectedProfile"], "name")?;
        Ok(())
    }

    /// Revokes the token. The status code is deliberately ignored.
    pub async fn invalidate(&self) -> Result<()> {
        request(
            "invalidate",
            &json!({
                "accessToken": self.access_token,
                "clientToken": self.client_token,
            }),
            false,
        )
        .await?;
        Ok(())
    }
}

async fn request(endpoint: &str, payload: &Value, check_error: bool) -> Result<(u16, Value)> {
    let (status, response) =
        shared::json_post(&format!("{AUTHSERVER_URL}/{endpoint}"), payload).await?;
    if check_error && status != 200 {
        return Err(Error::Yggdrasil(
            response["errorMessage"]
                .as_str()
                .unwrap_or("Unknown error")
                .to_string(),
        ));
    }
    Ok((status, response))
}

fn string_field(value: &Value, name: &str) -> Result<String> {
    value[name]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::MissingField(name.to_string()))
}
