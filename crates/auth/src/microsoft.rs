// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

//! The OAuth/Xbox-Live/XSTS/game-service authentication chain.
//!
//! Authentication is five POST hops: the OAuth token endpoint turns a code
//! (or refresh token) into a Microsoft access token, Xbox Live turns that
//! into an XBL token plus a user hash, XSTS authorizes the XBL token for
//! the game's relying party, the game service swaps the pair for a game
//! access token, and the profile endpoint finally yields the player's name
//! and id.

use base64::Engine;
use log::info;
use serde_json::{Value, json};

use crate::error::*;

const MS_OAUTH_CODE_URL: &str = "https://login.live.com/oauth20_authorize.srf";
const MS_OAUTH_LOGOUT_URL: &str = "https://login.live.com/oauth20_logout.srf";
const MS_OAUTH_TOKEN_URL: &str = "https://login.live.com/oauth20_token.srf";
const MS_XBL_AUTH_DOMAIN: &str = "user.auth.xboxlive.com";
const MS_XBL_AUTH_URL: &str = "https://user.auth.xboxlive.com/user/authenticate";
const MS_XSTS_AUTH_URL: &str = "https://xsts.auth.xboxlive.com/xsts/authorize";
const MC_AUTH_URL: &str = "https://api.minecraftservices.com/authentication/login_with_xbox";
const MC_PROFILE_URL: &str = "https://api.minecraftservices.com/minecraft/profile";

/// A session obtained through the OAuth chain.
#[derive(Debug, Clone, PartialEq)]
pub struct MicrosoftSession {
    pub access_token: String,
    pub username: String,
    pub uuid: String,
    pub refresh_token: String,
    pub client_id: String,
    pub redirect_uri: String,
    /// A username change noticed during validation, consumed by the next
    /// refresh without a network round trip.
    pub(crate) pending_renamed_username: Option<String>,
}

struct ChainResult {
    refresh_token: String,
    access_token: String,
    username: String,
    uuid: String,
}

impl MicrosoftSession {
    /// Exchanges a freshly captured authorization code for a session.
    pub async fn authenticate(
        app_client_id: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<Self> {
        let chain = run_chain(&[
            ("client_id", app_client_id),
            ("redirect_uri", redirect_uri),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("scope", "xboxlive.signin"),
        ])
        .await?;
        Ok(Self {
            access_token: chain.access_token,
            username: chain.username,
            uuid: chain.uuid,
            refresh_token: chain.refresh_token,
            client_id: app_client_id.to_string(),
            redirect_uri: redirect_uri.to_string(),
            pending_renamed_username: None,
        })
    }

    /// Asks the profile endpoint whether the token still works. A username
    /// change is detected here and stashed for [`Self::refresh`].
    pub async fn validate(&mut self) -> Result<bool> {
        self.pending_renamed_username = None;
        let (status, response) = shared::bearer_get(MC_PROFILE_URL, &self.access_token).await?;
        if status != 200 {
            return Ok(false);
        }
        let username = response["name"].as_str().unwrap_or_default();
        if self.username != username {
            self.pending_renamed_username = Some(username.to_string());
            return Ok(false);
        }
        Ok(true)
    }

    pub async fn refresh(&mut self) -> Result<()> {
        if let Some(renamed) = self.pending_renamed_username.take() {
            self.username = renamed;
            return Ok(());
        }
        let chain = run_chain(&[
            ("client_id", &self.client_id),
            ("redirect_uri", &self.redirect_uri),
            ("refresh_token", &self.refresh_token),
            ("grant_type", "refresh_token"),
            ("scope", "xboxlive.signin"),
        ])
        .await?;
        self.access_token = chain.access_token;
        self.username = chain.username;
        self.uuid = chain.uuid;
        self.refresh_token = chain.refresh_token;
        Ok(())
    }

    /// The chain has no revocation endpoint; forgetting the session is all
    /// there is to do.
    pub async fn invalidate(&self) -> Result<()> {
        Ok(())
    }
}

/// The browser page the user authorizes on. `response_mode=form_post` makes
/// the provider POST the code back to the local listener.
pub fn get_authentication_url(
    app_client_id: &str,
    redirect_uri: &str,
    email: &str,
    nonce: &str,
) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("client_id", app_client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "code id_token")
        .append_pair("scope", "xboxlive.signin offline_access openid email")
        .append_pair("login_hint", email)
        .append_pair("nonce", nonce)
        .append_pair("response_mode", "form_post")
        .finish();
    format!("{MS_OAUTH_CODE_URL}?{query}")
}

/// Clears the embedded browser session so the next login can use another
/// account. This does not invalidate the captured access token.
pub fn get_logout_url(app_client_id: &str, redirect_uri: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("client_id", app_client_id)
        .append_pair("redirect_uri", redirect_uri)
        .finish();
    format!("{MS_OAUTH_LOGOUT_URL}?{query}")
}

/// Verifies that the `id_token` that came back with the authorization code
/// carries the nonce this launcher issued and the email it asked for.
pub fn check_token_id(token_id: &str, email: &str, nonce: &str) -> bool {
    let Some(payload) = token_id.split('.').nth(1) else {
        return false;
    };
    let Ok(decoded) = base64url_decode(payload) else {
        return false;
    };
    let Ok(claims) = serde_json::from_slice::<Value>(&decoded) else {
        return false;
    };
    claims["nonce"] == json!(nonce) && claims["email"] == json!(email)
}

async fn run_chain(token_request_form: &[(&str, &str)]) -> Result<ChainResult> {
    // 1. OAuth token endpoint, code or refresh grant.
    let (_, response) = shared::form_post(MS_OAUTH_TOKEN_URL, token_request_form).await?;
    let ms_refresh_token = string_field(&response, "refresh_token")?;
    let ms_access_token = string_field(&response, "access_token")?;

    // 2. Xbox Live authentication.
    let (_, response) = shared::json_post(
        MS_XBL_AUTH_URL,
        &json!({
            "Properties": {
                "AuthMethod": "RPS",
                "SiteName": MS_XBL_AUTH_DOMAIN,
                "RpsTicket": format!("d={ms_access_token}"),
            },
            "RelyingParty": "http://auth.xboxlive.com",
            "TokenType": "JWT",
        }),
    )
    .await?;
    let xbl_token = string_field(&response, "Token")?;
    let xbl_user_hash = user_hash(&response)?;
    info!("Authenticated against Xbox Live");

    // 3. XSTS authorization for the game's relying party.
    let (_, response) = shared::json_post(
        MS_XSTS_AUTH_URL,
        &json!({
            "Properties": {
                "SandboxId": "RETAIL",
                "UserTokens": [xbl_token],
            },
            "RelyingParty": "rp://api.minecraftservices.com/",
            "TokenType": "JWT",
        }),
    )
    .await?;
    let xsts_token = string_field(&response, "Token")?;
    if xbl_user_hash != user_hash(&response)? {
        return Err(Error::InconsistentUserHash);
    }

    // 4. Game service login.
    let (_, response) = shared::json_post(
        MC_AUTH_URL,
        &json!({
            "identityToken": format!("XBL3.0 x={xbl_user_hash};{xsts_token}"),
        }),
    )
    .await?;
    let mc_access_token = string_field(&response, "access_token")?;

    // 5. Game profile.
    let (status, response) = shared::bearer_get(MC_PROFILE_URL, &mc_access_token).await?;
    match status {
        404 => return Err(Error::DoesNotOwnGame),
        401 => return Err(Error::OutdatedToken),
        200 if !response.as_object().is_some_and(|obj| obj.contains_key("error")) => {}
        _ => {
            let detail = response["errorMessage"]
                .as_str()
                .or(response["error"].as_str())
                .unwrap_or("Unknown error")
                .to_string();
            return Err(Error::Microsoft(detail));
        }
    }
    info!("Authenticated against the game service");

    Ok(ChainResult {
        refresh_token: ms_refresh_token,
        access_token: mc_access_token,
        username: string_field(&response, "name")?,
        uuid: string_field(&response, "id")?,
    })
}

fn user_hash(response: &Value) -> Result<String> {
    response["DisplayClaims"]["xui"][0]["uhs"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::MissingField("DisplayClaims.xui.uhs".to_string()))
}

fn string_field(value: &Value, name: &str) -> Result<String> {
    value[name]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::MissingField(name.to_string()))
}

fn base64url_decode(data: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    let mut padded = data.to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }
    base64::engine::general_purpose::URL_SAFE.decode(padded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forge_id_token(claims: &Value) -> String {
        let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .encode(serde_json::to_vec(claims).unwrap());
        format!("eyJhbGciOiJSUzI1NiJ9.{payload}.c2lnbmF0dXJl")
    }

    #[test]
    fn matching_nonce_and_email_are_accepted() {
        let token = forge_id_token(&json!({"nonce": "abc", "email": "u@e"}));
        assert!(check_token_id(&token, "u@e", "abc"));
    }

    #[test]
    fn foreign_nonce_is_rejected() {
        let token = forge_id_token(&json!({"nonce": "xyz", "email": "u@e"}));
        assert!(!check_token_id(&token, "u@e", "abc"));
    }

    #[test]
    fn foreign_email_is_rejected() {
        let token = forge_id_token(&json!({"nonce": "abc", "email": "someone@else"}));
        assert!(!check_token_id(&token, "u@e", "abc"));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert!(!check_token_id("not-a-jwt", "u@e", "abc"));
        assert!(!check_token_id("a.%%%.c", "u@e", "abc"));
    }

    #[test]
    fn authentication_url_posts_back_to_the_listener() {
        let url = get_authentication_url("client-id", "http://localhost:12782/code", "u@e", "n0");
        assert!(url.starts_with(MS_OAUTH_CODE_URL));
        assert!(url.contains("response_mode=form_post"));
        assert!(url.contains("nonce=n0"));
        assert!(url.contains("login_hint=u%40e"));
    }
}
