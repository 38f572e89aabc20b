// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use once_cell::sync::Lazy;
use serde_json::Value;

mod error;

pub use error::*;

pub static LAUNCHER_NAME: &str = "slingshot";
pub static LAUNCHER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::ClientBuilder::new()
        .pool_idle_timeout(Duration::from_secs(60))
        .pool_max_idle_per_host(200)
        .use_rustls_tls()
        .user_agent(format!("Slingshot/{LAUNCHER_VERSION}"))
        .build()
        .expect("Failed to build HTTP client")
});

/// Issues a GET request and parses the response body as JSON.
///
/// The status code is not inspected; a body that is not JSON is an error
/// because every caller of this function expects a JSON document.
pub async fn json_simple_request(url: &str) -> Result<Value> {
    let response = HTTP_CLIENT
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await?;
    let status = response.status().as_u16();
    response.json().await.map_err(|_| Error::NotJson(status))
}

/// POSTs a JSON payload and returns `(status, body)`.
///
/// A non-JSON response body is tolerated and surfaced as [`Value::Null`],
/// since identity endpoints answer some requests with an empty body.
pub async fn json_post(url: &str, payload: &Value) -> Result<(u16, Value)> {
    let response = HTTP_CLIENT
        .post(url)
        .header("Content-Type", "application/json")
        .header("Accept", "application/json")
        .body(serde_json::to_string(payload)?)
        .send()
        .await?;
    let status = response.status().as_u16();
    let body = response.json().await.unwrap_or(Value::Null);
    Ok((status, body))
}

/// POSTs an `application/x-www-form-urlencoded` payload and returns `(status, body)`.
pub async fn form_post(url: &str, form: &[(&str, &str)]) -> Result<(u16, Value)> {
    let response = HTTP_CLIENT
        .post(url)
        .header("Accept", "application/json")
        .form(form)
        .send()
        .await?;
    let status = response.status().as_u16();
    let body = response.json().await.unwrap_or(Value::Null);
    Ok((status, body))
}

/// Issues a GET request with a bearer token and returns `(status, body)`.
pub async fn bearer_get(url: &str, bearer: &str) -> Result<(u16, Value)> {
    let response = HTTP_CLIENT
        .get(url)
        .header("Accept", "application/json")
        .header("Authorization", format!("Bearer {bearer}"))
        .send()
        .await?;
    let status = response.status().as_u16();
    let body = response.json().await.unwrap_or(Value::Null);
    Ok((status, body))
}
