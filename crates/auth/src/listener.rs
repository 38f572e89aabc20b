// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

//! The loopback listener that captures the OAuth authorization code.
//!
//! The provider cannot redirect into a terminal, so the launcher opens the
//! authorize page in the user's browser and runs a tiny HTTP server on a
//! fixed loopback port the provider POSTs the code back to. The port is
//! part of the redirect URI registered with the identity provider, so it
//! cannot be picked dynamically.

use std::{
    io::Read,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use log::{info, warn};
use tiny_http::{Header, Response, Server};
use url::form_urlencoded;
use uuid::Uuid;

use crate::error::*;
use crate::microsoft::{
    MicrosoftSession, check_token_id, get_authentication_url, get_logout_url,
};

/// The fixed loopback port; `http://localhost:12782/code` must be a
/// registered redirect URI of the OAuth application.
pub const OAUTH_LISTENER_PORT: u16 = 12782;

/// The code/id-token pair the provider POSTed back.
pub struct CapturedCode {
    pub code: String,
    pub id_token: String,
}

/// Opens the browser on the authorize page and blocks until the provider
/// POSTs a code back, the user opens `/exit`, or `cancel` is raised.
///
/// Returns `None` when the user cancelled, no browser could be opened, or
/// the provider reported an error; those are dead ends, not failures.
pub fn acquire_code(
    app_client_id: &str,
    email: &str,
    nonce: &str,
    cancel: &AtomicBool,
) -> Result<Option<CapturedCode>> {
    let redirect_auth = format!("http://localhost:{OAUTH_LISTENER_PORT}");
    let code_redirect_uri = format!("{redirect_auth}/code");
    let exit_redirect_uri = format!("{redirect_auth}/exit");

    let server = Server::http(("127.0.0.1", OAUTH_LISTENER_PORT))
        .map_err(|err| Error::Listener(err.to_string()))?;

    if webbrowser::open(&get_authentication_url(
        app_client_id,
        &code_redirect_uri,
        email,
        nonce,
    ))
    .is_err()
    {
        warn!("Failed to open the login page, no web browser is supported");
        return Ok(None);
    }
    info!("Opened authentication page in browser, listening on port {OAUTH_LISTENER_PORT}");

    let mut captured: Option<CapturedCode> = None;
    let mut done = false;
    while !done && !cancel.load(Ordering::SeqCst) {
        let Some(mut request) = server
            .recv_timeout(Duration::from_millis(500))
            .map_err(|err| Error::Listener(err.to_string()))?
        else {
            continue;
        };
        let is_post = *request.method() == tiny_http::Method::Post;
        let is_get = *request.method() == tiny_http::Method::Get;
        let url = request.url().to_string();
        if is_post && url.starts_with("/code") && is_form_urlencoded(&request) {
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let query: Vec<(String, String)> =
                form_urlencoded::parse(body.as_bytes()).into_owned().collect();
            let field = |name: &str| query.iter().find(|(key, _)| key == name).map(|(_, v)| v);
            if let (Some(code), Some(id_token)) = (field("code"), field("id_token")) {
                captured = Some(CapturedCode {
                    code: code.clone(),
                    id_token: id_token.clone(),
                });
                // Log the browser session out right away so another account
                // can authenticate next time; the logout page redirects to
                // /exit, which ends the wait. The access token stays valid.
                let location = get_logout_url(app_client_id, &exit_redirect_uri);
                let response = Response::from_string("Redirecting...")
                    .with_status_code(307)
                    .with_header(
                        Header::from_bytes(&b"Location"[..], location.as_bytes())
                            .expect("Internal error: malformed header"),
                    );
                let _ = request.respond(response);
            } else if let Some(error) = field("error") {
                done = true;
                let description = field("error_description").cloned().unwrap_or_default();
                let _ = request.respond(
                    Response::from_string(format!("Error: {description} ({error})."))
                        .with_status_code(400),
                );
            } else {
                let _ = request
                    .respond(Response::from_string("Missing parameters.").with_status_code(404));
            }
        } else if is_get && url.starts_with("/exit") {
            done = true;
            let _ = request.respond(Response::from_string(
                "Logged in.\n\nClose this tab and return to the launcher.",
            ));
        } else {
            let _ =
                request.respond(Response::from_string("Unexpected page.").with_status_code(404));
        }
    }

    Ok(captured)
}

/// The whole interactive flow: capture a code on the loopback listener,
/// check the id token against the issued nonce, then run the
/// authentication chain. `None` means the user walked away.
pub async fn authenticate_interactive(
    app_client_id: &str,
    email: &str,
    cancel: &AtomicBool,
) -> Result<Option<MicrosoftSession>> {
    let nonce = Uuid::new_v4().simple().to_string();
    let Some(captured) = acquire_code(app_client_id, email, &nonce, cancel)? else {
        return Ok(None);
    };
    if !check_token_id(&captured.id_token, email, &nonce) {
        return Err(Error::IncoherentData);
    }
    let code_redirect_uri = format!("http://localhost:{OAUTH_LISTENER_PORT}/code");
    let session =
        MicrosoftSession::authenticate(app_client_id, &captured.code, &code_redirect_uri).await?;
    Ok(Some(session))
}

fn is_form_urlencoded(request: &tiny_http::Request) -> bool {
    request.headers().iter().any(|header| {
        header.field.equiv("Content-Type")
            && header
                .value
                .as_str()
                .starts_with("application/x-www-form-urlencoded")
    })
}
