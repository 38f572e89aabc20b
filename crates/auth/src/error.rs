// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::result;

use serde::Serialize;
use serde_with::serde_as;
use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

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

    #[error("Could not run the code listener: {0}")]
    Listener(String),

    /// The user hashes of the Xbox Live and XSTS stages disagree.
    #[error("Inconsistent user hash")]
    InconsistentUserHash,

    /// The id token that came back with the authorization code does not
    /// carry the issued nonce or the expected email.
    #[error("Incoherent authentication data")]
    IncoherentData,

    #[error("This account does not own the game")]
    DoesNotOwnGame,

    #[error("The token is no longer valid")]
    OutdatedToken,

    /// The provider reported an error the launcher has no specific handling
    /// for; the vendor message is carried verbatim.
    #[error("Authentication error: {0}")]
    Microsoft(String),

    #[error("Authentication error: {0}")]
    Yggdrasil(String),

    #[error("The provider response is missing {0}")]
    MissingField(String),
}
