// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::{collections::HashMap, path::PathBuf};

use log::{info, warn};
use serde_json::{Map, Value, json};

use folder::WorkLocation;

use crate::error::*;
use crate::{Session, SessionKind};

/// The durable session store: a two-level map keyed by provider tag, then
/// by the identity (email or username) the session was created for.
///
/// On disk it is a JSON document
/// `{tag: {"sessions": {identity: {field: value}}}}`. Loading tolerates a
/// missing file, parse errors and unknown provider tags; unknown tags are
/// dropped. An older space-delimited store is migrated on first load.
pub struct AuthDatabase {
    path: PathBuf,
    legacy_path: PathBuf,
    sessions: HashMap<String, HashMap<String, Session>>,
}

impl AuthDatabase {
    pub fn new(path: PathBuf, legacy_path: PathBuf) -> Self {
        Self {
            path,
            legacy_path,
            sessions: HashMap::new(),
        }
    }

    pub fn for_work_dir(work: &WorkLocation) -> Self {
        Self::new(work.get_session_file(), work.get_legacy_session_file())
    }

    /// Loads the store from disk, replacing the in-memory state. If the
    /// primary file is absent, the legacy file is imported and deleted.
    pub fn load(&mut self) {
        self.sessions.clear();
        if !self.path.is_file() {
            self.load_legacy_and_delete();
        }
        let Ok(data) = std::fs::read_to_string(&self.path) else {
            return;
        };
        let Ok(document) = serde_json::from_str::<Value>(&data) else {
            return;
        };
        let Some(document) = document.as_object() else {
            return;
        };
        for (tag, provider_data) in document {
            let Some(sessions_data) = provider_data["sessions"].as_object() else {
                continue;
            };
            for (identity, session_data) in sessions_data {
                let fields = session_data
                    .as_object()
                    .cloned()
                    .unwrap_or_else(Map::new);
                match Session::from_fields(tag, &fields) {
                    Some(session) => self.put(identity, session),
                    None => {
                        warn!("Dropping session of unsupported provider {tag}");
                        break;
                    }
                }
            }
        }
    }

    fn load_legacy_and_delete(&mut self) {
        let Ok(data) = std::fs::read_to_string(&self.legacy_path) else {
            return;
        };
        info!("Migrating legacy session file");
        for line in data.lines() {
            let parts: Vec<&str> = line.trim().split(' ').collect();
            if let [identity, client_token, username, uuid, access_token] = parts[..] {
                self.put(
                    identity,
                    Session::Yggdrasil(crate::YggdrasilSession {
                        access_token: access_token.to_string(),
                        username: username.to_string(),
                        uuid: uuid.to_string(),
                        client_token: client_token.to_string(),
                    }),
                );
            }
        }
        let _ = std::fs::remove_file(&self.legacy_path);
    }

    /// Writes the JSON form, indented, creating parent directories on
    /// demand.
    pub fn save(&self) -> Result<()> {
        let mut document = Map::new();
        for (tag, sessions) in &self.sessions {
            let mut sessions_data = Map::new();
            for (identity, session) in sessions {
                sessions_data.insert(identity.clone(), session.to_fields());
            }
            document.insert(tag.clone(), json!({"sessions": sessions_data}));
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(
            &self.path,
            serde_json::to_string_pretty(&Value::Object(document))?,
        )?;
        Ok(())
    }

    pub fn get(&self, identity: &str, kind: SessionKind) -> Option<&Session> {
        self.sessions.get(kind.tag())?.get(identity)
    }

    pub fn get_mut(&mut self, identity: &str, kind: SessionKind) -> Option<&mut Session> {
        self.sessions.get_mut(kind.tag())?.get_mut(identity)
    }

    pub fn put(&mut self, identity: &str, session: Session) {
        self.sessions
            .entry(session.tag().to_string())
            .or_default()
            .insert(identity.to_string(), session);
    }

    pub fn remove(&mut self, identity: &str, kind: SessionKind) -> Option<Session> {
        self.sessions.get_mut(kind.tag())?.remove(identity)
    }
}
