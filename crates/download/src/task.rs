// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

#[derive(Clone)]
pub enum Step {
    VerifyExistingFiles,
    DownloadFiles,
}

/// Shared download progress, polled by the front-end while the executor
/// runs. `completed` and `total` are byte counts over the whole plan;
/// `speed` accumulates streamed bytes and is reset periodically by whoever
/// renders it.
#[derive(Clone)]
pub struct Progress {
    pub completed: Arc<AtomicU64>,
    pub total: Arc<AtomicU64>,
    pub step: Arc<Mutex<Step>>,
    pub speed: Arc<AtomicU64>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            completed: Arc::new(AtomicU64::new(0)),
            total: Arc::new(AtomicU64::new(0)),
            speed: Arc::new(AtomicU64::new(0)),
            step: Arc::new(Mutex::new(Step::DownloadFiles)),
        }
    }
}

impl Progress {
    pub fn reset(&self, ordering: Ordering) {
        self.completed.store(0, ordering);
        self.total.store(0, ordering);
        self.speed.store(0, ordering);
    }
}
