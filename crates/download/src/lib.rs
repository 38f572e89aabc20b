// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::atomic::Ordering,
    time::Duration,
};

use futures::AsyncWriteExt;
use log::{debug, warn};
use serde_json::Value;
use url::Url;

use config::download::DownloadConfig;
use shared::HTTP_CLIENT;

mod error;
pub mod task;

pub use error::*;
use task::{Progress, Step};

/// A single pending download: where to fetch from, where to store, and the
/// declared integrity facts when the upstream metadata carries them.
#[derive(Clone)]
pub struct DownloadEntry {
    pub url: String,
    pub file: PathBuf,
    pub size: Option<u64>,
    pub sha1: Option<String>,
    /// Human readable name shown by progress front-ends, defaults to the URL.
    pub name: String,
}

impl DownloadEntry {
    pub fn new(url: String, file: PathBuf, name: Option<String>) -> Self {
        Self {
            name: name.unwrap_or_else(|| url.clone()),
            url,
            file,
            size: None,
            sha1: None,
        }
    }

    /// Builds an entry from a metadata download object `{url, size, sha1}`.
    ///
    /// Returns `None` when the object carries no URL.
    pub fn from_meta_info(info: &Value, file: PathBuf, name: Option<String>) -> Option<Self> {
        let url = info["url"].as_str()?.to_string();
        Some(Self {
            name: name.unwrap_or_else(|| url.clone()),
            url,
            file,
            size: info["size"].as_u64(),
            sha1: info["sha1"].as_str().map(|sha1| sha1.to_string()),
        })
    }
}

/// A deferred post-download action, run only after every entry of the plan
/// has been downloaded and verified.
pub type Finalizer = Box<dyn FnOnce() -> Result<()> + Send>;

/// The set of pending downloads accumulated by the provisioners before the
/// executor drains it.
///
/// Entries are grouped by `(scheme, authority)` so that one connection can
/// serve every entry of a bucket; the grouping key is the TLS bit followed
/// by the authority (`"1piston-meta.mojang.com"`). Buckets and the entries
/// inside them keep insertion order.
#[derive(Default)]
pub struct DownloadPlan {
    buckets: Vec<(String, Vec<DownloadEntry>)>,
    callbacks: Vec<Finalizer>,
    pub count: usize,
    pub size: u64,
}

impl DownloadPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to its host bucket. Only `http` and `https` URLs are
    /// accepted.
    pub fn push(&mut self, entry: DownloadEntry) -> Result<()> {
        let url = Url::parse(&entry.url)?;
        let tls = match url.scheme() {
            "https" => "1",
            "http" => "0",
            scheme => return Err(Error::IllegalScheme(scheme.to_string())),
        };
        let mut host_key = format!("{}{}", tls, url.host_str().unwrap_or_default());
        if let Some(port) = url.port() {
            host_key.push_str(&format!(":{port}"));
        }
        self.count += 1;
        if let Some(size) = entry.size {
            self.size += size;
        }
        match self.buckets.iter_mut().find(|(key, _)| *key == host_key) {
            Some((_, entries)) => entries.push(entry),
            None => self.buckets.push((host_key, vec![entry])),
        }
        Ok(())
    }

    pub fn add_callback(&mut self, callback: Finalizer) {
        self.callbacks.push(callback);
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[cfg(test)]
    fn host_keys(&self) -> Vec<&str> {
        self.buckets.iter().map(|(key, _)| key.as_str()).collect()
    }
}

/// Drains the given plan bucket by bucket.
///
/// Entries of one bucket are downloaded sequentially so the pooled
/// connection to that host is reused for all of them. Each entry is
/// attempted up to `max_tries` times; a failed attempt has its byte count
/// rolled back from the aggregate progress before the retry. Failing
/// entries are collected and raised together as [`Error::Download`] once
/// every bucket has been drained; the finalizers run, in insertion order,
/// only when the whole plan succeeded.
pub async fn execute_plan(
    plan: DownloadPlan,
    progress: &Progress,
    config: &DownloadConfig,
) -> Result<()> {
    let DownloadPlan {
        buckets,
        callbacks,
        count,
        size,
    } = plan;
    if count > 0 {
        progress.reset(Ordering::SeqCst);
        progress.total.store(size, Ordering::SeqCst);
        {
            let mut step = progress
                .step
                .lock()
                .expect("Internal error: another thread hold lock and panic");
            *step = Step::DownloadFiles;
        }
        let mut fails: HashMap<String, FailureKind> = HashMap::new();
        for (host, entries) in buckets {
            debug!("Downloading {} files from {}", entries.len(), &host[1..]);
            for entry in entries {
                if let Some(kind) = download_with_retries(&entry, progress, config).await? {
                    fails.insert(entry.url, kind);
                }
            }
        }
        if !fails.is_empty() {
            return Err(Error::Download(fails));
        }
    }
    for callback in callbacks {
        callback()?;
    }
    Ok(())
}

/// Attempts one entry up to the configured try count. Returns `Ok(None)` on
/// success and `Ok(Some(kind))` when every attempt failed with a retryable
/// error; transport errors abort the whole plan.
async fn download_with_retries(
    entry: &DownloadEntry,
    progress: &Progress,
    config: &DownloadConfig,
) -> Result<Option<FailureKind>> {
    let mut last_failure = None;
    for attempt in 1..=config.max_tries.max(1) {
        match download_once(entry, progress).await? {
            None => return Ok(None),
            Some(kind) => {
                warn!(
                    "Download failed ({kind}): {}, attempt {attempt}/{}",
                    entry.url, config.max_tries
                );
                last_failure = Some(kind);
            }
        }
        async_io::Timer::after(Duration::from_millis(250)).await;
    }
    Ok(last_failure)
}

async fn download_once(entry: &DownloadEntry, progress: &Progress) -> Result<Option<FailureKind>> {
    let response = HTTP_CLIENT.get(&entry.url).send().await?;
    if response.status().as_u16() != 200 {
        return Ok(Some(FailureKind::NotFound));
    }
    if let Some(parent) = entry.file.parent() {
        async_fs::create_dir_all(parent).await?;
    }
    let mut response = response;
    let mut file = async_fs::File::create(&entry.file).await?;
    let mut hasher = sha1_smol::Sha1::new();
    let mut counted: u64 = 0;
    let mut written: u64 = 0;
    let known_size = entry.size.is_some();
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        hasher.update(&chunk);
        written += chunk.len() as u64;
        if known_size {
            // Only adding to the aggregate if the size is known.
            counted += chunk.len() as u64;
            progress.completed.fetch_add(chunk.len() as u64, Ordering::SeqCst);
        }
        progress.speed.fetch_add(chunk.len() as u64, Ordering::SeqCst);
    }
    file.flush().await?;
    let failure = if entry.size.is_some_and(|size| size != written) {
        Some(FailureKind::InvalidSize)
    } else if entry
        .sha1
        .as_ref()
        .is_some_and(|sha1| *sha1 != hasher.digest().to_string())
    {
        Some(FailureKind::InvalidSha1)
    } else {
        None
    };
    if failure.is_some() {
        // When re-trying, reset the aggregate to the previous state.
        progress.completed.fetch_sub(counted, Ordering::SeqCst);
    }
    Ok(failure)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn entry(url: &str) -> DownloadEntry {
        DownloadEntry::new(url.to_string(), PathBuf::from("/tmp/x"), None)
    }

    #[test]
    fn plan_groups_by_scheme_and_authority() {
        let mut plan = DownloadPlan::new();
        plan.push(entry("http://a.example/x")).unwrap();
        plan.push(entry("https://a.example/y")).unwrap();
        plan.push(entry("http://a.example:8080/z")).unwrap();
        plan.push(entry("http://a.example/w")).unwrap();
        assert_eq!(
            plan.host_keys(),
            vec!["0a.example", "1a.example", "0a.example:8080"]
        );
        assert_eq!(plan.count, 4);
    }

    #[test]
    fn plan_rejects_non_http_schemes() {
        let mut plan = DownloadPlan::new();
        let err = plan.push(entry("ftp://a.example/x")).unwrap_err();
        assert!(matches!(err, Error::IllegalScheme(scheme) if scheme == "ftp"));
        assert_eq!(plan.count, 0);
    }

    #[test]
    fn plan_aggregates_declared_sizes() {
        let mut plan = DownloadPlan::new();
        let mut sized = entry("https://a.example/x");
        sized.size = Some(10);
        plan.push(sized).unwrap();
        plan.push(entry("https://a.example/y")).unwrap();
        assert_eq!(plan.size, 10);
        assert_eq!(plan.count, 2);
    }

    struct TestServer {
        port: u16,
        handle: Option<std::thread::JoinHandle<()>>,
    }

    impl TestServer {
        /// Serves the given sequence of `(status, body)` responses, one per
        /// request, then exits.
        fn serve(replies: Vec<(u16, Vec<u8>)>) -> Self {
            let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
            let port = server.server_addr().to_ip().unwrap().port();
            let handle = std::thread::spawn(move || {
                for (status, body) in replies {
                    let request = match server.recv() {
                        Ok(request) => request,
                        Err(_) => return,
                    };
                    let response = tiny_http::Response::from_data(body)
                        .with_status_code(tiny_http::StatusCode(status));
                    let _ = request.respond(response);
                }
            });
            Self {
                port,
                handle: Some(handle),
            }
        }

        fn url(&self, path: &str) -> String {
            format!("http://127.0.0.1:{}{}", self.port, path)
        }
    }

    impl Drop for TestServer {
        fn drop(&mut self) {
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        }
    }

    const BODY: &[u8] = b"hello world";

    fn body_sha1() -> String {
        let mut hasher = sha1_smol::Sha1::new();
        hasher.update(BODY);
        hasher.digest().to_string()
    }

    fn checked_entry(url: String, file: PathBuf) -> DownloadEntry {
        DownloadEntry {
            url,
            file,
            size: Some(BODY.len() as u64),
            sha1: Some(body_sha1()),
            name: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn drain_verifies_size_and_sha1() {
        let server = TestServer::serve(vec![(200, BODY.to_vec())]);
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sub").join("file.bin");
        let mut plan = DownloadPlan::new();
        plan.push(checked_entry(server.url("/file.bin"), file.clone()))
            .unwrap();
        let progress = Progress::default();
        execute_plan(plan, &progress, &DownloadConfig::default())
            .await
            .unwrap();
        assert_eq!(std::fs::read(&file).unwrap(), BODY);
        assert_eq!(progress.completed.load(Ordering::SeqCst), BODY.len() as u64);
    }

    #[tokio::test]
    async fn corrupted_attempt_is_rolled_back_and_retried() {
        // First reply has the right length but the wrong bytes, second is good.
        let server = TestServer::serve(vec![
            (200, b"hello wxrld".to_vec()),
            (200, BODY.to_vec()),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.bin");
        let mut plan = DownloadPlan::new();
        plan.push(checked_entry(server.url("/file.bin"), file.clone()))
            .unwrap();
        let progress = Progress::default();
        execute_plan(plan, &progress, &DownloadConfig::default())
            .await
            .unwrap();
        assert_eq!(std::fs::read(&file).unwrap(), BODY);
        assert_eq!(progress.completed.load(Ordering::SeqCst), BODY.len() as u64);
    }

    #[tokio::test]
    async fn persistent_corruption_is_reported_per_url() {
        let server = TestServer::serve(vec![
            (200, b"hello wxrld".to_vec()),
            (200, b"hello wxrld".to_vec()),
            (200, b"hello wxrld".to_vec()),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let url = server.url("/file.bin");
        let mut plan = DownloadPlan::new();
        plan.push(checked_entry(url.clone(), dir.path().join("file.bin")))
            .unwrap();
        let ran = Arc::new(Mutex::new(false));
        let ran_in_callback = ran.clone();
        plan.add_callback(Box::new(move || {
            *ran_in_callback.lock().unwrap() = true;
            Ok(())
        }));
        let progress = Progress::default();
        let err = execute_plan(plan, &progress, &DownloadConfig::default())
            .await
            .unwrap_err();
        match err {
            Error::Download(fails) => {
                assert!(matches!(fails.get(&url), Some(FailureKind::InvalidSha1)));
            }
            other => panic!("unexpected error: {other}"),
        }
        // No finalizer observes a partially-succeeded plan.
        assert!(!*ran.lock().unwrap());
        assert_eq!(progress.completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_file_is_reported_as_not_found() {
        let server = TestServer::serve(vec![(404, vec![]), (404, vec![]), (404, vec![])]);
        let dir = tempfile::tempdir().unwrap();
        let url = server.url("/gone");
        let mut plan = DownloadPlan::new();
        plan.push(DownloadEntry::new(
            url.clone(),
            dir.path().join("gone"),
            None,
        ))
        .unwrap();
        let err = execute_plan(plan, &Progress::default(), &DownloadConfig::default())
            .await
            .unwrap_err();
        match err {
            Error::Download(fails) => {
                assert!(matches!(fails.get(&url), Some(FailureKind::NotFound)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn finalizers_run_in_insertion_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut plan = DownloadPlan::new();
        for tag in ["first", "second", "third"] {
            let order = order.clone();
            plan.add_callback(Box::new(move || {
                order.lock().unwrap().push(tag);
                Ok(())
            }));
        }
        execute_plan(plan, &Progress::default(), &DownloadConfig::default())
            .await
            .unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }
}
