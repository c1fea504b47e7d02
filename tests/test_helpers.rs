//! Shared fixtures for the integration tests
//!
//! A scripted transport keyed by URL, a directory source with a fixed (or
//! changing) board map, and a helper that starts a client on top of a
//! `MemoryCache`.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use bbs_fetch::Client;
use bbs_fetch::cache::{DatCache, MemoryCache};
use bbs_fetch::config::{Config, create_default_config};
use bbs_fetch::memo::DirectorySource;
use bbs_fetch::transport::{HttpRequest, HttpResponse, Transport, TransportError};

pub const SERVER: &str = "hayabusa.2ch.net";
pub const BOARD: &str = "news";
pub const THREAD: &str = "1234567890";

pub fn thread_url() -> String {
    format!("http://{}/{}/dat/{}.dat", SERVER, BOARD, THREAD)
}

pub fn board_url() -> String {
    format!("http://{}/{}/subject.txt", SERVER, BOARD)
}

pub fn mirror_thread_url() -> String {
    format!(
        "http://bg20.2ch.net/test/r.so/{}/{}/{}/",
        SERVER, BOARD, THREAD
    )
}

pub fn mirror_board_url() -> String {
    format!("http://bg20.2ch.net/test/p.so/{}/{}/", SERVER, BOARD)
}

/// Transport answering from per-URL queues
///
/// The last queued answer for a URL repeats; unscripted URLs fail with a
/// connect error. Every request is recorded.
#[derive(Debug, Default)]
pub struct MockTransport {
    scripts: Mutex<HashMap<String, VecDeque<Result<HttpResponse, TransportError>>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: impl Into<String>, response: HttpResponse) {
        self.push(url.into(), Ok(response));
    }

    pub fn fail(&self, url: impl Into<String>, error: TransportError) {
        self.push(url.into(), Err(error));
    }

    fn push(&self, url: String, answer: Result<HttpResponse, TransportError>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(url)
            .or_default()
            .push_back(answer);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url == url)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(&url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(TransportError::Connect(format!("no route to {}", url))),
        }
    }
}

/// Directory source serving a sequence of maps; the last one repeats
#[derive(Debug)]
pub struct StaticDirectory {
    maps: Mutex<VecDeque<HashMap<String, String>>>,
}

impl StaticDirectory {
    pub fn new(maps: Vec<HashMap<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            maps: Mutex::new(maps.into()),
        })
    }
}

#[async_trait]
impl DirectorySource for StaticDirectory {
    async fn load(&self) -> Result<HashMap<String, String>> {
        let mut maps = self.maps.lock().unwrap();
        if maps.len() > 1 {
            Ok(maps.pop_front().unwrap())
        } else {
            Ok(maps.front().cloned().unwrap_or_default())
        }
    }
}

pub fn directory(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(board, server)| (board.to_string(), server.to_string()))
        .collect()
}

pub fn test_config() -> Config {
    create_default_config()
}

/// Start a client whose directory knows `news` and `eroparo`
pub async fn start_client(
    config: Config,
    transport: Arc<MockTransport>,
    cache: MemoryCache,
) -> Arc<Client> {
    let source = StaticDirectory::new(vec![directory(&[
        (BOARD, SERVER),
        ("eroparo", "pele.bbspink.com"),
    ])]);
    start_client_with_source(config, transport, cache, source).await
}

pub async fn start_client_with_source(
    config: Config,
    transport: Arc<MockTransport>,
    cache: MemoryCache,
    source: Arc<StaticDirectory>,
) -> Arc<Client> {
    start_client_with_store(config, transport, Arc::new(cache), source).await
}

/// Like [`start_client`], over any cache store
pub async fn start_client_with_cache(
    config: Config,
    transport: Arc<MockTransport>,
    cache: Arc<dyn DatCache>,
) -> Arc<Client> {
    let source = StaticDirectory::new(vec![directory(&[(BOARD, SERVER)])]);
    start_client_with_store(config, transport, cache, source).await
}

async fn start_client_with_store(
    config: Config,
    transport: Arc<MockTransport>,
    cache: Arc<dyn DatCache>,
    source: Arc<StaticDirectory>,
) -> Arc<Client> {
    Client::builder(config)
        .with_transport(transport)
        .with_cache(cache)
        .with_directory_source(source)
        .start()
        .await
        .expect("client starts")
}
