//! Record sources and the one-shot background fetch.
//!
//! This module provides:
//! - `FetchGateway` trait for anything that can produce raw records
//! - `HttpGateway` (remote JSON endpoint) and `FileGateway` (local JSON file)
//! - `spawn_fetch`, which runs a gateway off the calling thread and hands back
//!   its result exactly once

pub mod file;
pub mod http;

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use thiserror::Error;
use tracing::{info, warn};

use crate::record::RawRecord;

pub use file::FileGateway;
pub use http::HttpGateway;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid record payload from {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("fetch worker stopped before delivering a result")]
    Disconnected,
}

pub type FetchResult = Result<Vec<RawRecord>, FetchError>;

/// Anything that can produce the raw record collection.
pub trait FetchGateway: Send + Sync {
    /// Retrieve every record. Called once per fetch.
    fn fetch_records(&self) -> FetchResult;

    /// Human readable origin, used in log lines and the browser header.
    fn describe(&self) -> String;
}

/// Pick a gateway from a source string: `http(s)://` URLs go over the
/// network, anything else is read as a local file path.
pub fn gateway_for(source: &str) -> Arc<dyn FetchGateway> {
    let trimmed = source.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Arc::new(HttpGateway::new(trimmed))
    } else {
        Arc::new(FileGateway::new(trimmed))
    }
}

/// Decode a JSON payload. A `null` body counts as an empty collection.
pub(crate) fn decode_records(origin: &str, bytes: &[u8]) -> FetchResult {
    let records: Option<Vec<RawRecord>> =
        serde_json::from_slice(bytes).map_err(|source| FetchError::Decode {
            origin: origin.to_string(),
            source,
        })?;
    Ok(records.unwrap_or_default())
}

/// A fetch running on a worker thread. Its result can be taken once.
pub struct PendingFetch {
    receiver: Option<Receiver<FetchResult>>,
}

impl PendingFetch {
    /// Non-blocking check. Returns `Some` exactly once, when the worker has
    /// delivered (or died).
    pub fn poll(&mut self) -> Option<FetchResult> {
        let receiver = self.receiver.as_ref()?;
        let outcome = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(FetchError::Disconnected),
        };
        self.receiver = None;
        Some(outcome)
    }

    /// Block until the worker delivers.
    pub fn wait(mut self) -> FetchResult {
        match self.receiver.take() {
            Some(receiver) => receiver.recv().unwrap_or(Err(FetchError::Disconnected)),
            None => Err(FetchError::Disconnected),
        }
    }
}

pub fn spawn_fetch(gateway: Arc<dyn FetchGateway>) -> PendingFetch {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let origin = gateway.describe();
        info!(%origin, "fetching records");
        let result = gateway.fetch_records();
        match &result {
            Ok(records) => info!(%origin, count = records.len(), "fetch complete"),
            Err(err) => warn!(%origin, error = %err, "fetch failed"),
        }
        // The receiver may already be gone if the browser quit mid-fetch.
        let _ = sender.send(result);
    });
    PendingFetch {
        receiver: Some(receiver),
    }
}
