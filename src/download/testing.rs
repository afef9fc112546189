//! In-memory transport for engine tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;

use crate::download::transport::{FetchResponse, ImageTransport};
use crate::error::{Error, Result};

/// Answers every URL with its own bytes and records what it saw.
#[derive(Default)]
pub struct MockTransport {
    delay: Duration,
    decreasing_from: Option<usize>,
    failing: HashSet<String>,
    unreachable: HashSet<String>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    log: Mutex<Vec<(String, Option<String>)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The k-th request sleeps `(total - k) * 2ms`, so early requests
    /// finish last.
    pub fn with_decreasing_delay(mut self, total: usize) -> Self {
        self.decreasing_from = Some(total);
        self
    }

    /// Answer `url` with HTTP 500.
    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Fail `url` at the transport level.
    pub fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.insert(url.to_string());
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn request_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().iter().map(|(u, _)| u.clone()).collect()
    }

    pub fn referers(&self) -> Vec<Option<String>> {
        self.log.lock().unwrap().iter().map(|(_, r)| r.clone()).collect()
    }
}

#[async_trait]
impl ImageTransport for MockTransport {
    async fn get(
        &self,
        url: &str,
        _timeout: Duration,
        headers: header::HeaderMap,
    ) -> Result<FetchResponse> {
        let referer = headers
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let order = {
            let mut log = self.log.lock().unwrap();
            log.push((url.to_string(), referer));
            log.len()
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = match self.decreasing_from {
            Some(total) => Duration::from_millis(total.saturating_sub(order) as u64 * 2),
            None => self.delay,
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        // yield so concurrent requests overlap even without a delay
        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.unreachable.contains(url) {
            return Err(Error::Network(format!("connection refused: {}", url)));
        }
        if self.failing.contains(url) {
            return Ok(FetchResponse {
                status: 500,
                body: Vec::new(),
            });
        }
        Ok(FetchResponse {
            status: 200,
            body: url.as_bytes().to_vec(),
        })
    }
}
