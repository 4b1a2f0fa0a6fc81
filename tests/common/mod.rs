//! Simulated HTTP transport: scripted responses plus a call log.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpError {
    #[error("call timed out")]
    Timeout,
    #[error("call failed with status code {0}")]
    Status(u16),
    #[error("no response scripted")]
    Unscripted,
}

impl HttpError {
    pub fn is_transient(&self) -> bool {
        matches!(self, HttpError::Timeout | HttpError::Status(_))
    }
}

#[derive(Debug)]
enum Scripted {
    Timeout,
    Respond { status: u16, body: String },
}

/// Records every call and answers from a FIFO script.
#[derive(Debug, Clone, Default)]
pub struct SimTransport {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl SimTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn simulate_timeout(&self) -> &Self {
        self.script.lock().unwrap().push_back(Scripted::Timeout);
        self
    }

    pub fn respond_with(&self, body: &str, status: u16) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Respond { status, body: body.to_string() });
        self
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn send(&self, method: &str, url: &str) -> Result<String, HttpError> {
        self.calls.lock().unwrap().push(format!("{} {}", method, url));
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Timeout) => Err(HttpError::Timeout),
            Some(Scripted::Respond { status, body }) if (200..300).contains(&status) => Ok(body),
            Some(Scripted::Respond { status, .. }) => Err(HttpError::Status(status)),
            None => Err(HttpError::Unscripted),
        }
    }
}

/// Client handle bound to a base URL.
#[derive(Debug, Clone)]
pub struct SimClient {
    base: String,
    transport: SimTransport,
}

impl SimClient {
    pub fn new(base: &str, transport: &SimTransport) -> Self {
        Self { base: base.trim_end_matches('/').to_string(), transport: transport.clone() }
    }

    pub fn request(&self, segments: &[&str]) -> SimRequest {
        let mut url = self.base.clone();
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        SimRequest { url, transport: self.transport.clone() }
    }

    /// Blocking GET against `path`.
    pub fn get(&self, path: &str) -> Result<String, HttpError> {
        self.transport.send("GET", &format!("{}/{}", self.base, path))
    }
}

/// A request ready to be sent; cheap to clone for re-sending.
#[derive(Debug, Clone)]
pub struct SimRequest {
    url: String,
    transport: SimTransport,
}

impl SimRequest {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn get_json(self) -> Result<String, HttpError> {
        tokio::task::yield_now().await;
        self.transport.send("GET", &self.url)
    }

    pub async fn post_url_encoded(self, data: String) -> Result<(), HttpError> {
        tokio::task::yield_now().await;
        self.transport.send("POST", &format!("{}?{}", self.url, data)).map(|_| ())
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
