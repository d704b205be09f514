//! Outbound HTTP for probes.
//!
//! The executor talks to a [`Transport`] so the network can be swapped for a
//! scripted stand-in. [`HttpTransport`] is the reqwest-backed implementation
//! and follows redirects with reqwest's default policy.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use thiserror::Error;

use crate::probe::types::ProbeResponse;

/// Request methods a probe issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    Head,
    Get,
}

impl From<ProbeMethod> for reqwest::Method {
    fn from(method: ProbeMethod) -> Self {
        match method {
            ProbeMethod::Head => reqwest::Method::HEAD,
            ProbeMethod::Get => reqwest::Method::GET,
        }
    }
}

/// Transport-level failures. All of them end up as a red verdict.
#[derive(Debug, Error)]
pub enum TransportError {
    /// DNS, connect, TLS, or body read failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The probe deadline passed before a response arrived.
    #[error("probe deadline exceeded")]
    Timeout,

    /// The transport could not be constructed.
    #[error("transport setup failed: {0}")]
    Setup(String),
}

/// Something that can fetch a URL for a probe.
pub trait Transport: Send + Sync {
    fn send<'a>(
        &'a self,
        method: ProbeMethod,
        url: &'a str,
    ) -> BoxFuture<'a, Result<ProbeResponse, TransportError>>;
}

/// reqwest-backed transport shared by every probe.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, method: ProbeMethod, url: &str) -> Result<ProbeResponse, TransportError> {
        let response = self.client.request(method.into(), url).send().await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = match method {
            ProbeMethod::Head => Vec::new(),
            ProbeMethod::Get => response.bytes().await?.to_vec(),
        };

        Ok(ProbeResponse {
            status,
            content_type,
            body,
        })
    }
}

impl Transport for HttpTransport {
    fn send<'a>(
        &'a self,
        method: ProbeMethod,
        url: &'a str,
    ) -> BoxFuture<'a, Result<ProbeResponse, TransportError>> {
        self.fetch(method, url).boxed()
    }
}
