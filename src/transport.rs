//! # Transport
//!
//! The seam between request composition and the network. A [`Transport`]
//! receives a fully resolved [`OutgoingRequest`] and returns the response
//! head plus an unread body stream. Dialing, TLS, pooling and redirects all
//! live behind this trait.

use crate::error::{Error, Result};
use crate::request::{OutgoingRequest, TransportConfig};
use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Version};
use std::io::Read;
use std::sync::Mutex;
use url::Url;

/// Response head and body as returned by a transport
pub struct RawResponse {
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
    /// Final URL after any redirects
    pub url: Url,
    pub body: Box<dyn Read + Send>,
}

impl std::fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("version", &self.version)
            .field("headers", &self.headers)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

pub trait Transport: Send + Sync {
    fn execute(&self, request: &OutgoingRequest) -> Result<RawResponse>;
}

/// Blocking transport backed by reqwest.
///
/// The client is rebuilt only when the transport configuration changes, so
/// consecutive requests with the same settings share its connection pool.
#[derive(Default)]
pub struct ReqwestTransport {
    client: Mutex<Option<(TransportConfig, Client)>>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn client_for(&self, config: &TransportConfig) -> Result<Client> {
        let mut cached = self
            .client
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some((cached_config, client)) = cached.as_ref() {
            if cached_config == config {
                return Ok(client.clone());
            }
        }

        tracing::debug!("Building HTTP client for {config:?}");
        let client = build_client(config)?;
        *cached = Some((config.clone(), client.clone()));
        Ok(client)
    }
}

fn build_client(config: &TransportConfig) -> Result<Client> {
    // No overall deadline: large bodies must not be cut off by a dial timer
    let mut builder = Client::builder()
        .timeout(None)
        .danger_accept_invalid_certs(config.danger_accept_invalid_certs);

    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }

    builder = match &config.proxy {
        Some(proxy) => {
            let proxy_cfg = reqwest::Proxy::all(proxy).map_err(|source| Error::InvalidProxy {
                proxy: proxy.clone(),
                source,
            })?;
            builder.proxy(proxy_cfg)
        }
        None => builder.no_proxy(),
    };

    Ok(builder.build()?)
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: &OutgoingRequest) -> Result<RawResponse> {
        let client = self.client_for(&request.transport)?;

        let mut builder = client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.to_vec());
        }

        let response = builder
            .send()
            .with_context(|| format!("{} {}", request.method, request.url))
            .map_err(Error::Transport)?;

        Ok(RawResponse {
            status: response.status(),
            version: response.version(),
            headers: response.headers().clone(),
            url: response.url().clone(),
            body: Box::new(response),
        })
    }
}
