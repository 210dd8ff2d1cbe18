//! Outgoing request descriptor handed to a [`crate::Transport`].

use crate::error::{Error, Result};
use bytes::Bytes;
use cookie::Cookie;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use std::time::Duration;
use url::Url;

/// Connection-level knobs for a single request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportConfig {
    /// Bounds connection establishment only
    pub connect_timeout: Option<Duration>,
    pub proxy: Option<String>,
    pub danger_accept_invalid_certs: bool,
}

/// A fully resolved request, ready for dispatch
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub content_length: u64,
    pub transport: TransportConfig,
}

impl OutgoingRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            content_length: 0,
            transport: TransportConfig::default(),
        }
    }

    /// Header value as text, if present and printable
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    /// Insert or overwrite a header
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<()> {
        let invalid = || Error::InvalidHeader {
            name: name.to_string(),
        };
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        self.headers.insert(name, value);
        Ok(())
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        let body = body.into();
        self.content_length = body.len() as u64;
        self.body = Some(body);
    }

    /// Drop the payload once it has been sent
    pub fn clear_body(&mut self) {
        self.body = None;
        self.content_length = 0;
    }

    /// Cookies carried on the Cookie header
    pub fn cookies(&self) -> Vec<Cookie<'static>> {
        self.headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| Cookie::parse(pair.trim().to_owned()).ok())
            .collect()
    }
}
