//! # Response
//!
//! Wraps a completed exchange. The body stream is read at most once, on the
//! first call to [`Response::content`] or any view built on top of it, and the
//! bytes are kept for the lifetime of the response.
//!
//! Compressed bodies are only decoded when the request itself set an
//! `Accept-Encoding` header. A server that compresses unprompted hands back
//! the raw compressed bytes.

use crate::error::{ContentError, Error, Result};
use crate::transport::RawResponse;
use bytes::Bytes;
use cookie::Cookie;
use flate2::read::{MultiGzDecoder, ZlibDecoder};
use reqwest::header::{self, HeaderMap};
use reqwest::{StatusCode, Version};
use serde::de::DeserializeOwned;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use url::Url;

type BodyReader = Box<dyn Read + Send>;

struct Materialized {
    bytes: Bytes,
    error: Option<ContentError>,
}

pub struct Response {
    status: StatusCode,
    status_line: String,
    version: Version,
    headers: HeaderMap,
    url: Url,
    request_headers: HeaderMap,
    body: Mutex<Option<BodyReader>>,
    content: OnceLock<Materialized>,
    text: OnceLock<String>,
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status_line)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers)
            .field("materialized", &self.content.get().is_some())
            .finish()
    }
}

impl Response {
    /// Wrap a raw transport response together with the headers that were sent
    pub fn new(raw: RawResponse, request_headers: HeaderMap) -> Self {
        let status_line = match raw.status.canonical_reason() {
            Some(reason) => format!("{} {}", raw.status.as_u16(), reason),
            None => raw.status.as_u16().to_string(),
        };

        Self {
            status: raw.status,
            status_line,
            version: raw.version,
            headers: raw.headers,
            url: raw.url,
            request_headers,
            body: Mutex::new(Some(raw.body)),
            content: OnceLock::new(),
            text: OnceLock::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Status as text, e.g. "200 OK".
    ///
    /// The reason is the canonical phrase for the code, not the phrase the
    /// server sent; codes without one render as the bare number.
    pub fn status_line(&self) -> &str {
        &self.status_line
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, if present and printable
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Final URL after redirects
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Headers as they were sent on the request
    pub fn request_headers(&self) -> &HeaderMap {
        &self.request_headers
    }

    fn materialize(&self) -> &Materialized {
        self.content.get_or_init(|| {
            let body = self
                .body
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take();
            let Some(body) = body else {
                return Materialized {
                    bytes: Bytes::new(),
                    error: None,
                };
            };

            match self.read_body(body) {
                Ok(bytes) => {
                    tracing::debug!("Read {} byte response body from {}", bytes.len(), self.url);
                    Materialized {
                        bytes: Bytes::from(bytes),
                        error: None,
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to read response body from {}: {e}", self.url);
                    Materialized {
                        bytes: Bytes::new(),
                        error: Some(ContentError::new(&e)),
                    }
                }
            }
        })
    }

    fn read_body(&self, body: BodyReader) -> std::io::Result<Vec<u8>> {
        let mut reader = body;
        if self.request_headers.contains_key(header::ACCEPT_ENCODING) {
            let encoding = self
                .header(header::CONTENT_ENCODING.as_str())
                .map(|e| e.trim().to_ascii_lowercase());
            reader = match encoding.as_deref() {
                Some("gzip") => Box::new(MultiGzDecoder::new(reader)),
                Some("deflate") => Box::new(ZlibDecoder::new(reader)),
                Some("zstd") => Box::new(zstd::stream::read::Decoder::new(reader)?),
                _ => reader,
            };
        }

        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Response body bytes.
    ///
    /// Empty when reading or decoding failed; use [`Response::content_error`]
    /// or [`Response::try_content`] to tell that apart from an empty body.
    pub fn content(&self) -> &[u8] {
        &self.materialize().bytes
    }

    /// Response body bytes, or the error that prevented reading them
    pub fn try_content(&self) -> Result<&[u8]> {
        let materialized = self.materialize();
        match &materialized.error {
            Some(e) => Err(Error::Content(e.clone())),
            None => Ok(&materialized.bytes),
        }
    }

    /// The failure recorded while reading the body, if any
    pub fn content_error(&self) -> Option<&ContentError> {
        self.materialize().error.as_ref()
    }

    /// Body decoded with the charset from Content-Type, UTF-8 when absent
    pub fn text(&self) -> &str {
        self.text.get_or_init(|| {
            let encoding = self
                .header(header::CONTENT_TYPE.as_str())
                .and_then(charset)
                .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()))
                .unwrap_or(encoding_rs::UTF_8);
            let (text, _, _) = encoding.decode(self.content());
            text.into_owned()
        })
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(self.content())?)
    }

    /// Write the body to `path`, replacing any existing file
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let write_err = |source: std::io::Error| Error::WriteFile {
            path: path.to_path_buf(),
            source,
        };

        let content = self.content();
        let mut file = std::fs::File::create(path).map_err(write_err)?;
        file.write_all(content).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        tracing::debug!("Saved {} bytes to {}", content.len(), path.display());
        Ok(())
    }

    /// Cookies from Set-Cookie headers. Unparseable entries are skipped.
    pub fn cookies(&self) -> Vec<Cookie<'static>> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| Cookie::parse(v.to_owned()).ok())
            .collect()
    }

    /// Location header resolved against the response URL
    pub fn location(&self) -> Result<Url> {
        let location = self
            .header(header::LOCATION.as_str())
            .ok_or(Error::NoLocation)?;
        Ok(self.url.join(location)?)
    }
}

fn charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}
