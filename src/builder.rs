//! # Request Builder
//!
//! Resolves a method, a URL and an ordered list of [`RequestOption`]s into one
//! [`OutgoingRequest`], then dispatches it through a [`Transport`].
//!
//! ## Body encoding
//!
//! Exactly one body encoding is active per request, chosen after every option
//! has been applied:
//!
//! 1. any `Files` option: multipart, with `Data` fields added as plain parts
//! 2. otherwise any `Data` option: url-encoded form
//! 3. otherwise whatever the last `Json` or `RawBody` option installed
//!
//! A `Json` or `RawBody` payload is therefore dropped whenever `Data` is also
//! present. Callers migrating from the form-plus-json combination should send
//! one or the other.

use crate::config::{ClientConfig, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE};
use crate::error::Result;
use crate::multipart::Multipart;
use crate::options::{Fields, RequestOption};
use crate::request::OutgoingRequest;
use crate::response::Response;
use crate::transport::{ReqwestTransport, Transport};
use base64::Engine;
use cookie::Cookie;
use reqwest::header;
use reqwest::Method;
use url::Url;

/// Builds and sends requests.
///
/// Every call to [`RequestBuilder::send`] starts from a fresh request; only
/// the configuration, session headers and the transport (with its connection
/// pool) carry over between calls.
pub struct RequestBuilder {
    config: ClientConfig,
    transport: Box<dyn Transport>,
    /// Headers that persist across requests
    session_headers: Fields,
    close: bool,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config,
            transport: Box::new(ReqwestTransport::new()),
            session_headers: Fields::new(),
            close: false,
        }
    }

    /// Replace the transport used for dispatch
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Box::new(transport);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Add or update a session header
    pub fn set_session_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.session_headers.insert(key.into(), value.into());
    }

    /// Remove a session header
    pub fn remove_session_header(&mut self, key: &str) -> Option<String> {
        self.session_headers.remove(key)
    }

    pub fn session_headers(&self) -> &Fields {
        &self.session_headers
    }

    /// Ask the server to close the connection after each subsequent request
    pub fn close(&mut self) {
        self.close = true;
    }

    /// Resolve options into a request without sending it
    pub fn build<I>(&self, method: Method, url: &str, options: I) -> Result<OutgoingRequest>
    where
        I: IntoIterator<Item = RequestOption>,
    {
        let mut request = OutgoingRequest::new(method, Url::parse(url)?);

        request.set_header(header::USER_AGENT.as_str(), &self.config.user_agent)?;
        for (k, v) in self.config.default_headers.iter().chain(&self.session_headers) {
            request.set_header(k, v)?;
        }
        if self.close {
            request.set_header(header::CONNECTION.as_str(), "close")?;
        }

        // Inferred Content-Types may replace each other; explicit ones never move
        let mut explicit_content_type = request.has_header(header::CONTENT_TYPE.as_str());
        let mut params = Fields::new();
        let mut form = Fields::new();
        let mut files: Vec<(String, String)> = Vec::new();
        let mut cookies: Vec<(String, String)> = Vec::new();

        for option in options {
            tracing::debug!("Applying {} option to {} {}", option.kind(), request.method, url);
            match option {
                RequestOption::Header(fields) => {
                    for (k, v) in &fields {
                        request.set_header(k, v)?;
                    }
                    explicit_content_type |= fields
                        .keys()
                        .any(|k| k.eq_ignore_ascii_case(header::CONTENT_TYPE.as_str()));
                }
                RequestOption::Params(fields) => params.extend(fields),
                RequestOption::Data(fields) => form.extend(fields),
                RequestOption::Json(fields) => {
                    if !explicit_content_type {
                        request.set_header(header::CONTENT_TYPE.as_str(), JSON_CONTENT_TYPE)?;
                    }
                    request.set_body(serde_json::to_vec(&fields)?);
                }
                RequestOption::Files(fields) => files.extend(fields),
                RequestOption::Auth { username, password } => {
                    let credentials = base64::engine::general_purpose::STANDARD
                        .encode(format!("{username}:{password}"));
                    request.set_header(
                        header::AUTHORIZATION.as_str(),
                        &format!("Basic {credentials}"),
                    )?;
                }
                RequestOption::Timeout(timeout) => {
                    request.transport.connect_timeout = Some(timeout);
                }
                RequestOption::Proxy(proxy) => request.transport.proxy = Some(proxy),
                RequestOption::Cookie(fields) => cookies.extend(fields),
                RequestOption::RawBody(body) => {
                    if !explicit_content_type {
                        request.set_header(header::CONTENT_TYPE.as_str(), JSON_CONTENT_TYPE)?;
                    }
                    request.set_body(body);
                }
                RequestOption::InsecureSkipVerify(insecure) => {
                    request.transport.danger_accept_invalid_certs = insecure;
                }
            }
        }

        // A Cookie header set directly takes priority over structured cookies
        if !cookies.is_empty() && !request.has_header(header::COOKIE.as_str()) {
            let joined = cookies
                .iter()
                .map(|(k, v)| Cookie::new(k.as_str(), v.as_str()).encoded().to_string())
                .collect::<Vec<_>>()
                .join("; ");
            request.set_header(header::COOKIE.as_str(), &joined)?;
        }

        if !files.is_empty() {
            let mut multipart = Multipart::new();
            for (name, path) in &files {
                multipart.file(name, path)?;
            }
            for (name, value) in &form {
                multipart.field(name, value);
            }
            // The boundary parameter is mandatory, so this always overwrites
            request.set_header(header::CONTENT_TYPE.as_str(), &multipart.content_type())?;
            request.set_body(multipart.finish());
            tracing::debug!(
                "Encoded {} file(s) and {} field(s) as multipart",
                files.len(),
                form.len()
            );
        } else if !form.is_empty() {
            if !explicit_content_type {
                request.set_header(header::CONTENT_TYPE.as_str(), FORM_CONTENT_TYPE)?;
            }
            request.set_body(serde_urlencoded::to_string(&form)?);
            tracing::debug!("Encoded {} field(s) as url-encoded form", form.len());
        }

        // The query string is always replaced, never merged
        if params.is_empty() {
            request.url.set_query(None);
        } else {
            let query = serde_urlencoded::to_string(&params)?;
            request.url.set_query(Some(&query));
        }

        Ok(request)
    }

    /// Execute a built request.
    ///
    /// The request body is released afterwards whether or not the transport
    /// succeeded.
    pub fn dispatch(&self, request: &mut OutgoingRequest) -> Result<Response> {
        tracing::info!(
            "Sending {} {} ({} byte body)",
            request.method,
            request.url,
            request.content_length
        );
        let result = self.transport.execute(request);
        request.clear_body();

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("{} {} failed: {e}", request.method, request.url);
                return Err(e);
            }
        };
        tracing::info!("{} {} -> {}", request.method, request.url, raw.status);
        Ok(Response::new(raw, request.headers.clone()))
    }

    /// Build and dispatch in one step
    pub fn send<I>(&self, method: Method, url: &str, options: I) -> Result<Response>
    where
        I: IntoIterator<Item = RequestOption>,
    {
        let mut request = self.build(method, url, options)?;
        self.dispatch(&mut request)
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
