//! Test doubles shared by unit tests

use crate::error::Result;
use crate::request::OutgoingRequest;
use crate::transport::{RawResponse, Transport};
use flate2::write::GzEncoder;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{StatusCode, Version};
use std::io::{Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

/// Build a raw response for https://example.com/ with the given headers
pub fn raw_response(status: u16, headers: &[(&str, &str)], body: Box<dyn Read + Send>) -> RawResponse {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.append(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    RawResponse {
        status: StatusCode::from_u16(status).unwrap(),
        version: Version::HTTP_11,
        headers: map,
        url: Url::parse("https://example.com/").unwrap(),
        body,
    }
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Reader that counts how many times `read` is called
pub struct CountingReader {
    inner: std::io::Cursor<Vec<u8>>,
    reads: Arc<AtomicUsize>,
}

impl CountingReader {
    pub fn new(data: Vec<u8>) -> (Self, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner: std::io::Cursor::new(data),
                reads: reads.clone(),
            },
            reads,
        )
    }
}

impl Read for CountingReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(buf)
    }
}

/// Transport that records every request and answers with a fixed body
#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub requests: Arc<Mutex<Vec<OutgoingRequest>>>,
    pub fail: bool,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn last(&self) -> OutgoingRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request recorded")
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: &OutgoingRequest) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(crate::Error::Transport(anyhow::anyhow!("connection refused")));
        }
        let mut raw = raw_response(200, &[], Box::new(std::io::Cursor::new(b"ok".to_vec())));
        raw.url = request.url.clone();
        Ok(raw)
    }
}
