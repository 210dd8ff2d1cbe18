//! # easyreq - Option-Driven HTTP Requests
//!
//! Issue blocking GET/POST/PUT/PATCH/DELETE requests from a URL and a list of
//! typed options, without assembling a request object by hand.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   options   ┌────────────────┐  request   ┌─────────────┐
//! │ get / post.. │────────────▶│ RequestBuilder │───────────▶│  Transport  │
//! │   (api)      │             │ build/dispatch │            │  (reqwest)  │
//! └──────────────┘             └────────────────┘            └─────────────┘
//!                                      ▲                            │
//!                                      │         ┌──────────┐       │
//!                                      └─────────│ Response │◀──────┘
//!                                                │ lazy body│
//!                                                └──────────┘
//! ```
//!
//! ```no_run
//! use easyreq::RequestOption;
//!
//! let response = easyreq::get(
//!     "https://example.com/search",
//!     [RequestOption::params([("q", "rust")])],
//! )?;
//! println!("{} {}", response.status_line(), response.text());
//! # Ok::<(), easyreq::Error>(())
//! ```

pub mod api;
pub mod builder;
pub mod config;
pub mod error;
pub mod multipart;
pub mod options;
pub mod request;
pub mod response;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{delete, get, patch, post, put};
pub use builder::RequestBuilder;
pub use config::{ClientConfig, DEFAULT_USER_AGENT};
pub use error::{ContentError, Error, Result};
pub use options::{Fields, RequestOption};
pub use request::{OutgoingRequest, TransportConfig};
pub use reqwest::Method;
pub use response::Response;
pub use transport::{RawResponse, ReqwestTransport, Transport};
