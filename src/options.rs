//! # Request Options
//!
//! The closed set of typed arguments a caller may pass alongside a URL. Each
//! variant only carries data; its meaning is decided by
//! [`crate::RequestBuilder::build`].
//!
//! Options are applied in the order given. Where two options compete for the
//! same slot (two `Auth`s, two raw bodies) the later one wins. Headers set
//! through [`RequestOption::Header`] always beat values inferred from other
//! options, with the exception of the multipart Content-Type whose boundary
//! parameter is mandatory.

use std::collections::BTreeMap;
use std::time::Duration;

/// String-keyed field mapping used by most options.
///
/// Keys are kept sorted so encoded bodies and query strings are deterministic.
pub type Fields = BTreeMap<String, String>;

/// One typed argument to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOption {
    /// Headers merged into the request, overwriting earlier values
    Header(Fields),
    /// Query parameters; replace the query string of the URL
    Params(Fields),
    /// Form fields, url-encoded unless files are also present
    Data(Fields),
    /// Flat JSON object installed as the raw body
    Json(Fields),
    /// Multipart uploads as field name to file path
    Files(Fields),
    /// HTTP basic authentication
    Auth { username: String, password: String },
    /// Connection establishment timeout. Does not bound the body transfer.
    Timeout(Duration),
    /// Proxy URL for every scheme
    Proxy(String),
    /// Cookies, ignored when a Cookie header is already set
    Cookie(Fields),
    /// Literal body, sent as-is
    RawBody(String),
    /// Accept invalid TLS certificates
    InsecureSkipVerify(bool),
}

fn fields<I, K, V>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

impl RequestOption {
    pub fn header<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Header(fields(pairs))
    }

    pub fn params<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Params(fields(pairs))
    }

    pub fn data<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Data(fields(pairs))
    }

    pub fn json<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Json(fields(pairs))
    }

    pub fn files<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Files(fields(pairs))
    }

    pub fn cookie<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Cookie(fields(pairs))
    }

    pub fn auth(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Auth {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn timeout_secs(secs: u64) -> Self {
        Self::Timeout(Duration::from_secs(secs))
    }

    pub fn proxy(url: impl Into<String>) -> Self {
        Self::Proxy(url.into())
    }

    pub fn raw(body: impl Into<String>) -> Self {
        Self::RawBody(body.into())
    }

    pub fn insecure() -> Self {
        Self::InsecureSkipVerify(true)
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Header(_) => "header",
            Self::Params(_) => "params",
            Self::Data(_) => "data",
            Self::Json(_) => "json",
            Self::Files(_) => "files",
            Self::Auth { .. } => "auth",
            Self::Timeout(_) => "timeout",
            Self::Proxy(_) => "proxy",
            Self::Cookie(_) => "cookie",
            Self::RawBody(_) => "raw",
            Self::InsecureSkipVerify(_) => "insecure",
        }
    }
}
