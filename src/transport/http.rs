use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether a non-empty payload travels in the request body.
    pub fn sends_body(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Already-encoded bytes (JSON text or URL-encoded form).
    Bytes(Vec<u8>),
    /// Flattened text fields; the transport builds the multipart boundary.
    Multipart(Vec<(String, String)>),
}

/// A fully resolved HTTP request: final URL, merged headers, encoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Response header mapping, keyed by lowercased name. A repeated name
/// (in any case) overwrites the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders(BTreeMap<String, String>);

impl ResponseHeaders {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Parse a raw header block (status line plus `Name: value` lines).
    ///
    /// Lines without a colon are ignored; each line is split on its first
    /// colon and both halves are trimmed.
    pub fn parse(raw: &str) -> Self {
        let mut headers = Self::new();
        for line in raw.lines() {
            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name, value);
            }
        }
        headers
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.0.insert(name.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Coarse classification of a failed round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Connect,
    Timeout,
    Redirect,
    Body,
    Request,
    Other,
}

impl FailureKind {
    /// Whether the server answered before the failure.
    pub fn response_started(self) -> bool {
        matches!(self, Self::Body)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Timeout => "timeout",
            Self::Redirect => "redirect",
            Self::Body => "body",
            Self::Request => "request",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid request URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    Build(String),

    /// The round trip failed. With [`FailureKind::Body`] the status line
    /// arrived but the body could not be read; every other kind means no
    /// response was obtained.
    #[error("HTTP request failed ({kind}): {message}")]
    Request { kind: FailureKind, message: String },
}

impl TransportError {
    /// Short machine-readable code for the failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::Encode(_) => "encode",
            Self::Build(_) => "build",
            Self::Request { kind, .. } => kind.as_str(),
        }
    }
}

/// Executes one [`HttpRequest`] and returns whatever the server answered.
///
/// Implementations must return `Ok` for every response that was received,
/// including non-2xx ones; `Err` means no response exists.
pub trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>>;
}
