//! Client layer: the API façade that turns endpoint calls into HTTP round trips.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value, json};
use tracing::warn;

use crate::domain::{ApiKey, BaseUrl, Payload, ValidationError};
use crate::transport::{
    ContentType, HttpMethod, HttpResponse, HttpTransport, ReqwestTransport, TransportConfig,
    TransportError, build_request, decode_json_body, default_headers, merge_headers, merge_query,
};

const BASE_URL_ENV: &str = "EVOLUTION_API_URL";
const API_KEY_ENV: &str = "EVOLUTION_API_KEY";

/// Result of every façade and service call: decoded JSON or a uniform error.
pub type ApiResult = Result<Value, EvolutionError>;

#[derive(Debug, Clone)]
/// Server location and API key, immutable once built.
pub struct Credentials {
    base_url: BaseUrl,
    api_key: ApiKey,
}

impl Credentials {
    /// Validate a base URL and API key pair.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            base_url: BaseUrl::new(base_url)?,
            api_key: ApiKey::new(api_key)?,
        })
    }

    /// Read `EVOLUTION_API_URL` and `EVOLUTION_API_KEY`.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        Self::new(
            lookup(BASE_URL_ENV).unwrap_or_default(),
            lookup(API_KEY_ENV).unwrap_or_default(),
        )
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Where the API key travels on each request.
pub enum ApiKeyPlacement {
    /// `apikey: <key>` request header, as the Evolution API documents.
    #[default]
    Header,
    /// `?apikey=<key>` query parameter. Superseded by [`ApiKeyPlacement::Header`];
    /// kept for older gateways that only read the query string.
    Query,
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`EvolutionClient`] and the services built on it.
///
/// Every failure is reported as a value; nothing panics or unwinds. Use
/// [`EvolutionError::to_json`] for the `{"error": "<message>"}` shape.
pub enum EvolutionError {
    /// No response was obtained (DNS, TLS, refused connection, timeout) or
    /// the request could not be assembled.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// Non-2xx status returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response body is not valid JSON.
    #[error("invalid JSON response (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// A constructor or setter rejected an invalid argument.
    #[error("invalid argument: {0}")]
    Validation(#[from] ValidationError),
}

impl EvolutionError {
    /// Raw HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } | Self::Decode { status, .. } => Some(*status),
            Self::Transport(_) | Self::Validation(_) => None,
        }
    }

    /// The remote error body decoded as JSON, if there is one.
    pub fn body_json(&self) -> Option<Value> {
        match self {
            Self::HttpStatus {
                body: Some(body), ..
            } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// `{"error": "<message>"}`.
    pub fn to_json(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

impl From<EvolutionError> for Value {
    fn from(value: EvolutionError) -> Self {
        value.to_json()
    }
}

#[derive(Clone)]
/// Builder for [`EvolutionClient`].
///
/// Defaults: 30 s request timeout, 10 s connect timeout, certificate
/// verification on, up to 5 redirects followed, JSON bodies, API key header.
pub struct EvolutionClientBuilder {
    credentials: Credentials,
    config: TransportConfig,
    content_type: ContentType,
    headers: Vec<(String, String)>,
    api_key_placement: ApiKeyPlacement,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl EvolutionClientBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            config: TransportConfig::default(),
            content_type: ContentType::default(),
            headers: Vec::new(),
            api_key_placement: ApiKeyPlacement::default(),
            transport: None,
        }
    }

    /// Timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Disable to talk to servers with self-signed certificates.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.config.verify_ssl = verify;
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.config.follow_redirects = follow;
        self
    }

    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Body encoding for POST/PUT/PATCH/DELETE payloads.
    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Add or override a header sent with every request.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn api_key_placement(mut self, placement: ApiKeyPlacement) -> Self {
        self.api_key_placement = placement;
        self
    }

    /// Use a custom transport instead of the built-in reqwest one. Connection
    /// knobs (timeouts, TLS, redirects) are then the transport's concern.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build an [`EvolutionClient`].
    pub fn build(self) -> Result<EvolutionClient, EvolutionError> {
        let http: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.config)?),
        };
        let headers = merge_headers(&default_headers(self.content_type), &self.headers);

        Ok(EvolutionClient {
            credentials: Arc::new(self.credentials),
            headers: Arc::new(headers),
            content_type: self.content_type,
            api_key_placement: self.api_key_placement,
            http,
        })
    }
}

#[derive(Clone)]
/// Thin façade over the Evolution REST API.
///
/// Clones share the same credentials and HTTP transport, so one client can
/// back any number of services and be used from several tasks at once.
/// `get`, `post` and `delete` return decoded JSON for 2xx responses and an
/// [`EvolutionError`] otherwise; `status` treats any received body as data.
pub struct EvolutionClient {
    credentials: Arc<Credentials>,
    headers: Arc<Vec<(String, String)>>,
    content_type: ContentType,
    api_key_placement: ApiKeyPlacement,
    http: Arc<dyn HttpTransport>,
}

impl fmt::Debug for EvolutionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvolutionClient")
            .field("base_url", &self.credentials.base_url)
            .field("content_type", &self.content_type)
            .field("api_key_placement", &self.api_key_placement)
            .finish_non_exhaustive()
    }
}

impl EvolutionClient {
    /// Create a client with default transport settings.
    ///
    /// For more customization, use [`EvolutionClient::builder`].
    pub fn new(credentials: Credentials) -> Result<Self, EvolutionError> {
        EvolutionClientBuilder::new(credentials).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> EvolutionClientBuilder {
        EvolutionClientBuilder::new(credentials)
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// `GET` with `query` merged into the endpoint's query string.
    pub async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> ApiResult {
        let data = query
            .iter()
            .map(|(key, value)| ((*key).to_owned(), Value::String((*value).to_owned())))
            .collect();
        self.call(HttpMethod::Get, endpoint, data).await
    }

    /// `POST` with `body` as the request payload.
    pub async fn post(&self, endpoint: &str, body: Payload) -> ApiResult {
        self.call(HttpMethod::Post, endpoint, body.into_map()).await
    }

    /// `DELETE`, with `body` sent only when non-empty.
    pub async fn delete(&self, endpoint: &str, body: Payload) -> ApiResult {
        self.call(HttpMethod::Delete, endpoint, body.into_map()).await
    }

    /// `GET` that reads the body whatever the HTTP status.
    ///
    /// A non-2xx answer (e.g. a closed session) is decoded and returned as
    /// data. When no response was obtained at all the result is `[null]`; a
    /// response whose body could not be read is an error.
    pub async fn status(&self, endpoint: &str) -> ApiResult {
        match self.send(HttpMethod::Get, endpoint, Map::new()).await {
            Ok(response) => {
                decode_json_body(&response.body).map_err(|source| EvolutionError::Decode {
                    status: response.status,
                    source,
                })
            }
            Err(EvolutionError::Transport(err))
                if matches!(
                    &err,
                    TransportError::Request { kind, .. } if !kind.response_started()
                ) =>
            {
                warn!(endpoint, error = %err, "no response for status request");
                Ok(Value::Array(vec![Value::Null]))
            }
            Err(err) => {
                warn!(endpoint, error = %err, "Evolution API status request failed");
                Err(err)
            }
        }
    }

    async fn call(
        &self,
        method: HttpMethod,
        endpoint: &str,
        data: Map<String, Value>,
    ) -> ApiResult {
        let result = match self.send(method, endpoint, data).await {
            Ok(response) => decode_success(response),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            warn!(%method, endpoint, error = %err, "Evolution API request failed");
        }
        result
    }

    async fn send(
        &self,
        method: HttpMethod,
        endpoint: &str,
        data: Map<String, Value>,
    ) -> Result<HttpResponse, EvolutionError> {
        let api_key = self.credentials.api_key.as_str();
        let mut url = self.credentials.base_url.join(endpoint);
        let mut overrides = Vec::new();
        match self.api_key_placement {
            ApiKeyPlacement::Header => {
                overrides.push((ApiKey::FIELD.to_owned(), api_key.to_owned()));
            }
            ApiKeyPlacement::Query => {
                url = merge_query(&url, &[(ApiKey::FIELD.to_owned(), api_key.to_owned())])?;
            }
        }

        let headers = merge_headers(&self.headers, &overrides);
        let request = build_request(method, &url, &data, headers, self.content_type)?;
        Ok(self.http.execute(request).await?)
    }
}

fn decode_success(response: HttpResponse) -> ApiResult {
    if !response.is_success() {
        let body = if response.body_text().trim().is_empty() {
            None
        } else {
            Some(response.body_text().into_owned())
        };
        return Err(EvolutionError::HttpStatus {
            status: response.status,
            body,
        });
    }

    decode_json_body(&response.body).map_err(|source| EvolutionError::Decode {
        status: response.status,
        source,
    })
}
