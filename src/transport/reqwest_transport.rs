use std::error::Error as StdError;
use std::time::Duration;

use tracing::debug;

use crate::transport::http::{
    BoxFuture, FailureKind, HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody,
    ResponseHeaders, TransportError,
};

/// Connection-level knobs for [`ReqwestTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Whole-request timeout.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Set to `false` to accept self-signed or otherwise invalid certificates.
    pub verify_ssl: bool,
    pub follow_redirects: bool,
    /// Maximum hops when `follow_redirects` is on.
    pub max_redirects: usize,
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            verify_ssl: true,
            follow_redirects: true,
            max_redirects: 5,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        };

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(redirect);
        if !config.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(user_agent) = config.user_agent.as_deref() {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| TransportError::Build(error_chain(&err)))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            let method = request.method;
            let url = request.url;
            debug!(%method, %url, "sending HTTP request");

            let mut builder = self.client.request(reqwest_method(method), url.as_str());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder = match request.body {
                Some(RequestBody::Bytes(bytes)) => builder.body(bytes),
                Some(RequestBody::Multipart(fields)) => {
                    let form = fields
                        .into_iter()
                        .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                            form.text(name, value)
                        });
                    builder.multipart(form)
                }
                None => builder,
            };

            let response = builder.send().await.map_err(|err| {
                debug!(%method, %url, error = %err, "HTTP request failed");
                request_failure(&err)
            })?;

            let status = response.status().as_u16();
            let mut headers = ResponseHeaders::new();
            for (name, value) in response.headers() {
                headers.insert(name.as_str(), &String::from_utf8_lossy(value.as_bytes()));
            }
            let body = response
                .bytes()
                .await
                .map_err(|err| {
                    debug!(%method, %url, status, error = %err, "failed to read response body");
                    TransportError::Request {
                        kind: FailureKind::Body,
                        message: error_chain(&err),
                    }
                })?
                .to_vec();
            debug!(%method, %url, status, bytes = body.len(), "received HTTP response");

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        })
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn request_failure(err: &reqwest::Error) -> TransportError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_connect() {
        FailureKind::Connect
    } else if err.is_redirect() {
        FailureKind::Redirect
    } else if err.is_body() || err.is_decode() {
        FailureKind::Body
    } else if err.is_request() || err.is_builder() {
        FailureKind::Request
    } else {
        FailureKind::Other
    };
    TransportError::Request {
        kind,
        message: error_chain(err),
    }
}

fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
