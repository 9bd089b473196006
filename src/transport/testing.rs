use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::transport::http::{
    BoxFuture, FailureKind, HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody,
    ResponseHeaders, TransportError,
};

#[derive(Debug, Clone)]
enum Reply {
    Response { status: u16, body: String },
    Failure(FailureKind, String),
}

/// Records every request and answers with a canned reply.
#[derive(Debug, Clone)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug)]
struct FakeTransportState {
    requests: Vec<HttpRequest>,
    reply: Reply,
}

impl FakeTransport {
    pub(crate) fn new(status: u16, body: impl Into<String>) -> Self {
        Self::with_reply(Reply::Response {
            status,
            body: body.into(),
        })
    }

    /// Fails every request as a refused connection.
    pub(crate) fn failing(message: impl Into<String>) -> Self {
        Self::failing_with(FailureKind::Connect, message)
    }

    pub(crate) fn failing_with(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::with_reply(Reply::Failure(kind, message.into()))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeTransportState {
                requests: Vec::new(),
                reply,
            })),
        }
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }

    /// Method, URL path+query relative to the fake base, and decoded JSON body.
    pub(crate) fn last_call(&self) -> (HttpMethod, String, Option<Value>) {
        let request = self.last_request();
        let url = url::Url::parse(&request.url).unwrap();
        let mut target = url.path().to_owned();
        if let Some(query) = url.query() {
            target.push('?');
            target.push_str(query);
        }
        let body = match request.body {
            Some(RequestBody::Bytes(bytes)) => Some(serde_json::from_slice(&bytes).unwrap()),
            Some(RequestBody::Multipart(_)) => panic!("unexpected multipart body"),
            None => None,
        };
        (request.method, target, body)
    }
}

impl HttpTransport for FakeTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            let reply = {
                let mut state = self.state.lock().unwrap();
                state.requests.push(request);
                state.reply.clone()
            };
            match reply {
                Reply::Response { status, body } => Ok(HttpResponse {
                    status,
                    headers: ResponseHeaders::new(),
                    body: body.into_bytes(),
                }),
                Reply::Failure(kind, message) => Err(TransportError::Request { kind, message }),
            }
        })
    }
}
