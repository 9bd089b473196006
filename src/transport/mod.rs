//! Transport layer: HTTP request assembly, wire encoding, and execution.

mod decode;
mod encode;
mod http;
mod reqwest_transport;
#[cfg(test)]
pub(crate) mod testing;

pub use decode::{decode_json_body, wrap_scalar};
pub use encode::{
    ContentType, build_request, default_headers, encode_body, flatten_pairs, merge_headers,
    merge_query,
};
pub use http::{
    BoxFuture, FailureKind, HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody,
    ResponseHeaders, TransportError,
};
pub use reqwest_transport::{ReqwestTransport, TransportConfig};
