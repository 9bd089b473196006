use serde_json::{Map, Value};
use url::Url;

use crate::transport::http::{HttpMethod, HttpRequest, RequestBody, TransportError};

/// How non-empty request payloads are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    Json,
    FormUrlEncoded,
    /// Fields are handed to the HTTP client, which writes the boundary.
    Multipart,
}

impl ContentType {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::Multipart => "multipart/form-data",
        }
    }
}

/// Headers sent with every request before caller overrides are applied.
pub fn default_headers(content_type: ContentType) -> Vec<(String, String)> {
    vec![
        ("Content-Type".to_owned(), content_type.mime().to_owned()),
        ("Accept".to_owned(), "application/json".to_owned()),
    ]
}

/// Assemble a request: GET data goes into the query string, other methods
/// carry it as a body encoded per `content_type`.
pub fn build_request(
    method: HttpMethod,
    url: &str,
    data: &Map<String, Value>,
    headers: Vec<(String, String)>,
    content_type: ContentType,
) -> Result<HttpRequest, TransportError> {
    let url = if !method.sends_body() && !data.is_empty() {
        merge_query(url, &flatten_pairs(data))?
    } else {
        parse_url(url)?.into()
    };

    let body = if method.sends_body() {
        encode_body(data, content_type)?
    } else {
        None
    };

    let headers = if matches!(body, Some(RequestBody::Multipart(_))) {
        headers
            .into_iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("content-type"))
            .collect()
    } else {
        headers
    };

    Ok(HttpRequest {
        method,
        url,
        headers,
        body,
    })
}

/// Union of two header lists; `overrides` win on a case-insensitive name match.
pub fn merge_headers(
    defaults: &[(String, String)],
    overrides: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged = defaults.to_vec();
    for (name, value) in overrides {
        match merged
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value.clone(),
            None => merged.push((name.clone(), value.clone())),
        }
    }
    merged
}

/// Merge `params` into the URL's existing query. A supplied key replaces the
/// first existing value in place and drops any later duplicates.
pub fn merge_query(url: &str, params: &[(String, String)]) -> Result<String, TransportError> {
    let mut parsed = parse_url(url)?;
    let mut pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();

    for (key, value) in params {
        let mut replaced = false;
        pairs.retain_mut(|(existing, slot)| {
            if existing != key {
                return true;
            }
            if replaced {
                return false;
            }
            *slot = value.clone();
            replaced = true;
            true
        });
        if !replaced {
            pairs.push((key.clone(), value.clone()));
        }
    }

    if pairs.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(&pairs);
    }
    Ok(parsed.into())
}

pub fn encode_body(
    data: &Map<String, Value>,
    content_type: ContentType,
) -> Result<Option<RequestBody>, TransportError> {
    if data.is_empty() {
        return Ok(None);
    }

    let body = match content_type {
        ContentType::Json => RequestBody::Bytes(serde_json::to_vec(data)?),
        ContentType::FormUrlEncoded => {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(flatten_pairs(data))
                .finish();
            RequestBody::Bytes(encoded.into_bytes())
        }
        ContentType::Multipart => RequestBody::Multipart(flatten_pairs(data)),
    };
    Ok(Some(body))
}

/// Flatten a JSON object into form pairs: nested values become `key[index]` /
/// `key[name]`, booleans become `1`/`0`, nulls are skipped.
pub fn flatten_pairs(data: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in data {
        flatten_value(key.clone(), value, &mut pairs);
    }
    pairs
}

fn flatten_value(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => pairs.push((key, if *flag { "1" } else { "0" }.to_owned())),
        Value::Number(number) => pairs.push((key, number.to_string())),
        Value::String(text) => pairs.push((key, text.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_value(format!("{key}[{index}]"), item, pairs);
            }
        }
        Value::Object(fields) => {
            for (name, item) in fields {
                flatten_value(format!("{key}[{name}]"), item, pairs);
            }
        }
    }
}

fn parse_url(url: &str) -> Result<Url, TransportError> {
    Url::parse(url).map_err(|source| TransportError::InvalidUrl {
        url: url.to_owned(),
        source,
    })
}
