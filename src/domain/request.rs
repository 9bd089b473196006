use serde::Serialize;
use serde_json::{Map, Value};

/// Caller-supplied optional body fields (`delay`, `quoted`, `mentioned`, ...).
pub type Options = Map<String, Value>;

/// Ordered JSON request body assembled for one call.
///
/// Fields added with [`Payload::field`] are the endpoint's required fields;
/// [`Payload::with_options`] never overwrites them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Payload from a typed body; fails unless `body` serializes to an object.
    pub fn from_body<T: Serialize>(body: &T) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(body)?).map(Self)
    }

    /// Set a required field, replacing any previous value under `key`.
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    /// Merge optional fields. Keys already present keep their value.
    pub fn with_options(mut self, options: Options) -> Self {
        for (key, value) in options {
            self.0.entry(key).or_insert(value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

impl From<Payload> for Value {
    fn from(value: Payload) -> Self {
        Value::Object(value.0)
    }
}

/// Options for `POST /instance/create`.
#[derive(Debug, Clone)]
pub struct CreateInstanceOptions {
    /// Ask the server to generate a pairing QR code. Defaults to `true`.
    pub qrcode: bool,
    /// Integration name (e.g. `WHATSAPP-BAILEYS`). `None` is sent as `false`.
    pub integration: Option<String>,
    /// Extra fields forwarded as-is (`token`, `number`, `webhook`, ...).
    pub extra: Options,
}

impl Default for CreateInstanceOptions {
    fn default() -> Self {
        Self {
            qrcode: true,
            integration: None,
            extra: Options::new(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateInstanceBody<'a> {
    instance_name: &'a str,
    integration: Value,
    qrcode: bool,
}

impl<'a> CreateInstanceBody<'a> {
    pub(crate) fn new(instance_name: &'a str, options: &CreateInstanceOptions) -> Self {
        let integration = match options.integration.as_deref() {
            Some(name) => Value::String(name.to_owned()),
            None => Value::Bool(false),
        };
        Self {
            instance_name,
            integration,
            qrcode: options.qrcode,
        }
    }
}

/// String-typed boolean flag as the remote API expects in query strings.
pub fn query_flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Collect phone numbers / JIDs into a JSON array of strings.
pub fn string_list<I, S>(items: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::Array(
        items
            .into_iter()
            .map(|item| Value::String(item.into()))
            .collect(),
    )
}
