use std::fmt;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Name of a remote messaging session (an Evolution "instance").
///
/// Invariant: non-empty, and no `/`-separated segment is `.` or `..` (URL
/// parsers collapse those, so the request would address another path).
/// Otherwise the value is kept exactly as provided.
pub struct InstanceId(String);

impl InstanceId {
    /// Field name used in validation errors (`instance`).
    pub const FIELD: &'static str = "instance";

    /// Create a validated [`InstanceId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if value.split('/').any(|segment| matches!(segment, "." | "..")) {
            return Err(ValidationError::DotSegment { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the instance name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InstanceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Global or per-instance Evolution API key (`apikey` header).
///
/// Invariant: non-empty after trimming. `Debug` output is redacted.
pub struct ApiKey(String);

impl ApiKey {
    /// Header and query parameter name used by Evolution (`apikey`).
    pub const FIELD: &'static str = "apikey";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Root URL of an Evolution API server, e.g. `https://evo.example.com`.
///
/// Invariant: parses as an absolute `http`/`https` URL. Trailing slashes are
/// removed so endpoint paths (which start with `/`) can be appended directly.
pub struct BaseUrl(String);

impl BaseUrl {
    /// Field name used in validation errors (`base_url`).
    pub const FIELD: &'static str = "base_url";

    /// Create a validated [`BaseUrl`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = url::Url::parse(trimmed).map_err(|_| ValidationError::InvalidUrl {
            input: trimmed.to_owned(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(ValidationError::InvalidUrl {
                input: trimmed.to_owned(),
            });
        }

        Ok(Self(trimmed.trim_end_matches('/').to_owned()))
    }

    /// Borrow the normalized URL (no trailing slash).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join an endpoint path (e.g. `/instance/fetchInstances`) onto this base.
    pub fn join(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.0)
        } else {
            format!("{}/{endpoint}", self.0)
        }
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
