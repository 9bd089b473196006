//! Domain layer: validated value types and request payload helpers (no I/O).

mod request;
mod validation;
mod value;

pub(crate) use request::CreateInstanceBody;
pub use request::{CreateInstanceOptions, Options, Payload, query_flag, string_list};
pub use validation::ValidationError;
pub use value::{ApiKey, BaseUrl, InstanceId};
