//! Thin async Rust client for the Evolution messaging API.
//!
//! The crate has a domain layer of validated values and payload helpers, a
//! transport layer for HTTP and wire-format details, a client façade that
//! injects the API key and decodes responses, and one service per remote
//! resource family (instances, groups, messages, settings, webhooks, profile).
//!
//! ```rust,no_run
//! use evolution_api::{Credentials, EvolutionClient, Options};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), evolution_api::EvolutionError> {
//!     let client = EvolutionClient::new(Credentials::new("https://evo.example.com", "...")?)?;
//!     let messages = client.messages("my-instance")?;
//!     match messages.send_text("5511999999999", "hello", Options::new()).await {
//!         Ok(sent) => println!("{sent}"),
//!         Err(err) => eprintln!("{}", err.to_json()),
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod service;
pub mod transport;

pub use client::{
    ApiKeyPlacement, ApiResult, Credentials, EvolutionClient, EvolutionClientBuilder,
    EvolutionError,
};
pub use domain::{
    ApiKey, BaseUrl, CreateInstanceOptions, InstanceId, Options, Payload, ValidationError,
};
pub use service::{
    GroupService, InstanceService, MessageService, ProfileService, SettingsService,
    WebhookService,
};
pub use transport::{ContentType, HttpTransport, TransportError};
