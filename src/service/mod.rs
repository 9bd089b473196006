//! Service layer: one type per remote resource family, bound to an instance.
//!
//! Services hold a cloned [`EvolutionClient`] plus the instance name that is
//! interpolated into every path. Results are returned exactly as the façade
//! produced them.

mod group;
mod instance;
mod message;
mod profile;
mod settings;
mod webhook;

pub use group::GroupService;
pub use instance::InstanceService;
pub use message::MessageService;
pub use profile::ProfileService;
pub use settings::SettingsService;
pub use webhook::WebhookService;

use crate::client::EvolutionClient;
use crate::domain::{InstanceId, ValidationError};

#[derive(Debug, Clone)]
struct InstanceScope {
    api: EvolutionClient,
    instance: InstanceId,
}

impl InstanceScope {
    fn new(api: EvolutionClient, instance: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            api,
            instance: InstanceId::new(instance)?,
        })
    }

    /// Leaves the current instance untouched when validation fails.
    fn set_instance(&mut self, instance: impl Into<String>) -> Result<(), ValidationError> {
        self.instance = InstanceId::new(instance)?;
        Ok(())
    }

    /// `/{resource}/{action}/{instance}`. Each `/`-separated part of the
    /// instance is percent-encoded; the separators themselves are kept.
    fn path(&self, resource: &str, action: &str) -> String {
        let instance = self
            .instance
            .as_str()
            .split('/')
            .map(urlencoding::encode)
            .collect::<Vec<_>>()
            .join("/");
        format!("/{resource}/{action}/{instance}")
    }
}

impl EvolutionClient {
    pub fn instances(
        &self,
        instance: impl Into<String>,
    ) -> Result<InstanceService, ValidationError> {
        InstanceService::new(self.clone(), instance)
    }

    pub fn groups(&self, instance: impl Into<String>) -> Result<GroupService, ValidationError> {
        GroupService::new(self.clone(), instance)
    }

    pub fn messages(&self, instance: impl Into<String>) -> Result<MessageService, ValidationError> {
        MessageService::new(self.clone(), instance)
    }

    pub fn settings(
        &self,
        instance: impl Into<String>,
    ) -> Result<SettingsService, ValidationError> {
        SettingsService::new(self.clone(), instance)
    }

    pub fn webhooks(&self, instance: impl Into<String>) -> Result<WebhookService, ValidationError> {
        WebhookService::new(self.clone(), instance)
    }

    pub fn profile(&self, instance: impl Into<String>) -> Result<ProfileService, ValidationError> {
        ProfileService::new(self.clone(), instance)
    }
}
