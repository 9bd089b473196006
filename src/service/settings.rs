use crate::client::{ApiResult, EvolutionClient};
use crate::domain::{InstanceId, Options, Payload, ValidationError};
use crate::service::InstanceScope;

const RESOURCE: &str = "settings";

/// Instance behaviour settings (`rejectCall`, `groupsIgnore`, `alwaysOnline`, ...).
#[derive(Debug, Clone)]
pub struct SettingsService {
    scope: InstanceScope,
}

impl SettingsService {
    pub fn new(api: EvolutionClient, instance: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            scope: InstanceScope::new(api, instance)?,
        })
    }

    pub fn instance(&self) -> &InstanceId {
        &self.scope.instance
    }

    pub fn set_instance(
        &mut self,
        instance: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.scope.set_instance(instance)?;
        Ok(self)
    }

    /// Post `settings` as the whole request body.
    pub async fn set_settings(&self, settings: Options) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "set");
        self.scope.api.post(&endpoint, Payload::from(settings)).await
    }

    pub async fn find_settings(&self) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "find");
        self.scope.api.get(&endpoint, &[]).await
    }
}
