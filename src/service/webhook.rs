use serde_json::Value;

use crate::client::{ApiResult, EvolutionClient};
use crate::domain::{InstanceId, Options, Payload, ValidationError};
use crate::service::InstanceScope;

const RESOURCE: &str = "webhook";

/// Webhook configuration for one instance.
#[derive(Debug, Clone)]
pub struct WebhookService {
    scope: InstanceScope,
}

impl WebhookService {
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

    /// Sent wrapped as `{"webhook": settings}` (`enabled`, `url`, `events`, ...).
    pub async fn set_webhook(&self, settings: Options) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "set");
        let payload = Payload::new().field("webhook", Value::Object(settings));
        self.scope.api.post(&endpoint, payload).await
    }

    pub async fn find_webhook(&self) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "find");
        self.scope.api.get(&endpoint, &[]).await
    }
}
