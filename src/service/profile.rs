use crate::client::{ApiResult, EvolutionClient};
use crate::domain::{InstanceId, ValidationError};
use crate::service::InstanceScope;

/// Profile of the account behind one instance.
#[derive(Debug, Clone)]
pub struct ProfileService {
    scope: InstanceScope,
}

impl ProfileService {
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

    pub async fn fetch_profile(&self) -> ApiResult {
        let endpoint = self.scope.path("chat", "fetchProfile");
        self.scope.api.get(&endpoint, &[]).await
    }
}
