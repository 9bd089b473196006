use crate::client::{ApiResult, EvolutionClient};
use crate::domain::{
    CreateInstanceBody, CreateInstanceOptions, InstanceId, Payload, ValidationError,
};
use crate::service::InstanceScope;
use crate::transport::TransportError;

const RESOURCE: &str = "instance";

/// Instance lifecycle: create, connect, restart, presence, state, logout, delete.
#[derive(Debug, Clone)]
pub struct InstanceService {
    scope: InstanceScope,
}

impl InstanceService {
    pub fn new(api: EvolutionClient, instance: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            scope: InstanceScope::new(api, instance)?,
        })
    }

    pub fn instance(&self) -> &InstanceId {
        &self.scope.instance
    }

    /// Switch to another instance; the current one is kept if `instance` is empty.
    pub fn set_instance(
        &mut self,
        instance: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.scope.set_instance(instance)?;
        Ok(self)
    }

    /// `POST /instance/create`. Does not use the bound instance.
    pub async fn create_instance(
        &self,
        instance_name: &str,
        options: CreateInstanceOptions,
    ) -> ApiResult {
        let payload = Payload::from_body(&CreateInstanceBody::new(instance_name, &options))
            .map_err(TransportError::Encode)?
            .with_options(options.extra);
        self.scope.api.post("/instance/create", payload).await
    }

    /// `GET /instance/fetchInstances`. Does not use the bound instance.
    pub async fn fetch_instances(&self) -> ApiResult {
        self.scope.api.get("/instance/fetchInstances", &[]).await
    }

    pub async fn connect_instance(&self) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "connect");
        self.scope.api.get(&endpoint, &[]).await
    }

    pub async fn restart_instance(&self) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "restart");
        self.scope.api.post(&endpoint, Payload::new()).await
    }

    /// `presence` is forwarded as-is (`available`, `unavailable`, ...).
    pub async fn set_presence(&self, presence: &str) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "setPresence");
        let payload = Payload::new().field("presence", presence);
        self.scope.api.post(&endpoint, payload).await
    }

    /// Connection state. A non-2xx answer is returned as data, and `[null]`
    /// means the server could not be reached.
    pub async fn connection_state(&self) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "connectionState");
        self.scope.api.status(&endpoint).await
    }

    pub async fn logout_instance(&self) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "logout");
        self.scope.api.delete(&endpoint, Payload::new()).await
    }

    pub async fn delete_instance(&self) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "delete");
        self.scope.api.delete(&endpoint, Payload::new()).await
    }
}
