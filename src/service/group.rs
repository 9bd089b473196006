use serde_json::Value;

use crate::client::{ApiResult, EvolutionClient};
use crate::domain::{InstanceId, Payload, ValidationError, query_flag, string_list};
use crate::service::InstanceScope;

const RESOURCE: &str = "group";

/// Group management for one instance.
///
/// Some endpoints take `groupJid` in the path's query string and others in
/// the body or query map; each method follows what its endpoint expects.
#[derive(Debug, Clone)]
pub struct GroupService {
    scope: InstanceScope,
}

impl GroupService {
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

    /// Create a group. `description` is omitted from the body when `None`.
    pub async fn create_group<I, S>(
        &self,
        subject: &str,
        participants: I,
        description: Option<&str>,
    ) -> ApiResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut payload = Payload::new().field("subject", subject);
        if let Some(description) = description {
            payload = payload.field("description", description);
        }
        let payload = payload.field("participants", string_list(participants));
        self.scope
            .api
            .post(&self.scope.path(RESOURCE, "create"), payload)
            .await
    }

    pub async fn update_group_subject(&self, group_jid: &str, subject: &str) -> ApiResult {
        let endpoint = self.jid_path("updateGroupSubject", group_jid);
        let payload = Payload::new().field("subject", subject);
        self.scope.api.post(&endpoint, payload).await
    }

    pub async fn update_group_description(&self, group_jid: &str, description: &str) -> ApiResult {
        let endpoint = self.jid_path("updateGroupDescription", group_jid);
        let payload = Payload::new().field("description", description);
        self.scope.api.post(&endpoint, payload).await
    }

    /// `getParticipants` is sent as the string `"true"` / `"false"`.
    pub async fn fetch_all_groups(&self, get_participants: bool) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "fetchAllGroups");
        self.scope
            .api
            .get(&endpoint, &[("getParticipants", query_flag(get_participants))])
            .await
    }

    pub async fn find_participants(&self, group_jid: &str) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "participants");
        self.scope
            .api
            .get(&endpoint, &[("groupJid", group_jid)])
            .await
    }

    /// `action` is one of `add`, `remove`, `promote`, `demote`.
    pub async fn update_participants<I, S>(
        &self,
        group_jid: &str,
        action: &str,
        participants: I,
    ) -> ApiResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let endpoint = self.jid_path("updateParticipant", group_jid);
        let payload = Payload::new()
            .field("action", action)
            .field("participants", string_list(participants));
        self.scope.api.post(&endpoint, payload).await
    }

    pub async fn leave_group(&self, group_jid: &str) -> ApiResult {
        let endpoint = self.jid_path("leaveGroup", group_jid);
        self.scope.api.delete(&endpoint, Payload::new()).await
    }

    pub async fn fetch_invite_code(&self, group_jid: &str) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "inviteCode");
        self.scope
            .api
            .get(&endpoint, &[("groupJid", group_jid)])
            .await
    }

    pub async fn revoke_invite_code(&self, group_jid: &str) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "revokeInviteCode");
        let payload = Payload::new().field("groupJid", group_jid);
        self.scope.api.post(&endpoint, payload).await
    }

    pub async fn send_invite_url<I, S>(
        &self,
        group_jid: &str,
        description: &str,
        numbers: I,
    ) -> ApiResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let endpoint = self.scope.path(RESOURCE, "sendInviteUrl");
        let payload = Payload::new()
            .field("groupJid", group_jid)
            .field("description", description)
            .field("numbers", string_list(numbers));
        self.scope.api.post(&endpoint, payload).await
    }

    pub async fn find_group_by_invite_code(&self, invite_code: &str) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "findByInviteCode");
        self.scope
            .api
            .get(&endpoint, &[("inviteCode", invite_code)])
            .await
    }

    pub async fn find_group_by_jid(&self, group_jid: &str) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "findByJid");
        self.scope
            .api
            .get(&endpoint, &[("groupJid", group_jid)])
            .await
    }

    /// `settings` is forwarded as-is, e.g. `{"action": "announcement"}`.
    pub async fn update_group_setting(&self, group_jid: &str, settings: Value) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, "updateSetting");
        let payload = Payload::new()
            .field("groupJid", group_jid)
            .field("settings", settings);
        self.scope.api.post(&endpoint, payload).await
    }

    /// `image` is a URL or base64 data.
    pub async fn update_group_picture(&self, group_jid: &str, image: &str) -> ApiResult {
        let endpoint = self.jid_path("updateGroupPicture", group_jid);
        let payload = Payload::new().field("image", image);
        self.scope.api.post(&endpoint, payload).await
    }

    /// `/group/{action}/{instance}?groupJid={jid}`, with the JID appended verbatim.
    fn jid_path(&self, action: &str, group_jid: &str) -> String {
        format!("{}?groupJid={group_jid}", self.scope.path(RESOURCE, action))
    }
}
