use serde_json::Value;

use crate::client::{ApiResult, EvolutionClient};
use crate::domain::{InstanceId, Options, Payload, ValidationError, string_list};
use crate::service::InstanceScope;

const RESOURCE: &str = "message";

/// Message sending for one instance.
///
/// Every method takes `options` for optional fields such as `delay`,
/// `quoted`, `mentionsEveryOne` or `mentioned`. Options never replace the
/// method's own fields; a `number` key in `options` is ignored.
#[derive(Debug, Clone)]
pub struct MessageService {
    scope: InstanceScope,
}

impl MessageService {
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

    pub async fn send_text(&self, number: &str, text: &str, options: Options) -> ApiResult {
        let payload = Payload::new().field("number", number).field("text", text);
        self.send("sendText", payload, options).await
    }

    /// `mediatype` is `image`, `video` or `document`; `media` is a URL or base64.
    pub async fn send_media(
        &self,
        number: &str,
        media: &str,
        mediatype: &str,
        mimetype: &str,
        caption: &str,
        options: Options,
    ) -> ApiResult {
        let payload = Payload::new()
            .field("number", number)
            .field("media", media)
            .field("mediatype", mediatype)
            .field("mimetype", mimetype)
            .field("caption", caption);
        self.send("sendMedia", payload, options).await
    }

    /// Voice note (`/message/sendWhatsAppAudio`).
    pub async fn send_audio(&self, number: &str, audio: &str, options: Options) -> ApiResult {
        let payload = Payload::new().field("number", number).field("audio", audio);
        self.send("sendWhatsAppAudio", payload, options).await
    }

    pub async fn send_sticker(&self, number: &str, sticker: &str, options: Options) -> ApiResult {
        let payload = Payload::new()
            .field("number", number)
            .field("sticker", sticker);
        self.send("sendSticker", payload, options).await
    }

    pub async fn send_location(
        &self,
        number: &str,
        name: &str,
        address: &str,
        latitude: f64,
        longitude: f64,
        options: Options,
    ) -> ApiResult {
        let payload = Payload::new()
            .field("number", number)
            .field("name", name)
            .field("address", address)
            .field("latitude", latitude)
            .field("longitude", longitude);
        self.send("sendLocation", payload, options).await
    }

    /// `contacts` entries are forwarded as-is (`fullName`, `wuid`, `phoneNumber`, ...).
    pub async fn send_contact(
        &self,
        number: &str,
        contacts: Vec<Value>,
        options: Options,
    ) -> ApiResult {
        let payload = Payload::new()
            .field("number", number)
            .field("contact", Value::Array(contacts));
        self.send("sendContact", payload, options).await
    }

    pub async fn send_poll<I, S>(
        &self,
        number: &str,
        name: &str,
        selectable_count: u32,
        values: I,
        options: Options,
    ) -> ApiResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let payload = Payload::new()
            .field("number", number)
            .field("name", name)
            .field("selectableCount", selectable_count)
            .field("values", string_list(values));
        self.send("sendPoll", payload, options).await
    }

    pub async fn send_template(&self, number: &str, options: Options) -> ApiResult {
        let payload = Payload::new().field("number", number);
        self.send("sendTemplate", payload, options).await
    }

    pub async fn send_list(&self, number: &str, options: Options) -> ApiResult {
        let payload = Payload::new().field("number", number);
        self.send("sendList", payload, options).await
    }

    async fn send(&self, action: &str, payload: Payload, options: Options) -> ApiResult {
        let endpoint = self.scope.path(RESOURCE, action);
        self.scope
            .api
            .post(&endpoint, payload.with_options(options))
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::service::test_support::client_with;
    use crate::transport::HttpMethod;
    use crate::transport::testing::FakeTransport;

    use super::*;

    const NUMBER: &str = "5511999999999";

    fn service(transport: &FakeTransport) -> MessageService {
        MessageService::new(client_with(transport), "bot").unwrap()
    }

    fn options(value: Value) -> Options {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn send_text_merges_options_under_required_fields() {
        let transport = FakeTransport::new(201, r#"{"key":{"id":"M1"}}"#);
        let messages = service(&transport);

        let value = messages
            .send_text(NUMBER, "hi", options(json!({"delay": 10, "number": "000"})))
            .await
            .unwrap();
        assert_eq!(value, json!({"key": {"id": "M1"}}));

        let (method, target, body) = transport.last_call();
        assert_eq!(method, HttpMethod::Post);
        assert_eq!(target, "/message/sendText/bot");
        assert_eq!(body, Some(json!({"number": NUMBER, "text": "hi", "delay": 10})));
    }

    #[tokio::test]
    async fn send_media_body() {
        let transport = FakeTransport::new(201, "{}");
        service(&transport)
            .send_media(
                NUMBER,
                "https://cdn.invalid/a.png",
                "image",
                "image/png",
                "",
                Options::new(),
            )
            .await
            .unwrap();

        let (_, target, body) = transport.last_call();
        assert_eq!(target, "/message/sendMedia/bot");
        assert_eq!(
            body,
            Some(json!({
                "number": NUMBER,
                "media": "https://cdn.invalid/a.png",
                "mediatype": "image",
                "mimetype": "image/png",
                "caption": ""
            }))
        );
    }

    #[tokio::test]
    async fn audio_and_sticker_endpoints() {
        let transport = FakeTransport::new(201, "{}");
        let messages = service(&transport);

        messages
            .send_audio(NUMBER, "https://cdn.invalid/a.ogg", Options::new())
            .await
            .unwrap();
        let (_, target, body) = transport.last_call();
        assert_eq!(target, "/message/sendWhatsAppAudio/bot");
        assert_eq!(
            body,
            Some(json!({"number": NUMBER, "audio": "https://cdn.invalid/a.ogg"}))
        );

        messages
            .send_sticker(NUMBER, "https://cdn.invalid/s.webp", Options::new())
            .await
            .unwrap();
        let (_, target, body) = transport.last_call();
        assert_eq!(target, "/message/sendSticker/bot");
        assert_eq!(
            body,
            Some(json!({"number": NUMBER, "sticker": "https://cdn.invalid/s.webp"}))
        );
    }

    #[tokio::test]
    async fn send_location_body() {
        let transport = FakeTransport::new(201, "{}");
        service(&transport)
            .send_location(NUMBER, "Office", "Av. Paulista, 1000", -23.5, -46.625, Options::new())
            .await
            .unwrap();

        let (_, target, body) = transport.last_call();
        assert_eq!(target, "/message/sendLocation/bot");
        assert_eq!(
            body,
            Some(json!({
                "number": NUMBER,
                "name": "Office",
                "address": "Av. Paulista, 1000",
                "latitude": -23.5,
                "longitude": -46.625
            }))
        );
    }

    #[tokio::test]
    async fn send_contact_and_poll_bodies() {
        let transport = FakeTransport::new(201, "{}");
        let messages = service(&transport);

        let contact = json!({"fullName": "Ana", "wuid": "5511777777777", "phoneNumber": "+55 11 77777-7777"});
        messages
            .send_contact(NUMBER, vec![contact.clone()], Options::new())
            .await
            .unwrap();
        let (_, target, body) = transport.last_call();
        assert_eq!(target, "/message/sendContact/bot");
        assert_eq!(body, Some(json!({"number": NUMBER, "contact": [contact]})));

        messages
            .send_poll(
                NUMBER,
                "Lunch?",
                1,
                ["yes", "no"],
                options(json!({"mentionsEveryOne": true})),
            )
            .await
            .unwrap();
        let (_, target, body) = transport.last_call();
        assert_eq!(target, "/message/sendPoll/bot");
        assert_eq!(
            body,
            Some(json!({
                "number": NUMBER,
                "name": "Lunch?",
                "selectableCount": 1,
                "values": ["yes", "no"],
                "mentionsEveryOne": true
            }))
        );
    }

    #[tokio::test]
    async fn template_and_list_include_number() {
        let transport = FakeTransport::new(201, "{}");
        let messages = service(&transport);

        messages
            .send_template(NUMBER, options(json!({"name": "welcome", "language": "pt_BR"})))
            .await
            .unwrap();
        let (_, target, body) = transport.last_call();
        assert_eq!(target, "/message/sendTemplate/bot");
        assert_eq!(
            body,
            Some(json!({"number": NUMBER, "name": "welcome", "language": "pt_BR"}))
        );

        messages
            .send_list(NUMBER, options(json!({"title": "Menu", "sections": []})))
            .await
            .unwrap();
        let (_, target, body) = transport.last_call();
        assert_eq!(target, "/message/sendList/bot");
        assert_eq!(
            body,
            Some(json!({"number": NUMBER, "title": "Menu", "sections": []}))
        );
    }

    #[tokio::test]
    async fn transport_failure_is_returned_not_raised() {
        let transport = FakeTransport::failing("dns error");
        let err = service(&transport)
            .send_text(NUMBER, "hi", Options::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_json(),
            json!({"error": "HTTP request failed (connect): dns error"})
        );
    }
}
