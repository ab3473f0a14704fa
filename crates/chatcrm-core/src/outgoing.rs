//! Channel-agnostic outbound delivery façade.
//!
//! The application dispatches persisted messages through this port. The live
//! implementation talks to the channel adapters; the mock simulates success
//! for local/test deployments. Which one runs is decided once, at
//! composition time, keyed by the deployment environment. The send path
//! itself carries no environment checks.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    config::AppEnv,
    domain::Integration,
    messaging::{
        port::MessagingChannel,
        registry::ChannelRegistry,
        types::{ChatActionMessage, MediaMessage, OutboundFile, TextMessage, TextParseMode},
    },
    model::StoredMessage,
    storage::MediaStorage,
    Error, Result,
};

/// Per-send options supplied by the caller alongside the persisted message.
#[derive(Clone, Debug, Default)]
pub struct SendOptions {
    pub parse_mode: Option<TextParseMode>,
    pub reply_to_message_id: Option<String>,
    pub disable_notification: bool,
}

/// What the channel acknowledged for a dispatched message.
#[derive(Clone, Debug)]
pub struct SendReceipt {
    pub message_id: Option<String>,
}

#[async_trait]
pub trait OutgoingMessenger: Send + Sync {
    /// Dispatch a persisted message to its integration's channel.
    async fn send(
        &self,
        message: &StoredMessage,
        integration: &Integration,
        options: &SendOptions,
    ) -> Result<SendReceipt>;

    /// Show a typing indicator in the chat.
    async fn send_typing(&self, integration: &Integration, chat_id: &str) -> Result<()>;
}

/// Live delivery through the channel registry.
pub struct LiveOutgoingMessenger {
    registry: Arc<ChannelRegistry>,
    storage: Arc<dyn MediaStorage>,
}

impl LiveOutgoingMessenger {
    pub fn new(registry: Arc<ChannelRegistry>, storage: Arc<dyn MediaStorage>) -> Self {
        Self { registry, storage }
    }
}

fn message_id_from(response: &serde_json::Value) -> Option<String> {
    match response.get("message_id") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(v) => v.as_i64().map(|id| id.to_string()),
        None => None,
    }
}

#[async_trait]
impl OutgoingMessenger for LiveOutgoingMessenger {
    async fn send(
        &self,
        message: &StoredMessage,
        integration: &Integration,
        options: &SendOptions,
    ) -> Result<SendReceipt> {
        let channel = self.registry.channel(integration.service)?;

        let stored_media = message
            .media
            .as_ref()
            .and_then(|m| m.path.as_deref().map(|path| (m, path)));

        let response = match stored_media {
            Some((media, path)) => {
                let url = self.storage.public_url(path).ok_or_else(|| {
                    Error::Config(format!("no public url for stored media {path}"))
                })?;
                let dto = MediaMessage {
                    service: integration.service,
                    chat_id: message.external_chat_id.clone(),
                    kind: media.kind,
                    file: OutboundFile::Url(url),
                    caption: message.text.clone(),
                    parse_mode: options.parse_mode,
                    reply_to_message_id: options.reply_to_message_id.clone(),
                    disable_notification: options.disable_notification,
                };
                channel.send_media(integration, &dto).await?
            }
            None => {
                let text = message.text.clone().ok_or_else(|| {
                    Error::Config(format!(
                        "message {} has neither text nor stored media",
                        message.id
                    ))
                })?;
                let dto = TextMessage {
                    service: integration.service,
                    chat_id: message.external_chat_id.clone(),
                    text,
                    parse_mode: options.parse_mode,
                    reply_to_message_id: options.reply_to_message_id.clone(),
                    disable_web_page_preview: false,
                    disable_notification: options.disable_notification,
                };
                channel.send_text(integration, &dto).await?
            }
        };

        Ok(SendReceipt {
            message_id: message_id_from(&response),
        })
    }

    async fn send_typing(&self, integration: &Integration, chat_id: &str) -> Result<()> {
        let channel = self.registry.channel(integration.service)?;
        channel
            .send_chat_action(
                integration,
                &ChatActionMessage::typing(integration.service, chat_id),
            )
            .await?;
        Ok(())
    }
}

/// No-I/O delivery for local and test deployments: every send succeeds with
/// a synthesized receipt that is obvious in logs.
pub struct MockOutgoingMessenger;

#[async_trait]
impl OutgoingMessenger for MockOutgoingMessenger {
    async fn send(
        &self,
        message: &StoredMessage,
        integration: &Integration,
        _options: &SendOptions,
    ) -> Result<SendReceipt> {
        tracing::info!(
            message_id = message.id,
            integration = %integration.id,
            "mock outgoing send"
        );
        Ok(SendReceipt {
            message_id: Some(format!("mock-{}", Uuid::new_v4())),
        })
    }

    async fn send_typing(&self, _integration: &Integration, _chat_id: &str) -> Result<()> {
        Ok(())
    }
}

/// Composition-time strategy selection: live delivery in production-like
/// environments, simulated delivery everywhere else.
pub fn outgoing_for_env(
    env: AppEnv,
    registry: Arc<ChannelRegistry>,
    storage: Arc<dyn MediaStorage>,
) -> Arc<dyn OutgoingMessenger> {
    match env {
        AppEnv::Production | AppEnv::Staging => {
            Arc::new(LiveOutgoingMessenger::new(registry, storage))
        }
        AppEnv::Local | AppEnv::Testing => Arc::new(MockOutgoingMessenger),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use super::*;
    use crate::domain::{ChannelService, IntegrationId};
    use crate::media::kind::MediaKind;
    use crate::messaging::types::IncomingKind;
    use crate::model::StoredMedia;
    use crate::storage::LocalDiskStorage;

    #[derive(Debug, PartialEq)]
    enum Dispatched {
        Text(String),
        Media(MediaKind, String),
    }

    struct StubChannel {
        calls: Mutex<Vec<Dispatched>>,
    }

    impl StubChannel {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MessagingChannel for StubChannel {
        fn service(&self) -> ChannelService {
            ChannelService::Telegram
        }

        async fn send_text(
            &self,
            _integration: &Integration,
            message: &TextMessage,
        ) -> Result<serde_json::Value> {
            self.calls
                .lock()
                .unwrap()
                .push(Dispatched::Text(message.text.clone()));
            Ok(serde_json::json!({"message_id": 123}))
        }

        async fn send_media(
            &self,
            _integration: &Integration,
            message: &MediaMessage,
        ) -> Result<serde_json::Value> {
            let OutboundFile::Url(url) = &message.file else {
                panic!("live messenger should send stored media by url");
            };
            self.calls
                .lock()
                .unwrap()
                .push(Dispatched::Media(message.kind, url.clone()));
            Ok(serde_json::json!({"message_id": "123"}))
        }

        async fn send_chat_action(
            &self,
            _integration: &Integration,
            _message: &ChatActionMessage,
        ) -> Result<bool> {
            Ok(true)
        }

        fn handle_webhook(
            &self,
            _integration: &Integration,
            _body: &[u8],
        ) -> Option<crate::messaging::types::IncomingMessage> {
            None
        }

        async fn setup_webhook(&self, _integration: &Integration) -> Result<()> {
            Ok(())
        }

        async fn validate_integration(&self, _integration: &Integration) -> bool {
            true
        }
    }

    fn integration() -> Integration {
        Integration {
            id: IntegrationId(1),
            service: ChannelService::Telegram,
            token: "token".to_string(),
            webhook_url: None,
        }
    }

    fn live_with_stub() -> (LiveOutgoingMessenger, Arc<StubChannel>) {
        let stub = Arc::new(StubChannel::new());
        let mut registry = ChannelRegistry::new();
        registry.register_channel(stub.clone());
        let storage: Arc<dyn MediaStorage> = Arc::new(LocalDiskStorage::new(
            PathBuf::from("/srv/media"),
            Some("https://cdn.example.com".to_string()),
        ));
        (
            LiveOutgoingMessenger::new(Arc::new(registry), storage),
            stub,
        )
    }

    #[tokio::test]
    async fn live_send_prefers_stored_media_over_text() {
        let (messenger, stub) = live_with_stub();
        let message = StoredMessage {
            id: 10,
            external_chat_id: "42".to_string(),
            kind: IncomingKind::Media,
            text: Some("caption".to_string()),
            media: Some(StoredMedia {
                kind: MediaKind::Photo,
                path: Some("chats/42/abc.jpg".to_string()),
                mime_type: Some("image/jpeg".to_string()),
                file_name: None,
            }),
        };

        let receipt = messenger
            .send(&message, &integration(), &SendOptions::default())
            .await
            .unwrap();

        assert_eq!(receipt.message_id.as_deref(), Some("123"));
        assert_eq!(
            *stub.calls.lock().unwrap(),
            vec![Dispatched::Media(
                MediaKind::Photo,
                "https://cdn.example.com/chats/42/abc.jpg".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn live_send_falls_back_to_text_without_a_stored_path() {
        let (messenger, stub) = live_with_stub();
        let message = StoredMessage {
            id: 11,
            external_chat_id: "42".to_string(),
            kind: IncomingKind::Text,
            text: Some("hello".to_string()),
            media: None,
        };

        let receipt = messenger
            .send(&message, &integration(), &SendOptions::default())
            .await
            .unwrap();

        assert_eq!(receipt.message_id.as_deref(), Some("123"));
        assert_eq!(
            *stub.calls.lock().unwrap(),
            vec![Dispatched::Text("hello".to_string())]
        );
    }

    #[tokio::test]
    async fn live_send_with_nothing_to_deliver_is_a_config_error() {
        let (messenger, _stub) = live_with_stub();
        let message = StoredMessage {
            id: 12,
            external_chat_id: "42".to_string(),
            kind: IncomingKind::Text,
            text: None,
            media: None,
        };

        let err = messenger
            .send(&message, &integration(), &SendOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn mock_send_synthesizes_a_receipt_without_any_wiring() {
        // An empty registry would fail the live path; the mock never touches it.
        let messenger = outgoing_for_env(
            AppEnv::Local,
            Arc::new(ChannelRegistry::new()),
            Arc::new(LocalDiskStorage::new(PathBuf::from("/tmp"), None)),
        );
        let message = StoredMessage {
            id: 13,
            external_chat_id: "42".to_string(),
            kind: IncomingKind::Text,
            text: Some("hi".to_string()),
            media: None,
        };

        let receipt = messenger
            .send(&message, &integration(), &SendOptions::default())
            .await
            .unwrap();
        assert!(receipt.message_id.unwrap().starts_with("mock-"));
        messenger
            .send_typing(&integration(), "42")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn production_env_selects_live_delivery() {
        let messenger = outgoing_for_env(
            AppEnv::Production,
            Arc::new(ChannelRegistry::new()),
            Arc::new(LocalDiskStorage::new(PathBuf::from("/tmp"), None)),
        );
        let message = StoredMessage {
            id: 14,
            external_chat_id: "42".to_string(),
            kind: IncomingKind::Text,
            text: Some("hi".to_string()),
            media: None,
        };

        // Live delivery hits the (empty) registry and fails, proving the
        // factory picked the real implementation.
        let err = messenger
            .send(&message, &integration(), &SendOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
