//! Telegram adapter (teloxide).
//!
//! Implements the `chatcrm-core` channel ports over the Telegram Bot API.
//! All knowledge of Telegram's update/request shapes stays inside this
//! crate; the rest of the system only sees the normalized DTOs.

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{InputFile, MessageId, Update, UpdateKind},
};

pub mod download;
pub mod extract;

pub use download::TelegramMediaDownloader;
pub use extract::TelegramMediaExtractor;

use chatcrm_core::{
    domain::{ChannelService, Integration},
    media::MediaKind,
    messaging::{
        port::MessagingChannel,
        types::{
            ChatAction, ChatActionMessage, IncomingKind, IncomingMessage, MediaMessage,
            MessageSource, OutboundFile, TextMessage, TextParseMode,
        },
    },
    Error, Result,
};

/// Telegram implementation of the messaging port.
///
/// State-free: one `Bot` is constructed per call from the integration's
/// token, over a shared HTTP client with an explicit timeout so no channel
/// call can hang indefinitely.
#[derive(Clone)]
pub struct TelegramChannel {
    http: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(timeout: std::time::Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build");
        Self { http }
    }

    fn bot(&self, integration: &Integration) -> Bot {
        Bot::with_client(integration.token.clone(), self.http.clone())
    }

    fn tg_chat(chat_id: &str) -> Result<teloxide::types::ChatId> {
        let id: i64 = chat_id
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("invalid telegram chat id: {chat_id}")))?;
        Ok(teloxide::types::ChatId(id))
    }

    fn tg_reply_to(message_id: &str) -> Result<MessageId> {
        let id: i32 = message_id
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("invalid telegram message id: {message_id}")))?;
        Ok(MessageId(id))
    }

    fn tg_parse_mode(mode: TextParseMode) -> teloxide::types::ParseMode {
        match mode {
            TextParseMode::Html => teloxide::types::ParseMode::Html,
            TextParseMode::Markdown => teloxide::types::ParseMode::Markdown,
        }
    }

    fn input_file(file: &OutboundFile) -> Result<InputFile> {
        match file {
            OutboundFile::Url(url) => {
                let url = reqwest::Url::parse(url)
                    .map_err(|e| Error::Config(format!("invalid media url {url}: {e}")))?;
                Ok(InputFile::url(url))
            }
            OutboundFile::Path(path) => Ok(InputFile::file(path.clone())),
        }
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }
}

#[async_trait]
impl MessagingChannel for TelegramChannel {
    fn service(&self) -> ChannelService {
        ChannelService::Telegram
    }

    async fn send_text(
        &self,
        integration: &Integration,
        message: &TextMessage,
    ) -> Result<serde_json::Value> {
        let bot = self.bot(integration);
        let chat = Self::tg_chat(&message.chat_id)?;

        let mut req = bot.send_message(chat, message.text.clone());
        if let Some(mode) = message.parse_mode {
            req = req.parse_mode(Self::tg_parse_mode(mode));
        }
        if let Some(reply_to) = &message.reply_to_message_id {
            req = req.reply_to_message_id(Self::tg_reply_to(reply_to)?);
        }
        if message.disable_web_page_preview {
            req = req.disable_web_page_preview(true);
        }
        if message.disable_notification {
            req = req.disable_notification(true);
        }

        let sent = req.await.map_err(Self::map_err)?;
        Ok(serde_json::to_value(&sent)?)
    }

    async fn send_media(
        &self,
        integration: &Integration,
        message: &MediaMessage,
    ) -> Result<serde_json::Value> {
        let bot = self.bot(integration);
        let chat = Self::tg_chat(&message.chat_id)?;

        // Outbound delivery implements photo and video only; everything else
        // fails loud before any network traffic.
        let sent = match message.kind {
            MediaKind::Photo => {
                let mut req = bot.send_photo(chat, Self::input_file(&message.file)?);
                if let Some(caption) = &message.caption {
                    req = req.caption(caption.clone());
                }
                if let Some(mode) = message.parse_mode {
                    req = req.parse_mode(Self::tg_parse_mode(mode));
                }
                if let Some(reply_to) = &message.reply_to_message_id {
                    req = req.reply_to_message_id(Self::tg_reply_to(reply_to)?);
                }
                if message.disable_notification {
                    req = req.disable_notification(true);
                }
                req.await.map_err(Self::map_err)?
            }
            MediaKind::Video => {
                let mut req = bot.send_video(chat, Self::input_file(&message.file)?);
                if let Some(caption) = &message.caption {
                    req = req.caption(caption.clone());
                }
                if let Some(mode) = message.parse_mode {
                    req = req.parse_mode(Self::tg_parse_mode(mode));
                }
                if let Some(reply_to) = &message.reply_to_message_id {
                    req = req.reply_to_message_id(Self::tg_reply_to(reply_to)?);
                }
                if message.disable_notification {
                    req = req.disable_notification(true);
                }
                req.await.map_err(Self::map_err)?
            }
            other => return Err(Error::UnsupportedMediaKind(other)),
        };

        Ok(serde_json::to_value(&sent)?)
    }

    async fn send_chat_action(
        &self,
        integration: &Integration,
        message: &ChatActionMessage,
    ) -> Result<bool> {
        let bot = self.bot(integration);
        let chat = Self::tg_chat(&message.chat_id)?;

        let action = match message.action {
            ChatAction::Typing => teloxide::types::ChatAction::Typing,
            ChatAction::UploadPhoto => teloxide::types::ChatAction::UploadPhoto,
            ChatAction::UploadDocument => teloxide::types::ChatAction::UploadDocument,
        };

        bot.send_chat_action(chat, action)
            .await
            .map_err(Self::map_err)?;
        Ok(true)
    }

    fn handle_webhook(&self, integration: &Integration, body: &[u8]) -> Option<IncomingMessage> {
        let raw: serde_json::Value = serde_json::from_slice(body).ok()?;
        let update: Update = serde_json::from_value(raw.clone()).ok()?;

        let message = match &update.kind {
            UpdateKind::Message(m) | UpdateKind::EditedMessage(m) => m,
            _ => {
                tracing::debug!(
                    integration = %integration.id,
                    "webhook update carries no message, skipping"
                );
                return None;
            }
        };

        let media = extract::extract_media(message);
        let text = message
            .text()
            .or_else(|| message.caption())
            .map(str::to_string);

        // Text wins the type classification whenever the update carries one;
        // updates with neither text nor recognized media (polls, locations,
        // service messages) are dropped.
        let kind = if message.text().is_some() {
            IncomingKind::Text
        } else if media.is_some() {
            IncomingKind::Media
        } else {
            tracing::debug!(
                integration = %integration.id,
                "webhook message has neither text nor media, skipping"
            );
            return None;
        };

        let source = if message.from().map(|u| u.is_bot).unwrap_or(false) {
            MessageSource::Bot
        } else {
            MessageSource::User
        };

        Some(IncomingMessage {
            service: ChannelService::Telegram,
            chat_id: message.chat.id.0.to_string(),
            message_id: message.id.0.to_string(),
            user_id: message.from().map(|u| u.id.0.to_string()),
            source,
            kind,
            text,
            media,
            sent_at: Some(chrono::Utc::now()),
            raw: Some(raw),
        })
    }

    async fn setup_webhook(&self, integration: &Integration) -> Result<()> {
        let url = integration.webhook_url.as_deref().ok_or_else(|| {
            Error::WebhookRegistration(format!(
                "integration {} has no webhook url configured",
                integration.id
            ))
        })?;
        let url = reqwest::Url::parse(url)
            .map_err(|e| Error::WebhookRegistration(format!("invalid webhook url {url}: {e}")))?;

        self.bot(integration)
            .set_webhook(url)
            .await
            .map_err(|e| Error::WebhookRegistration(format!("telegram rejected webhook: {e}")))?;

        tracing::info!(integration = %integration.id, "telegram webhook registered");
        Ok(())
    }

    async fn validate_integration(&self, integration: &Integration) -> bool {
        match self.bot(integration).get_me().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(
                    integration = %integration.id,
                    error = %e,
                    "telegram integration probe failed"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chatcrm_core::domain::IntegrationId;

    use super::*;

    fn channel() -> TelegramChannel {
        TelegramChannel::new(Duration::from_secs(5))
    }

    fn integration() -> Integration {
        Integration {
            id: IntegrationId(1),
            service: ChannelService::Telegram,
            token: "123456:TEST".to_string(),
            webhook_url: None,
        }
    }

    fn webhook(body: serde_json::Value) -> Option<IncomingMessage> {
        channel().handle_webhook(&integration(), body.to_string().as_bytes())
    }

    fn text_update(text: &str) -> serde_json::Value {
        serde_json::json!({
            "update_id": 1000,
            "message": {
                "message_id": 1365,
                "from": {"id": 521260234u64, "is_bot": false, "first_name": "Dave", "username": "dave"},
                "chat": {"id": 521260234i64, "first_name": "Dave", "username": "dave", "type": "private"},
                "date": 1712345678,
                "text": text
            }
        })
    }

    #[test]
    fn malformed_body_fails_soft() {
        let msg = channel().handle_webhook(&integration(), b"not json at all");
        assert!(msg.is_none());
    }

    #[test]
    fn update_without_a_message_fails_soft() {
        assert!(webhook(serde_json::json!({"update_id": 1})).is_none());
    }

    #[test]
    fn text_update_normalizes_to_a_text_message() {
        let msg = webhook(text_update("hello")).unwrap();
        assert_eq!(msg.service, ChannelService::Telegram);
        assert_eq!(msg.kind, IncomingKind::Text);
        assert_eq!(msg.text.as_deref(), Some("hello"));
        assert_eq!(msg.chat_id, "521260234");
        assert_eq!(msg.message_id, "1365");
        assert_eq!(msg.user_id.as_deref(), Some("521260234"));
        assert_eq!(msg.source, MessageSource::User);
        assert!(msg.media.is_none());
        assert!(msg.sent_at.is_some());
        assert!(msg.raw.is_some());
    }

    #[test]
    fn edited_message_updates_are_accepted() {
        let msg = webhook(serde_json::json!({
            "update_id": 1001,
            "edited_message": {
                "message_id": 1366,
                "from": {"id": 521260234u64, "is_bot": false, "first_name": "Dave"},
                "chat": {"id": 521260234i64, "first_name": "Dave", "type": "private"},
                "date": 1712345678,
                "edit_date": 1712345699,
                "text": "hello again"
            }
        }))
        .unwrap();
        assert_eq!(msg.text.as_deref(), Some("hello again"));
    }

    #[test]
    fn bot_senders_are_flagged_as_bot_source() {
        let mut update = text_update("beep");
        update["message"]["from"]["is_bot"] = serde_json::json!(true);
        let msg = webhook(update).unwrap();
        assert_eq!(msg.source, MessageSource::Bot);
    }

    #[test]
    fn caption_becomes_the_text_of_a_media_message() {
        let msg = webhook(serde_json::json!({
            "update_id": 1002,
            "message": {
                "message_id": 1367,
                "from": {"id": 521260234u64, "is_bot": false, "first_name": "Dave"},
                "chat": {"id": 521260234i64, "first_name": "Dave", "type": "private"},
                "date": 1712345678,
                "caption": "look at this",
                "photo": [
                    {"file_id": "small", "file_unique_id": "u1", "file_size": 1234, "width": 90, "height": 67},
                    {"file_id": "large", "file_unique_id": "u2", "file_size": 5678, "width": 800, "height": 600}
                ]
            }
        }))
        .unwrap();
        assert_eq!(msg.kind, IncomingKind::Media);
        assert_eq!(msg.text.as_deref(), Some("look at this"));
        assert_eq!(msg.media.as_ref().unwrap().file_id, "large");
    }

    #[tokio::test]
    async fn outbound_media_kinds_beyond_photo_and_video_are_rejected() {
        for kind in [
            MediaKind::Audio,
            MediaKind::Document,
            MediaKind::Voice,
            MediaKind::VideoNote,
            MediaKind::Sticker,
        ] {
            let dto = MediaMessage::new(
                ChannelService::Telegram,
                "42",
                kind,
                OutboundFile::Url("https://cdn.example.com/f.bin".to_string()),
            );
            let err = channel()
                .send_media(&integration(), &dto)
                .await
                .unwrap_err();
            assert!(
                matches!(err, Error::UnsupportedMediaKind(k) if k == kind),
                "kind {kind}"
            );
        }
    }

    #[tokio::test]
    async fn non_numeric_chat_ids_are_config_errors() {
        let dto = TextMessage::new(ChannelService::Telegram, "@not-numeric", "hi");
        let err = channel().send_text(&integration(), &dto).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn setup_webhook_requires_a_configured_url() {
        let err = channel()
            .setup_webhook(&integration())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::WebhookRegistration(_)));
    }
}
