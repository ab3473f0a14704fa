use std::path::PathBuf;

use async_trait::async_trait;

use crate::{
    domain::{ChannelService, Integration},
    messaging::types::{
        ChatActionMessage, IncomingMedia, IncomingMessage, MediaMessage, TextMessage,
    },
    Result,
};

/// Cross-channel messaging port.
///
/// Telegram is the first implementation; the shape is designed so future
/// adapters (WhatsApp/Viber/etc) fit behind the same interface, keyed by
/// [`ChannelService`] in the registry. Implementations are state-free: every
/// call is parameterized by the integration credential, so no locking is
/// needed across concurrent calls.
#[async_trait]
pub trait MessagingChannel: Send + Sync {
    fn service(&self) -> ChannelService;

    /// Send a text message. Returns the channel's own response payload,
    /// opaque to the core (empty object if the channel returns nothing).
    async fn send_text(
        &self,
        integration: &Integration,
        message: &TextMessage,
    ) -> Result<serde_json::Value>;

    /// Send a photo or video. Any other media kind fails with
    /// `Error::UnsupportedMediaKind`; inbound recognizes more kinds than
    /// outbound delivery implements.
    async fn send_media(
        &self,
        integration: &Integration,
        message: &MediaMessage,
    ) -> Result<serde_json::Value>;

    async fn send_chat_action(
        &self,
        integration: &Integration,
        message: &ChatActionMessage,
    ) -> Result<bool>;

    /// Parse a raw webhook body into the normalized envelope.
    ///
    /// Fail-soft: malformed bodies and updates that carry neither a new nor
    /// an edited message yield `None`, never an error. The caller maps that
    /// to its own "nothing to do" branch.
    fn handle_webhook(&self, integration: &Integration, body: &[u8]) -> Option<IncomingMessage>;

    /// Register the integration's webhook URL with the channel. Anything but
    /// channel-confirmed success is `Error::WebhookRegistration`.
    async fn setup_webhook(&self, integration: &Integration) -> Result<()>;

    /// Liveness probe against the channel API. Transport and protocol
    /// failures reduce to `false`; this never errors.
    async fn validate_integration(&self, integration: &Integration) -> bool;
}

/// Per-channel media extraction from a raw inbound message payload.
pub trait MediaExtractor: Send + Sync {
    fn service(&self) -> ChannelService;

    /// Extract a normalized media descriptor from the channel-native message
    /// JSON. `None` means the message carries no recognized media kind.
    fn extract(&self, raw_message: &serde_json::Value) -> Option<IncomingMedia>;
}

/// Per-channel media download into transient local storage.
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    fn service(&self) -> ChannelService;

    /// Fetch the bytes behind `media.file_id` into a freshly allocated
    /// temporary file and return its path.
    ///
    /// The caller owns cleanup of the returned path, after storing the file
    /// durably or after giving up on it.
    async fn download(&self, integration: &Integration, media: &IncomingMedia) -> Result<PathBuf>;
}
