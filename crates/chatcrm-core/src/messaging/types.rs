use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ChannelService;
use crate::media::kind::MediaKind;

/// Who authored an inbound message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSource {
    User,
    Bot,
    System,
}

/// Payload shape of an inbound message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomingKind {
    Text,
    Media,
}

/// Normalized inbound media descriptor.
///
/// `file_id` is the only field guaranteed sufficient to later fetch bytes
/// through a `MediaDownloader`; everything else is best-effort metadata the
/// channel happened to supply. Constructed once per inbound update by a
/// `MediaExtractor` and consumed immediately.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IncomingMedia {
    pub kind: MediaKind,
    /// Channel-native file reference. Always non-empty.
    pub file_id: String,
    pub mime_type: Option<String>,
    /// Duration in seconds, where the channel reports one.
    pub duration: Option<u32>,
    /// Opaque channel-native thumbnail reference.
    pub thumbnail: Option<serde_json::Value>,
    /// Opaque size-variant list (photos only).
    pub sizes: Option<serde_json::Value>,
    pub file_name: Option<String>,
    /// Audio only.
    pub title: Option<String>,
    /// Audio only.
    pub performer: Option<String>,
}

/// Normalized inbound message envelope.
///
/// Created per webhook call and handed to the chat-persistence collaborator;
/// never persisted directly. `kind == Media` implies `media` is present,
/// `kind == Text` implies `text` is present.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub service: ChannelService,
    /// Channel-native chat id.
    pub chat_id: String,
    /// Channel-native message id.
    pub message_id: String,
    pub user_id: Option<String>,
    pub source: MessageSource,
    pub kind: IncomingKind,
    pub text: Option<String>,
    pub media: Option<IncomingMedia>,
    /// Processing time, not the channel's own timestamp. Under delivery lag
    /// or replay this can misorder messages; the channel timestamp survives
    /// inside `raw` for a later backfill.
    pub sent_at: Option<DateTime<Utc>>,
    /// Full original payload, retained for auditing/debugging.
    pub raw: Option<serde_json::Value>,
}

/// Text formatting the channel should apply to an outbound message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextParseMode {
    Html,
    Markdown,
}

/// Outbound text send command. Write-only: carries no identity, is never
/// stored, and one dispatch produces exactly one channel API call.
#[derive(Clone, Debug)]
pub struct TextMessage {
    pub service: ChannelService,
    pub chat_id: String,
    pub text: String,
    pub parse_mode: Option<TextParseMode>,
    pub reply_to_message_id: Option<String>,
    pub disable_web_page_preview: bool,
    pub disable_notification: bool,
}

impl TextMessage {
    pub fn new(
        service: ChannelService,
        chat_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            service,
            chat_id: chat_id.into(),
            text: text.into(),
            parse_mode: None,
            reply_to_message_id: None,
            disable_web_page_preview: false,
            disable_notification: false,
        }
    }
}

/// Source of outbound media bytes: already hosted somewhere, or a local file
/// the adapter should upload.
#[derive(Clone, Debug)]
pub enum OutboundFile {
    Url(String),
    Path(PathBuf),
}

/// Outbound media send command.
#[derive(Clone, Debug)]
pub struct MediaMessage {
    pub service: ChannelService,
    pub chat_id: String,
    pub kind: MediaKind,
    pub file: OutboundFile,
    pub caption: Option<String>,
    pub parse_mode: Option<TextParseMode>,
    pub reply_to_message_id: Option<String>,
    pub disable_notification: bool,
}

impl MediaMessage {
    pub fn new(
        service: ChannelService,
        chat_id: impl Into<String>,
        kind: MediaKind,
        file: OutboundFile,
    ) -> Self {
        Self {
            service,
            chat_id: chat_id.into(),
            kind,
            file,
            caption: None,
            parse_mode: None,
            reply_to_message_id: None,
            disable_notification: false,
        }
    }
}

/// Transient chat state shown to the other party ("typing…").
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChatAction {
    #[default]
    Typing,
    UploadPhoto,
    UploadDocument,
}

/// Outbound chat-action command.
#[derive(Clone, Debug)]
pub struct ChatActionMessage {
    pub service: ChannelService,
    pub chat_id: String,
    pub action: ChatAction,
}

impl ChatActionMessage {
    pub fn typing(service: ChannelService, chat_id: impl Into<String>) -> Self {
        Self {
            service,
            chat_id: chat_id.into(),
            action: ChatAction::Typing,
        }
    }
}
