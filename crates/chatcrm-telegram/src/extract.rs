//! Media extraction from Telegram messages.

use teloxide::types::Message;

use chatcrm_core::{
    domain::ChannelService,
    media::MediaKind,
    messaging::{port::MediaExtractor, types::IncomingMedia},
};

fn media(kind: MediaKind, file_id: String) -> IncomingMedia {
    IncomingMedia {
        kind,
        file_id,
        mime_type: None,
        duration: None,
        thumbnail: None,
        sizes: None,
        file_name: None,
        title: None,
        performer: None,
    }
}

/// Extract a normalized media descriptor from a Telegram message.
///
/// Fixed priority order; a Telegram message carries at most one of these
/// kinds, so the first structural match wins. Returns `None` for pure text
/// messages.
pub(crate) fn extract_media(message: &Message) -> Option<IncomingMedia> {
    if let Some(photo) = message.photo() {
        // Telegram orders size variants ascending; the last one is the
        // original-resolution rendition we keep as the representative file.
        let best = photo.last()?;
        return Some(IncomingMedia {
            // Telegram does not report a MIME type for photos; they are
            // always re-encoded JPEG server-side.
            mime_type: Some("image/jpeg".to_string()),
            sizes: serde_json::to_value(photo).ok(),
            ..media(MediaKind::Photo, best.file.id.clone())
        });
    }

    if let Some(video) = message.video() {
        return Some(IncomingMedia {
            mime_type: video.mime_type.as_ref().map(|m| m.to_string()),
            duration: Some(video.duration),
            thumbnail: video.thumb.as_ref().and_then(|t| serde_json::to_value(t).ok()),
            file_name: video.file_name.clone(),
            ..media(MediaKind::Video, video.file.id.clone())
        });
    }

    if let Some(document) = message.document() {
        return Some(IncomingMedia {
            mime_type: document.mime_type.as_ref().map(|m| m.to_string()),
            thumbnail: document
                .thumb
                .as_ref()
                .and_then(|t| serde_json::to_value(t).ok()),
            file_name: document.file_name.clone(),
            ..media(MediaKind::Document, document.file.id.clone())
        });
    }

    if let Some(voice) = message.voice() {
        return Some(IncomingMedia {
            mime_type: voice.mime_type.as_ref().map(|m| m.to_string()),
            duration: Some(voice.duration),
            ..media(MediaKind::Voice, voice.file.id.clone())
        });
    }

    if let Some(audio) = message.audio() {
        return Some(IncomingMedia {
            mime_type: audio.mime_type.as_ref().map(|m| m.to_string()),
            duration: Some(audio.duration),
            thumbnail: audio.thumb.as_ref().and_then(|t| serde_json::to_value(t).ok()),
            file_name: audio.file_name.clone(),
            title: audio.title.clone(),
            performer: audio.performer.clone(),
            ..media(MediaKind::Audio, audio.file.id.clone())
        });
    }

    if let Some(note) = message.video_note() {
        return Some(IncomingMedia {
            duration: Some(note.duration),
            thumbnail: note.thumb.as_ref().and_then(|t| serde_json::to_value(t).ok()),
            ..media(MediaKind::VideoNote, note.file.id.clone())
        });
    }

    if let Some(sticker) = message.sticker() {
        return Some(IncomingMedia {
            thumbnail: sticker
                .thumb
                .as_ref()
                .and_then(|t| serde_json::to_value(t).ok()),
            ..media(MediaKind::Sticker, sticker.file.id.clone())
        });
    }

    None
}

/// Registry-facing extractor; deserializes the raw channel message before
/// delegating to the typed extraction.
pub struct TelegramMediaExtractor;

impl MediaExtractor for TelegramMediaExtractor {
    fn service(&self) -> ChannelService {
        ChannelService::Telegram
    }

    fn extract(&self, raw_message: &serde_json::Value) -> Option<IncomingMedia> {
        let message: Message = serde_json::from_value(raw_message.clone()).ok()?;
        extract_media(&message)
    }
}
