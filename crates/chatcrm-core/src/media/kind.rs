use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse media category of an inbound or stored attachment.
///
/// Inbound extraction can produce every variant; outbound delivery only
/// implements `Photo` and `Video` (see `MessagingChannel::send_media`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
    Audio,
    Document,
    Voice,
    VideoNote,
    Sticker,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Voice => "voice",
            Self::VideoNote => "video_note",
            Self::Sticker => "sticker",
        }
    }

    /// Classify a MIME type into a coarse category.
    ///
    /// Case-insensitive prefix test in fixed order; anything unrecognized
    /// (including a missing MIME type) is a document. Total function.
    pub fn from_mime(mime: Option<&str>) -> Self {
        let Some(mime) = mime else {
            return Self::Document;
        };
        let mime = mime.trim().to_lowercase();

        if mime.starts_with("image/") {
            Self::Photo
        } else if mime.starts_with("video/") {
            Self::Video
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else {
            Self::Document
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_mime_prefix() {
        assert_eq!(MediaKind::from_mime(Some("image/png")), MediaKind::Photo);
        assert_eq!(MediaKind::from_mime(Some("video/mp4")), MediaKind::Video);
        assert_eq!(MediaKind::from_mime(Some("audio/mpeg")), MediaKind::Audio);
        assert_eq!(
            MediaKind::from_mime(Some("application/pdf")),
            MediaKind::Document
        );
    }

    #[test]
    fn missing_mime_is_a_document() {
        assert_eq!(MediaKind::from_mime(None), MediaKind::Document);
    }

    #[test]
    fn classification_ignores_case_and_whitespace() {
        assert_eq!(
            MediaKind::from_mime(Some("  IMAGE/JPEG ")),
            MediaKind::Photo
        );
    }
}
