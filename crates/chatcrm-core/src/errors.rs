use crate::domain::IntegrationId;
use crate::media::kind::MediaKind;

/// Core error type.
///
/// Adapter crates map their transport-specific failures into this type so
/// callers can decide on compensating action consistently. Parsing and
/// probing paths do NOT use it; they fail soft (`None` / `false`) because
/// "not available" is a normal branch for their callers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Outbound send of a media kind the channel adapter does not implement.
    /// Inbound recognizes more kinds than outbound can deliver; callers must
    /// see the gap rather than have media silently dropped.
    #[error("unsupported outbound media kind: {0}")]
    UnsupportedMediaKind(MediaKind),

    /// Media fetch from the channel failed. Carries the integration and the
    /// channel-native file id for observability; the caller decides whether
    /// to retry.
    #[error("download failed (integration {integration}, file {file_id}): {reason}")]
    Download {
        integration: IntegrationId,
        file_id: String,
        reason: String,
    },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("webhook registration failed: {0}")]
    WebhookRegistration(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
