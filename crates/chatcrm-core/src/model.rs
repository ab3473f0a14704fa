//! Read-only views of the collaborator persistence layer.
//!
//! Chat/Message/Client CRUD lives outside this core; these structs are the
//! minimal mirror of its records that the outbound and Dify paths consume.

use serde::{Deserialize, Serialize};

use crate::media::kind::MediaKind;
use crate::messaging::types::IncomingKind;

/// A persisted media record attached to a message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredMedia {
    pub kind: MediaKind,
    /// Durable storage key (`{prefix}/{uuid}.{ext}`), if the download/store
    /// pipeline has completed for this record.
    pub path: Option<String>,
    pub mime_type: Option<String>,
    pub file_name: Option<String>,
}

/// A persisted message queued for outbound delivery.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    /// Channel-native chat id the message belongs to.
    pub external_chat_id: String,
    pub kind: IncomingKind,
    pub text: Option<String>,
    pub media: Option<StoredMedia>,
}
