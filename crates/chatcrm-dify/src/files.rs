//! Dify file references for stored chat media.

use serde::Serialize;

use chatcrm_core::{media::MediaKind, model::StoredMedia, storage::MediaStorage};

/// Dify's coarse file categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifyFileType {
    Document,
    Image,
    Audio,
    Video,
    Custom,
}

impl DifyFileType {
    fn from_media_kind(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Photo => Self::Image,
            MediaKind::Video => Self::Video,
            MediaKind::Audio | MediaKind::Voice => Self::Audio,
            MediaKind::Document => Self::Document,
            MediaKind::VideoNote | MediaKind::Sticker => Self::Custom,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMethod {
    RemoteUrl,
    LocalFile,
}

/// Outbound file reference in Dify's wire format.
///
/// Exactly one of `url` / `upload_file_id` is populated, matching the
/// transfer method; the constructors enforce that, so a partially-populated
/// reference cannot be built.
#[derive(Clone, Debug, Serialize)]
pub struct DifyFile {
    #[serde(rename = "type")]
    pub kind: DifyFileType,
    pub transfer_method: TransferMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_file_id: Option<String>,
}

impl DifyFile {
    pub fn remote_url(kind: DifyFileType, url: impl Into<String>) -> Self {
        Self {
            kind,
            transfer_method: TransferMethod::RemoteUrl,
            url: Some(url.into()),
            upload_file_id: None,
        }
    }

    pub fn local_file(kind: DifyFileType, upload_file_id: impl Into<String>) -> Self {
        Self {
            kind,
            transfer_method: TransferMethod::LocalFile,
            url: None,
            upload_file_id: Some(upload_file_id.into()),
        }
    }
}

/// Map a stored media record into a Dify file reference.
///
/// `None` when the record has no stored path yet, or when storage exposes no
/// public URL for it; a partially-populated reference is never returned.
/// Always uses `remote_url` transfer; `local_file` exists in the wire format
/// but is not produced here.
pub fn file_for_media(media: &StoredMedia, storage: &dyn MediaStorage) -> Option<DifyFile> {
    let path = media.path.as_deref()?;
    let url = storage.public_url(path)?;
    Some(DifyFile::remote_url(
        DifyFileType::from_media_kind(media.kind),
        url,
    ))
}
