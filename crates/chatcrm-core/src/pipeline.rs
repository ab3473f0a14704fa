//! Webhook-to-storage media pipeline.
//!
//! Strictly sequential: download, then store, then drop the temp file. One
//! inbound update triggers at most one pass through here.

use std::sync::Arc;

use crate::{
    domain::Integration,
    messaging::{port::MediaDownloader, registry::ChannelRegistry, types::IncomingMedia},
    storage::MediaStorage,
    Result,
};

/// Moves extracted media from the channel into durable storage.
pub struct MediaArchiver {
    registry: Arc<ChannelRegistry>,
    storage: Arc<dyn MediaStorage>,
}

impl MediaArchiver {
    pub fn new(registry: Arc<ChannelRegistry>, storage: Arc<dyn MediaStorage>) -> Self {
        Self { registry, storage }
    }

    /// Download `media` via the integration's channel and store it under
    /// `prefix`, returning the durable storage key.
    ///
    /// The downloader's temp file is removed here whether storing succeeded
    /// or failed; this is the owning caller the download port's cleanup
    /// contract talks about.
    pub async fn archive(
        &self,
        integration: &Integration,
        media: &IncomingMedia,
        prefix: &str,
    ) -> Result<String> {
        let downloader = self.registry.downloader(integration.service)?;
        let local = downloader.download(integration, media).await?;

        let stored = self
            .storage
            .store(prefix, media.mime_type.as_deref(), &local)
            .await;

        if let Err(e) = tokio::fs::remove_file(&local).await {
            tracing::warn!(path = %local.display(), error = %e, "failed to remove temp media file");
        }

        stored
    }
}
