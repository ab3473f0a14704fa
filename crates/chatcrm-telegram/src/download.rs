//! Media download from Telegram into transient local storage.

use std::{
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use teloxide::{net::Download, prelude::*};

use chatcrm_core::{
    domain::{ChannelService, Integration},
    media::resolve_extension,
    messaging::{port::MediaDownloader, types::IncomingMedia},
    Error, Result,
};

static DOWNLOAD_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Fetches file bytes behind an `IncomingMedia` descriptor via
/// `getFile` + file download, writing into the configured temp directory.
///
/// The caller owns cleanup of the returned path.
pub struct TelegramMediaDownloader {
    http: reqwest::Client,
    temp_dir: PathBuf,
}

impl TelegramMediaDownloader {
    pub fn new(temp_dir: PathBuf, timeout: std::time::Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build");
        Self { http, temp_dir }
    }

    fn temp_path(&self, media: &IncomingMedia) -> PathBuf {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let n = DOWNLOAD_COUNTER.fetch_add(1, Ordering::SeqCst);
        let ext = resolve_extension(media.mime_type.as_deref());
        self.temp_dir
            .join(format!("{}_{ts}_{n}.{ext}", media.kind.as_str()))
    }

    fn failure(integration: &Integration, media: &IncomingMedia, reason: String) -> Error {
        Error::Download {
            integration: integration.id,
            file_id: media.file_id.clone(),
            reason,
        }
    }
}

#[async_trait]
impl MediaDownloader for TelegramMediaDownloader {
    fn service(&self) -> ChannelService {
        ChannelService::Telegram
    }

    async fn download(&self, integration: &Integration, media: &IncomingMedia) -> Result<PathBuf> {
        let bot = Bot::with_client(integration.token.clone(), self.http.clone());

        let file = bot
            .get_file(media.file_id.clone())
            .await
            .map_err(|e| Self::failure(integration, media, format!("getFile: {e}")))?;

        tokio::fs::create_dir_all(&self.temp_dir).await?;
        let path = self.temp_path(media);
        let mut dst = tokio::fs::File::create(&path).await?;

        if let Err(e) = bot.download_file(&file.path, &mut dst).await {
            // Don't leave partial bytes behind on a failed transfer.
            drop(dst);
            let _ = tokio::fs::remove_file(&path).await;
            return Err(Self::failure(integration, media, format!("transfer: {e}")));
        }

        tracing::debug!(
            integration = %integration.id,
            file_id = %media.file_id,
            path = %path.display(),
            "downloaded telegram media"
        );
        Ok(path)
    }
}
