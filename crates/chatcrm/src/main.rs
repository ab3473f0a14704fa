//! Composition root + webhook bootstrap.
//!
//! Wires the channel adapters, media storage and outgoing messenger once,
//! then validates each configured integration and registers its webhook.
//! Serving the webhook HTTP endpoint is the application layer's job.

use std::sync::Arc;

use anyhow::Context;

use chatcrm_core::{
    config::AppConfig,
    messaging::{port::MessagingChannel, registry::ChannelRegistry, types::IncomingKind},
    model::StoredMessage,
    outgoing::{outgoing_for_env, OutgoingMessenger, SendOptions},
    storage::{LocalDiskStorage, MediaStorage},
};
use chatcrm_telegram::{TelegramChannel, TelegramMediaDownloader, TelegramMediaExtractor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chatcrm_core::logging::init("chatcrm");

    let cfg = Arc::new(AppConfig::load().context("loading configuration")?);

    let mut registry = ChannelRegistry::new();
    registry
        .register_channel(Arc::new(TelegramChannel::new(cfg.http_timeout)))
        .register_extractor(Arc::new(TelegramMediaExtractor))
        .register_downloader(Arc::new(TelegramMediaDownloader::new(
            cfg.temp_dir.clone(),
            cfg.http_timeout,
        )));
    let registry = Arc::new(registry);

    let storage: Arc<dyn MediaStorage> = Arc::new(LocalDiskStorage::new(
        cfg.media_root.clone(),
        cfg.media_public_base_url.clone(),
    ));

    // Resolved once here; the send path never checks the environment again.
    let outgoing = outgoing_for_env(cfg.app_env, registry.clone(), storage);

    let integrations = cfg.integrations();
    if integrations.is_empty() {
        tracing::warn!("no integrations configured, nothing to bootstrap");
        return Ok(());
    }

    for integration in integrations {
        let channel = registry
            .channel(integration.service)
            .context("resolving channel adapter")?;

        if !channel.validate_integration(&integration).await {
            tracing::warn!(
                integration = %integration.id,
                service = %integration.service,
                "integration failed the liveness probe, skipping webhook setup"
            );
            continue;
        }

        channel
            .setup_webhook(&integration)
            .await
            .with_context(|| format!("registering webhook for integration {}", integration.id))?;

        tracing::info!(
            integration = %integration.id,
            service = %integration.service,
            "integration validated and webhook registered"
        );

        if let Some(chat_id) = &cfg.bootstrap_test_chat_id {
            let smoke_test = StoredMessage {
                id: 0,
                external_chat_id: chat_id.clone(),
                kind: IncomingKind::Text,
                text: Some("chatcrm bootstrap: delivery path OK".to_string()),
                media: None,
            };
            let receipt = outgoing
                .send(&smoke_test, &integration, &SendOptions::default())
                .await
                .context("sending bootstrap smoke-test message")?;
            tracing::info!(
                message_id = receipt.message_id.as_deref().unwrap_or("-"),
                "smoke-test message delivered"
            );
        }
    }

    Ok(())
}
