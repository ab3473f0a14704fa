use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    domain::ChannelService,
    messaging::port::{MediaDownloader, MediaExtractor, MessagingChannel},
    Error, Result,
};

/// Composition-time lookup of channel adapters keyed by [`ChannelService`].
///
/// Built once by the composition root and then treated as immutable: no
/// ambient/global registration, no mutation after startup. Calling code
/// never sees channel-native types, only the ports.
#[derive(Default)]
pub struct ChannelRegistry {
    channels: HashMap<ChannelService, Arc<dyn MessagingChannel>>,
    extractors: HashMap<ChannelService, Arc<dyn MediaExtractor>>,
    downloaders: HashMap<ChannelService, Arc<dyn MediaDownloader>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_channel(&mut self, channel: Arc<dyn MessagingChannel>) -> &mut Self {
        self.channels.insert(channel.service(), channel);
        self
    }

    pub fn register_extractor(&mut self, extractor: Arc<dyn MediaExtractor>) -> &mut Self {
        self.extractors.insert(extractor.service(), extractor);
        self
    }

    pub fn register_downloader(&mut self, downloader: Arc<dyn MediaDownloader>) -> &mut Self {
        self.downloaders.insert(downloader.service(), downloader);
        self
    }

    pub fn channel(&self, service: ChannelService) -> Result<Arc<dyn MessagingChannel>> {
        self.channels
            .get(&service)
            .cloned()
            .ok_or_else(|| Self::missing("channel", service))
    }

    pub fn extractor(&self, service: ChannelService) -> Result<Arc<dyn MediaExtractor>> {
        self.extractors
            .get(&service)
            .cloned()
            .ok_or_else(|| Self::missing("media extractor", service))
    }

    pub fn downloader(&self, service: ChannelService) -> Result<Arc<dyn MediaDownloader>> {
        self.downloaders
            .get(&service)
            .cloned()
            .ok_or_else(|| Self::missing("media downloader", service))
    }

    fn missing(what: &str, service: ChannelService) -> Error {
        Error::Config(format!("no {what} registered for service {service}"))
    }
}
