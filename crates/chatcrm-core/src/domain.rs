use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Database id of a configured integration (one bot token / channel account).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntegrationId(pub i64);

impl fmt::Display for IntegrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// External messaging platform a chat lives on.
///
/// Registry key for the channel adapters: adding a platform means adding a
/// variant here plus an adapter crate, with no change to calling code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelService {
    Telegram,
}

impl ChannelService {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Telegram => "telegram",
        }
    }
}

impl fmt::Display for ChannelService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelService {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "telegram" => Ok(Self::Telegram),
            other => Err(crate::Error::Config(format!(
                "unknown channel service: {other}"
            ))),
        }
    }
}

/// A configured credential/connection to one external channel account.
///
/// Every port operation is parameterized by the integration passed in, so
/// adapters hold no per-account state and concurrent calls for different
/// integrations are independent.
#[derive(Clone, Debug)]
pub struct Integration {
    pub id: IntegrationId,
    pub service: ChannelService,
    /// Channel credential (e.g. a Telegram bot token).
    pub token: String,
    /// Absolute URL the channel should push webhook updates to.
    pub webhook_url: Option<String>,
}
