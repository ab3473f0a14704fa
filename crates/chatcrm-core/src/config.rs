use std::{
    env, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use crate::{
    domain::{ChannelService, Integration, IntegrationId},
    errors::Error,
    Result,
};

/// Deployment environment, resolved once at config load.
///
/// Drives composition-time strategy selection (live vs. mock outgoing
/// delivery); business logic never branches on it at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppEnv {
    Production,
    Staging,
    Local,
    Testing,
}

impl FromStr for AppEnv {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "local" | "dev" | "development" => Ok(Self::Local),
            "testing" | "test" => Ok(Self::Testing),
            other => Err(Error::Config(format!("unknown APP_ENV: {other}"))),
        }
    }
}

/// Typed configuration for the messaging core and its composition root.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub app_env: AppEnv,

    // Telegram integration bootstrap
    pub telegram_bot_token: Option<String>,
    pub telegram_integration_id: i64,
    pub webhook_base_url: Option<String>,
    /// Chat to send a smoke-test message to after webhook registration.
    pub bootstrap_test_chat_id: Option<String>,

    // Media pipeline
    pub media_root: PathBuf,
    pub media_public_base_url: Option<String>,
    pub temp_dir: PathBuf,

    // Dify funnel service
    pub dify_base_url: String,
    pub dify_api_key: Option<String>,

    // Transport
    pub http_timeout: Duration,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let app_env = match env_str("APP_ENV") {
            Some(raw) => raw.parse()?,
            None => AppEnv::Local,
        };

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").and_then(non_empty);
        let telegram_integration_id = env_i64("TELEGRAM_INTEGRATION_ID").unwrap_or(1);
        let webhook_base_url = env_str("WEBHOOK_BASE_URL")
            .and_then(non_empty)
            .map(|u| u.trim_end_matches('/').to_string());
        let bootstrap_test_chat_id = env_str("BOOTSTRAP_TEST_CHAT_ID").and_then(non_empty);

        let media_root =
            PathBuf::from(env_str("MEDIA_ROOT").unwrap_or("storage/media".to_string()));
        let media_public_base_url = env_str("MEDIA_PUBLIC_BASE_URL").and_then(non_empty);

        let temp_dir = PathBuf::from(env_str("TEMP_DIR").unwrap_or("/tmp/chatcrm".to_string()));
        fs::create_dir_all(&temp_dir)?;

        let dify_base_url = env_str("DIFY_BASE_URL")
            .and_then(non_empty)
            .unwrap_or("https://api.dify.ai/v1".to_string());
        let dify_api_key = env_str("DIFY_API_KEY").and_then(non_empty);

        let http_timeout = Duration::from_secs(env_u64("HTTP_TIMEOUT_SECS").unwrap_or(30));

        Ok(Self {
            app_env,
            telegram_bot_token,
            telegram_integration_id,
            webhook_base_url,
            bootstrap_test_chat_id,
            media_root,
            media_public_base_url,
            temp_dir,
            dify_base_url,
            dify_api_key,
            http_timeout,
        })
    }

    /// Integrations configured through the environment.
    ///
    /// Deployments with a credential store register integrations there; this
    /// env-backed list exists for the bootstrap binary and single-bot setups.
    pub fn integrations(&self) -> Vec<Integration> {
        let mut out = Vec::new();
        if let Some(token) = &self.telegram_bot_token {
            let id = IntegrationId(self.telegram_integration_id);
            out.push(Integration {
                id,
                service: ChannelService::Telegram,
                token: token.clone(),
                webhook_url: self.webhook_url_for(ChannelService::Telegram, id),
            });
        }
        out
    }

    fn webhook_url_for(&self, service: ChannelService, id: IntegrationId) -> Option<String> {
        let base = self.webhook_base_url.as_deref()?;
        Some(format!("{base}/api/webhooks/{service}/{id}"))
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_i64(key: &str) -> Option<i64> {
    env_str(key).and_then(|s| s.trim().parse::<i64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_env_parses_common_aliases() {
        assert_eq!("production".parse::<AppEnv>().unwrap(), AppEnv::Production);
        assert_eq!("dev".parse::<AppEnv>().unwrap(), AppEnv::Local);
        assert_eq!("test".parse::<AppEnv>().unwrap(), AppEnv::Testing);
        assert!("qa".parse::<AppEnv>().is_err());
    }

    #[test]
    fn webhook_url_is_service_and_id_scoped() {
        let cfg = AppConfig {
            app_env: AppEnv::Local,
            telegram_bot_token: Some("123:abc".to_string()),
            telegram_integration_id: 9,
            webhook_base_url: Some("https://crm.example.com".to_string()),
            bootstrap_test_chat_id: None,
            media_root: PathBuf::from("storage/media"),
            media_public_base_url: None,
            temp_dir: PathBuf::from("/tmp/chatcrm"),
            dify_base_url: "https://api.dify.ai/v1".to_string(),
            dify_api_key: None,
            http_timeout: Duration::from_secs(30),
        };

        let integrations = cfg.integrations();
        assert_eq!(integrations.len(), 1);
        assert_eq!(
            integrations[0].webhook_url.as_deref(),
            Some("https://crm.example.com/api/webhooks/telegram/9")
        );
    }

    #[test]
    fn no_token_means_no_integrations() {
        let cfg = AppConfig {
            app_env: AppEnv::Local,
            telegram_bot_token: None,
            telegram_integration_id: 1,
            webhook_base_url: None,
            bootstrap_test_chat_id: None,
            media_root: PathBuf::from("storage/media"),
            media_public_base_url: None,
            temp_dir: PathBuf::from("/tmp/chatcrm"),
            dify_base_url: "https://api.dify.ai/v1".to_string(),
            dify_api_key: None,
            http_timeout: Duration::from_secs(30),
        };
        assert!(cfg.integrations().is_empty());
    }
}
