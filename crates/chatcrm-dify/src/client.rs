//! HTTP client for the Dify chat-messages API.

use serde::Serialize;
use serde_json::Value;

use chatcrm_core::{Error, Result};

use crate::files::DifyFile;
use crate::response::DifyResponse;

/// One funnel turn: the user's text plus any stored-media references.
#[derive(Clone, Debug)]
pub struct ChatMessageRequest {
    pub query: String,
    /// Stable end-user identifier Dify uses for conversation scoping.
    pub user: String,
    pub conversation_id: Option<String>,
    pub files: Vec<DifyFile>,
}

#[derive(Serialize)]
struct ChatMessageBody<'a> {
    inputs: Value,
    query: &'a str,
    response_mode: &'static str,
    user: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    files: Vec<DifyFile>,
}

#[derive(Clone, Debug)]
pub struct DifyClient {
    base_url: String,
    http: reqwest::Client,
}

impl DifyClient {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build");
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Send one chat message in blocking response mode.
    ///
    /// The funnel API key is per integration, so it travels with the call
    /// rather than living in the client.
    pub async fn send_chat_message(
        &self,
        api_key: &str,
        request: &ChatMessageRequest,
    ) -> Result<DifyResponse> {
        let body = ChatMessageBody {
            inputs: Value::Object(Default::default()),
            query: &request.query,
            response_mode: "blocking",
            user: &request.user,
            conversation_id: request.conversation_id.as_deref(),
            files: request.files.clone(),
        };

        let resp = self
            .http
            .post(format!("{}/chat-messages", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::External(format!("dify request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::External(format!(
                "dify chat-messages failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let raw: Value = resp
            .json()
            .await
            .map_err(|e| Error::External(format!("dify json error: {e}")))?;

        tracing::debug!(
            conversation_id = raw
                .get("conversation_id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or(""),
            "dify chat message answered"
        );
        Ok(DifyResponse::from_value(raw))
    }
}
