//! Oracle service - capability layer
//!
//! The single seam to the external AI text-generation service. Callers hand
//! over one free-text prompt and get free-text output back; all structural
//! validation of that output belongs to the caller.
//!
//! ## Stack
//! - Uses the `async-openai` crate for API calls
//! - Supports custom API endpoints (any OpenAI-compatible service)

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::OracleError;

/// Whether the request should run against the live-web-search capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebSearch {
    Enabled,
    Disabled,
}

/// The external classification oracle.
///
/// One request in flight at a time; callers issue requests strictly
/// sequentially and treat the returned text as untrusted payload.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        system_message: Option<&str>,
        web_search: WebSearch,
    ) -> Result<String, OracleError>;
}

/// Production oracle backed by an OpenAI-compatible chat-completion API.
///
/// Web-search capability is selected by model: requests with
/// [`WebSearch::Enabled`] are routed to the search-capable model named in the
/// configuration.
pub struct OpenAiOracle {
    client: Client<OpenAIConfig>,
    description_model: String,
    classification_model: String,
}

impl OpenAiOracle {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.oracle_api_key)
            .with_api_base(&config.oracle_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            description_model: config.description_model.clone(),
            classification_model: config.classification_model.clone(),
        }
    }

    fn model_for(&self, web_search: WebSearch) -> &str {
        match web_search {
            WebSearch::Enabled => &self.description_model,
            WebSearch::Disabled => &self.classification_model,
        }
    }
}

#[async_trait]
impl Oracle for OpenAiOracle {
    async fn complete(
        &self,
        prompt: &str,
        system_message: Option<&str>,
        web_search: WebSearch,
    ) -> Result<String, OracleError> {
        let model = self.model_for(web_search).to_string();
        debug!("calling oracle, model: {}", model);
        debug!("prompt length: {} chars", prompt.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| OracleError::Transport {
                    model: model.clone(),
                    source: e,
                })?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| OracleError::Transport {
                model: model.clone(),
                source: e,
            })?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&model)
            .messages(messages)
            .build()
            .map_err(|e| OracleError::Transport {
                model: model.clone(),
                source: e,
            })?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("oracle request failed: {}", e);
            OracleError::Transport {
                model: model.clone(),
                source: e,
            }
        })?;

        debug!("oracle request succeeded");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(OracleError::EmptyResponse { model })?;

        Ok(content.trim().to_string())
    }
}

/// Strip a Markdown code fence from an oracle payload, if present.
///
/// Models wrap CSV and JSON payloads in ``` fences often enough that both
/// parsing paths run their input through this first.
pub(crate) fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        // drop the info string on the opening fence line
        let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
        let body = body.trim_end();
        let body = body.strip_suffix("```").unwrap_or(body);
        return body.trim();
    }
    trimmed
}
