use async_trait::async_trait;
use game_types::{ModelOption, ModelProvider, OperativeContext, SpymasterContext};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use super::prompts::{SYSTEM_PROMPT, operative_prompt, spymaster_prompt};
use super::{GuessProvider, HintProvider, OperativeGuess, ProviderError, SpymasterHint};
use crate::config::Config;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 150;

/// Chat-completion backed provider for both AI roles
#[derive(Clone)]
pub struct LlmProvider {
    client: reqwest::Client,
    openai_api_key: Option<String>,
    anthropic_api_key: Option<String>,
    openai_base_url: String,
    anthropic_base_url: String,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct AnthropicMessage {
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Models with "claude" in their id are served by Anthropic
pub fn provider_for(model_id: &str) -> ModelProvider {
    if model_id.to_lowercase().contains("claude") {
        ModelProvider::Anthropic
    } else {
        ModelProvider::OpenAi
    }
}

/// Slice from the first `{` to the last `}`, ignoring any prose around it
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_reply<T: DeserializeOwned>(reply: &str) -> Result<T, ProviderError> {
    let body = extract_json(reply).ok_or(ProviderError::NoJson)?;
    Ok(serde_json::from_str(body)?)
}

fn is_chat_model(model_id: &str) -> bool {
    model_id.contains("gpt") && !model_id.contains("realtime") && !model_id.contains("audio")
}

impl LlmProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            openai_api_key: config.openai_api_key.clone(),
            anthropic_api_key: config.anthropic_api_key.clone(),
            openai_base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            anthropic_base_url: config.anthropic_base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn complete(&self, model_id: &str, prompt: &str) -> Result<String, ProviderError> {
        let reply = match provider_for(model_id) {
            ModelProvider::Anthropic => self.complete_anthropic(model_id, prompt).await?,
            ModelProvider::OpenAi => self.complete_openai(model_id, prompt).await?,
        };
        debug!(model_id, reply = %reply, "Model replied");
        Ok(reply)
    }

    async fn complete_openai(&self, model_id: &str, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self
            .openai_api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey(ModelProvider::OpenAi))?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.openai_base_url))
            .bearer_auth(api_key)
            .json(&json!({
                "model": model_id,
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": prompt },
                ],
                "response_format": { "type": "json_object" },
            }))
            .send()
            .await?;

        let completion: ChatCompletion = read_json(response).await?;
        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }

    async fn complete_anthropic(
        &self,
        model_id: &str,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        let api_key = self
            .anthropic_api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey(ModelProvider::Anthropic))?;

        let response = self
            .client
            .post(format!("{}/v1/messages", self.anthropic_base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&json!({
                "model": model_id,
                "max_tokens": ANTHROPIC_MAX_TOKENS,
                "system": SYSTEM_PROMPT,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await?;

        let message: AnthropicMessage = read_json(response).await?;
        Ok(message
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join(""))
    }

    /// Models usable for AI seats, grouped by provider then sorted by name.
    /// A provider that fails to list is skipped rather than failing the whole call.
    pub async fn list_models(&self) -> Vec<ModelOption> {
        let mut models = Vec::new();

        if let Some(api_key) = &self.openai_api_key {
            let request = self
                .client
                .get(format!("{}/models", self.openai_base_url))
                .bearer_auth(api_key);
            match fetch_models(request).await {
                Ok(list) => models.extend(
                    list.data
                        .into_iter()
                        .filter(|entry| is_chat_model(&entry.id))
                        .map(|entry| ModelOption {
                            name: entry.id.clone(),
                            id: entry.id,
                            provider: ModelProvider::OpenAi,
                        }),
                ),
                Err(e) => warn!("Failed to list OpenAI models: {}", e),
            }
        }

        if let Some(api_key) = &self.anthropic_api_key {
            let request = self
                .client
                .get(format!("{}/v1/models", self.anthropic_base_url))
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION);
            match fetch_models(request).await {
                Ok(list) => models.extend(list.data.into_iter().map(|entry| ModelOption {
                    name: entry.display_name.unwrap_or_else(|| entry.id.clone()),
                    id: entry.id,
                    provider: ModelProvider::Anthropic,
                })),
                Err(e) => warn!("Failed to list Anthropic models: {}", e),
            }
        }

        sort_models(&mut models);
        models
    }
}

fn provider_rank(provider: ModelProvider) -> u8 {
    match provider {
        ModelProvider::Anthropic => 0,
        ModelProvider::OpenAi => 1,
    }
}

fn sort_models(models: &mut [ModelOption]) {
    models.sort_by(|a, b| {
        provider_rank(a.provider)
            .cmp(&provider_rank(b.provider))
            .then_with(|| a.name.cmp(&b.name))
    });
}

async fn fetch_models(request: reqwest::RequestBuilder) -> Result<ModelList, ProviderError> {
    read_json(request.send().await?).await
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}

#[async_trait]
impl HintProvider for LlmProvider {
    async fn generate_hint(
        &self,
        model_id: &str,
        context: &SpymasterContext,
    ) -> Result<SpymasterHint, ProviderError> {
        let reply = self.complete(model_id, &spymaster_prompt(context)).await?;
        parse_reply(&reply)
    }
}

#[async_trait]
impl GuessProvider for LlmProvider {
    async fn generate_guess(
        &self,
        model_id: &str,
        context: &OperativeContext,
    ) -> Result<OperativeGuess, ProviderError> {
        let reply = self.complete(model_id, &operative_prompt(context)).await?;
        parse_reply(&reply)
    }
}
