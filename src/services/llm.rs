use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::core::config::Config;
use crate::services::ClientBounds;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LlmConfig {
    #[serde(default)]
    pub openai: OpenAIConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenAIConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_chat_model")]
    pub model: String,
    pub base_url: Option<String>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_chat_model(),
            base_url: None,
        }
    }
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}

impl OpenAIConfig {
    pub fn endpoint(&self, path: &str) -> Result<url::Url> {
        let base = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
        url::Url::parse(&joined).map_err(|e| anyhow!("Invalid OpenAI base_url '{}': {}", base, e))
    }

    pub fn require_key(&self) -> Result<&str> {
        if self.api_key.trim().is_empty() {
            bail!(
                "OpenAI API key missing. Set llm.openai.api_key in config.yml or {}.",
                crate::core::config::API_KEY_ENV
            );
        }
        Ok(&self.api_key)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait LlmClient: ClientBounds + Debug {
    /// An empty `user` sends the system instruction alone.
    async fn chat(&self, system: &str, user: &str) -> Result<String>;
}

pub fn create_llm(config: &Config) -> Result<Box<dyn LlmClient>> {
    Ok(Box::new(OpenAIClient::new(&config.llm.openai)?))
}

// --- OpenAI ---

#[derive(Debug)]
pub struct OpenAIClient {
    api_key: String,
    model: String,
    url: url::Url,
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(config: &OpenAIConfig) -> Result<Self> {
        Ok(Self {
            api_key: config.require_key()?.to_string(),
            model: config.model.clone(),
            url: config.endpoint("chat/completions")?,
            client: reqwest::Client::new(),
        })
    }
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
}

#[derive(Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessageResponse,
}

#[derive(Deserialize)]
struct OpenAIMessageResponse {
    content: Option<String>,
}

fn build_request(model: &str, system: &str, user: &str) -> OpenAIRequest {
    let mut messages = vec![OpenAIMessage { role: "system".to_string(), content: system.to_string() }];
    if !user.is_empty() {
        messages.push(OpenAIMessage { role: "user".to_string(), content: user.to_string() });
    }
    OpenAIRequest { model: model.to_string(), messages }
}

fn first_content(response: OpenAIResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| anyhow!("OpenAI response empty or missing content"))
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl LlmClient for OpenAIClient {
    async fn chat(&self, system: &str, user: &str) -> Result<String> {
        let request_body = build_request(&self.model, system, user);
        log::debug!("POST {} (model {})", self.url, self.model);

        let resp = self.client.post(self.url.clone())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await?;
            return Err(anyhow!("OpenAI API error ({}): {}", status, error_text));
        }

        let result: OpenAIResponse = resp.json().await?;
        first_content(result)
    }
}
