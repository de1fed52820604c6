use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::core::config::Config;
use crate::services::llm::OpenAIConfig;
use crate::services::ClientBounds;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageConfig {
    #[serde(default = "default_image_model")]
    pub model: String,
    #[serde(default = "default_image_size")]
    pub size: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            model: default_image_model(),
            size: default_image_size(),
        }
    }
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}
fn default_image_size() -> String {
    "1024x1024".to_string()
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ImageClient: ClientBounds + Debug {
    /// Returns the URL of one generated image.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub fn create_image_client(config: &Config) -> Result<Box<dyn ImageClient>> {
    Ok(Box::new(OpenAIImageClient::new(&config.llm.openai, &config.image)?))
}

#[derive(Debug)]
pub struct OpenAIImageClient {
    api_key: String,
    model: String,
    size: String,
    url: url::Url,
    client: reqwest::Client,
}

impl OpenAIImageClient {
    pub fn new(openai: &OpenAIConfig, image: &ImageConfig) -> Result<Self> {
        Ok(Self {
            api_key: openai.require_key()?.to_string(),
            model: image.model.clone(),
            size: image.size.clone(),
            url: openai.endpoint("images/generations")?,
            client: reqwest::Client::new(),
        })
    }
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Deserialize, Debug)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize, Debug)]
struct ImageData {
    url: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

fn first_url(response: ImageResponse) -> Result<String> {
    let first = response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Image response contained no data"))?;
    if let Some(revised) = &first.revised_prompt {
        log::debug!("Illustration prompt revised to: {}", revised);
    }
    first.url.ok_or_else(|| anyhow!("Image response missing url"))
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ImageClient for OpenAIImageClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request_body = ImageRequest {
            model: &self.model,
            prompt,
            n: 1,
            size: &self.size,
        };

        let resp = self.client.post(self.url.clone())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await?;
            return Err(anyhow!("OpenAI image API error ({}): {}", status, error_text));
        }

        let result: ImageResponse = resp.json().await?;
        log::debug!("Image response: {:?}", result);
        first_url(result)
    }
}
