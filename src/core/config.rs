use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use crate::services::image::ImageConfig;
use crate::services::llm::LlmConfig;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub story: StoryConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoryConfig {
    /// Language the script is written in, spelled out for the prompt.
    #[serde(default = "default_language")]
    pub language: String,
    /// BCP 47 tag handed to the speech synthesizer.
    #[serde(default = "default_voice_lang")]
    pub voice_lang: String,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            voice_lang: default_voice_lang(),
        }
    }
}

fn default_language() -> String {
    "french".to_string()
}
fn default_voice_lang() -> String {
    "fr-FR".to_string()
}

impl Config {
    /// Parses a YAML document, then fills the credential from the environment if the document left it empty.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut config: Config =
            serde_yaml_ng::from_str(content).context("Failed to parse config.yml")?;
        config.apply_env(std::env::var(API_KEY_ENV).ok(), std::env::var(BASE_URL_ENV).ok());
        Ok(config)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.yml"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("{} not found, using defaults", path.display());
            let mut config = Config::default();
            config.apply_env(std::env::var(API_KEY_ENV).ok(), std::env::var(BASE_URL_ENV).ok());
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// The browser build has no file system; the credential is baked in at compile time.
    pub fn from_build_env() -> Self {
        let mut config = Config::default();
        config.apply_env(
            option_env!("OPENAI_API_KEY").map(str::to_string),
            option_env!("OPENAI_BASE_URL").map(str::to_string),
        );
        config
    }

    fn apply_env(&mut self, api_key: Option<String>, base_url: Option<String>) {
        let openai = &mut self.llm.openai;
        if openai.api_key.trim().is_empty() {
            if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
                openai.api_key = key;
            }
        }
        if openai.base_url.is_none() {
            openai.base_url = base_url.filter(|u| !u.trim().is_empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: Config = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(config.llm.openai.model, "gpt-3.5-turbo");
        assert_eq!(config.image.model, "dall-e-3");
        assert_eq!(config.image.size, "1024x1024");
        assert_eq!(config.story.voice_lang, "fr-FR");
        assert_eq!(config.story.language, "french");
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
llm:
  openai:
    api_key: "sk-file"
    model: "gpt-4o-mini"
    base_url: "http://localhost:8080/v1"
image:
  size: "512x512"
story:
  language: "english"
  voice_lang: "en-US"
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.llm.openai.api_key, "sk-file");
        assert_eq!(config.llm.openai.model, "gpt-4o-mini");
        assert_eq!(config.llm.openai.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(config.image.model, "dall-e-3");
        assert_eq!(config.image.size, "512x512");
        assert_eq!(config.story.voice_lang, "en-US");
    }

    #[test]
    fn test_env_fills_empty_key_only() {
        let mut config = Config::default();
        config.apply_env(Some("sk-env".to_string()), None);
        assert_eq!(config.llm.openai.api_key, "sk-env");

        config.llm.openai.api_key = "sk-file".to_string();
        config.apply_env(Some("sk-other".to_string()), Some("".to_string()));
        assert_eq!(config.llm.openai.api_key, "sk-file");
        assert!(config.llm.openai.base_url.is_none());
    }

    #[test]
    fn test_load_from_round_trips_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.yml");

        let mut config = Config::default();
        config.llm.openai.api_key = "sk-saved".to_string();
        config.story.voice_lang = "fr-CA".to_string();
        config.save_to(&path)?;

        let loaded = Config::load_from(&path)?;
        assert_eq!(loaded.llm.openai.api_key, "sk-saved");
        assert_eq!(loaded.story.voice_lang, "fr-CA");
        Ok(())
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let loaded = Config::load_from(&dir.path().join("absent.yml"))?;
        assert_eq!(loaded.image.model, "dall-e-3");
        Ok(())
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(Config::from_yaml("llm: [unterminated").is_err());
    }
}
