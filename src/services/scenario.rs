use anyhow::{Context, Result};

use crate::core::config::Config;
use crate::core::episode::{Episode, ScenarioPart};
use crate::services::image::{create_image_client, ImageClient};
use crate::services::llm::{create_llm, LlmClient};
use crate::utils::text::strip_code_blocks;

/// The whole request goes out as a single system message.
pub fn scenario_prompt(premise: &str, language: &str) -> String {
    format!(
        "You're a screenwriter. Here's a short story idea. Write the long script in {} based on this story \
for a few part audio series with only one narrator and any character. Do not specify any noise in this script. \
Then generate a prompt to create an illustration image for each part.\n\
The structure of your response will be JSON in the following form :\n\
{{ script: string, illustration_prompt: string }}[]\n\
story: {}",
        language, premise
    )
}

pub fn parse_scenario(response: &str) -> Result<Vec<ScenarioPart>> {
    let clean_json = strip_code_blocks(response);
    let parts: Vec<ScenarioPart> = serde_json::from_str(clean_json)
        .with_context(|| format!("Failed to parse scenario JSON: {}", clean_json))?;
    Ok(parts)
}

pub struct ScenarioGenerator {
    llm: Box<dyn LlmClient>,
    images: Box<dyn ImageClient>,
    language: String,
}

impl ScenarioGenerator {
    pub fn new(llm: Box<dyn LlmClient>, images: Box<dyn ImageClient>, language: &str) -> Self {
        Self {
            llm,
            images,
            language: language.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            create_llm(config)?,
            create_image_client(config)?,
            &config.story.language,
        ))
    }

    /// One chat completion, then one illustration per part, strictly in order.
    pub async fn generate(&self, premise: &str) -> Result<Vec<Episode>> {
        log::info!("Generating scenario ({} chars of premise)", premise.len());
        let prompt = scenario_prompt(premise, &self.language);
        let reply = self.llm.chat(&prompt, "").await?;
        let parts = parse_scenario(&reply)?;
        log::info!("Scenario has {} parts", parts.len());

        let total = parts.len();
        let mut episodes = Vec::with_capacity(total);
        for (i, part) in parts.into_iter().enumerate() {
            log::info!("Illustrating episode {}/{}", i + 1, total);
            let image_url = self
                .images
                .generate(&part.illustration_prompt)
                .await
                .with_context(|| format!("Image generation failed for episode {}", i + 1))?;
            episodes.push(Episode::illustrated(part, image_url));
        }

        Ok(episodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct MockLlmClient {
        reply: String,
        calls: Arc<Mutex<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn chat(&self, system: &str, user: &str) -> Result<String> {
            self.calls.lock().unwrap().push((system.to_string(), user.to_string()));
            Ok(self.reply.clone())
        }
    }

    #[derive(Debug)]
    struct MockImageClient {
        prompts: Arc<Mutex<Vec<String>>>,
        fail_on: Option<usize>,
    }

    #[async_trait]
    impl ImageClient for MockImageClient {
        async fn generate(&self, prompt: &str) -> Result<String> {
            let mut prompts = self.prompts.lock().unwrap();
            if self.fail_on == Some(prompts.len()) {
                return Err(anyhow::anyhow!("Mock image error"));
            }
            prompts.push(prompt.to_string());
            Ok(format!("https://img.example/{}.png", prompts.len() - 1))
        }
    }

    const REPLY: &str = r#"```json
[
  {"script": "Au commencement, Lina trouve la carte.", "illustration_prompt": "a girl holding an old map"},
  {"script": "Le désert s'étend devant elle.", "illustration_prompt": "endless dunes at dawn"},
  {"script": "La cité perdue apparaît.", "illustration_prompt": "a ruined city under the sand"}
]
```"#;

    fn generator(reply: &str, fail_on: Option<usize>) -> (ScenarioGenerator, Arc<Mutex<Vec<(String, String)>>>, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let llm = Box::new(MockLlmClient { reply: reply.to_string(), calls: calls.clone() });
        let images = Box::new(MockImageClient { prompts: prompts.clone(), fail_on });
        (ScenarioGenerator::new(llm, images, "french"), calls, prompts)
    }

    #[test]
    fn test_prompt_embeds_premise_and_format() {
        let prompt = scenario_prompt("a cat who flies", "french");
        assert!(prompt.starts_with("You're a screenwriter."));
        assert!(prompt.contains("long script in french"));
        assert!(prompt.contains("{ script: string, illustration_prompt: string }[]"));
        assert!(prompt.ends_with("story: a cat who flies"));
    }

    #[test]
    fn test_parse_scenario_plain_json() {
        let parts = parse_scenario(r#"[{"script": "s", "illustration_prompt": "p"}]"#).unwrap();
        assert_eq!(parts, vec![ScenarioPart { script: "s".to_string(), illustration_prompt: "p".to_string() }]);
    }

    #[test]
    fn test_parse_scenario_rejects_non_json() {
        let err = parse_scenario("Désolé, je ne peux pas.").unwrap_err();
        assert!(err.to_string().contains("Failed to parse scenario JSON"));
    }

    #[test]
    fn test_parse_scenario_requires_both_fields() {
        assert!(parse_scenario(r#"[{"script": "only a script"}]"#).is_err());
    }

    #[tokio::test]
    async fn test_generate_illustrates_every_part_in_order() -> Result<()> {
        let (generator, calls, prompts) = generator(REPLY, None);

        let episodes = generator.generate("une cartographe").await?;

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1, "one chat completion per scenario");
        assert!(calls[0].0.ends_with("story: une cartographe"));
        assert!(calls[0].1.is_empty(), "only the system message is sent");

        assert_eq!(
            *prompts.lock().unwrap(),
            vec!["a girl holding an old map", "endless dunes at dawn", "a ruined city under the sand"]
        );

        assert_eq!(episodes.len(), 3);
        assert_eq!(episodes[0].script, "Au commencement, Lina trouve la carte.");
        assert_eq!(episodes[0].image_url, "https://img.example/0.png");
        assert_eq!(episodes[2].illustration_prompt, "a ruined city under the sand");
        assert_eq!(episodes[2].image_url, "https://img.example/2.png");
        Ok(())
    }

    #[tokio::test]
    async fn test_image_failure_stops_generation() {
        let (generator, _, prompts) = generator(REPLY, Some(1));

        let err = generator.generate("premise").await.unwrap_err();
        assert!(err.to_string().contains("episode 2"));
        assert_eq!(prompts.lock().unwrap().len(), 1, "no image requested after the failure");
    }

    #[tokio::test]
    async fn test_malformed_reply_requests_no_image() {
        let (generator, _, prompts) = generator("not json", None);
        assert!(generator.generate("premise").await.is_err());
        assert!(prompts.lock().unwrap().is_empty());
    }
}
