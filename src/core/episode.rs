use serde::{Deserialize, Serialize};

/// One item of the model's reply, before its illustration exists.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ScenarioPart {
    pub script: String,
    pub illustration_prompt: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Episode {
    pub script: String,
    pub illustration_prompt: String,
    pub image_url: String,
}

impl Episode {
    pub fn illustrated(part: ScenarioPart, image_url: String) -> Self {
        Self {
            script: part.script,
            illustration_prompt: part.illustration_prompt,
            image_url,
        }
    }
}
