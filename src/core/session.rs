use anyhow::{bail, Result};

use crate::core::episode::Episode;
use crate::core::presets::Preset;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Prompt,
    Loading,
    Episode,
}

/// Everything the player keeps for the lifetime of a tab or terminal run.
///
/// `episodes` is either `None` or a non-empty list, and `index` always
/// addresses an element of it when present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    input: String,
    loading: bool,
    episodes: Option<Vec<Episode>>,
    index: usize,
    error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        if self.loading {
            return;
        }
        self.input = text.into();
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        self.set_input(preset.text());
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> View {
        if self.episodes.is_some() {
            View::Episode
        } else if self.loading {
            View::Loading
        } else {
            View::Prompt
        }
    }

    /// Enters the loading state and hands back the premise to send.
    pub fn begin_generation(&mut self) -> Result<String> {
        if self.loading {
            bail!("A scenario is already being generated");
        }
        self.loading = true;
        self.error = None;
        Ok(self.input.clone())
    }

    pub fn finish_generation(&mut self, episodes: Vec<Episode>) -> Result<()> {
        self.loading = false;
        if episodes.is_empty() {
            let message = "The scenario came back without any episode";
            self.error = Some(message.to_string());
            bail!(message);
        }
        log::info!("Scenario ready: {} episodes", episodes.len());
        self.episodes = Some(episodes);
        self.index = 0;
        Ok(())
    }

    pub fn fail_generation(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn episodes(&self) -> Option<&[Episode]> {
        self.episodes.as_deref()
    }

    pub fn episode_count(&self) -> usize {
        self.episodes.as_ref().map_or(0, Vec::len)
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.episodes.as_ref().and_then(|e| e.get(self.index))
    }

    pub fn episode_index(&self) -> usize {
        self.index
    }

    /// 1-based, as displayed.
    pub fn episode_number(&self) -> usize {
        self.index + 1
    }

    pub fn can_go_back(&self) -> bool {
        self.episodes.is_some() && self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.episode_count()
    }

    pub fn previous(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn next(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Back to the prompt screen. The premise stays in the input.
    pub fn regenerate(&mut self) {
        self.episodes = None;
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episodes(n: usize) -> Vec<Episode> {
        (0..n)
            .map(|i| Episode {
                script: format!("Partie {}", i + 1),
                illustration_prompt: format!("scene {}", i + 1),
                image_url: format!("https://img.example/{}.png", i),
            })
            .collect()
    }

    fn generated(n: usize) -> Session {
        let mut session = Session::new();
        session.set_input("a story");
        session.begin_generation().unwrap();
        session.finish_generation(episodes(n)).unwrap();
        session
    }

    #[test]
    fn test_no_episode_view_before_generation() {
        let session = Session::new();
        assert_eq!(session.view(), View::Prompt);
        assert!(session.current_episode().is_none());
        assert!(!session.can_go_back());
        assert!(!session.can_go_forward());
    }

    #[test]
    fn test_loading_view_while_generating() {
        let mut session = Session::new();
        session.set_input("premise");
        let premise = session.begin_generation().unwrap();
        assert_eq!(premise, "premise");
        assert_eq!(session.view(), View::Loading);
        assert!(session.begin_generation().is_err());
    }

    #[test]
    fn test_generation_starts_at_first_episode() {
        let session = generated(3);
        assert_eq!(session.view(), View::Episode);
        assert!(!session.is_loading());
        assert_eq!(session.episode_index(), 0);
        assert_eq!(session.episode_number(), 1);
        let current = session.current_episode().unwrap();
        assert_eq!(current.script, "Partie 1");
        assert_eq!(current.image_url, "https://img.example/0.png");
    }

    #[test]
    fn test_navigation_bounds() {
        let mut session = generated(3);
        assert!(!session.can_go_back());
        assert!(session.can_go_forward());
        assert!(!session.previous());
        assert_eq!(session.episode_index(), 0);

        assert!(session.next());
        assert!(session.can_go_back());
        assert!(session.can_go_forward());

        assert!(session.next());
        assert_eq!(session.episode_index(), 2);
        assert!(session.can_go_back());
        assert!(!session.can_go_forward());
        assert!(!session.next());
        assert_eq!(session.episode_index(), 2);

        assert!(session.previous());
        assert_eq!(session.current_episode().unwrap().script, "Partie 2");
    }

    #[test]
    fn test_single_episode_disables_both_controls() {
        let session = generated(1);
        assert!(!session.can_go_back());
        assert!(!session.can_go_forward());
    }

    #[test]
    fn test_regenerate_resets_episodes_and_index() {
        let mut session = generated(4);
        session.next();
        session.next();
        session.regenerate();
        assert_eq!(session.view(), View::Prompt);
        assert!(session.episodes().is_none());
        assert_eq!(session.episode_index(), 0);
        assert_eq!(session.input(), "a story");
    }

    #[test]
    fn test_preset_populates_exact_text() {
        let mut session = Session::new();
        for preset in Preset::ALL {
            session.apply_preset(preset);
            assert_eq!(session.input(), preset.text());
        }
    }

    #[test]
    fn test_input_frozen_while_loading() {
        let mut session = Session::new();
        session.set_input("kept");
        session.begin_generation().unwrap();
        session.apply_preset(Preset::Comedy);
        session.set_input("ignored");
        assert_eq!(session.input(), "kept");
    }

    #[test]
    fn test_empty_scenario_is_rejected() {
        let mut session = Session::new();
        session.begin_generation().unwrap();
        assert!(session.finish_generation(Vec::new()).is_err());
        assert!(session.episodes().is_none());
        assert!(!session.is_loading());
        assert!(session.error().is_some());
        assert_eq!(session.view(), View::Prompt);
    }

    #[test]
    fn test_failure_clears_loading_and_keeps_message() {
        let mut session = Session::new();
        session.begin_generation().unwrap();
        session.fail_generation("OpenAI API error: 429");
        assert!(!session.is_loading());
        assert_eq!(session.error(), Some("OpenAI API error: 429"));

        session.begin_generation().unwrap();
        assert!(session.error().is_none());
    }
}
