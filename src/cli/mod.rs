use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{InquireError, Select, Text};
use std::fmt;
use std::time::Duration;

use crate::core::config::Config;
use crate::core::presets::Preset;
use crate::core::session::{Session, View};
use crate::services::scenario::ScenarioGenerator;
use crate::services::speech::{ConsoleSpeaker, Speaker};

const WRITE_OWN: &str = "Write my own";
const QUIT: &str = "Quit";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Back,
    Forward,
    StopSpeaking,
    Regenerate,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Back => "<-",
            Action::Forward => "->",
            Action::StopSpeaking => "stop speaking",
            Action::Regenerate => "regenerate",
            Action::Quit => "quit",
        };
        f.write_str(label)
    }
}

/// Actions offered in the episode viewer; the arrows only when they can move.
pub fn available_actions(session: &Session) -> Vec<Action> {
    let mut actions = Vec::with_capacity(5);
    if session.can_go_forward() {
        actions.push(Action::Forward);
    }
    if session.can_go_back() {
        actions.push(Action::Back);
    }
    actions.extend([Action::StopSpeaking, Action::Regenerate, Action::Quit]);
    actions
}

/// Esc and Ctrl-C leave the player instead of surfacing as errors.
fn prompt_or_quit<T>(result: std::result::Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub async fn run(config: Config) -> Result<()> {
    let speaker = ConsoleSpeaker::stdout(&config.story.voice_lang);
    let mut session = Session::new();

    loop {
        let keep_going = match session.view() {
            View::Prompt | View::Loading => {
                if prompt_screen(&mut session)? {
                    generate(&config, &mut session).await?;
                    true
                } else {
                    false
                }
            }
            View::Episode => episode_screen(&mut session, &speaker)?,
        };
        if !keep_going {
            break;
        }
    }

    speaker.cancel()?;
    println!("Bye!");
    Ok(())
}

fn prompt_screen(session: &mut Session) -> Result<bool> {
    if let Some(err) = session.error() {
        eprintln!("Generation failed: {}", err);
    }

    let mut choices: Vec<&str> = Preset::ALL.iter().map(|p| p.label()).collect();
    choices.push(WRITE_OWN);
    choices.push(QUIT);

    let Some(choice) = prompt_or_quit(
        Select::new("Ask me a story and I will generate a short audio serie", choices).prompt(),
    )?
    else {
        return Ok(false);
    };
    if choice == QUIT {
        return Ok(false);
    }
    if let Some(preset) = Preset::from_label(choice) {
        session.apply_preset(preset);
    }

    let Some(premise) = prompt_or_quit(
        Text::new("Story:")
            .with_placeholder("Ask me a story")
            .with_initial_value(session.input())
            .prompt(),
    )?
    else {
        return Ok(false);
    };
    session.set_input(premise);
    Ok(true)
}

async fn generate(config: &Config, session: &mut Session) -> Result<()> {
    let premise = session.begin_generation()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message("Writing the scenario and drawing the episodes...");
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = match ScenarioGenerator::from_config(config) {
        Ok(generator) => generator.generate(&premise).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(episodes) => {
            pb.finish_with_message(format!("Scenario ready: {} episodes", episodes.len()));
            if let Err(e) = session.finish_generation(episodes) {
                log::warn!("{}", e);
            }
        }
        Err(e) => {
            pb.abandon_with_message("Generation failed");
            log::error!("Scenario generation failed: {:#}", e);
            session.fail_generation(format!("{:#}", e));
        }
    }
    Ok(())
}

fn episode_screen(session: &mut Session, speaker: &dyn Speaker) -> Result<bool> {
    let mut spoken: Option<usize> = None;

    loop {
        let Some(episode) = session.current_episode() else {
            return Ok(true);
        };

        if spoken != Some(session.episode_index()) {
            println!();
            println!("=== Episode {} / {} ===", session.episode_number(), session.episode_count());
            println!("Illustration: {}", episode.image_url);
            speaker.speak(&episode.script)?;
            spoken = Some(session.episode_index());
        }

        let Some(action) = prompt_or_quit(Select::new("", available_actions(session)).prompt())? else {
            return Ok(false);
        };
        match action {
            Action::Back => {
                session.previous();
            }
            Action::Forward => {
                session.next();
            }
            Action::StopSpeaking => speaker.cancel()?,
            Action::Regenerate => {
                session.regenerate();
                return Ok(true);
            }
            Action::Quit => return Ok(false),
        }
    }
}
