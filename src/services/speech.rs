use anyhow::Result;

/// Fire-and-forget narration of an episode script.
pub trait Speaker {
    fn speak(&self, text: &str) -> Result<()>;
    /// Stops whatever is being narrated. Nothing happens when idle.
    fn cancel(&self) -> Result<()>;
}

// --- Browser ---

#[cfg(target_arch = "wasm32")]
pub use web::WebSpeaker;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::Speaker;
    use anyhow::{anyhow, Result};
    use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance};

    pub struct WebSpeaker {
        lang: String,
    }

    impl WebSpeaker {
        pub fn new(lang: &str) -> Self {
            Self { lang: lang.to_string() }
        }
    }

    fn synthesis() -> Result<SpeechSynthesis> {
        let window = web_sys::window().ok_or_else(|| anyhow!("No window available"))?;
        window
            .speech_synthesis()
            .map_err(|e| anyhow!("Speech synthesis unavailable: {:?}", e))
    }

    impl Speaker for WebSpeaker {
        fn speak(&self, text: &str) -> Result<()> {
            let utterance = SpeechSynthesisUtterance::new_with_text(text)
                .map_err(|e| anyhow!("Failed to create utterance: {:?}", e))?;
            utterance.set_lang(&self.lang);
            synthesis()?.speak(&utterance);
            Ok(())
        }

        fn cancel(&self) -> Result<()> {
            synthesis()?.cancel();
            Ok(())
        }
    }
}

// --- Terminal ---

#[cfg(not(target_arch = "wasm32"))]
pub use console::ConsoleSpeaker;

#[cfg(not(target_arch = "wasm32"))]
mod console {
    use super::Speaker;
    use anyhow::{anyhow, Result};
    use std::io::Write;
    use std::sync::Mutex;

    /// Narrates into a terminal (or any writer) by reading the script aloud as text.
    pub struct ConsoleSpeaker<W: Write> {
        lang: String,
        out: Mutex<W>,
        speaking: Mutex<bool>,
    }

    impl ConsoleSpeaker<std::io::Stdout> {
        pub fn stdout(lang: &str) -> Self {
            Self::new(lang, std::io::stdout())
        }
    }

    impl<W: Write> ConsoleSpeaker<W> {
        pub fn new(lang: &str, out: W) -> Self {
            Self {
                lang: lang.to_string(),
                out: Mutex::new(out),
                speaking: Mutex::new(false),
            }
        }

        pub fn is_speaking(&self) -> bool {
            self.speaking.lock().map(|s| *s).unwrap_or(false)
        }

        pub fn into_inner(self) -> Result<W> {
            self.out.into_inner().map_err(|_| anyhow!("Speaker output poisoned"))
        }
    }

    impl<W: Write> Speaker for ConsoleSpeaker<W> {
        fn speak(&self, text: &str) -> Result<()> {
            {
                let mut out = self.out.lock().map_err(|_| anyhow!("Speaker output poisoned"))?;
                writeln!(out, "[narrator {}]", self.lang)?;
                writeln!(out, "{}", text)?;
                out.flush()?;
            }
            *self.speaking.lock().map_err(|_| anyhow!("Speaker state poisoned"))? = true;
            Ok(())
        }

        fn cancel(&self) -> Result<()> {
            let mut speaking = self.speaking.lock().map_err(|_| anyhow!("Speaker state poisoned"))?;
            if !*speaking {
                return Ok(());
            }
            *speaking = false;
            let mut out = self.out.lock().map_err(|_| anyhow!("Speaker output poisoned"))?;
            writeln!(out, "[narration stopped]")?;
            Ok(())
        }
    }
}
