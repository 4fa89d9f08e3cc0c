use thiserror::Error;

/// Language tag used for English playback.
pub const ENGLISH_VOICE: &str = "en-US";

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Speech synthesis unavailable: {0}")]
    Unavailable(String),

    #[error("Speech synthesis failed: {0}")]
    Failed(String),
}

/// Text to speak and the voice language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
}

impl Utterance {
    pub fn english(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: ENGLISH_VOICE.to_string(),
        }
    }
}

/// Text-to-speech backend. `speak` starts playback and returns without
/// waiting for it to finish.
pub trait SpeechSynthesizer: Send + Sync {
    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;
}

/// Speaks by running an external TTS program (e.g. `espeak-ng -v en-us`,
/// `say`) with the text as its last argument.
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    /// Parse a whitespace-separated command line. Returns `None` when blank.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next()?;

        Some(Self {
            program,
            args: words.collect(),
        })
    }
}

impl SpeechSynthesizer for CommandSpeaker {
    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        // The runtime reaps the child once it exits.
        tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(&utterance.text)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| SpeechError::Unavailable(format!("{}: {}", self.program, e)))?;

        tracing::debug!(
            program = %self.program,
            lang = %utterance.lang,
            "Started speech playback"
        );
        Ok(())
    }
}
