use super::client::{ClientError, UploadClient};
use super::display::{QuizDisplay, QuizStatus};
use super::reveal::RevealTimer;
use super::speech::{SpeechError, SpeechSynthesizer, Utterance};
use crate::models::WordPair;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// How long the hidden side of a card stays hidden.
pub const REVEAL_DELAY: Duration = Duration::from_secs(5);

/// One learner's flashcard session.
///
/// Owns the current word list and publishes the card display through a watch
/// channel; UIs render whatever [`QuizSession::subscribe`] yields. Actions
/// must run inside a Tokio runtime because picks schedule a delayed reveal.
pub struct QuizSession {
    words: Vec<WordPair>,
    display: Arc<watch::Sender<QuizDisplay>>,
    reveal: RevealTimer<QuizDisplay>,
    rng: StdRng,
    reveal_delay: Duration,
    speaker: Arc<dyn SpeechSynthesizer>,
}

impl QuizSession {
    pub fn new(speaker: Arc<dyn SpeechSynthesizer>) -> Self {
        let (tx, _rx) = watch::channel(QuizDisplay::default());
        let display = Arc::new(tx);

        Self {
            words: Vec::new(),
            reveal: RevealTimer::new(Arc::clone(&display)),
            display,
            rng: StdRng::from_entropy(),
            reveal_delay: REVEAL_DELAY,
            speaker,
        }
    }

    /// Use a specific random source (seeded sessions are reproducible).
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<QuizDisplay> {
        self.display.subscribe()
    }

    /// Snapshot of the current display.
    pub fn display(&self) -> QuizDisplay {
        self.display.borrow().clone()
    }

    pub fn words(&self) -> &[WordPair] {
        &self.words
    }

    pub fn has_pending_reveal(&self) -> bool {
        self.reveal.is_pending()
    }

    /// Show a random English word now and its meaning after the reveal delay.
    pub fn pick_random_english(&mut self) -> Option<WordPair> {
        let word = self.pick()?;
        self.show(QuizDisplay::show_english(word.clone()));
        self.reveal
            .schedule(self.reveal_delay, QuizDisplay::reveal_answer);
        Some(word)
    }

    /// Show a random Korean meaning now and its English word after the delay.
    pub fn pick_random_korean(&mut self) -> Option<WordPair> {
        let word = self.pick()?;
        self.show(QuizDisplay::show_korean(word.clone()));
        self.reveal
            .schedule(self.reveal_delay, QuizDisplay::reveal_answer);
        Some(word)
    }

    /// Replace the word list wholesale. Returns the new list length.
    pub fn load_word_list(&mut self, pairs: Vec<WordPair>) -> usize {
        self.words = pairs;

        let status = if self.words.is_empty() {
            QuizStatus::NoWordsFound
        } else {
            QuizStatus::ListLoaded
        };
        self.show(QuizDisplay::with_status(status));

        tracing::info!(words = self.words.len(), "Word list loaded");
        self.words.len()
    }

    /// Enter the loading state while an upload is in flight.
    pub fn begin_upload(&mut self) {
        self.show(QuizDisplay::with_status(QuizStatus::Loading));
    }

    /// Report a failed upload. The previous word list stays usable.
    pub fn fail_upload(&mut self) {
        self.show(QuizDisplay::with_status(QuizStatus::Error));
    }

    /// Upload an image through `client` and load the words it yields.
    pub async fn upload_image(
        &mut self,
        client: &UploadClient,
        image: Vec<u8>,
        file_name: &str,
        mime_type: &str,
    ) -> Result<usize, ClientError> {
        self.begin_upload();

        match client.upload(image, file_name, mime_type).await {
            Ok(pairs) => Ok(self.load_word_list(pairs)),
            Err(e) => {
                tracing::error!(error = %e, file_name, "Word list upload failed");
                self.fail_upload();
                Err(e)
            }
        }
    }

    /// Speak the English word on the card. Returns `false` (and does nothing)
    /// when the card shows no English word.
    pub fn speak_current_english(&self) -> Result<bool, SpeechError> {
        let text = self
            .display
            .borrow()
            .speakable_english()
            .map(str::to_string);

        match text {
            Some(text) => {
                self.speaker.speak(&Utterance::english(text))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn pick(&mut self) -> Option<WordPair> {
        if self.words.is_empty() {
            self.show(QuizDisplay::with_status(QuizStatus::UploadFirst));
            return None;
        }

        let index = self.rng.gen_range(0..self.words.len());
        Some(self.words[index].clone())
    }

    /// Replace the display, superseding any pending reveal first.
    fn show(&mut self, display: QuizDisplay) {
        self.reveal.cancel();
        self.display.send_replace(display);
    }
}
