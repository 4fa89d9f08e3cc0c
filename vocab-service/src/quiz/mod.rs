//! Client-side quiz session: the word list, the flashcard display and the
//! delayed reveal of the answer.

pub mod client;
pub mod display;
pub mod reveal;
pub mod session;
pub mod speech;

pub use client::{ClientError, UploadClient};
pub use display::{Prompt, QuizDisplay, QuizStatus};
pub use reveal::RevealTimer;
pub use session::{QuizSession, REVEAL_DELAY};
pub use speech::{CommandSpeaker, SpeechError, SpeechSynthesizer, Utterance};
