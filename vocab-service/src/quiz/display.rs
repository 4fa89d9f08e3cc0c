use crate::models::WordPair;

/// Status messages that temporarily replace the word display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStatus {
    /// A pick was requested before any word list was loaded.
    UploadFirst,
    Loading,
    ListLoaded,
    NoWordsFound,
    Error,
}

impl QuizStatus {
    /// Text shown in the word area.
    pub fn headline(self) -> &'static str {
        match self {
            QuizStatus::UploadFirst => "Please upload a word list first!",
            QuizStatus::Loading => "Analyzing image...",
            QuizStatus::ListLoaded => "Word list loaded!",
            QuizStatus::NoWordsFound => "No words found in the image.",
            QuizStatus::Error => "Error!",
        }
    }

    /// Text shown in the translation area.
    pub fn detail(self) -> &'static str {
        match self {
            QuizStatus::UploadFirst | QuizStatus::Loading => "",
            QuizStatus::ListLoaded => "Start studying now.",
            QuizStatus::NoWordsFound => "Try another image.",
            QuizStatus::Error => "There was a problem processing the image.",
        }
    }
}

/// Which side of the card a pick shows first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    English,
    Korean,
}

/// Everything the flashcard UI renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizDisplay {
    /// Word currently on the card.
    pub word: Option<WordPair>,
    pub prompt: Option<Prompt>,
    /// Whether the hidden side has been revealed.
    pub answer_revealed: bool,
    pub status: Option<QuizStatus>,
    /// Word area text.
    pub english: String,
    /// Translation area text.
    pub translation: String,
    pub speak_enabled: bool,
}

impl QuizDisplay {
    pub fn with_status(status: QuizStatus) -> Self {
        Self {
            status: Some(status),
            english: status.headline().to_string(),
            translation: status.detail().to_string(),
            ..Self::default()
        }
    }

    /// English card text, if the word area currently shows a word rather than
    /// a status message.
    pub fn speakable_english(&self) -> Option<&str> {
        if self.status.is_some() || !self.speak_enabled {
            return None;
        }
        Some(self.english.as_str()).filter(|text| !text.trim().is_empty())
    }

    pub(crate) fn show_english(word: WordPair) -> Self {
        Self {
            english: word.eng.clone(),
            translation: String::new(),
            speak_enabled: true,
            prompt: Some(Prompt::English),
            word: Some(word),
            ..Self::default()
        }
    }

    pub(crate) fn show_korean(word: WordPair) -> Self {
        Self {
            english: String::new(),
            translation: word.kor.clone(),
            speak_enabled: false,
            prompt: Some(Prompt::Korean),
            word: Some(word),
            ..Self::default()
        }
    }

    /// Show the hidden side of the current card.
    pub(crate) fn reveal_answer(&mut self) {
        let Some(word) = &self.word else {
            return;
        };

        match self.prompt {
            Some(Prompt::English) => self.translation = word.kor.clone(),
            Some(Prompt::Korean) => {
                self.english = word.eng.clone();
                self.speak_enabled = true;
            }
            None => return,
        }
        self.answer_revealed = true;
    }
}
