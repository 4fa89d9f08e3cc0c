//! Terminal flashcard client for the vocab-service upload relay.
//!
//! Commands (one per line on stdin):
//!   upload <path>   send an image of a word list to the server
//!   eng             show a random English word, meaning follows in 5s
//!   kor             show a random Korean meaning, word follows in 5s
//!   speak           read the English word aloud
//!   show            print the current card
//!   quit

use service_core::observability::init_tracing;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use vocab_service::models::image_mime_from_extension;
use vocab_service::quiz::{
    CommandSpeaker, QuizDisplay, QuizSession, SpeechError, SpeechSynthesizer, UploadClient,
    Utterance,
};

const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Fallback when no TTS program is configured.
struct TerminalSpeaker;

impl SpeechSynthesizer for TerminalSpeaker {
    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        tracing::info!(lang = %utterance.lang, text = %utterance.text, "Speaking");
        println!("({}) {}", utterance.lang, utterance.text);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing("vocab-quiz", "warn", None);

    let server_url =
        std::env::var("VOCAB_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    let client = UploadClient::new(server_url.as_str())?;

    let speaker: Arc<dyn SpeechSynthesizer> = match std::env::var("VOCAB_TTS_COMMAND")
        .ok()
        .and_then(|cmd| CommandSpeaker::from_command_line(&cmd))
    {
        Some(speaker) => Arc::new(speaker),
        None => Arc::new(TerminalSpeaker),
    };

    let mut session = QuizSession::new(speaker);
    let printer = tokio::spawn(print_changes(session.subscribe()));

    println!("vocab-quiz connected to {}", server_url);
    println!("commands: upload <path> | eng | kor | speak | show | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = line
            .split_once(char::is_whitespace)
            .map(|(c, a)| (c, a.trim()))
            .unwrap_or((line, ""));

        match command {
            "" => {}
            "upload" => upload(&mut session, &client, arg).await,
            "eng" => {
                session.pick_random_english();
            }
            "kor" => {
                session.pick_random_korean();
            }
            "speak" => match session.speak_current_english() {
                Ok(true) => {}
                Ok(false) => println!("nothing to speak"),
                Err(e) => eprintln!("{}", e),
            },
            "show" => print_display(&session.display()),
            "quit" | "exit" => break,
            other => println!("unknown command: {}", other),
        }
    }

    printer.abort();
    Ok(())
}

async fn upload(session: &mut QuizSession, client: &UploadClient, arg: &str) {
    if arg.is_empty() {
        println!("usage: upload <path>");
        return;
    }

    let path = Path::new(arg);
    let image = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("cannot read {}: {}", path.display(), e);
            return;
        }
    };

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image");
    let mime_type = image_mime_from_extension(file_name).unwrap_or("application/octet-stream");

    // The session shows the outcome; the error detail goes to stderr.
    if let Err(e) = session.upload_image(client, image, file_name, mime_type).await {
        eprintln!("{}", e);
    }
}

async fn print_changes(mut rx: watch::Receiver<QuizDisplay>) {
    while rx.changed().await.is_ok() {
        let display = rx.borrow_and_update().clone();
        print_display(&display);
    }
}

fn print_display(display: &QuizDisplay) {
    let english = if display.english.is_empty() { "?" } else { display.english.as_str() };
    let translation = if display.translation.is_empty() && display.status.is_none() {
        "?"
    } else {
        display.translation.as_str()
    };
    println!("  {}  |  {}", english, translation);
}
