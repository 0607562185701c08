//! Terminal rendering of the transcript.

use colored::Colorize;
use jay_core::transcript::{Sender, Transcript, TranscriptRenderer, latest_question_label};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Formats one turn for the terminal. Text is printed literally, one
/// coloured line per input line; Markdown is not interpreted.
pub fn format_turn(sender: Sender, text: &str, assistant_name: &str) -> String {
    match sender {
        Sender::User => text
            .lines()
            .map(|line| format!("> {line}").green().to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        Sender::Assistant => {
            let mut out = format!("[{assistant_name}]").bright_magenta().to_string();
            for line in text.lines() {
                out.push('\n');
                out.push_str(&line.bright_blue().to_string());
            }
            out.push('\n');
            out
        }
    }
}

/// Prints turns to a terminal while recording them in a `Transcript`.
pub struct TerminalRenderer {
    assistant_name: String,
    transcript: Arc<Transcript>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalRenderer {
    pub fn new(
        assistant_name: impl Into<String>,
        transcript: Arc<Transcript>,
        out: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            assistant_name: assistant_name.into(),
            transcript,
            out: Mutex::new(out),
        }
    }

    pub fn stdout(assistant_name: impl Into<String>, transcript: Arc<Transcript>) -> Self {
        Self::new(assistant_name, transcript, Box::new(std::io::stdout()))
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut out) = self.out.lock() {
            // A closed terminal is not worth failing the session over.
            let _ = writeln!(out, "{line}");
            let _ = out.flush();
        }
    }
}

impl TranscriptRenderer for TerminalRenderer {
    fn render_turn(&self, sender: Sender, text: &str) {
        self.transcript.render_turn(sender, text);
        self.write_line(&format_turn(sender, text, &self.assistant_name));
    }

    fn show_latest_question(&self, text: &str) {
        self.transcript.show_latest_question(text);
        self.write_line(&latest_question_label(text).bold().bright_black().to_string());
    }
}
