//! Builtin REPL commands.
//!
//! Anything that is not a command is submitted to the assistant.

use std::sync::OnceLock;

/// A builtin slash command.
#[derive(Debug, Clone)]
pub struct BuiltinCommand {
    /// Command name (without the leading /)
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
}

impl BuiltinCommand {
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description }
    }

    pub fn usage(&self) -> String {
        format!("/{}", self.name)
    }
}

static BUILTIN_COMMANDS: OnceLock<Vec<BuiltinCommand>> = OnceLock::new();

/// Returns all builtin commands, initialized on first access.
pub fn builtin_commands() -> &'static [BuiltinCommand] {
    BUILTIN_COMMANDS.get_or_init(|| {
        vec![
            BuiltinCommand::new("help", "Show available commands"),
            BuiltinCommand::new("history", "Print the conversation sent to the assistant"),
            BuiltinCommand::new("name", "Show the name you introduced yourself with"),
            BuiltinCommand::new("quit", "Exit the chat"),
        ]
    })
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Help,
    History,
    Name,
    Quit,
    /// A slash command that does not exist.
    Unknown(String),
    /// A chat message for the assistant.
    Message(String),
}

/// Classifies an input line. `quit` and `exit` work without the slash.
pub fn parse_input(line: &str) -> ReplInput {
    let trimmed = line.trim();

    if trimmed == "quit" || trimmed == "exit" {
        return ReplInput::Quit;
    }

    let Some(command) = trimmed.strip_prefix('/') else {
        return ReplInput::Message(line.to_string());
    };

    match command.split_whitespace().next().unwrap_or("") {
        "help" => ReplInput::Help,
        "history" => ReplInput::History,
        "name" => ReplInput::Name,
        "quit" | "exit" => ReplInput::Quit,
        other => ReplInput::Unknown(other.to_string()),
    }
}
