mod commands;
mod logging;
mod renderer;

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::task::JoinHandle;

use jay_core::config::AppConfig;
use jay_core::session::Session;
use jay_core::transcript::Transcript;
use jay_infrastructure::{ConfigService, JayPaths};
use jay_interaction::{ChatController, CompletionClient};

use commands::{ReplInput, builtin_commands, parse_input};
use renderer::TerminalRenderer;

/// Chat with Jay, the L'Oréal Paris beauty assistant.
#[derive(Parser, Debug)]
#[command(name = "jay", version, about)]
struct Args {
    /// Path to config.toml (defaults to ~/.config/jay/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for config, input history and logs (defaults to ~/.config/jay)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Relay endpoint receiving chat-completion requests
    #[arg(long)]
    endpoint: Option<String>,

    /// Model identifier sent with every request
    #[arg(long)]
    model: Option<String>,

    /// Also print logs to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Command-line flags take precedence over file and environment.
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.relay.endpoint = endpoint.clone();
        }
        if let Some(model) = &self.model {
            config.relay.model = model.clone();
        }
    }
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: builtin_commands().iter().map(|c| c.usage()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn print_help() {
    for command in builtin_commands() {
        println!(
            "  {:<10} {}",
            command.usage().bright_cyan(),
            command.description.bright_black()
        );
    }
}

async fn print_history(controller: &ChatController) {
    for message in controller.history().await.iter() {
        println!("{}", format!("[{}] {}", message.role, message.timestamp).bright_black());
        for line in message.content.lines() {
            println!("  {line}");
        }
    }
}

/// The main entry point for the Jay readline REPL.
///
/// Loads configuration, sets up tracing, and runs a rustyline loop in which
/// every chat message is answered on a background task, so the prompt stays
/// responsive while a reply is pending.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ===== Configuration =====
    let paths = JayPaths::new(args.config_dir.clone());
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => paths.config_file()?,
    };
    let mut config = ConfigService::new(config_path)
        .load_with_env()
        .context("Failed to load configuration")?;
    args.apply_overrides(&mut config);

    let logs_dir = paths.logs_dir()?;
    let _log_guard = logging::init_tracing(&config.logging.level, &logs_dir, args.verbose)?;
    tracing::info!(
        endpoint = %config.relay.endpoint,
        model = %config.relay.model,
        "Starting jay"
    );

    // ===== Session =====
    let client = CompletionClient::from_config(&config)?;
    let transcript = Arc::new(Transcript::new());
    let renderer = Arc::new(TerminalRenderer::stdout(
        config.persona.name.clone(),
        transcript.clone(),
    ));
    let controller = Arc::new(ChatController::new(
        Session::new(&config.persona),
        Arc::new(client),
        renderer,
        config.session.overlap,
    ));
    tracing::info!(session_id = %controller.session_id().await, "Session started");

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));
    let history_file = paths.history_file()?;
    if rl.load_history(&history_file).is_err() {
        tracing::debug!(path = %history_file.display(), "No readline history yet");
    }

    println!("{}", format!("=== {} ===", config.persona.name).bright_magenta().bold());
    println!(
        "{}",
        "Ask about products, routines and beauty tips. Type '/help' for commands or 'quit' to exit."
            .bright_black()
    );
    println!();

    let mut pending: Vec<JoinHandle<()>> = Vec::new();

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                match parse_input(&line) {
                    ReplInput::Quit => {
                        println!("{}", "Happy pampering! 💖".bright_green());
                        break;
                    }
                    ReplInput::Help => print_help(),
                    ReplInput::History => print_history(&controller).await,
                    ReplInput::Name => match controller.user_name().await {
                        Some(name) => println!("{}", format!("Your name: {name}").bright_black()),
                        None => println!("{}", "You haven't told me your name yet.".bright_black()),
                    },
                    ReplInput::Unknown(command) => {
                        println!("{}", format!("Unknown command: /{command}").bright_black());
                    }
                    ReplInput::Message(message) => {
                        pending.retain(|handle| !handle.is_finished());
                        let controller = Arc::clone(&controller);
                        pending.push(tokio::spawn(async move {
                            if let Err(e) = controller.submit(&message).await {
                                eprintln!("{}", e.to_string().yellow());
                            }
                        }));
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    // Let replies already on their way finish rendering.
    for handle in pending {
        let _ = handle.await;
    }

    if let Some(parent) = history_file.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = rl.save_history(&history_file) {
        tracing::warn!(error = %e, "Failed to save readline history");
    }

    tracing::info!(turns = transcript.len(), "Session ended");
    Ok(())
}
