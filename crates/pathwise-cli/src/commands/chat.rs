use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use pathwise_application::{AppServices, MessageReply};
use pathwise_core::config::LoggingSettings;
use pathwise_execution::{DEFAULT_EVENT_CAPACITY, PipelineEventLayer, RecentEvents, init_tracing};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;
use tokio::time::timeout;

use super::render;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Completion, highlighting and hints for slash commands.
#[derive(Clone)]
struct ChatHelper {
    commands: Vec<String>,
}

impl ChatHelper {
    fn new() -> Self {
        Self {
            commands: vec!["/reset".to_string(), "/session".to_string()],
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
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

impl Highlighter for ChatHelper {
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

impl Hinter for ChatHelper {
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

impl Validator for ChatHelper {}

/// Runs the interactive dialog for `user` until `quit` or Ctrl-D.
pub async fn run(config: Option<PathBuf>, user: &str, show_events: bool) -> Result<()> {
    let config = super::load_config(config)?;

    // Formatted logs share stdout with the prompt, so only warnings get through.
    let logging = LoggingSettings {
        level: "warn".to_string(),
        json: false,
    };
    let mut layer = PipelineEventLayer::new(RecentEvents::new(DEFAULT_EVENT_CAPACITY));
    let mut event_rx = None;
    if show_events {
        let (tx, rx) = mpsc::unbounded_channel();
        layer = layer.with_forwarding(tx);
        event_rx = Some(rx);
    }
    init_tracing(&logging, Some(layer))?;

    if let Some(mut rx) = event_rx {
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                println!(
                    "{}",
                    format!("  [{}] {}", event.target, event.message).bright_black()
                );
            }
        });
    }

    let services = AppServices::from_config(&config)?;
    let orchestrator = services.orchestrator;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ChatHelper::new()));

    println!("{}", "=== Pathwise ===".bright_magenta().bold());
    println!(
        "{}",
        "Tell me what you want to plan. '/reset' starts over, '/session' shows progress, 'quit' exits."
            .bright_black()
    );
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match trimmed {
                    "/reset" => match orchestrator.reset(user).await {
                        Ok(()) => println!("{}", "Conversation reset".bright_green()),
                        Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                    },
                    "/session" => match orchestrator.session(user).await {
                        Ok(session) => {
                            let slots: Vec<&str> =
                                session.missing_slots.iter().map(String::as_str).collect();
                            println!(
                                "{}",
                                format!("phase {} | missing: {}", session.phase, slots.join(", "))
                                    .bright_black()
                            );
                        }
                        Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                    },
                    text => match timeout(REQUEST_TIMEOUT, orchestrator.handle_message(user, text)).await {
                        Ok(Ok(reply)) => print_reply(&reply),
                        Ok(Err(e)) => eprintln!("{}", format!("Error: {}", e).red()),
                        Err(_) => eprintln!("{}", "Error: Request timed out.".red()),
                    },
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

    Ok(())
}

fn print_reply(reply: &MessageReply) {
    match reply {
        MessageReply::Text(text) => {
            for line in text.lines() {
                println!("{}", line.bright_blue());
            }
        }
        MessageReply::Plan(plan) => {
            for line in render::plan_lines(plan) {
                if line.starts_with("Unavailable") || line.starts_with("  warning") {
                    println!("{}", line.yellow());
                } else {
                    println!("{}", line.bright_blue());
                }
            }
        }
    }
    println!();
}
