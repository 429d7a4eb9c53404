use anyhow::Result;
use colloquy::notify::{Notifier, NotifyKind};
use colloquy::scorer::HeuristicScorer;
use colloquy::store::FileStore;
use colloquy::{ChatSession, Config};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::env;

struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, kind: NotifyKind, title: &str, message: &str) {
        match kind {
            NotifyKind::Error => eprintln!("{} {}", format!("[{}]", title).red().bold(), message),
            NotifyKind::Info => println!("{} {}", format!("[{}]", title).cyan().bold(), message),
        }
    }
}

fn print_help() {
    println!("commands: /new, /list, /switch N, /help, /quit");
}

#[tokio::main]
async fn main() -> Result<()> {
    flexi_logger::Logger::try_with_env_or_str("info")?.start()?;

    let config = Config::load_or_init()?;
    let store = FileStore::open(FileStore::default_path()?)?;
    let mut session = ChatSession::new(
        config,
        Box::new(store),
        Box::new(HeuristicScorer),
        Box::new(TerminalNotifier),
    )?;

    if session.api_key().is_empty() {
        if let Ok(key) = env::var("OPENAI_API_KEY") {
            session.set_api_key(key)?;
        } else {
            eprintln!("{}", "no API key found; set OPENAI_API_KEY".yellow());
        }
    }

    if session.conversations().is_empty() {
        session.start_new_conversation(None)?;
    }
    print_help();

    let mut editor = DefaultEditor::new()?;
    loop {
        let title = session
            .conversations()
            .current()
            .map(|c| c.title.clone())
            .unwrap_or_default();
        let line = match editor.readline(&format!("{} > ", title.bold())) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        editor.add_history_entry(&line)?;

        match line.as_str() {
            "/quit" => break,
            "/help" => print_help(),
            "/new" => {
                session.start_new_conversation(None)?;
            }
            "/list" => {
                for (i, conversation) in session.conversations().as_slice().iter().enumerate() {
                    let marker = if i == session.conversations().current_index() {
                        "*"
                    } else {
                        " "
                    };
                    println!(
                        "{} [{}] {} ({} messages)",
                        marker,
                        i,
                        conversation.title,
                        conversation.messages.len()
                    );
                }
            }
            _ if line.starts_with("/switch ") => {
                match line["/switch ".len()..].trim().parse::<usize>() {
                    Ok(index) => {
                        if let Err(e) = session.switch_conversation(index) {
                            eprintln!("{}", e.to_string().red());
                        }
                    }
                    Err(_) => eprintln!("{}", "usage: /switch N".red()),
                }
            }
            _ => {
                session.set_input(line);
                if let Err(e) = session.submit().await {
                    eprintln!("{}", e.to_string().red());
                    continue;
                }
                if let Some(reply) = session
                    .conversations()
                    .current()
                    .and_then(|c| c.messages.last())
                {
                    println!("{}", reply.content.green());
                }
                println!(
                    "{} {} ({:+}) {}",
                    "score:".dimmed(),
                    session.score(),
                    session.last_score_change(),
                    session.last_feedback().dimmed()
                );
                if let Some(prompt) = session.current_prompt() {
                    println!("{} {}", "suggested:".dimmed(), prompt.dimmed());
                }
            }
        }
    }

    Ok(())
}
