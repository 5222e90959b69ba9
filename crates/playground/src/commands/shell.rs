//! Interactive terminal over the project.

use super::context::Session;
use playground_core::terminal::{write_welcome, PROMPT};
use playground_core::AutosaveConfig;
use playground_exec::WriterTerminal;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Lines the shell handles itself before the terminal dispatcher.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Exit,
    Open(&'a str),
    Terminal(&'a str),
}

impl<'a> ShellCommand<'a> {
    fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        match trimmed.split_once(char::is_whitespace) {
            _ if trimmed == "exit" || trimmed == "quit" => ShellCommand::Exit,
            Some(("open", target)) if !target.trim().is_empty() => ShellCommand::Open(target.trim()),
            _ => ShellCommand::Terminal(trimmed),
        }
    }
}

/// Run the shell until `exit` or end of input.
pub async fn handle_shell(mut session: Session, autosave: &AutosaveConfig) -> anyhow::Result<()> {
    if autosave.is_enabled() {
        session.playground.enable_autosave(autosave);
    }

    let mut terminal = WriterTerminal::new(std::io::stdout());
    write_welcome(&mut terminal);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{PROMPT}");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match ShellCommand::parse(&line) {
            ShellCommand::Exit => break,
            ShellCommand::Open(target) => match session.playground.resolve(target) {
                Ok(node) => {
                    let id = node.id.clone();
                    session.playground.select(Some(&id)).await;
                    println!("Opened {target}");
                }
                Err(e) => println!("{e}"),
            },
            ShellCommand::Terminal(line) => {
                session.playground.terminal(line, &mut terminal);
            }
        }
        session.flush_notices();
    }

    tracing::info!(saves = session.playground.autosave_count(), "shell closed");
    session.playground.shutdown().await;
    session.finish().await
}
