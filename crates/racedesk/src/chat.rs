// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `racedesk chat`: a local REPL against the orchestrator.

use colored::Colorize;
use racedesk_config::RacedeskConfig;
use racedesk_core::RacedeskError;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::runtime::Runtime;
use crate::serve::init_tracing;

/// Client id used for every terminal conversation.
pub const CLI_CLIENT_ID: &str = "CLI-local";

/// Runs the interactive chat until `/quit`, Ctrl+C or Ctrl+D.
pub async fn run_chat(config: RacedeskConfig, admin: bool) -> Result<(), RacedeskError> {
    init_tracing("warn");
    let runtime = Runtime::build(&config).await?;

    let mut rl = DefaultEditor::new()
        .map_err(|e| RacedeskError::Internal(format!("failed to initialize readline: {e}")))?;

    let profile = if admin { "admin" } else { "client" };
    println!("{} ({profile} profile)", "racedesk chat".bold().green());
    println!("Type {} to exit.\n", "/quit".yellow());

    let prompt = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match runtime
                    .orchestrator
                    .process_message(CLI_CLIENT_ID, trimmed, admin)
                    .await
                {
                    Ok(reply) => println!("{} {}\n", "bot>".cyan(), reply.text),
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    runtime.shutdown().await;
    println!("{}", "goodbye".dimmed());
    Ok(())
}
