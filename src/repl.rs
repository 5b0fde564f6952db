//! Interactive question loop.
//!
//! Reads one question per line, answers it, and exits on a quit keyword or
//! end of input. This is a thin caller around [`Engine`]; it owns no
//! retrieval logic of its own.

use anyhow::Result;
use std::io::{self, BufRead, Write};

use crate::engine::Engine;

/// Words that end the session, checked case-insensitively.
const EXIT_KEYWORDS: [&str; 3] = ["exit", "quit", "bye"];

/// Run the read-evaluate-print loop until a quit keyword or end of input.
///
/// A failed answer is reported and the loop continues; only I/O errors on
/// the terminal itself abort the session.
pub async fn run_chat(engine: &Engine, show_context: bool) -> Result<()> {
    println!("Fleetwise — ask about the fleet (exit, quit, or bye to leave)");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\nYou: ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if EXIT_KEYWORDS.contains(&question.to_lowercase().as_str()) {
            println!("Session ended.");
            break;
        }

        if let Err(e) = answer_one(engine, question, show_context).await {
            eprintln!("Error: {:#}", e);
        }
    }

    Ok(())
}

async fn answer_one(engine: &Engine, question: &str, show_context: bool) -> Result<()> {
    let evidence = engine.retrieve(question).await?;

    if show_context {
        println!("\n--- Context ---");
        print!("{}", evidence.context);
        println!("---------------");
    }

    let answer = engine.synthesize(question, &evidence).await?;
    println!("\nAssistant:\n{}", answer);

    Ok(())
}
