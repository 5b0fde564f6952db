//! # Fleetwise CLI (`fleet`)
//!
//! The `fleet` binary answers natural-language questions about a vehicle
//! fleet by routing each question across three data stores (descriptions,
//! usage statistics, feature relations) and handing the fused evidence to
//! a text-generation model.
//!
//! ## Usage
//!
//! ```bash
//! fleet --config ./config/fleetwise.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fleet ask "<question>"` | Answer a single question and exit |
//! | `fleet chat` | Interactive question loop |
//! | `fleet plan "<question>"` | Show the retrieval plan without executing it |
//! | `fleet context "<question>"` | Retrieve and print the evidence context only |
//! | `fleet stats` | Dataset and model configuration overview |
//!
//! ## Examples
//!
//! ```bash
//! # One-shot question
//! fleet ask "Which car is best for long trips?"
//!
//! # Inspect what the router decides
//! fleet plan "What is the average distance for Car B?"
//!
//! # See the exact evidence handed to the generator
//! fleet context "Which car is best for long trips?"
//!
//! # Interactive session, printing the context before each answer
//! fleet chat --show-context
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use fleetwise::config;
use fleetwise::engine::Engine;
use fleetwise::repl;
use fleetwise::router;

/// Fleetwise CLI — multi-store retrieval and question answering over
/// vehicle fleet data.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/fleetwise.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "fleet",
    about = "Fleetwise — multi-store retrieval and question answering over vehicle fleet data",
    version,
    long_about = "Fleetwise routes each question to one or more fleet data stores (semantic \
    descriptions, usage statistics, feature relations), fuses the retrieved evidence into a \
    single context, and delegates the final answer to a text-generation model."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/fleetwise.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Answer a single question and exit.
    ///
    /// Routes the question, retrieves evidence from the planned stores,
    /// and calls the generation model. Fails if generation fails.
    Ask {
        /// The question to answer.
        question: String,

        /// Print the assembled evidence context before the answer.
        #[arg(long)]
        show_context: bool,
    },

    /// Interactive question loop.
    ///
    /// Reads one question per line and answers each; type `exit`, `quit`,
    /// or `bye` to leave.
    Chat {
        /// Print the assembled evidence context before each answer.
        #[arg(long)]
        show_context: bool,
    },

    /// Show the retrieval plan for a question without executing it.
    ///
    /// Prints which stores would be consulted and the extracted target
    /// car name, as JSON.
    Plan {
        /// The question to route.
        question: String,
    },

    /// Retrieve and print the evidence context without generating an answer.
    Context {
        /// The question to retrieve evidence for.
        question: String,
    },

    /// Show dataset and model configuration overview.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // `plan` is pure routing; it needs neither config nor data.
    if let Commands::Plan { question } = &cli.command {
        let plan = router::plan(question);
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Ask {
            question,
            show_context,
        } => {
            let engine = Engine::new(cfg)?;
            let evidence = engine.retrieve(&question).await?;

            if show_context {
                println!("--- Context ---");
                print!("{}", evidence.context);
                println!("---------------\n");
            }

            let answer = engine.synthesize(&question, &evidence).await?;
            println!("{}", answer);
        }
        Commands::Chat { show_context } => {
            let engine = Engine::new(cfg)?;
            repl::run_chat(&engine, show_context).await?;
        }
        Commands::Context { question } => {
            let engine = Engine::new(cfg)?;
            let evidence = engine.retrieve(&question).await?;
            print!("{}", evidence.context);
        }
        Commands::Stats => {
            let engine = Engine::new(cfg)?;
            print_stats(&engine);
        }
        Commands::Plan { .. } => unreachable!(),
    }

    Ok(())
}

fn print_stats(engine: &Engine) {
    println!("Fleetwise — Dataset Stats");
    println!("=========================");
    println!();
    println!("  Descriptions: {}", engine.doc_count());
    println!("  Stat rows:    {}", engine.stat_count());
    println!("  Relations:    {}", engine.relation_count());
    println!();
    println!(
        "  Semantic index: {}",
        if engine.semantic_indexed() {
            "built"
        } else {
            "not built"
        }
    );
    println!(
        "  Embedding:      {}",
        engine.embedding_model().unwrap_or("disabled")
    );
    println!("  Generator:      {}", engine.generation_model());
}
