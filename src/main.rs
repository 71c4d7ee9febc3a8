//! # FAQ Agent CLI (`faq`)
//!
//! The `faq` binary answers support questions from the built-in knowledge
//! base, falling back to an external chat model (or a generic reply) when no
//! entry matches confidently.
//!
//! ## Usage
//!
//! ```bash
//! faq --config ./config/faq.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `faq ask "<question>"` | Answer a single question |
//! | `faq match "<question>"` | Show every candidate's match score |
//! | `faq questions` | List the knowledge-base questions |
//! | `faq chat` | Interactive question/answer loop |
//!
//! The `OPENAI_API_KEY` environment variable enables the external fallback;
//! without it, unmatched questions get a fixed generic reply.

use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use faq_agent::agent::SupportAgent;
use faq_agent::config;
use faq_agent::matcher::similarity_score;

/// FAQ Agent CLI — answer support questions from a fixed knowledge base,
/// with an LLM fallback for everything else.
#[derive(Parser)]
#[command(
    name = "faq",
    about = "FAQ Agent — knowledge-base question answering with an LLM fallback",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/faq.toml`. A missing file is fine — all
    /// settings have defaults.
    #[arg(long, global = true, default_value = "./config/faq.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Answer a single question.
    ///
    /// Prints the answer followed by a status line showing whether it came
    /// from the knowledge base and the match score.
    Ask {
        /// The question to answer.
        question: String,

        /// Emit the answer as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show match scores for every knowledge-base question.
    ///
    /// Ranks all candidates against the query and marks the acceptance
    /// threshold. Useful for tuning `[matching]` settings.
    Match {
        /// The query to score.
        question: String,

        /// Maximum number of candidates to show.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List the questions the agent can answer from its knowledge base.
    Questions,

    /// Interactive question/answer loop.
    ///
    /// Reads questions from stdin until EOF or an empty line.
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Ask { question, json } => {
            if question.trim().is_empty() {
                anyhow::bail!("Please enter a question.");
            }
            let agent = SupportAgent::from_config(&cfg)?;
            let answer = agent.answer(&question).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                println!("{}", answer.text);
                println!();
                if answer.matched {
                    println!("Answered from the knowledge base (match score: {:.2}).", answer.score);
                } else {
                    println!(
                        "No confident knowledge-base match (best score: {:.2}); used the fallback reply.",
                        answer.score
                    );
                }
            }
        }
        Commands::Match { question, limit } => {
            let agent = SupportAgent::from_config(&cfg)?;
            let params = agent.params();

            let mut scored: Vec<(f64, &str)> = agent
                .knowledge()
                .iter()
                .map(|item| {
                    (
                        similarity_score(&question, &item.question, params),
                        item.question.as_str(),
                    )
                })
                .collect();

            // Stable sort keeps knowledge-base order for equal scores.
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
            scored.truncate(limit.unwrap_or(scored.len()));

            for (i, (score, question)) in scored.iter().enumerate() {
                let marker = if *score >= params.accept_threshold {
                    "*"
                } else {
                    " "
                };
                println!("{}. [{:.2}]{} {}", i + 1, score, marker, question);
            }
            println!();
            println!("acceptance threshold: {:.2} (* = would match)", params.accept_threshold);
        }
        Commands::Questions => {
            let agent = SupportAgent::from_config(&cfg)?;
            for (i, item) in agent.knowledge().iter().enumerate() {
                println!("{}. {}", i + 1, item.question);
            }
        }
        Commands::Chat => {
            let agent = SupportAgent::from_config(&cfg)?;
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();

            println!("Ask about Thoughtful AI's healthcare automation agents. Empty line exits.");
            loop {
                print!("> ");
                stdout.flush()?;

                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let question = line.trim();
                if question.is_empty() {
                    break;
                }

                let answer = agent.answer(question).await;
                println!("{}", answer.text);
                if answer.matched {
                    println!("  (knowledge base, score {:.2})", answer.score);
                } else {
                    println!("  (fallback, best score {:.2})", answer.score);
                }
                println!();
            }
        }
    }

    Ok(())
}
