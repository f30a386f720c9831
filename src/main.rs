//! # Tagster — FAQ assistant CLI
//!
//! Usage:
//!   tagster ask "What are your hours?"
//!   tagster config
//!
//! The CLI owns input validation, logging, and error display; all answer
//! logic lives in the `tagster-faq` crate.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tagster_core::TagsterConfig;
use tagster_core::types::AnswerSource;
use tagster_faq::FaqMatcher;

#[derive(Parser)]
#[command(
    name = "tagster",
    version,
    about = "FAQ assistant — semantic matching with LLM fallback"
)]
struct Cli {
    /// Path to config file (default: ~/.tagster/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the FAQ source path
    #[arg(long)]
    faq: Option<PathBuf>,

    /// Override the similarity threshold
    #[arg(long)]
    threshold: Option<f32>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a question
    Ask { question: String },
    /// Print the resolved configuration (API key redacted)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &cli.config {
        Some(path) => TagsterConfig::load_from(path)?,
        None => TagsterConfig::load()?,
    };
    if let Some(faq) = &cli.faq {
        config.faq.path = faq.display().to_string();
    }
    if let Some(threshold) = cli.threshold {
        config.faq.similarity_threshold = threshold;
    }

    match cli.command {
        Command::Ask { question } => ask(&config, &question).await,
        Command::Config => show_config(&config),
    }
}

async fn ask(config: &TagsterConfig, question: &str) -> Result<()> {
    if !is_substantive_question(question) {
        anyhow::bail!("the question must contain at least one letter or digit");
    }

    let embedder = tagster_providers::create_embedder(config)?;
    let completer = tagster_providers::create_completer(config)?;
    let matcher = FaqMatcher::new(config, embedder, completer);

    match matcher.answer_detailed(question).await {
        Ok(answer) => {
            match &answer.source {
                AnswerSource::Faq { question, score } => {
                    tracing::debug!(matched = %question, score, "answered from FAQ store");
                }
                AnswerSource::Generated => {
                    tracing::debug!("answered by completion service");
                }
            }
            println!("{}", answer.text);
            Ok(())
        }
        Err(e) => {
            let cause = anyhow::Error::from(e);
            tracing::error!("failed to answer question: {cause:#}");
            anyhow::bail!("could not answer the question right now, please try again")
        }
    }
}

fn show_config(config: &TagsterConfig) -> Result<()> {
    let mut redacted = config.clone();
    if !redacted.api_key.is_empty() {
        redacted.api_key = "<redacted>".into();
    }
    print!("{}", toml::to_string_pretty(&redacted)?);
    Ok(())
}

/// A question must contain at least one letter or digit once whitespace and
/// punctuation are stripped.
fn is_substantive_question(question: &str) -> bool {
    question.chars().any(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_validation() {
        assert!(is_substantive_question("What are your hours?"));
        assert!(is_substantive_question("24/7?"));
        assert!(!is_substantive_question(""));
        assert!(!is_substantive_question("   "));
        assert!(!is_substantive_question("?!... ---"));
    }
}
