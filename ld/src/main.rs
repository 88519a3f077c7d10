//! LetterDraft - claim letter drafting assistant
//!
//! CLI entry point for creating claims, checking them for gaps, drafting
//! letters, and revising them conversationally.

use std::fs;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};
use uuid::Uuid;

use claimstore::ClaimStore;
use letterdraft::cli::{Cli, Command};
use letterdraft::config::Config;
use letterdraft::domain::{ClaimRecord, GenerationTurn, SessionTracker, Tone, find_template};
use letterdraft::llm::{LlmClient, create_client};
use letterdraft::pipeline::{ClaimGateway, CorrectionEngine, DraftGenerator, GapDetector, GapQuestion, PipelineError};
use letterdraft::prompts::PromptLoader;
use letterdraft::BUILTIN_TEMPLATES;

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    // Log level priority: CLI --log-level > default (WARN, to keep stdout clean)
    let level = if let Some(s) = cli_log_level {
        match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", s);
                tracing::Level::WARN
            }
        }
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::New { file } => cmd_new(&config, &file),
        Command::Show { claim_id } => cmd_show(&config, &claim_id),
        Command::List => cmd_list(&config),
        Command::Templates => cmd_templates(),
        Command::Gaps { claim_id } => cmd_gaps(&config, &claim_id).await,
        Command::Draft {
            claim_id,
            template,
            tone,
            skip_gap_check,
        } => cmd_draft(&config, &claim_id, template.as_deref(), tone, skip_gap_check).await,
        Command::Correct {
            claim_id,
            instruction,
            tone,
        } => cmd_correct(&config, &claim_id, &instruction, tone).await,
    }
}

/// Open the claims store configured for this run
fn open_store(config: &Config) -> Result<Arc<ClaimStore>> {
    debug!(db_path = ?config.storage.db_path, "open_store: called");
    let store = ClaimStore::open(&config.storage.db_path).context("Failed to open claims store")?;
    Ok(Arc::new(store))
}

/// Fetch a claim or fail with a not-found error
fn load_claim(store: &ClaimStore, claim_id: &str) -> Result<ClaimRecord> {
    store
        .get_claim(claim_id)?
        .ok_or_else(|| eyre::Report::from(PipelineError::ClaimNotFound(claim_id.to_string())))
}

/// Create a claim record from an intake file
fn cmd_new(config: &Config, file: &std::path::Path) -> Result<()> {
    debug!(?file, "cmd_new: called");
    let content = fs::read_to_string(file).context(format!("Failed to read {}", file.display()))?;

    // YAML is a superset of JSON, so one parser covers both intake formats
    let mut record: ClaimRecord =
        serde_yaml::from_str(&content).context(format!("Invalid intake data in {}", file.display()))?;
    if record.id.is_empty() {
        record.id = Uuid::now_v7().to_string();
    }
    if record.title.is_empty() {
        eyre::bail!("Intake file must include a title");
    }

    let store = open_store(config)?;
    store.put(&record.id, &serde_json::to_value(&record)?)?;
    info!(claim_id = %record.id, "Claim created");

    println!("{} Created claim: {}", "\u{2713}".green(), record.id.cyan());
    println!("  Title: {}", record.title);
    Ok(())
}

/// Show a claim record and its current letter
fn cmd_show(config: &Config, claim_id: &str) -> Result<()> {
    debug!(%claim_id, "cmd_show: called");
    let store = open_store(config)?;
    let record = load_claim(&store, claim_id)?;

    println!("{}  {}", record.id.cyan(), record.title.bold());
    println!("  Status:   {}", record.status.to_string().yellow());
    println!("  Tone:     {}", record.effective_tone());
    if let Some(template_id) = &record.template_used {
        println!("  Template: {}", template_id);
    }
    println!("  Updated:  {}", record.updated_at.to_rfc3339().dimmed());

    match &record.generated_content {
        Some(letter) => {
            println!();
            println!("{}", letter);
        }
        None => println!("  {}", "(no letter drafted yet)".dimmed()),
    }
    Ok(())
}

/// List stored claims
fn cmd_list(config: &Config) -> Result<()> {
    debug!("cmd_list: called");
    let store = open_store(config)?;
    let summaries = store.list()?;

    if summaries.is_empty() {
        println!("No claims found");
        return Ok(());
    }
    for s in summaries {
        println!("{}  {}  {}  {}", s.id.cyan(), s.status.yellow(), s.updated_at.dimmed(), s.title);
    }
    Ok(())
}

/// List the built-in letter templates
fn cmd_templates() -> Result<()> {
    debug!("cmd_templates: called");
    println!("Available templates:");
    println!();
    for template in BUILTIN_TEMPLATES {
        println!("  {:<16} {}", template.id.cyan(), template.name);
    }
    Ok(())
}

/// Check a claim for information gaps
async fn cmd_gaps(config: &Config, claim_id: &str) -> Result<()> {
    debug!(%claim_id, "cmd_gaps: called");
    config.validate()?;

    let store = open_store(config)?;
    let record = load_claim(&store, claim_id)?;

    let llm = create_client(&config.llm).context("Failed to create generation client")?;
    let prompts = Arc::new(PromptLoader::new(std::env::current_dir()?));
    let detector = GapDetector::new(llm, prompts, &config.generation);

    let questions = detector.check(&record).await?;
    print_gap_result(&questions);
    Ok(())
}

fn print_gap_result(questions: &[GapQuestion]) {
    if questions.is_empty() {
        println!("{} Claim information is sufficient to draft the letter", "\u{2713}".green());
    } else {
        println!("{} Missing information:", "\u{26A0}".yellow());
        for question in questions {
            println!("  - {}", question);
        }
    }
}

/// Generate a letter draft for a claim
async fn cmd_draft(
    config: &Config,
    claim_id: &str,
    template_id: Option<&str>,
    tone: Option<Tone>,
    skip_gap_check: bool,
) -> Result<()> {
    debug!(%claim_id, ?template_id, ?tone, skip_gap_check, "cmd_draft: called");
    config.validate()?;

    let store = open_store(config)?;
    let mut record = load_claim(&store, claim_id)?;
    if let Some(tone) = tone {
        record.tone = Some(tone);
    }

    let template = match template_id {
        Some(id) => Some(find_template(id).ok_or_else(|| {
            eyre::eyre!(
                "Unknown template: '{}'. Run `ld templates` to list available templates.",
                id
            )
        })?),
        None => None,
    };

    let llm: Arc<dyn LlmClient> = create_client(&config.llm).context("Failed to create generation client")?;
    let prompts = Arc::new(PromptLoader::new(std::env::current_dir()?));

    if !skip_gap_check {
        let detector = GapDetector::new(llm.clone(), prompts.clone(), &config.generation);
        let questions = detector.check(&record).await?;
        if !questions.is_empty() {
            print_gap_result(&questions);
            println!();
            println!("Add the missing information, or rerun with --skip-gap-check to draft anyway.");
            std::process::exit(1);
        }
    }

    let generator = DraftGenerator::new(llm, store.clone(), prompts, &config.generation);
    let mut session = SessionTracker::new(claim_id);
    let outcome = generator.generate(&record, template, &mut session).await?;

    println!("{}", outcome.text);
    if !outcome.persisted {
        eprintln!("{} Draft was generated but could not be saved", "\u{26A0}".yellow());
    }
    Ok(())
}

/// Revise the stored letter with a free-text instruction
async fn cmd_correct(config: &Config, claim_id: &str, instruction: &str, tone: Option<Tone>) -> Result<()> {
    debug!(%claim_id, %instruction, ?tone, "cmd_correct: called");
    config.validate()?;

    let store = open_store(config)?;
    let record = load_claim(&store, claim_id)?;
    let current_letter = record
        .generated_content
        .clone()
        .ok_or_else(|| eyre::eyre!("Claim '{}' has no letter to revise. Run `ld draft` first.", claim_id))?;

    // Seed a fresh session from the persisted letter so the engine revises
    // the content the user last saw
    let mut session = SessionTracker::new(claim_id);
    session.append(GenerationTurn::response(current_letter));

    let llm = create_client(&config.llm).context("Failed to create generation client")?;
    let prompts = Arc::new(PromptLoader::new(std::env::current_dir()?));
    let engine = CorrectionEngine::new(llm, store.clone(), prompts, &config.generation);

    let outcome = engine
        .apply(claim_id, &mut session, instruction, tone.unwrap_or_else(|| record.effective_tone()))
        .await?;

    println!("{}", outcome.text);
    if !outcome.persisted {
        eprintln!("{} Revision was generated but could not be saved", "\u{26A0}".yellow());
    }
    Ok(())
}
