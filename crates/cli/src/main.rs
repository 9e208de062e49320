//! ContentGate CLI - content safety and quality gate.

mod print;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use contentgate_core::{ContentBrief, GateConfig, LlmConfig, SafetyVerdict, ViolationType};
use contentgate_critic::CriticAgent;
use contentgate_guardian::Guardian;
use contentgate_improve::{IterativeImprover, LlmContentWriter};
use contentgate_llm::{LlmClient, OllamaClient};
use contentgate_review::{ContentReviewer, SafetyPipeline};
use contentgate_storage::{
    load_config, save_config, JsonReviewStore, ReportFilter, ReviewStore, CONFIG_FILE,
    DEFAULT_STORE_DIR,
};

#[derive(Parser)]
#[command(name = "contentgate")]
#[command(about = "Content safety and quality gate", long_about = None)]
struct Cli {
    /// Store directory for config and review history
    #[arg(long, global = true, default_value = DEFAULT_STORE_DIR)]
    store: PathBuf,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Guardian rules over a file
    Scan {
        /// Content file, or - for stdin
        path: String,
        /// Scan as requester input (injection rules only)
        #[arg(long)]
        input: bool,
        /// Brief JSON, enables brand and competitor checks
        #[arg(long)]
        brief: Option<PathBuf>,
        /// Print the content with personal data masked
        #[arg(long)]
        redact: bool,
    },
    /// Score content with the Critic
    Critique {
        /// Content file, or - for stdin
        path: String,
        /// Brief JSON
        #[arg(long)]
        brief: PathBuf,
    },
    /// Run the full Guardian + Critic review
    Review {
        /// Content file, or - for stdin
        path: String,
        /// Brief JSON
        #[arg(long)]
        brief: PathBuf,
        /// Do not record the report
        #[arg(long)]
        no_save: bool,
    },
    /// Generate content and revise it until it passes
    Improve {
        /// Brief JSON
        #[arg(long)]
        brief: PathBuf,
        /// Start from existing content instead of a fresh draft
        #[arg(long)]
        from: Option<String>,
        /// Target score, 0-100
        #[arg(long)]
        target: Option<f64>,
        /// Maximum review passes
        #[arg(long)]
        max_iterations: Option<u32>,
        /// Write the final content to this file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Do not record the run
        #[arg(long)]
        no_save: bool,
    },
    /// List Guardian rules
    Rules {
        /// Only rules of this violation type
        #[arg(long = "type")]
        violation_type: Option<String>,
    },
    /// Show recorded reviews and runs
    History {
        /// Filter by verdict
        #[arg(long)]
        verdict: Option<String>,
        /// Only the last N hours
        #[arg(long)]
        since_hours: Option<i64>,
        /// Maximum entries
        #[arg(long, default_value = "20")]
        limit: usize,
        /// List improvement runs instead of reviews
        #[arg(long)]
        runs: bool,
        /// Show one report or run in full
        #[arg(long)]
        show: Option<String>,
    },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli.store)
        .await
        .with_context(|| format!("loading {}", cli.store.join(CONFIG_FILE).display()))?;

    match cli.command {
        Commands::Scan { path, input, brief, redact } => {
            let guardian = build_guardian(&config)?;
            let content = read_content(&path).await?;
            let brief = match brief {
                Some(p) => Some(read_brief(&p).await?),
                None => None,
            };

            let report = if input {
                guardian.scan_input(&content)
            } else {
                guardian.scan_output(&content, brief.as_ref())
            };

            if cli.json {
                print::json(&report)?;
            } else {
                print::guardian(&report);
            }
            if redact {
                println!("\n{}", guardian.redact_personal_data(&content));
            }
        }
        Commands::Critique { path, brief } => {
            let content = read_content(&path).await?;
            let brief = read_brief(&brief).await?;
            ensure_llm_reachable(&config.llm).await?;
            let critic = build_critic(&config);

            let review = critic.review(&content, &brief).await?;
            if cli.json {
                print::json(&review)?;
            } else {
                print::critic(&review);
            }
        }
        Commands::Review { path, brief, no_save } => {
            let content = read_content(&path).await?;
            let brief = read_brief(&brief).await?;
            ensure_llm_reachable(&config.llm).await?;
            let pipeline = SafetyPipeline::new(build_guardian(&config)?, build_critic(&config));

            let report = pipeline.review(&content, &brief).await?;
            if !no_save {
                let mut store = JsonReviewStore::new(&cli.store).await?;
                store.save_report(&report).await?;
                info!("Recorded report {}", report.id);
            }

            if cli.json {
                print::json(&report)?;
            } else {
                print::safety(&report);
            }
            return Ok(ExitCode::from(review_exit_status(report.verdict)));
        }
        Commands::Improve { brief, from, target, max_iterations, output, no_save } => {
            let brief = read_brief(&brief).await?;
            ensure_llm_reachable(&config.llm).await?;

            let mut improve_config = config.improve.clone();
            if let Some(target) = target {
                improve_config.target_score = target;
            }
            if let Some(max) = max_iterations {
                improve_config.max_iterations = max;
            }

            let guardian = build_guardian(&config)?;
            let pipeline = Arc::new(SafetyPipeline::new(guardian.clone(), build_critic(&config)));
            let writer = Arc::new(
                LlmContentWriter::new(llm_client(&config.llm, &config.llm.primary_model))
                    .with_temperature(config.llm.writer_temperature),
            );
            let improver = IterativeImprover::new(writer, pipeline, improve_config)
                .with_input_guard(guardian);

            let outcome = match from {
                Some(path) => {
                    let content = read_content(&path).await?;
                    improver.improve_from(&brief, &content).await?
                }
                None => improver.improve(&brief).await?,
            };

            if !no_save {
                let mut store = JsonReviewStore::new(&cli.store).await?;
                store.save_run(&outcome).await?;
                info!("Recorded run {}", outcome.id);
            }
            if let Some(path) = output {
                tokio::fs::write(&path, outcome.final_content.as_bytes())
                    .await
                    .with_context(|| format!("writing {}", path.display()))?;
            }

            if cli.json {
                print::json(&outcome)?;
            } else {
                print::outcome(&outcome);
            }
        }
        Commands::Rules { violation_type } => {
            let guardian = build_guardian(&config)?;
            let rules = match violation_type {
                Some(t) => {
                    let t: ViolationType = t.parse()?;
                    guardian.rules().find_by_type(t)
                }
                None => guardian.rules().list(),
            };

            if cli.json {
                let rows: Vec<_> = rules
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "id": r.id,
                            "violation_type": r.violation_type,
                            "severity": r.severity,
                            "input": r.check_input,
                            "message": r.message,
                            "pattern": r.as_str(),
                        })
                    })
                    .collect();
                print::json(&rows)?;
            } else {
                print::rules(&rules);
            }
        }
        Commands::History { verdict, since_hours, limit, runs, show } => {
            let store = JsonReviewStore::new(&cli.store).await?;

            if let Some(id) = show {
                show_record(&store, &id, cli.json).await?;
                return Ok(ExitCode::SUCCESS);
            }

            if runs {
                let runs = store.list_runs(Some(limit)).await?;
                if cli.json {
                    print::json(&runs)?;
                } else {
                    print::runs(&runs);
                }
                return Ok(ExitCode::SUCCESS);
            }

            let verdicts = match verdict {
                Some(v) => Some(vec![v.parse::<SafetyVerdict>()?]),
                None => None,
            };
            let filter = ReportFilter {
                verdicts,
                since: since_hours.map(|h| chrono::Utc::now() - chrono::Duration::hours(h)),
                limit: Some(limit),
            };
            let reports = store.list_reports(&filter).await?;
            if cli.json {
                print::json(&reports)?;
            } else {
                print::reports(&reports);
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => print::json(&config)?,
            ConfigAction::Init { force } => {
                let path = cli.store.join(CONFIG_FILE);
                if path.exists() && !force {
                    bail!("{} already exists (use --force to overwrite)", path.display());
                }
                save_config(&cli.store, &GateConfig::default()).await?;
                println!("Wrote {}", path.display());
            }
            ConfigAction::Path => println!("{}", cli.store.join(CONFIG_FILE).display()),
        },
    }

    Ok(ExitCode::SUCCESS)
}

/// Process exit status for a review: 2 when rejected, 0 otherwise.
fn review_exit_status(verdict: SafetyVerdict) -> u8 {
    if verdict == SafetyVerdict::Rejected {
        2
    } else {
        0
    }
}

fn build_guardian(config: &GateConfig) -> Result<Arc<Guardian>> {
    let guardian = Guardian::new(config.guardian.clone()).context("building guardian rules")?;
    Ok(Arc::new(guardian))
}

fn llm_client(config: &LlmConfig, model: &str) -> Arc<dyn LlmClient> {
    Arc::new(OllamaClient::with_timeout(
        &config.base_url,
        model,
        Duration::from_secs(config.timeout_secs),
    ))
}

async fn ensure_llm_reachable(config: &LlmConfig) -> Result<()> {
    let probe = OllamaClient::with_timeout(&config.base_url, &config.primary_model, Duration::from_secs(5));
    if !probe.health_check().await {
        bail!("no LLM server reachable at {} (is Ollama running?)", config.base_url);
    }
    Ok(())
}

fn build_critic(config: &GateConfig) -> CriticAgent {
    let llm = &config.llm;
    let primary = llm_client(llm, &llm.primary_model);
    let secondary = match &llm.secondary_model {
        Some(model) if model != &llm.primary_model => Some(llm_client(llm, model)),
        Some(_) => {
            warn!("Secondary model equals the primary; scoring with one model");
            None
        }
        None => None,
    };
    CriticAgent::new(primary, secondary, config.critic.clone())
        .with_temperature(llm.critic_temperature)
}

async fn read_content(path: &str) -> Result<String> {
    let content = if path == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("reading stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path))?
    };
    if content.trim().is_empty() {
        bail!("no content in {}", path);
    }
    Ok(content)
}

async fn read_brief(path: &Path) -> Result<ContentBrief> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading brief {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing brief {}", path.display()))
}

async fn show_record(store: &JsonReviewStore, id: &str, as_json: bool) -> Result<()> {
    if let Ok(review_id) = id.parse() {
        if let Some(report) = store.load_report(review_id).await? {
            if as_json {
                print::json(&report)?;
            } else {
                print::safety(&report);
            }
            return Ok(());
        }
    }
    if let Ok(run_id) = id.parse() {
        if let Some(run) = store.load_run(run_id).await? {
            if as_json {
                print::json(&run)?;
            } else {
                print::outcome(&run);
            }
            return Ok(());
        }
    }
    bail!("no report or run with id {}", id)
}
