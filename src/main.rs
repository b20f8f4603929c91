//! diffgpt - CLI entry point.

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use diffgpt::commit::{CommitOutcome, commit};
use diffgpt::config::{Config, DEFAULT_BASE_URL, DEFAULT_MODEL};
use diffgpt::git::{check_git_installed, resolve_repo_root, staged_diff};
use diffgpt::learn::{DEFAULT_LEARN_COUNT, LearnEvent, collect_examples};
use diffgpt::llm::{MessageShape, OpenAiClient, generate_commit_message};
use diffgpt::store::{ExampleStore, Scope, default_store_path};

/// Environment variable holding a tracing filter directive.
const LOG_ENV_VAR: &str = "DIFFGPT_LOG";

/// Generate commit messages from your staged diff with an LLM.
#[derive(Parser, Debug)]
#[command(name = "diffgpt")]
#[command(about = "Generate commit messages from your staged diff with an LLM")]
#[command(version)]
struct Cli {
    /// API key for the chat completions endpoint
    #[arg(short = 'k', long, env = "DIFFGPT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(short = 'u', long, env = "DIFFGPT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Model to use
    #[arg(short, long, env = "DIFFGPT_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Ask for a summary line plus a bullet-point body
    #[arg(short, long, env = "DIFFGPT_DETAILED")]
    detailed: bool,

    /// Total generation attempts on transient failures
    #[arg(
        long,
        env = "DIFFGPT_MAX_ATTEMPTS",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_attempts: u32,

    /// Give up on a model request after this many seconds (default: wait indefinitely)
    #[arg(long, env = "DIFFGPT_TIMEOUT", value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Learn commit style from a repository's history
    Learn {
        /// Repository (or a path inside it) to learn from
        path: Option<PathBuf>,

        /// Store the examples globally instead of for this repository
        #[arg(short, long)]
        global: bool,

        /// Commit to start walking back from (defaults to HEAD)
        #[arg(short, long)]
        start: Option<String>,

        /// Number of commits to learn from
        #[arg(short = 'n', long, default_value_t = DEFAULT_LEARN_COUNT)]
        count: usize,

        /// Remove the stored examples for the scope instead of learning
        #[arg(short, long)]
        clear: bool,
    },
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let store_path = default_store_path().context("Cannot locate the example store")?;
        Ok(Config {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            shape: MessageShape::from_detailed(self.detailed),
            max_attempts: self.max_attempts,
            request_timeout: self.timeout.map(Duration::from_secs),
            store_path,
        })
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    check_git_installed().context("git is required")?;

    let config = cli.config()?;
    debug!("Using {:?}", config);

    match cli.command {
        Some(Command::Learn {
            path,
            global,
            start,
            count,
            clear,
        }) => {
            if clear {
                run_clear(&config, path.as_deref(), global)
            } else {
                run_learn(&config, path.as_deref(), global, start.as_deref(), count)
            }
        }
        None => run_generate(&config).await,
    }
}

/// Generate a message for the staged (or piped) diff and commit it.
async fn run_generate(config: &Config) -> Result<()> {
    let api_key = config.require_api_key()?;
    let piped = !std::io::stdin().is_terminal();

    let repo_root = match resolve_repo_root(None) {
        Ok(root) => Some(root),
        Err(e) if piped => {
            eprintln!("Warning: Could not determine repository root: {}", e);
            None
        }
        Err(e) => {
            return Err(e)
                .context("Not a git repository. Run diffgpt from within a git repository.");
        }
    };

    let diff = match &repo_root {
        _ if piped => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read diff from stdin")?;
            buf
        }
        Some(root) => staged_diff(root).context("Failed to read staged changes")?,
        None => String::new(),
    };

    if diff.trim().is_empty() {
        println!("No changes to commit");
        return Ok(());
    }

    let store = ExampleStore::load(&config.store_path).context("Failed to load learned examples")?;
    let examples = store.examples_for(repo_root.as_deref());
    debug!("Conditioning on {} learned example(s)", examples.len());

    let client = OpenAiClient::new(api_key, &config.base_url, config.request_timeout)?;
    let message = generate_commit_message(
        &client,
        &config.model,
        config.shape,
        &diff,
        &examples,
        config.max_attempts,
    )
    .await
    .context("Failed to generate commit message")?;

    match commit(&message, repo_root.as_deref()).await? {
        CommitOutcome::Committed => {}
        CommitOutcome::Aborted => println!("Commit was aborted or canceled by user"),
    }

    Ok(())
}

fn learn_scope(path: Option<&Path>, global: bool) -> Result<Scope> {
    if global {
        return Ok(Scope::Global);
    }
    let root = resolve_repo_root(path).context("Failed to resolve repository root")?;
    Ok(Scope::Repo(root))
}

fn run_clear(config: &Config, path: Option<&Path>, global: bool) -> Result<()> {
    let key = learn_scope(path, global)?.key();
    let mut store =
        ExampleStore::load(&config.store_path).context("Failed to load learned examples")?;

    if store.clear_scope(&key) {
        store
            .save(&config.store_path)
            .context("Failed to save learned examples")?;
        println!("Cleared examples for '{}'", key);
    } else {
        println!("No examples found for '{}' to clear.", key);
    }
    Ok(())
}

fn run_learn(
    config: &Config,
    path: Option<&Path>,
    global: bool,
    start: Option<&str>,
    count: usize,
) -> Result<()> {
    let repo_root = resolve_repo_root(path).context("Failed to resolve repository root")?;
    let scope = if global {
        Scope::Global
    } else {
        Scope::Repo(repo_root.clone())
    };

    // Fail on an unreadable store before spending time on history.
    let mut store =
        ExampleStore::load(&config.store_path).context("Failed to load learned examples")?;

    println!(
        "Fetching last {} commits from {}...",
        count,
        start.filter(|s| !s.is_empty()).unwrap_or("HEAD")
    );

    let report = collect_examples(&repo_root, start, count, |event| match event {
        LearnEvent::Processing {
            index,
            total,
            commit,
        } => println!(
            "[{}/{}] Processing commit {} ({})",
            index,
            total,
            commit.short_sha(),
            commit.subject
        ),
        LearnEvent::SkippedEmpty { commit } => {
            println!("  Skipping commit {}: empty diff", commit.short_sha())
        }
        LearnEvent::Failed { commit, error } => {
            eprintln!("  Warning: skipping commit {}: {}", commit.short_sha(), error)
        }
    })
    .context("Failed to read commit history")?;

    if report.commits_seen == 0 {
        println!("No commits found to learn from.");
        return Ok(());
    }

    let learned = report.examples.len();
    let key = scope.key();
    store.set_scope(key.as_str(), report.examples);
    store
        .save(&config.store_path)
        .context("Failed to save learned examples")?;

    if learned == 0 {
        println!(
            "No usable examples found in {} commit(s); examples for '{}' are now empty.",
            report.commits_seen, key
        );
    } else {
        println!("Learned {} example(s) for '{}'", learned, key);
    }
    if report.skipped_empty > 0 || report.failed > 0 {
        println!(
            "  ({} skipped with empty diffs, {} could not be read)",
            report.skipped_empty, report.failed
        );
    }
    Ok(())
}
