//! Command-line interface for promptchain
//!
//! Argument parsing, configuration discovery, backend and pattern
//! construction, and chain execution. `run()` handles all output including
//! errors; main.rs only maps the returned exit code.

use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tracing::info;

use promptchain_config::{CliOverrides, Config};
use promptchain_engine::{
    ArtifactSink, ChainContext, ChainOutcome, ChainPattern, CoinFlipProbe, ConditionalBranch,
    FallbackCascade, FanOutFanIn, FileSink, HumanLoop, Linear, PlanExecute, SelfCorrect,
    StdinSource,
};
use promptchain_utils::exit_codes::ExitCode;
use promptchain_utils::logging::init_tracing;

/// promptchain - run prompt chain patterns against an LLM backend
#[derive(Parser)]
#[command(name = "promptchain")]
#[command(about = "Run different prompt chain patterns with various LLM providers")]
#[command(long_about = r#"
promptchain demonstrates orchestration patterns for multi-step LLM
workflows. Pick a provider and a chain; the selected pattern drives the
sequence of generation calls and stores the final artifact.

EXAMPLES:
  # Run with defaults (anthropic provider, linear chain)
  promptchain

  # Use a specific provider and chain
  promptchain --provider gemini --chain workers

  # Iterate interactively on a result
  promptchain --chain human

CHAINS:
  linear       - Builds information progressively (content creation)
  workers      - Delegates sub-tasks to individual prompts (divide and conquer)
  fallback     - Tries candidates in order until one is accepted (reliability)
  decision     - A classification round controls the downstream flow
  plan         - Separates planning and execution (complex tasks)
  human        - Incorporates operator feedback (iterative refinement)
  self-correct - Reviews and corrects its own output (accuracy)
"#)]
struct Cli {
    /// LLM provider to use (default: the config file value, else anthropic)
    #[arg(long, value_enum)]
    provider: Option<ProviderArg>,

    /// Chain pattern to run
    #[arg(long, value_enum, default_value_t = ChainArg::Linear)]
    chain: ChainArg,

    /// Model override for the selected provider
    #[arg(long)]
    model: Option<String>,

    /// Directory artifacts are written into
    #[arg(long)]
    output_dir: Option<camino::Utf8PathBuf>,

    /// Path to a config file (default: ./promptchain.toml if present)
    #[arg(long)]
    config: Option<camino::Utf8PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderArg {
    Anthropic,
    Gemini,
}

impl ProviderArg {
    fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChainArg {
    Linear,
    Workers,
    Fallback,
    Decision,
    Plan,
    Human,
    SelfCorrect,
}

/// Main CLI execution function.
///
/// Handles ALL output including errors and returns the exit code for
/// main.rs to apply.
///
/// # Errors
///
/// Returns the mapped `ExitCode` after printing a diagnostic.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("warning: failed to initialize logging: {e}");
    }

    let overrides = CliOverrides {
        config_path: cli.config.clone(),
        provider: cli.provider.map(|p| p.as_str().to_string()),
        model: cli.model.clone(),
        output_dir: cli.output_dir.clone(),
    };

    let config = Config::discover(&overrides).map_err(|e| {
        eprintln!("✗ Configuration error: {e}");
        ExitCode::CONFIG
    })?;

    let backend = promptchain_llm::backend_from_config(&config).map_err(|e| {
        eprintln!("✗ Backend setup failed: {e}");
        ExitCode::CONFIG
    })?;

    let rt = tokio::runtime::Runtime::new().map_err(|e| {
        eprintln!("✗ Failed to create async runtime: {e}");
        ExitCode::FAILURE
    })?;

    let ctx = ChainContext::new(Arc::from(backend), config.timeout());

    // Ctrl-C stops the chain before its next generation call
    let cancel = ctx.cancellation_flag();
    rt.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupt received, stopping before the next round...");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let mut pattern: Box<dyn ChainPattern> = match cli.chain {
        ChainArg::Linear => Box::new(Linear::new()),
        ChainArg::Workers => Box::new(FanOutFanIn::new()),
        ChainArg::Fallback => Box::new(FallbackCascade::new(Box::new(CoinFlipProbe::new()))),
        ChainArg::Decision => Box::new(ConditionalBranch::new()),
        ChainArg::Plan => Box::new(PlanExecute::new()),
        ChainArg::Human => Box::new(HumanLoop::new(
            config.sentinel(),
            Box::new(StdinSource::new()),
        )),
        ChainArg::SelfCorrect => Box::new(SelfCorrect::new(Box::new(CoinFlipProbe::new()))),
    };

    info!(provider = config.provider(), chain = %pattern.id(), "Running chain");

    let outcome = rt.block_on(pattern.run(&ctx)).map_err(|e| {
        eprintln!("✗ Chain halted: {e}");
        e.to_exit_code()
    })?;

    match outcome {
        ChainOutcome::Success { artifact, warnings } => {
            let sink = FileSink::new(config.output_dir());
            let path = sink.store(&artifact).map_err(|e| {
                eprintln!("✗ Failed to store artifact: {e}");
                ExitCode::FAILURE
            })?;

            for warning in &warnings {
                eprintln!("⚠ {warning}");
            }
            println!("✓ Chain succeeded, artifact written to {path}");
            Ok(())
        }
        ChainOutcome::Failure { diagnostic } => {
            eprintln!("✗ Chain ended in failure: {diagnostic}");
            Err(ExitCode::FAILURE)
        }
    }
}
