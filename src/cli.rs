//! Command-line interface.
//!
//! `run()` owns all user-facing output and maps every failure to an exit
//! code; library errors never escape to `main`.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::exit_codes::ExitCode;
use crate::persist;
use crate::INPUT_CHAR_CAP;
use reqiq_artifacts::ArtifactKind;
use reqiq_config::Config;
use reqiq_domain::Domain;
use reqiq_pipeline::{Pipeline, PipelineRequest};
use reqiq_utils::error::PipelineError;
use reqiq_utils::text::truncate_chars;

#[derive(Debug, Parser)]
#[command(
    name = "reqiq",
    version,
    about = "Turns raw stakeholder notes into schema-validated BA artifacts"
)]
struct Cli {
    /// Verbose logging (RUST_LOG overrides)
    #[arg(long, global = true)]
    verbose: bool,

    /// Explicit config file instead of upward discovery
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the generation pipeline over an input file
    Generate {
        /// Path to the stakeholder input text
        input: Utf8PathBuf,

        /// Industry domain, or "auto" to classify from the input
        #[arg(long, default_value = "auto")]
        domain: String,

        /// Independent artifact kinds to generate (gap and risk always run)
        #[arg(long, value_delimiter = ',', default_value = "brd,frd,agile")]
        kinds: Vec<String>,

        /// Output directory for artifacts and the run receipt
        #[arg(long, default_value = "reqiq-out")]
        out: Utf8PathBuf,

        /// Use the offline fixture backend instead of a real provider
        #[arg(long)]
        dry_run: bool,

        /// Print the full run as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Classify the industry domain of an input file
    Classify {
        /// Path to the stakeholder input text
        input: Utf8PathBuf,
    },
}

/// CLI entrypoint. Handles all output; returns only the exit code.
///
/// # Errors
/// Returns the exit code `main` should terminate with.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    // A second init (e.g. under test harnesses) is not an error worth dying for
    let _ = reqiq_utils::logging::init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref()).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::Usage
    })?;

    match cli.command {
        Command::Generate {
            input,
            domain,
            kinds,
            out,
            dry_run,
            json,
        } => generate(config, &input, &domain, &kinds, &out, dry_run, json),
        Command::Classify { input } => classify(&input),
    }
}

fn load_config(explicit: Option<&camino::Utf8Path>) -> anyhow::Result<Config> {
    match explicit {
        Some(path) => Ok(Config::load_from(path.as_std_path())?),
        None => Ok(Config::discover()?),
    }
}

fn read_input(path: &Utf8PathBuf) -> Result<String, ExitCode> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) => {
            eprintln!("error: cannot read input file {path}: {e}");
            Err(ExitCode::Failure)
        }
    }
}

fn parse_kinds(kinds: &[String]) -> Result<Vec<ArtifactKind>, ExitCode> {
    kinds
        .iter()
        .map(|raw| {
            ArtifactKind::parse(raw).ok_or_else(|| {
                eprintln!(
                    "error: unknown artifact kind '{raw}' (expected brd, frd, or agile)"
                );
                ExitCode::Usage
            })
        })
        .collect()
}

fn resolve_domain(flag: &str, input_text: &str) -> Domain {
    if flag.eq_ignore_ascii_case("auto") {
        let domain = reqiq_domain::classify(input_text);
        debug!(domain = %domain, "domain classified from input");
        domain
    } else {
        Domain::parse(flag)
    }
}

#[allow(clippy::too_many_arguments)]
fn generate(
    mut config: Config,
    input: &Utf8PathBuf,
    domain_flag: &str,
    kinds: &[String],
    out: &Utf8PathBuf,
    dry_run: bool,
    json: bool,
) -> Result<(), ExitCode> {
    let raw = read_input(input)?;
    let input_text = truncate_chars(&raw, INPUT_CHAR_CAP).to_string();
    let requested_kinds = parse_kinds(kinds)?;
    let domain = resolve_domain(domain_flag, &input_text);

    if dry_run {
        config.llm.provider = Some("fixture".to_string());
    }

    let pipeline = Pipeline::from_config(&config).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::Usage
    })?;

    let runtime = tokio::runtime::Runtime::new().map_err(|e| {
        eprintln!("error: failed to start async runtime: {e}");
        ExitCode::Failure
    })?;

    let run = runtime
        .block_on(pipeline.run(PipelineRequest {
            input_text,
            domain,
            requested_kinds,
        }))
        .map_err(|e: PipelineError| {
            eprintln!("error: {e}");
            ExitCode::Usage
        })?;

    let written = persist::write_run(out, &run).map_err(|e| {
        eprintln!("error: {e:#}");
        ExitCode::Failure
    })?;

    if json {
        match serde_json::to_string_pretty(&run) {
            Ok(body) => println!("{body}"),
            Err(e) => {
                eprintln!("error: failed to serialize run: {e}");
                return Err(ExitCode::Failure);
            }
        }
    } else {
        print_summary(&run, &written);
    }

    Ok(())
}

fn print_summary(run: &reqiq_pipeline::PipelineRun, written: &[String]) {
    println!("domain: {}", run.domain);
    println!("score: {}/100", run.completeness_score);

    let produced: Vec<String> = run
        .succeeded_kinds()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!(
        "artifacts: {}",
        if produced.is_empty() {
            "(none)".to_string()
        } else {
            produced.join(", ")
        }
    );

    if run.errors.is_empty() {
        println!("errors: (none)");
    } else {
        println!("errors:");
        for error in &run.errors {
            println!("  - {error}");
        }
    }

    println!(
        "tokens: {} (est. ${:.4}, {} ms)",
        run.total_tokens, run.estimated_cost_usd, run.duration_ms
    );
    for path in written {
        println!("wrote: {path}");
    }
}

fn classify(input: &Utf8PathBuf) -> Result<(), ExitCode> {
    let text = read_input(input)?;
    println!("{}", reqiq_domain::classify(&text));
    Ok(())
}
