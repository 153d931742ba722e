//! belign — compare BEL statement extractions from two systems.
//! Entry point for the command-line binary.

mod report;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use belign_common::config::{CompareConfig, SolverKind};
use belign_compare::pipeline::{compare_corpus, RawCorpus};

#[derive(Parser, Debug)]
#[command(name = "belign")]
#[command(author, version, about = "Compare BEL statements from two extraction systems", long_about = None)]
struct Args {
    /// Path to the source-A JSON file (group id -> { text, statements })
    #[arg(long = "source-a-file")]
    source_a_file: PathBuf,

    /// Path to the source-B JSON file, same shape
    #[arg(long = "source-b-file")]
    source_b_file: PathBuf,

    /// Compare a single evidence group instead of the whole corpus
    #[arg(long = "group")]
    group: Option<String>,

    /// Minimum pair score for a committed match, in (0, 1]
    #[arg(long = "threshold")]
    threshold: Option<f64>,

    /// Assignment solver: exact | greedy
    #[arg(long = "solver")]
    solver: Option<String>,

    /// TOML configuration file; command-line flags override it
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Directory results are written into
    #[arg(long = "output-dir", default_value = ".")]
    output_dir: PathBuf,

    /// Output format: json | text | both
    #[arg(long = "format", default_value = "both")]
    format: String,
}

fn parse_solver(name: &str) -> anyhow::Result<SolverKind> {
    match name {
        "exact" => Ok(SolverKind::Exact),
        "greedy" => Ok(SolverKind::Greedy),
        other => anyhow::bail!("unknown solver `{other}` (expected `exact` or `greedy`)"),
    }
}

fn load_config(args: &Args) -> anyhow::Result<CompareConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            CompareConfig::from_toml_str(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => CompareConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        cfg.threshold = threshold;
    }
    if let Some(ref solver) = args.solver {
        cfg.solver = parse_solver(solver)?;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn load_corpus(path: &PathBuf) -> anyhow::Result<RawCorpus> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading input {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("belign_compare=debug,info")),
        )
        .init();

    let args = Args::parse();
    if !matches!(args.format.as_str(), "json" | "text" | "both") {
        anyhow::bail!("unknown format `{}` (expected json, text, or both)", args.format);
    }

    let cfg = load_config(&args)?;

    info!("Loading source A from {}", args.source_a_file.display());
    let source_a = load_corpus(&args.source_a_file)?;
    info!("Loading source B from {}", args.source_b_file.display());
    let source_b = load_corpus(&args.source_b_file)?;

    let result = compare_corpus(&source_a, &source_b, args.group.as_deref(), &cfg)?;
    info!(
        groups = result.n_groups,
        exact = result.totals.counts.n_exact,
        core = result.totals.counts.n_core,
        "comparison finished"
    );

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating output directory {}", args.output_dir.display()))?;

    if matches!(args.format.as_str(), "json" | "both") {
        let json_path = args.output_dir.join("comparison_report.json");
        let json = serde_json::to_string_pretty(&result)?;
        fs::write(&json_path, json)
            .with_context(|| format!("writing {}", json_path.display()))?;
        info!("Saved JSON results to {}", json_path.display());
    }

    if matches!(args.format.as_str(), "text" | "both") {
        let rendered = report::render(&result);
        let text_path = args.output_dir.join("comparison_report.txt");
        fs::write(&text_path, &rendered)
            .with_context(|| format!("writing {}", text_path.display()))?;
        info!("Saved text report to {}", text_path.display());
        println!("{rendered}");
    }

    Ok(())
}
