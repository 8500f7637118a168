use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use textgraph_prep::{config, prepare_graph_data, telemetry};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "absa-graph",
    about = "Build instance and corpus graphs from a labelled text corpus"
)]
struct Cli {
    /// Path to the input corpus (JSONL, one `{"text", "labels"}` record per line)
    #[arg(long)]
    corpus: PathBuf,
    /// Path to config file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Root directory for `graphs_data/<timestamp>/`
    #[arg(long, default_value = ".")]
    out: PathBuf,
    /// Treat the corpus as multi-label (adds document-document IoU edges)
    #[arg(long)]
    multi_label: bool,
    /// Also write a timestamped run log into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Increase library log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    // Optional .env with TEXTGRAPH_* overrides; absence is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let log_opts = telemetry::LogOptions {
        level,
        log_dir: cli.log_dir.clone(),
        log_name: "absa-graph".into(),
        ..telemetry::LogOptions::default()
    };
    if let Err(err) = telemetry::init(&log_opts) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(out_dir) => {
            println!("{out_dir}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let mut cfg = config::load(cli.config.as_deref())?;
    if cli.multi_label {
        cfg.corpus.multi_label = true;
    }

    let persisted = prepare_graph_data(&cli.corpus, &cfg, &cli.out)?;
    Ok(persisted.out_dir)
}
