mod dom;
mod error;
mod extract;
mod fetch;
mod output;
mod rules;
mod settings;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use extract::Converter;
use fetch::HttpFetcher;
use rules::RuleSet;
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "article2md",
    about = "Download a public web article and save it as Markdown"
)]
struct Cli {
    /// Article URL
    url: String,
    /// Output directory (default: md_files)
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Settings file (TOML); defaults to ./article2md.toml when present
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let t0 = Instant::now();
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;
    info!(settings = ?settings, "Loaded settings");

    let url = fetch::parse_url(&cli.url)?;
    let out_dir = cli.out.unwrap_or_else(|| settings.output_dir.clone());
    let rules = RuleSet::load(settings.rules_path.as_deref())?;
    let converter = Converter::new(HttpFetcher::new(&settings)?, settings, rules);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Fetching {}", url));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = converter.run(&url, &out_dir);
    spinner.finish_and_clear();

    let (article, path) = result?;

    println!("✓ Saved '{}' → {}", article.title, path.display());
    info!(elapsed_ms = t0.elapsed().as_millis() as u64, "Done");
    Ok(())
}
