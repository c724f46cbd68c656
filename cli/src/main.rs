use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};
use wayfarer_core::index::IdfMode;
use wayfarer_core::rates::{DEFAULT_FALLBACK_RATE, DEFAULT_QUOTE, DEFAULT_RATE_URL, DEFAULT_TIMEOUT_SECS};
use wayfarer_core::{AdvisorConfig, Analyzer, Catalog, DisplayRecord, Recommender, Weighting, DEFAULT_TOP_K};

#[derive(Parser)]
#[command(name = "wayfarer")]
#[command(about = "Recommend travel destinations from a catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank catalog destinations for a traveller
    Recommend {
        /// Country the traveller is in
        #[arg(long, default_value = "India")]
        country: String,
        /// Free-text travel interest, e.g. "beaches and seafood"
        #[arg(long, default_value = "adventure")]
        interest: String,
        /// Number of results
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        k: usize,
        /// Print JSON instead of cards
        #[arg(long, default_value_t = false)]
        json: bool,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Validate a catalog and print index statistics
    Check {
        /// Destination catalog (.csv, .json or .jsonl)
        #[arg(long, default_value = "./data/travel_dataset.csv")]
        catalog: PathBuf,
        /// Disable stemming
        #[arg(long, default_value_t = false)]
        no_stem: bool,
    },
}

#[derive(Args)]
struct EngineArgs {
    /// Destination catalog (.csv, .json or .jsonl)
    #[arg(long, default_value = "./data/travel_dataset.csv")]
    catalog: PathBuf,
    /// Exchange rate endpoint
    #[arg(long, default_value = DEFAULT_RATE_URL)]
    rate_url: String,
    #[arg(long, default_value = DEFAULT_QUOTE)]
    rate_quote: String,
    /// Rate used when the lookup fails
    #[arg(long, default_value_t = DEFAULT_FALLBACK_RATE)]
    fallback_rate: f64,
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    rate_timeout_secs: u64,
    /// Never call the rate endpoint; use the fallback rate
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// IDF formula: smooth or plain
    #[arg(long, default_value = "smooth")]
    idf: IdfMode,
    #[arg(long, default_value_t = false)]
    sublinear_tf: bool,
    /// Disable stemming
    #[arg(long, default_value_t = false)]
    no_stem: bool,
}

impl From<EngineArgs> for AdvisorConfig {
    fn from(a: EngineArgs) -> Self {
        AdvisorConfig {
            catalog: a.catalog,
            analyzer: Analyzer::new(!a.no_stem),
            weighting: Weighting { idf: a.idf, sublinear_tf: a.sublinear_tf },
            rate_url: a.rate_url,
            rate_quote: a.rate_quote,
            fallback_rate: a.fallback_rate,
            rate_timeout: Duration::from_secs(a.rate_timeout_secs),
            offline: a.offline,
            ..AdvisorConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Recommend { country, interest, k, json, engine } => {
            let advisor = AdvisorConfig::from(engine).build()?;
            let records = advisor.recommend(&country, &interest, k).await;
            tracing::info!(country, interest, results = records.len(), "recommendations ready");
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for (i, r) in records.iter().enumerate() {
                    println!("{}", render_card(i + 1, r));
                }
            }
            Ok(())
        }
        Commands::Check { catalog, no_stem } => check(&catalog, no_stem),
    }
}

fn check(path: &Path, no_stem: bool) -> Result<()> {
    println!("{}", check_report(path, no_stem)?);
    Ok(())
}

fn check_report(path: &Path, no_stem: bool) -> Result<String> {
    let catalog = Catalog::load(path)?;
    let rec = Recommender::new(catalog, Analyzer::new(!no_stem), Weighting::default());
    let countries = rec.catalog().countries().len();
    let stats = rec.index().stats();
    tracing::info!(path = %path.display(), countries, "catalog check passed");
    Ok(format!(
        "{}: {} destinations, {} countries, {} terms, {} postings, {} without indexable text",
        path.display(),
        stats.documents,
        countries,
        stats.vocabulary,
        stats.postings,
        stats.empty_documents
    ))
}

fn render_card(rank: usize, r: &DisplayRecord) -> String {
    format!(
        "{rank}. {} ({})\n   Best time: {}\n   Why visit: {}\n   Travel type: {}\n   Estimated cost: {}\n",
        r.city, r.country, r.best_time, r.description, r.travel_type_label, r.display_cost
    )
}
