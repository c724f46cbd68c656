use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};
use wayfarer_core::index::IdfMode;
use wayfarer_core::rates::{DEFAULT_FALLBACK_RATE, DEFAULT_QUOTE, DEFAULT_RATE_URL, DEFAULT_TIMEOUT_SECS};
use wayfarer_core::{AdvisorConfig, Analyzer, Weighting};
use wayfarer_server::build_app;

#[derive(Parser)]
struct Args {
    /// Destination catalog (.csv, .json or .jsonl)
    #[arg(long, default_value = "./data/travel_dataset.csv")]
    catalog: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Exchange rate endpoint
    #[arg(long, default_value = DEFAULT_RATE_URL)]
    rate_url: String,
    /// Currency code to read from the endpoint's `rates` object
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
    /// Use 1 + ln(tf) for term frequency
    #[arg(long, default_value_t = false)]
    sublinear_tf: bool,
    /// Disable stemming
    #[arg(long, default_value_t = false)]
    no_stem: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = AdvisorConfig {
        catalog: args.catalog,
        analyzer: Analyzer::new(!args.no_stem),
        weighting: Weighting { idf: args.idf, sublinear_tf: args.sublinear_tf },
        rate_url: args.rate_url,
        rate_quote: args.rate_quote,
        fallback_rate: args.fallback_rate,
        rate_timeout: Duration::from_secs(args.rate_timeout_secs),
        offline: args.offline,
        ..AdvisorConfig::default()
    };
    let advisor = config.build()?;
    let app: Router = build_app(advisor);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
