use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use tokio::sync::OnceCell;
use url::Url;

pub const DEFAULT_RATE_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";
pub const DEFAULT_QUOTE: &str = "INR";
/// Deployment constant used whenever the live lookup fails. Not a market quote.
pub const DEFAULT_FALLBACK_RATE: f64 = 84.0;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum RateError {
    #[error("invalid rate endpoint `{0}`")]
    InvalidUrl(String),
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("rate request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("rate endpoint returned status {0}")]
    Status(u16),
    #[error("malformed rate response: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("rate response has no `rates.{0}` field")]
    MissingRate(String),
    #[error("rate for {currency} is not a number")]
    NotANumber { currency: String },
    #[error("rate {0} is not a positive finite number")]
    InvalidRate(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateOrigin {
    Live,
    Static,
    Fallback,
}

/// Units of the local currency per one unit of the reference currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRate {
    pub value: f64,
    pub origin: RateOrigin,
    pub fetched_at: String,
}

/// Something that can look up the current exchange rate.
pub trait RateSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<f64, RateError>> + Send;

    fn origin(&self) -> RateOrigin { RateOrigin::Live }
}

/// Fetches `{"rates": {"<QUOTE>": <number>}}` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    client: reqwest::Client,
    url: Url,
    quote: String,
}

impl HttpRateSource {
    pub fn new(url: &str, quote: &str, timeout: Duration) -> Result<Self, RateError> {
        let url = Url::parse(url).map_err(|_| RateError::InvalidUrl(url.to_string()))?;
        if !url.scheme().starts_with("http") {
            return Err(RateError::InvalidUrl(url.to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RateError::Client)?;
        Ok(Self { client, url, quote: quote.to_ascii_uppercase() })
    }
}

impl RateSource for HttpRateSource {
    async fn fetch(&self) -> Result<f64, RateError> {
        let resp = self.client.get(self.url.clone()).send().await.map_err(RateError::Transport)?;
        if !resp.status().is_success() {
            return Err(RateError::Status(resp.status().as_u16()));
        }
        let bytes = resp.bytes().await.map_err(RateError::Transport)?;
        parse_rate(&bytes, &self.quote)
    }
}

/// Always yields the same value; used when running without network access.
#[derive(Debug, Clone, Copy)]
pub struct StaticRate(pub f64);

impl RateSource for StaticRate {
    async fn fetch(&self) -> Result<f64, RateError> {
        validate(self.0)
    }

    fn origin(&self) -> RateOrigin { RateOrigin::Static }
}

/// The rate sources the binaries choose between at startup.
#[derive(Debug, Clone)]
pub enum RateBackend {
    Http(HttpRateSource),
    Static(StaticRate),
}

impl RateSource for RateBackend {
    async fn fetch(&self) -> Result<f64, RateError> {
        match self {
            RateBackend::Http(s) => s.fetch().await,
            RateBackend::Static(s) => s.fetch().await,
        }
    }

    fn origin(&self) -> RateOrigin {
        match self {
            RateBackend::Http(s) => s.origin(),
            RateBackend::Static(s) => s.origin(),
        }
    }
}

#[derive(Deserialize)]
struct LatestRates {
    rates: HashMap<String, serde_json::Value>,
}

/// Extract `rates.<quote>` from a rate endpoint body.
pub fn parse_rate(body: &[u8], quote: &str) -> Result<f64, RateError> {
    let latest: LatestRates = serde_json::from_slice(body).map_err(RateError::Malformed)?;
    let value = latest.rates.get(quote).ok_or_else(|| RateError::MissingRate(quote.to_string()))?;
    let rate = value.as_f64().ok_or_else(|| RateError::NotANumber { currency: quote.to_string() })?;
    validate(rate)
}

fn validate(rate: f64) -> Result<f64, RateError> {
    if rate.is_finite() && rate > 0.0 { Ok(rate) } else { Err(RateError::InvalidRate(rate)) }
}

/// Looks the rate up at most once and caches the outcome, fallback included.
#[derive(Debug)]
pub struct RateProvider<S> {
    source: S,
    fallback: f64,
    cell: OnceCell<ExchangeRate>,
}

impl<S: RateSource> RateProvider<S> {
    pub fn new(source: S, fallback: f64) -> Self {
        Self { source, fallback, cell: OnceCell::new() }
    }

    pub async fn rate(&self) -> &ExchangeRate {
        self.cell
            .get_or_init(|| async {
                let (value, origin) = match self.source.fetch().await {
                    Ok(v) => (v, self.source.origin()),
                    Err(err) => {
                        tracing::warn!(error = %err, fallback = self.fallback, "exchange rate lookup failed; using fallback");
                        (self.fallback, RateOrigin::Fallback)
                    }
                };
                tracing::info!(value, ?origin, "exchange rate cached");
                let fetched_at = time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
                ExchangeRate { value, origin, fetched_at }
            })
            .await
    }

    pub async fn get_rate(&self) -> f64 {
        self.rate().await.value
    }

    /// The cached rate, if a lookup already happened.
    pub fn cached(&self) -> Option<&ExchangeRate> { self.cell.get() }
}
