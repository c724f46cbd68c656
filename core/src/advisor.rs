use crate::catalog::{Catalog, CatalogError};
use crate::compose::{compose, Conversion, DisplayRecord};
use crate::cost::estimate;
use crate::index::{TermIndex, Weighting};
use crate::rank::{partition, score, RankedResult};
use crate::rates::{
    ExchangeRate, HttpRateSource, RateBackend, RateError, RateProvider, RateSource, StaticRate, DEFAULT_FALLBACK_RATE,
    DEFAULT_QUOTE, DEFAULT_RATE_URL, DEFAULT_TIMEOUT_SECS,
};
use crate::tokenizer::Analyzer;
use crate::{Destination, DestinationId};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TOP_K: usize = 10;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Rate(#[from] RateError),
}

/// Everything needed to assemble a [`TravelAdvisor`] at process start.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub catalog: PathBuf,
    pub analyzer: Analyzer,
    pub weighting: Weighting,
    pub rate_url: String,
    pub rate_quote: String,
    pub fallback_rate: f64,
    pub rate_timeout: Duration,
    /// Skip the network and use `fallback_rate` as a static rate.
    pub offline: bool,
    pub conversion: Conversion,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("./data/travel_dataset.csv"),
            analyzer: Analyzer::default(),
            weighting: Weighting::default(),
            rate_url: DEFAULT_RATE_URL.to_string(),
            rate_quote: DEFAULT_QUOTE.to_string(),
            fallback_rate: DEFAULT_FALLBACK_RATE,
            rate_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            offline: false,
            conversion: Conversion::default(),
        }
    }
}

impl AdvisorConfig {
    /// Load the catalog, build the index and set up the rate source.
    /// Fails only on an unusable catalog or rate endpoint.
    pub fn build(&self) -> Result<TravelAdvisor<RateBackend>, SetupError> {
        let catalog = Catalog::load(&self.catalog)?;
        let backend = if self.offline {
            RateBackend::Static(StaticRate(self.fallback_rate))
        } else {
            RateBackend::Http(HttpRateSource::new(&self.rate_url, &self.rate_quote, self.rate_timeout)?)
        };
        let recommender = Recommender::new(catalog, self.analyzer, self.weighting);
        let rates = RateProvider::new(backend, self.fallback_rate);
        Ok(TravelAdvisor::new(recommender, rates, self.conversion.clone()))
    }
}

/// Catalog plus its term index. Everything here is immutable after construction.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Catalog,
    index: TermIndex,
}

impl Recommender {
    pub fn new(catalog: Catalog, analyzer: Analyzer, weighting: Weighting) -> Self {
        let index = TermIndex::build(catalog.descriptions(), analyzer, weighting);
        Self { catalog, index }
    }

    /// Rank the catalog for one query: score, order locality-first, truncate, price.
    pub fn rank(&self, user_country: &str, user_interest: &str, top_k: usize) -> Vec<RankedResult> {
        let query = self.index.project(user_interest);
        let similarities = score(&query, &self.index);
        let ordered = partition(self.catalog.destinations(), &similarities, user_country);
        tracing::debug!(
            user_country,
            query_terms = query.vector().entries().len(),
            candidates = ordered.len(),
            top_k,
            "ranked destinations"
        );
        ordered
            .into_iter()
            .take(top_k)
            .map(|s| {
                let est = estimate(s.destination.avg_cost, user_country, &s.destination.country);
                RankedResult {
                    destination: s.destination.clone(),
                    similarity: s.similarity,
                    estimated_cost: est.cost,
                    cost_category: est.category,
                }
            })
            .collect()
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }

    pub fn index(&self) -> &TermIndex { &self.index }

    pub fn destination(&self, id: DestinationId) -> Option<&Destination> { self.catalog.get(id) }
}

/// The single recommendation entry point: ranking plus the cached exchange rate.
#[derive(Debug)]
pub struct TravelAdvisor<S> {
    recommender: Recommender,
    rates: RateProvider<S>,
    conversion: Conversion,
}

impl<S: RateSource> TravelAdvisor<S> {
    pub fn new(recommender: Recommender, rates: RateProvider<S>, conversion: Conversion) -> Self {
        Self { recommender, rates, conversion }
    }

    pub async fn recommend(&self, user_country: &str, user_interest: &str, top_k: usize) -> Vec<DisplayRecord> {
        let ranked = self.recommender.rank(user_country, user_interest, top_k);
        let rate = self.rates.rate().await;
        compose(ranked, user_country, rate, &self.conversion)
    }

    pub async fn rate(&self) -> &ExchangeRate { self.rates.rate().await }

    pub fn recommender(&self) -> &Recommender { &self.recommender }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::RateOrigin;

    fn sample() -> PathBuf {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../data/travel_dataset.csv"))
    }

    #[tokio::test]
    async fn offline_config_uses_static_rate() {
        let config = AdvisorConfig { catalog: sample(), offline: true, fallback_rate: 83.0, ..Default::default() };
        let advisor = config.build().unwrap();
        let rate = advisor.rate().await;
        assert_eq!(rate.value, 83.0);
        assert_eq!(rate.origin, RateOrigin::Static);
        let out = advisor.recommend("India", "temples", DEFAULT_TOP_K).await;
        assert_eq!(out.len(), DEFAULT_TOP_K);
        assert_eq!(out[0].country, "India");
    }

    #[test]
    fn bad_rate_endpoint_is_a_setup_error() {
        let config = AdvisorConfig { catalog: sample(), rate_url: "not a url".into(), ..Default::default() };
        assert!(matches!(config.build(), Err(SetupError::Rate(RateError::InvalidUrl(_)))));
    }

    #[test]
    fn missing_catalog_is_a_setup_error() {
        let config = AdvisorConfig { catalog: PathBuf::from("/nonexistent/catalog.csv"), offline: true, ..Default::default() };
        assert!(matches!(config.build(), Err(SetupError::Catalog(_))));
    }

    #[test]
    fn local_temples_rank_first_for_nepal() {
        let catalog = Catalog::load(sample()).unwrap();
        let rec = Recommender::new(catalog, Analyzer::default(), Weighting::default());
        let out = rec.rank("Nepal", "temples and trekking", 5);
        assert_eq!(out[0].destination.country, "Nepal");
        assert_eq!(out[1].destination.country, "Nepal");
        assert!(out[0].similarity >= out[1].similarity);
        assert!(out[2..].iter().all(|r| r.destination.country != "Nepal"));
    }
}
