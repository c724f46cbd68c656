//! Destination matching and ranking.
//!
//! A [`Catalog`] of destinations is indexed once into a [`TermIndex`]. Each
//! query is projected into the same TF-IDF space, scored by cosine
//! similarity, ordered locality-first and priced by the [`cost`] rules. The
//! [`TravelAdvisor`] ties this together with a cached exchange rate.

pub mod advisor;
pub mod catalog;
pub mod compose;
pub mod cost;
pub mod index;
pub mod rank;
pub mod rates;
pub mod tokenizer;

use serde::{Deserialize, Serialize};

pub use advisor::{AdvisorConfig, Recommender, SetupError, TravelAdvisor, DEFAULT_TOP_K};
pub use catalog::{Catalog, CatalogError, CatalogRow};
pub use compose::{compose, Conversion, DisplayRecord, Money};
pub use cost::{estimate, CostEstimate, RegionalCountry, TravelCategory};
pub use index::{IdfMode, QueryVector, TermIndex, Weighting};
pub use rank::{partition, score, RankedResult, Scored};
pub use rates::{ExchangeRate, HttpRateSource, RateBackend, RateError, RateOrigin, RateProvider, RateSource, StaticRate};
pub use tokenizer::Analyzer;

pub type TermId = u32;
pub type DestinationId = u32;

/// Immutable catalog row. `id` is the row position assigned at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub city: String,
    pub country: String,
    pub description: String,
    pub avg_cost: f64,
    pub best_time: String,
}

/// Country names match case-insensitively, ignoring surrounding whitespace.
pub fn same_country(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
