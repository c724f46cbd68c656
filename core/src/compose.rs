use crate::cost::TravelCategory;
use crate::rank::RankedResult;
use crate::rates::ExchangeRate;
use crate::{same_country, DestinationId};
use serde::Serialize;
use std::fmt;

/// The two currencies a cost can be presented in.
///
/// Costs in the catalog are in the reference currency. Users located in the
/// home market see them converted to the local currency; everyone else sees
/// them unconverted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub home_market: String,
    pub reference_currency: String,
    pub reference_symbol: String,
    pub local_currency: String,
    pub local_symbol: String,
}

impl Default for Conversion {
    fn default() -> Self {
        Self {
            home_market: "India".into(),
            reference_currency: "USD".into(),
            reference_symbol: "$".into(),
            local_currency: "INR".into(),
            local_symbol: "₹".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Money {
    pub amount: f64,
    pub currency: String,
    #[serde(skip)]
    symbol: String,
    #[serde(skip)]
    grouped: bool,
}

impl fmt::Display for Money {
    /// `₹8,400.00 INR` for the local currency, `$600.00 USD` for the reference one.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = if self.grouped { group_thousands(self.amount) } else { format!("{:.2}", self.amount) };
        write!(f, "{}{} {}", self.symbol, amount, self.currency)
    }
}

fn group_thousands(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut out = String::with_capacity(fixed.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{out}.{frac}")
}

/// What the presentation layer renders for one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRecord {
    pub id: DestinationId,
    pub city: String,
    pub country: String,
    pub description: String,
    pub best_time: String,
    pub similarity: f32,
    pub travel_type: TravelCategory,
    pub travel_type_label: &'static str,
    /// Estimate in the reference currency, before any conversion.
    pub estimated_cost: f64,
    pub display_cost: Money,
    pub display_text: String,
}

pub fn compose(ranked: Vec<RankedResult>, user_country: &str, rate: &ExchangeRate, conversion: &Conversion) -> Vec<DisplayRecord> {
    let convert = same_country(user_country, &conversion.home_market);
    ranked
        .into_iter()
        .map(|r| {
            let display_cost = if convert {
                Money {
                    amount: r.estimated_cost * rate.value,
                    currency: conversion.local_currency.clone(),
                    symbol: conversion.local_symbol.clone(),
                    grouped: true,
                }
            } else {
                Money {
                    amount: r.estimated_cost,
                    currency: conversion.reference_currency.clone(),
                    symbol: conversion.reference_symbol.clone(),
                    grouped: false,
                }
            };
            let d = r.destination;
            DisplayRecord {
                id: d.id,
                city: d.city,
                country: d.country,
                description: d.description,
                best_time: d.best_time,
                similarity: r.similarity,
                travel_type: r.cost_category,
                travel_type_label: r.cost_category.label(),
                estimated_cost: r.estimated_cost,
                display_text: display_cost.to_string(),
                display_cost,
            }
        })
        .collect()
}
