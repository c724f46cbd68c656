use crate::same_country;
use serde::Serialize;

/// Countries treated as one travel region.
///
/// The membership is a closed list: any pair of distinct countries outside
/// it is priced as international, even when they share a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionalCountry {
    India,
    Nepal,
    SriLanka,
    Bangladesh,
}

impl RegionalCountry {
    pub const ALL: [RegionalCountry; 4] = [
        RegionalCountry::India,
        RegionalCountry::Nepal,
        RegionalCountry::SriLanka,
        RegionalCountry::Bangladesh,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RegionalCountry::India => "India",
            RegionalCountry::Nepal => "Nepal",
            RegionalCountry::SriLanka => "Sri Lanka",
            RegionalCountry::Bangladesh => "Bangladesh",
        }
    }

    pub fn from_name(country: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| same_country(c.name(), country))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TravelCategory {
    Local,
    Regional,
    International,
}

impl TravelCategory {
    pub fn classify(user_country: &str, dest_country: &str) -> Self {
        if same_country(user_country, dest_country) {
            TravelCategory::Local
        } else if RegionalCountry::from_name(user_country).is_some() && RegionalCountry::from_name(dest_country).is_some() {
            TravelCategory::Regional
        } else {
            TravelCategory::International
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            TravelCategory::Local => 1.0,
            TravelCategory::Regional => 1.5,
            TravelCategory::International => 3.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TravelCategory::Local => "Local travel",
            TravelCategory::Regional => "Regional travel",
            TravelCategory::International => "International travel",
        }
    }
}

impl std::fmt::Display for TravelCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostEstimate {
    pub cost: f64,
    pub category: TravelCategory,
}

pub fn estimate(base_cost: f64, user_country: &str, dest_country: &str) -> CostEstimate {
    let category = TravelCategory::classify(user_country, dest_country);
    CostEstimate { cost: base_cost * category.multiplier(), category }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_country_is_local() {
        let e = estimate(100.0, "india", "India");
        assert_eq!(e.category, TravelCategory::Local);
        assert_eq!(e.cost, 100.0);
    }

    #[test]
    fn neighbours_in_region_are_regional() {
        let e = estimate(100.0, "Nepal", "sri lanka");
        assert_eq!(e.category, TravelCategory::Regional);
        assert_eq!(e.cost, 150.0);
    }

    #[test]
    fn neighbours_outside_region_are_international() {
        // Pakistan borders India but is not in the regional list
        let e = estimate(100.0, "India", "Pakistan");
        assert_eq!(e.category, TravelCategory::International);
        assert_eq!(e.cost, 300.0);
        assert_eq!(estimate(100.0, "France", "Spain").category, TravelCategory::International);
    }

    #[test]
    fn same_non_regional_country_is_still_local() {
        assert_eq!(estimate(80.0, "France", "FRANCE").cost, 80.0);
    }

    #[test]
    fn regional_names_round_trip() {
        for c in RegionalCountry::ALL {
            assert_eq!(RegionalCountry::from_name(&c.name().to_uppercase()), Some(c));
        }
        assert_eq!(RegionalCountry::from_name("Bhutan"), None);
    }
}
