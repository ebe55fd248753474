//! Provider catalog types.
//!
//! Providers are read-only for the lifetime of a search session. They arrive
//! from the API, from a JSON file, or from the bundled sample catalog.

use crate::error::ParseError;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const SAMPLE_CATALOG: &str = include_str!("sample_catalog.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: u32,
    pub name: String,
    pub specialties: Vec<String>,
    pub rating: f64,
    #[serde(rename = "reviews")]
    pub review_count: u32,
    pub price_range: PriceRange,
    pub available: bool,
    pub location: Location,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub next_available: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub services: Vec<Service>,
}

impl Provider {
    pub fn service(&self, id: u32) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "distance")]
    pub distance_miles: f64,
    #[serde(rename = "travelTime")]
    pub travel_time_minutes: u32,
    pub address: String,
}

/// A bookable service on a provider's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub duration_minutes: u32,
    pub price: u32,
}

/// Whole-dollar price bounds, `min <= max`.
///
/// Accepts either `{"min": 25, "max": 45}` or the display form `"$25-45"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    min: u32,
    max: u32,
}

impl PriceRange {
    pub fn new(min: u32, max: u32) -> Result<Self, ParseError> {
        if min > max {
            return Err(ParseError::InvertedPriceRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}-{}", self.min, self.max)
    }
}

impl FromStr for PriceRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::PriceRange(s.to_string());
        // Whole dollars; cents ("$25.50") are dropped
        let parse_bound = |part: &str| -> Result<u32, ParseError> {
            let amount = part.trim().trim_start_matches('$');
            let (dollars, cents) = amount.split_once('.').unwrap_or((amount, "0"));
            if cents.is_empty() || !cents.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            dollars.parse::<u32>().map_err(|_| invalid())
        };

        match s.split_once('-') {
            Some((min, max)) => PriceRange::new(parse_bound(min)?, parse_bound(max)?),
            // A single figure ("$30") is a fixed price
            None => {
                let price = parse_bound(s)?;
                PriceRange::new(price, price)
            }
        }
    }
}

impl<'de> Deserialize<'de> for PriceRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Bounds { min: u32, max: u32 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
            Repr::Bounds { min, max } => {
                PriceRange::new(min, max).map_err(serde::de::Error::custom)
            }
        }
    }
}

/// The bundled sample catalog.
pub fn sample_catalog() -> Vec<Provider> {
    match serde_json::from_str(SAMPLE_CATALOG) {
        Ok(providers) => providers,
        Err(e) => {
            tracing::error!("Bundled sample catalog is malformed: {}", e);
            Vec::new()
        }
    }
}

/// Load a catalog from a JSON file holding an array of providers.
pub fn load_catalog(path: &Path) -> Result<Vec<Provider>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {:?}", path))?;
    let providers: Vec<Provider> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog file {:?}", path))?;
    tracing::debug!("Loaded {} providers from {:?}", providers.len(), path);
    Ok(providers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_price_range() {
        let range: PriceRange = "$25-45".parse().unwrap();
        assert_eq!(range.min(), 25);
        assert_eq!(range.max(), 45);
        assert_eq!(range.to_string(), "$25-45");

        let fixed: PriceRange = "$30".parse().unwrap();
        assert_eq!((fixed.min(), fixed.max()), (30, 30));

        assert_eq!(
            "$45-25".parse::<PriceRange>(),
            Err(ParseError::InvertedPriceRange { min: 45, max: 25 })
        );
        assert!("cheap".parse::<PriceRange>().is_err());
        assert!("$-10".parse::<PriceRange>().is_err());
    }

    #[test]
    fn test_parse_price_range_truncates_cents() {
        let range: PriceRange = "$25.50-40".parse().unwrap();
        assert_eq!((range.min(), range.max()), (25, 40));
        assert_eq!(range.to_string(), "$25-40");

        let quoted: PriceRange = serde_json::from_str("\"$19.99-35.00\"").unwrap();
        assert_eq!((quoted.min(), quoted.max()), (19, 35));

        assert!("$25.-40".parse::<PriceRange>().is_err());
        assert!("$25.5x-40".parse::<PriceRange>().is_err());
        assert!("$.50".parse::<PriceRange>().is_err());
    }

    #[test]
    fn test_price_range_accepts_both_json_forms() {
        let text: PriceRange = serde_json::from_str("\"$15-35\"").unwrap();
        let bounds: PriceRange = serde_json::from_str(r#"{"min": 15, "max": 35}"#).unwrap();
        assert_eq!(text, bounds);
        assert!(serde_json::from_str::<PriceRange>(r#"{"min": 40, "max": 35}"#).is_err());
    }

    #[test]
    fn test_sample_catalog() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 6);

        let ids: Vec<u32> = catalog.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);

        let mike = &catalog[0];
        assert_eq!(mike.name, "Mike Johnson");
        assert_eq!(mike.price_range.min(), 25);
        assert_eq!(mike.location.travel_time_minutes, 12);
        assert_eq!(mike.service(4).map(|s| s.price), Some(35));
        assert!(catalog.iter().all(|p| !p.services.is_empty()));
    }

    #[test]
    fn test_load_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{
                "id": 9,
                "name": "Sam Lee",
                "specialties": ["Fades"],
                "rating": 4.2,
                "reviews": 10,
                "priceRange": "$20-30",
                "available": false,
                "location": {{"distance": 2.5, "travelTime": 15, "address": "1 Main St"}}
            }}]"#
        )
        .unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].review_count, 10);
        assert!(catalog[0].services.is_empty());
        assert!(catalog[0].bio.is_none());
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_catalog(&dir.path().join("nope.json")).is_err());
    }
}
