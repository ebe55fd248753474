//! Filter and sort selection for the provider list.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MAX_DISTANCE_MILES: f64 = 5.0;
pub const DEFAULT_MAX_TRAVEL_TIME_MINUTES: u32 = 60;

/// Distance slider bounds and step, in miles
const DISTANCE_MIN: f64 = 0.5;
const DISTANCE_STEP: f64 = 0.5;

/// Travel time slider bounds and step, in minutes
const TRAVEL_TIME_MIN: u32 = 5;
const TRAVEL_TIME_STEP: u32 = 5;

/// Upper bound on `price_range.min` for the budget band
const BUDGET_CEILING: u32 = 25;
/// Upper bound on `price_range.min` for the mid band
const MID_CEILING: u32 = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Availability {
    #[default]
    All,
    AvailableOnly,
    BusyOnly,
}

impl Availability {
    pub fn admits(self, available: bool) -> bool {
        match self {
            Availability::All => true,
            Availability::AvailableOnly => available,
            Availability::BusyOnly => !available,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MinRating {
    #[default]
    None,
    FourPlus,
    FourFivePlus,
    FourEightPlus,
}

impl MinRating {
    pub fn threshold(self) -> Option<f64> {
        match self {
            MinRating::None => None,
            MinRating::FourPlus => Some(4.0),
            MinRating::FourFivePlus => Some(4.5),
            MinRating::FourEightPlus => Some(4.8),
        }
    }

    pub fn admits(self, rating: f64) -> bool {
        self.threshold().is_none_or(|t| rating >= t)
    }
}

/// Price band, judged on the low end of a provider's price range.
/// Ties at a band edge go to the cheaper band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceBand {
    #[default]
    All,
    Budget,
    Mid,
    Premium,
}

impl PriceBand {
    pub fn admits(self, min_price: u32) -> bool {
        match self {
            PriceBand::All => true,
            PriceBand::Budget => min_price <= BUDGET_CEILING,
            PriceBand::Mid => min_price > BUDGET_CEILING && min_price <= MID_CEILING,
            PriceBand::Premium => min_price > MID_CEILING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Distance,
    TravelTime,
    Rating,
    Price,
}

impl SortBy {
    /// Short label for the sort toggle
    pub fn short_label(self) -> &'static str {
        match self {
            SortBy::Distance => "Closest",
            SortBy::TravelTime => "Fastest",
            SortBy::Rating => "Top Rated",
            SortBy::Price => "Cheapest",
        }
    }
}

/// The user's current search text, filters and ranking.
///
/// Numeric thresholds are inclusive. `sort_by` only orders results and never
/// changes which providers are shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub search_text: String,
    pub max_distance_miles: f64,
    pub max_travel_time_minutes: u32,
    pub availability: Availability,
    pub min_rating: MinRating,
    pub price_band: PriceBand,
    pub sort_by: SortBy,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            max_distance_miles: DEFAULT_MAX_DISTANCE_MILES,
            max_travel_time_minutes: DEFAULT_MAX_TRAVEL_TIME_MINUTES,
            availability: Availability::default(),
            min_rating: MinRating::default(),
            price_band: PriceBand::default(),
            sort_by: SortBy::default(),
        }
    }
}

impl FilterSpec {
    /// Set the distance limit, snapped to the slider's half-mile steps.
    pub fn set_max_distance(&mut self, miles: f64) {
        let snapped = (miles / DISTANCE_STEP).round() * DISTANCE_STEP;
        self.max_distance_miles = if snapped.is_nan() {
            DEFAULT_MAX_DISTANCE_MILES
        } else {
            snapped.clamp(DISTANCE_MIN, DEFAULT_MAX_DISTANCE_MILES)
        };
    }

    /// Set the travel time limit, snapped to the slider's five-minute steps.
    pub fn set_max_travel_time(&mut self, minutes: u32) {
        let snapped =
            minutes.saturating_add(TRAVEL_TIME_STEP / 2) / TRAVEL_TIME_STEP * TRAVEL_TIME_STEP;
        self.max_travel_time_minutes =
            snapped.clamp(TRAVEL_TIME_MIN, DEFAULT_MAX_TRAVEL_TIME_MINUTES);
    }

    /// Reset every filter and the ranking, keeping the search text.
    pub fn clear_filters(&mut self) {
        *self = FilterSpec {
            search_text: std::mem::take(&mut self.search_text),
            ..FilterSpec::default()
        };
    }

    /// Number of fields that differ from their defaults. Zero exactly when
    /// the spec equals [`FilterSpec::default`].
    pub fn active_filter_count(&self) -> usize {
        let default = FilterSpec::default();
        [
            self.search_text != default.search_text,
            self.max_distance_miles != default.max_distance_miles,
            self.max_travel_time_minutes != default.max_travel_time_minutes,
            self.availability != default.availability,
            self.min_rating != default.min_rating,
            self.price_band != default.price_band,
            self.sort_by != default.sort_by,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Chips describing the active membership filters.
    ///
    /// The ranking has its own toggle label and gets no chip.
    pub fn active_filter_labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        if self.max_distance_miles != DEFAULT_MAX_DISTANCE_MILES {
            labels.push(format!("Within {} miles", self.max_distance_miles));
        }
        if self.max_travel_time_minutes != DEFAULT_MAX_TRAVEL_TIME_MINUTES {
            labels.push(format!("Under {} min", self.max_travel_time_minutes));
        }
        match self.availability {
            Availability::All => {}
            Availability::AvailableOnly => labels.push("Available Now".to_string()),
            Availability::BusyOnly => labels.push("Busy".to_string()),
        }
        if self.min_rating != MinRating::None {
            labels.push(format!("{} Rating", self.min_rating));
        }
        match self.price_band {
            PriceBand::All => {}
            PriceBand::Budget => labels.push("Budget Price".to_string()),
            PriceBand::Mid => labels.push("Mid Price".to_string()),
            PriceBand::Premium => labels.push("Premium Price".to_string()),
        }
        labels
    }
}

// Display/FromStr use the short wire values the app exchanges ("4.5+", "busy", "time")

macro_rules! wire_values {
    ($ty:ident, $field:literal, { $($variant:ident => $value:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let value = match self {
                    $($ty::$variant => $value),+
                };
                f.write_str(value)
            }
        }

        impl FromStr for $ty {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($value => Ok($ty::$variant),)+
                    _ => Err(ParseError::UnknownValue {
                        field: $field,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

wire_values!(Availability, "availability", {
    All => "all",
    AvailableOnly => "available",
    BusyOnly => "busy",
});

wire_values!(MinRating, "rating", {
    None => "all",
    FourPlus => "4+",
    FourFivePlus => "4.5+",
    FourEightPlus => "4.8+",
});

wire_values!(PriceBand, "price range", {
    All => "all",
    Budget => "budget",
    Mid => "mid",
    Premium => "premium",
});

wire_values!(SortBy, "sort", {
    Distance => "distance",
    TravelTime => "time",
    Rating => "rating",
    Price => "price",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec() {
        let spec = FilterSpec::default();
        assert_eq!(spec.max_distance_miles, 5.0);
        assert_eq!(spec.max_travel_time_minutes, 60);
        assert_eq!(spec.availability, Availability::All);
        assert_eq!(spec.min_rating, MinRating::None);
        assert_eq!(spec.price_band, PriceBand::All);
        assert_eq!(spec.sort_by, SortBy::Distance);
        assert_eq!(spec.active_filter_count(), 0);
        assert!(spec.active_filter_labels().is_empty());
    }

    #[test]
    fn test_price_band_edges_go_to_lower_band() {
        assert!(PriceBand::Budget.admits(25));
        assert!(!PriceBand::Mid.admits(25));
        assert!(PriceBand::Mid.admits(26));
        assert!(PriceBand::Mid.admits(35));
        assert!(!PriceBand::Premium.admits(35));
        assert!(PriceBand::Premium.admits(36));
        assert!(PriceBand::All.admits(0));

        for price in 0..100 {
            let bands = [PriceBand::Budget, PriceBand::Mid, PriceBand::Premium]
                .into_iter()
                .filter(|b| b.admits(price))
                .count();
            assert_eq!(bands, 1, "price {} must fall in exactly one band", price);
        }
    }

    #[test]
    fn test_rating_thresholds_are_inclusive() {
        assert!(MinRating::None.admits(0.0));
        assert!(MinRating::FourPlus.admits(4.0));
        assert!(!MinRating::FourPlus.admits(3.9));
        assert!(MinRating::FourFivePlus.admits(4.5));
        assert!(MinRating::FourEightPlus.admits(4.8));
        assert!(!MinRating::FourEightPlus.admits(4.7));
    }

    #[test]
    fn test_availability() {
        assert!(Availability::All.admits(true));
        assert!(Availability::All.admits(false));
        assert!(Availability::AvailableOnly.admits(true));
        assert!(!Availability::AvailableOnly.admits(false));
        assert!(Availability::BusyOnly.admits(false));
        assert!(!Availability::BusyOnly.admits(true));
    }

    #[test]
    fn test_active_filter_count_tracks_each_field() {
        let mut spec = FilterSpec::default();
        spec.set_max_distance(2.5);
        assert_eq!(spec.active_filter_count(), 1);
        spec.set_max_travel_time(30);
        assert_eq!(spec.active_filter_count(), 2);
        spec.availability = Availability::BusyOnly;
        spec.min_rating = MinRating::FourFivePlus;
        spec.price_band = PriceBand::Premium;
        spec.sort_by = SortBy::Rating;
        assert_eq!(spec.active_filter_count(), 6);

        spec.search_text = "fade".to_string();
        assert_eq!(spec.active_filter_count(), 7);

        let searched = FilterSpec {
            search_text: "fade".to_string(),
            ..FilterSpec::default()
        };
        assert_ne!(searched, FilterSpec::default());
        assert_eq!(searched.active_filter_count(), 1);
        assert!(searched.active_filter_labels().is_empty());
    }

    #[test]
    fn test_active_filter_labels() {
        let spec = FilterSpec {
            max_distance_miles: 2.5,
            max_travel_time_minutes: 30,
            availability: Availability::AvailableOnly,
            min_rating: MinRating::FourFivePlus,
            price_band: PriceBand::Budget,
            sort_by: SortBy::Price,
            ..FilterSpec::default()
        };
        assert_eq!(
            spec.active_filter_labels(),
            vec![
                "Within 2.5 miles",
                "Under 30 min",
                "Available Now",
                "4.5+ Rating",
                "Budget Price",
            ]
        );

        let whole = FilterSpec {
            max_distance_miles: 2.0,
            ..FilterSpec::default()
        };
        assert_eq!(whole.active_filter_labels(), vec!["Within 2 miles"]);
    }

    #[test]
    fn test_slider_snapping() {
        let mut spec = FilterSpec::default();
        spec.set_max_distance(2.3);
        assert_eq!(spec.max_distance_miles, 2.5);
        spec.set_max_distance(0.1);
        assert_eq!(spec.max_distance_miles, 0.5);
        spec.set_max_distance(12.0);
        assert_eq!(spec.max_distance_miles, 5.0);
        spec.set_max_distance(f64::NAN);
        assert_eq!(spec.max_distance_miles, 5.0);

        spec.set_max_travel_time(23);
        assert_eq!(spec.max_travel_time_minutes, 25);
        spec.set_max_travel_time(22);
        assert_eq!(spec.max_travel_time_minutes, 20);
        spec.set_max_travel_time(0);
        assert_eq!(spec.max_travel_time_minutes, 5);
        spec.set_max_travel_time(240);
        assert_eq!(spec.max_travel_time_minutes, 60);
    }

    #[test]
    fn test_setters_touch_one_field() {
        let mut spec = FilterSpec {
            search_text: "beard".to_string(),
            price_band: PriceBand::Mid,
            ..FilterSpec::default()
        };
        spec.set_max_travel_time(40);
        assert_eq!(spec.search_text, "beard");
        assert_eq!(spec.price_band, PriceBand::Mid);
        assert_eq!(spec.max_distance_miles, 5.0);
    }

    #[test]
    fn test_clear_filters_keeps_search_text() {
        let mut spec = FilterSpec {
            search_text: "fade".to_string(),
            max_distance_miles: 1.0,
            availability: Availability::BusyOnly,
            sort_by: SortBy::Rating,
            ..FilterSpec::default()
        };
        spec.clear_filters();
        assert_eq!(spec.search_text, "fade");
        assert_eq!(spec.active_filter_count(), 1);
        assert!(spec.active_filter_labels().is_empty());
    }

    #[test]
    fn test_wire_values() {
        assert_eq!("available".parse::<Availability>(), Ok(Availability::AvailableOnly));
        assert_eq!("4.8+".parse::<MinRating>(), Ok(MinRating::FourEightPlus));
        assert_eq!("all".parse::<MinRating>(), Ok(MinRating::None));
        assert_eq!("Premium".parse::<PriceBand>(), Ok(PriceBand::Premium));
        assert_eq!("time".parse::<SortBy>(), Ok(SortBy::TravelTime));
        assert_eq!(MinRating::FourPlus.to_string(), "4+");
        assert_eq!(SortBy::TravelTime.short_label(), "Fastest");
        assert_eq!(
            "cheapest".parse::<SortBy>(),
            Err(ParseError::UnknownValue {
                field: "sort",
                value: "cheapest".to_string()
            })
        );
    }

    #[test]
    fn test_spec_deserializes_with_defaults() {
        let spec: FilterSpec = serde_json::from_str(r#"{"priceBand": "budget"}"#).unwrap();
        assert_eq!(spec.price_band, PriceBand::Budget);
        assert_eq!(spec.max_distance_miles, 5.0);
        assert_eq!(spec.sort_by, SortBy::Distance);
    }
}
