//! Provider search, filtering and ranking.
//!
//! Everything here is synchronous and side-effect free, cheap enough to run
//! on every keystroke.

mod engine;
mod spec;

pub use engine::{apply, matches, summary};
pub use spec::{
    Availability, FilterSpec, MinRating, PriceBand, SortBy, DEFAULT_MAX_DISTANCE_MILES,
    DEFAULT_MAX_TRAVEL_TIME_MINUTES,
};
