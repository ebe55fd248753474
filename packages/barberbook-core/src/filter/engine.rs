//! Membership and ranking of providers against a [`FilterSpec`].

use super::spec::{FilterSpec, SortBy};
use crate::catalog::Provider;
use std::cmp::Ordering;

/// Filter and order `providers` for display.
///
/// Pure and total: impossible constraints yield an empty list. Providers with
/// equal sort keys keep their catalog order.
pub fn apply(providers: &[Provider], spec: &FilterSpec) -> Vec<Provider> {
    let query = normalize_query(&spec.search_text);

    let mut visible: Vec<Provider> = providers
        .iter()
        .filter(|p| matches_query(p, &query) && matches_filters(p, spec))
        .cloned()
        .collect();

    // sort_by is stable
    visible.sort_by(|a, b| compare(a, b, spec.sort_by));

    tracing::trace!(
        "Filtered {} providers down to {} (sort: {})",
        providers.len(),
        visible.len(),
        spec.sort_by
    );
    visible
}

/// Whether a single provider passes every membership predicate of `spec`.
pub fn matches(provider: &Provider, spec: &FilterSpec) -> bool {
    matches_query(provider, &normalize_query(&spec.search_text)) && matches_filters(provider, spec)
}

/// "3 barbers found for \"fade\""
pub fn summary(count: usize, search_text: &str) -> String {
    let plural = if count == 1 { "" } else { "s" };
    let search_text = search_text.trim();
    if search_text.is_empty() {
        format!("{} barber{} found", count, plural)
    } else {
        format!("{} barber{} found for \"{}\"", count, plural, search_text)
    }
}

fn normalize_query(search_text: &str) -> String {
    search_text.trim().to_lowercase()
}

fn matches_query(provider: &Provider, query: &str) -> bool {
    query.is_empty()
        || provider.name.to_lowercase().contains(query)
        || provider
            .specialties
            .iter()
            .any(|s| s.to_lowercase().contains(query))
}

fn matches_filters(provider: &Provider, spec: &FilterSpec) -> bool {
    provider.location.distance_miles <= spec.max_distance_miles
        && provider.location.travel_time_minutes <= spec.max_travel_time_minutes
        && spec.availability.admits(provider.available)
        && spec.min_rating.admits(provider.rating)
        && spec.price_band.admits(provider.price_range.min())
}

fn compare(a: &Provider, b: &Provider, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Distance => a
            .location
            .distance_miles
            .total_cmp(&b.location.distance_miles),
        SortBy::TravelTime => a
            .location
            .travel_time_minutes
            .cmp(&b.location.travel_time_minutes),
        SortBy::Rating => b.rating.total_cmp(&a.rating),
        SortBy::Price => a.price_range.min().cmp(&b.price_range.min()),
    }
}
