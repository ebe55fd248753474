//! Plain-text rendering of providers for terminal output.

use barberbook_core::{Provider, ServiceSelection};

/// One provider as a result-list card.
pub fn provider_card(provider: &Provider) -> String {
    let status = if provider.available { "Available" } else { "Busy" };
    let specialties = provider
        .specialties
        .iter()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");

    let mut card = format!(
        "  #{:<3} {:<20} ★ {:.1} ({} reviews)  {:<9} {}\n",
        provider.id,
        provider.name,
        provider.rating,
        provider.review_count,
        status,
        provider.price_range
    );
    card.push_str(&format!("       {}\n", specialties));
    card.push_str(&format!(
        "       {} mi • {} min away • {}",
        provider.location.distance_miles,
        provider.location.travel_time_minutes,
        provider.location.address
    ));
    if let Some(next) = &provider.next_available {
        card.push_str(&format!("\n       Next available: {}", next));
    }
    card
}

/// Full profile with the service menu, marking selected services.
pub fn provider_profile(provider: &Provider, selection: &ServiceSelection) -> String {
    let mut out = format!("{}\n", provider.name);
    out.push_str(&format!(
        "★ {:.1} ({} reviews)",
        provider.rating, provider.review_count
    ));
    if let Some(experience) = &provider.experience {
        out.push_str(&format!(" • {} experience", experience));
    }
    out.push('\n');
    out.push_str(&format!(
        "{} ({} mi, {} min)\n",
        provider.location.address,
        provider.location.distance_miles,
        provider.location.travel_time_minutes
    ));
    if let Some(bio) = &provider.bio {
        out.push_str(&format!("\n{}\n", bio));
    }
    out.push_str(&format!("\nSpecialties: {}\n", provider.specialties.join(", ")));

    if provider.services.is_empty() {
        out.push_str("\nNo services listed.\n");
        return out;
    }

    out.push_str("\nServices:\n");
    for service in &provider.services {
        let mark = if selection.is_selected(service.id) { "x" } else { " " };
        out.push_str(&format!(
            "  [{}] {:>2}. {:<26} {:>4} min  ${:>3}\n",
            mark, service.id, service.name, service.duration_minutes, service.price
        ));
    }

    if !selection.is_empty() {
        out.push_str(&format!(
            "\nSelected: {} service(s), {} min, total ${}\n",
            selection.services(provider).len(),
            selection.total_duration_minutes(provider),
            selection.total_price(provider)
        ));
    }
    out
}
