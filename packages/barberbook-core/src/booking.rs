//! Service selection on a provider profile and the booking it produces.

use crate::catalog::{Provider, Service};
use crate::error::BookingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Services picked on a provider's profile, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSelection {
    service_ids: Vec<u32>,
}

impl ServiceSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the service if unselected, deselect it otherwise.
    /// Returns whether it is selected afterwards.
    pub fn toggle(&mut self, service_id: u32) -> bool {
        if let Some(pos) = self.service_ids.iter().position(|id| *id == service_id) {
            self.service_ids.remove(pos);
            false
        } else {
            self.service_ids.push(service_id);
            true
        }
    }

    pub fn is_selected(&self, service_id: u32) -> bool {
        self.service_ids.contains(&service_id)
    }

    pub fn ids(&self) -> &[u32] {
        &self.service_ids
    }

    pub fn is_empty(&self) -> bool {
        self.service_ids.is_empty()
    }

    /// Selected services in menu order. Ids the provider does not offer are skipped.
    pub fn services<'a>(&self, provider: &'a Provider) -> Vec<&'a Service> {
        provider
            .services
            .iter()
            .filter(|s| self.is_selected(s.id))
            .collect()
    }

    pub fn total_price(&self, provider: &Provider) -> u32 {
        self.services(provider).iter().map(|s| s.price).sum()
    }

    pub fn total_duration_minutes(&self, provider: &Provider) -> u32 {
        self.services(provider).iter().map(|s| s.duration_minutes).sum()
    }

    pub fn to_booking(
        &self,
        provider: &Provider,
        scheduled_for: Option<DateTime<Utc>>,
    ) -> Result<BookingRequest, BookingError> {
        if self.is_empty() {
            return Err(BookingError::NoServicesSelected);
        }
        if let Some(unknown) = self
            .service_ids
            .iter()
            .find(|id| provider.service(**id).is_none())
        {
            return Err(BookingError::UnknownService {
                barber_id: provider.id,
                service_id: *unknown,
            });
        }

        Ok(BookingRequest {
            barber_id: provider.id,
            service_ids: self.service_ids.clone(),
            scheduled_for,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub barber_id: u32,
    pub service_ids: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_catalog;

    fn mike() -> Provider {
        sample_catalog().remove(0)
    }

    #[test]
    fn test_toggle() {
        let mut selection = ServiceSelection::new();
        assert!(selection.toggle(4));
        assert!(selection.toggle(1));
        assert_eq!(selection.ids(), &[4, 1]);
        assert!(!selection.toggle(4));
        assert_eq!(selection.ids(), &[1]);
        assert!(!selection.is_selected(4));
    }

    #[test]
    fn test_totals() {
        let barber = mike();
        let mut selection = ServiceSelection::new();
        assert_eq!(selection.total_price(&barber), 0);

        // Hot Towel Shave ($35, 40 min) + Classic Haircut ($25, 45 min)
        selection.toggle(4);
        selection.toggle(1);
        assert_eq!(selection.total_price(&barber), 60);
        assert_eq!(selection.total_duration_minutes(&barber), 85);

        let names: Vec<&str> = selection
            .services(&barber)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Classic Haircut", "Hot Towel Shave"]);
    }

    #[test]
    fn test_to_booking() {
        let barber = mike();
        let mut selection = ServiceSelection::new();
        assert_eq!(
            selection.to_booking(&barber, None),
            Err(BookingError::NoServicesSelected)
        );

        selection.toggle(2);
        let booking = selection.to_booking(&barber, None).unwrap();
        assert_eq!(booking.barber_id, 1);
        assert_eq!(booking.service_ids, vec![2]);

        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json, serde_json::json!({"barberId": 1, "serviceIds": [2]}));

        selection.toggle(42);
        assert_eq!(
            selection.to_booking(&barber, None),
            Err(BookingError::UnknownService {
                barber_id: 1,
                service_id: 42
            })
        );
    }
}
