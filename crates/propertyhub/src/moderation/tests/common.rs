use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::listings::{FilterCatalog, Notification};
use crate::moderation::domain::{Listing, ListingId, ListingPatch, ListingPurpose, PropertyType};
use crate::moderation::repository::{ListingRepository, Notifier, NotifyError, RepositoryError};
use crate::moderation::status::PropertyStatus;
use crate::moderation::{moderation_router, ModerationService};

pub(super) fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 8, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn listing(id: &str, status: PropertyStatus, age_days: i64) -> Listing {
    let created_at = reference_now() - Duration::days(age_days);
    Listing {
        id: ListingId(id.to_string()),
        title: format!("Rumah {id}"),
        property_type: PropertyType::House,
        purpose: ListingPurpose::Sale,
        agent_id: "agent-1".to_string(),
        city: "Yogyakarta".to_string(),
        price: 1_250_000_000,
        status,
        created_at,
        updated_at: created_at,
    }
}

pub(super) fn seeded_listings() -> Vec<Listing> {
    let mut villa = listing("prop-villa", PropertyStatus::Published, 40);
    villa.property_type = PropertyType::Villa;
    villa.purpose = ListingPurpose::Rent;
    villa.agent_id = "agent-2".to_string();

    vec![
        listing("prop-pending", PropertyStatus::Pending, 1),
        listing("prop-approved", PropertyStatus::Approved, 3),
        listing("prop-rejected", PropertyStatus::Rejected, 10),
        listing("prop-unpublished", PropertyStatus::Unpublished, 200),
        villa,
    ]
}

pub(super) fn catalog() -> FilterCatalog {
    FilterCatalog::new([("agent-1", "Budi Santoso"), ("agent-2", "Sari Dewi")])
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    listings: Arc<Mutex<BTreeMap<ListingId, Listing>>>,
}

impl MemoryRepository {
    pub(super) fn with_listings(listings: Vec<Listing>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.listings.lock().unwrap();
            for listing in listings {
                guard.insert(listing.id.clone(), listing);
            }
        }
        repository
    }

    pub(super) fn status_of(&self, id: &str) -> Option<PropertyStatus> {
        self.listings
            .lock()
            .unwrap()
            .get(&ListingId(id.to_string()))
            .map(|listing| listing.status)
    }
}

impl ListingRepository for MemoryRepository {
    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        Ok(self.listings.lock().unwrap().get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Listing>, RepositoryError> {
        Ok(self.listings.lock().unwrap().values().cloned().collect())
    }

    fn update_status(
        &self,
        id: &ListingId,
        expected: PropertyStatus,
        next: PropertyStatus,
        at: DateTime<Utc>,
    ) -> Result<Listing, RepositoryError> {
        let mut guard = self.listings.lock().unwrap();
        let listing = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if listing.status != expected {
            return Err(RepositoryError::Conflict {
                expected,
                actual: listing.status,
            });
        }
        listing.status = next;
        listing.updated_at = at;
        Ok(listing.clone())
    }

    fn update_fields(
        &self,
        id: &ListingId,
        patch: ListingPatch,
        at: DateTime<Utc>,
    ) -> Result<Listing, RepositoryError> {
        let mut guard = self.listings.lock().unwrap();
        let listing = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        patch.apply(listing, at);
        Ok(listing.clone())
    }

    fn delete(&self, id: &ListingId) -> Result<(), RepositoryError> {
        self.listings
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

pub(super) struct UnavailableRepository;

impl ListingRepository for UnavailableRepository {
    fn fetch(&self, _id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Listing>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_status(
        &self,
        _id: &ListingId,
        _expected: PropertyStatus,
        _next: PropertyStatus,
        _at: DateTime<Utc>,
    ) -> Result<Listing, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_fields(
        &self,
        _id: &ListingId,
        _patch: ListingPatch,
        _at: DateTime<Utc>,
    ) -> Result<Listing, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &ListingId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Hands out the stored snapshot, then lets another admin move the listing
/// to `interleaved` before the caller writes.
pub(super) struct RacingRepository {
    pub(super) inner: MemoryRepository,
    pub(super) interleaved: PropertyStatus,
}

impl ListingRepository for RacingRepository {
    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        let snapshot = self.inner.fetch(id)?;
        if let Some(listing) = &snapshot {
            self.inner
                .update_status(id, listing.status, self.interleaved, reference_now())?;
        }
        Ok(snapshot)
    }

    fn list(&self) -> Result<Vec<Listing>, RepositoryError> {
        self.inner.list()
    }

    fn update_status(
        &self,
        id: &ListingId,
        expected: PropertyStatus,
        next: PropertyStatus,
        at: DateTime<Utc>,
    ) -> Result<Listing, RepositoryError> {
        self.inner.update_status(id, expected, next, at)
    }

    fn update_fields(
        &self,
        id: &ListingId,
        patch: ListingPatch,
        at: DateTime<Utc>,
    ) -> Result<Listing, RepositoryError> {
        self.inner.update_fields(id, patch, at)
    }

    fn delete(&self, id: &ListingId) -> Result<(), RepositoryError> {
        self.inner.delete(id)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for MemoryNotifier {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError> {
        self.events.lock().unwrap().push(notification);
        Ok(())
    }
}

pub(super) struct OfflineNotifier;

impl Notifier for OfflineNotifier {
    fn publish(&self, _notification: Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp down".to_string()))
    }
}

pub(super) fn build_service() -> (
    ModerationService<MemoryRepository, MemoryNotifier>,
    MemoryRepository,
    MemoryNotifier,
) {
    let repository = MemoryRepository::with_listings(seeded_listings());
    let notifier = MemoryNotifier::default();
    let service = ModerationService::new(
        Arc::new(repository.clone()),
        Arc::new(notifier.clone()),
        catalog(),
    );
    (service, repository, notifier)
}

pub(super) fn router_with_service(
    service: ModerationService<MemoryRepository, MemoryNotifier>,
) -> axum::Router {
    moderation_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
