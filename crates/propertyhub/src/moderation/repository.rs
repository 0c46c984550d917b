use chrono::{DateTime, Utc};

use super::domain::{Listing, ListingId, ListingPatch};
use super::status::PropertyStatus;
use crate::listings::profiles::Notification;

/// Property update collaborator; the service never mutates listings directly.
pub trait ListingRepository: Send + Sync {
    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError>;
    fn list(&self) -> Result<Vec<Listing>, RepositoryError>;
    /// Compare-and-set: writes `next` only while the stored status is still
    /// `expected`, otherwise fails with [`RepositoryError::Conflict`].
    fn update_status(
        &self,
        id: &ListingId,
        expected: PropertyStatus,
        next: PropertyStatus,
        at: DateTime<Utc>,
    ) -> Result<Listing, RepositoryError>;
    fn update_fields(
        &self,
        id: &ListingId,
        patch: ListingPatch,
        at: DateTime<Utc>,
    ) -> Result<Listing, RepositoryError>;
    fn delete(&self, id: &ListingId) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("listing not found")]
    NotFound,
    #[error("listing status is {actual}, expected {expected}")]
    Conflict {
        expected: PropertyStatus,
        actual: PropertyStatus,
    },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for owner/agent notifications.
pub trait Notifier: Send + Sync {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
