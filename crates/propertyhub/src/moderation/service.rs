use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::actions::{visible_actions, ActionButton, ModerationAction, QuickActions};
use super::domain::{Listing, ListingId, ListingPatch};
use super::repository::{ListingRepository, Notifier, NotifyError, RepositoryError};
use super::status::{PropertyStatus, StatusBadge};
use crate::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::listings::{
    FilterCatalog, FilterError, Filters, ModerationStats, Notification, NotificationKind,
    Pagination, PropertySummary,
};

/// Service deciding which moderation moves are legal before delegating them
/// to the property update collaborator.
pub struct ModerationService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    catalog: FilterCatalog,
    page_size: u32,
}

static NOTIFICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_notification_id() -> String {
    let id = NOTIFICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("ntf-{id:06}")
}

/// Filter selection plus paging, as received from the admin list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub filters: Filters,
    pub page: u32,
    pub page_size: Option<u32>,
}

/// Listing row with its badge and quick action buttons.
#[derive(Debug, Clone, Serialize)]
pub struct ListingCard {
    #[serde(flatten)]
    pub listing: Listing,
    pub badge: StatusBadge,
    pub actions: Vec<ActionButton>,
}

impl From<Listing> for ListingCard {
    fn from(listing: Listing) -> Self {
        let badge = listing.status.badge();
        let actions = visible_actions(listing.status)
            .into_iter()
            .map(ActionButton::from)
            .collect();
        Self {
            listing,
            badge,
            actions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub items: Vec<ListingCard>,
    pub pagination: Pagination,
}

impl<R, N> ModerationService<R, N>
where
    R: ListingRepository + 'static,
    N: Notifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, catalog: FilterCatalog) -> Self {
        Self {
            repository,
            notifier,
            catalog,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    pub fn list(&self, query: ListingQuery) -> Result<ListingPage, ModerationError> {
        self.list_at(query, Utc::now())
    }

    /// Listings matching the filters as of `now`, newest first.
    pub fn list_at(
        &self,
        query: ListingQuery,
        now: DateTime<Utc>,
    ) -> Result<ListingPage, ModerationError> {
        self.catalog.validate(&query.filters)?;

        let mut matching: Vec<Listing> = self
            .repository
            .list()?
            .into_iter()
            .filter(|listing| query.filters.matches(listing, now))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let page_size = query
            .page_size
            .unwrap_or(self.page_size)
            .clamp(1, MAX_PAGE_SIZE);
        let pagination = Pagination::compute(query.page, page_size, matching.len() as u64);
        let items = pagination
            .window(matching)
            .into_iter()
            .map(ListingCard::from)
            .collect();

        Ok(ListingPage { items, pagination })
    }

    pub fn get(&self, id: &ListingId) -> Result<Listing, ModerationError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| ModerationError::NotFound(id.clone()))
    }

    pub fn quick_actions(&self, id: &ListingId) -> Result<QuickActions, ModerationError> {
        let listing = self.get(id)?;
        Ok(QuickActions::for_listing(&listing))
    }

    pub fn apply(
        &self,
        id: &ListingId,
        action: ModerationAction,
    ) -> Result<Listing, ModerationError> {
        self.change_status(id, action.target())
    }

    /// Move a listing to `next` if the quick actions panel would offer it.
    pub fn change_status(
        &self,
        id: &ListingId,
        next: PropertyStatus,
    ) -> Result<Listing, ModerationError> {
        let current = self.get(id)?;
        if !current.status.can_transition_to(next) {
            return Err(ModerationError::IllegalTransition {
                from: current.status,
                to: next,
            });
        }

        let now = Utc::now();
        let updated = match self
            .repository
            .update_status(id, current.status, next, now)
        {
            Ok(listing) => listing,
            Err(RepositoryError::Conflict { actual, .. }) => {
                warn!(
                    listing = %id,
                    expected = %current.status,
                    %actual,
                    "listing status changed concurrently"
                );
                return Err(ModerationError::IllegalTransition {
                    from: actual,
                    to: next,
                });
            }
            Err(err) => return Err(err.into()),
        };
        info!(listing = %id, from = %current.status, to = %next, "listing status changed");

        if let Err(err) = self.notify_status_change(&updated, current.status, now) {
            warn!(listing = %id, error = %err, "status change notification not delivered");
        }

        Ok(updated)
    }

    pub fn edit(&self, id: &ListingId, patch: ListingPatch) -> Result<Listing, ModerationError> {
        if patch.is_empty() {
            return Err(ModerationError::EmptyPatch);
        }
        self.get(id)?;
        let updated = self.repository.update_fields(id, patch, Utc::now())?;
        info!(listing = %id, "listing edited");
        Ok(updated)
    }

    pub fn delete(&self, id: &ListingId) -> Result<(), ModerationError> {
        self.get(id)?;
        self.repository.delete(id)?;
        info!(listing = %id, "listing deleted");
        Ok(())
    }

    pub fn stats(&self) -> Result<ModerationStats, ModerationError> {
        let listings = self.repository.list()?;
        Ok(ModerationStats::from_statuses(
            listings.iter().map(|listing| listing.status),
        ))
    }

    fn notify_status_change(
        &self,
        listing: &Listing,
        previous: PropertyStatus,
        at: DateTime<Utc>,
    ) -> Result<(), NotifyError> {
        let notification = Notification {
            id: next_notification_id(),
            user_id: listing.agent_id.clone(),
            kind: NotificationKind::StatusChanged,
            title: format!("Status properti: {}", listing.status.label()),
            message: format!(
                "\"{}\" berubah dari {} menjadi {}.",
                listing.title,
                previous.label(),
                listing.status.label()
            ),
            read: false,
            created_at: at,
            property: Some(PropertySummary::from(listing)),
        };
        self.notifier.publish(notification)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("listing {0} not found")]
    NotFound(ListingId),
    #[error("cannot move listing from {from} to {to}")]
    IllegalTransition {
        from: PropertyStatus,
        to: PropertyStatus,
    },
    #[error("edit request changes nothing")]
    EmptyPatch,
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ModerationError {
    pub const fn code(&self) -> &'static str {
        match self {
            ModerationError::NotFound(_) | ModerationError::Repository(RepositoryError::NotFound) => {
                "not_found"
            }
            ModerationError::IllegalTransition { .. }
            | ModerationError::Repository(RepositoryError::Conflict { .. }) => {
                "illegal_transition"
            }
            ModerationError::EmptyPatch => "empty_patch",
            ModerationError::Filter(_) => "invalid_filter",
            ModerationError::Repository(RepositoryError::Unavailable(_)) => "repository_unavailable",
        }
    }
}
