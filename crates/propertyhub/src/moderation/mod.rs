//! Listing moderation: the status state machine, quick actions, and the admin API over it.

pub mod actions;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod status;

#[cfg(test)]
mod tests;

pub use actions::{
    visible_actions, ActionButton, ButtonTone, ModerationAction, QuickActions, UnknownAction,
};
pub use domain::{Listing, ListingId, ListingPatch, ListingPurpose, PropertyType};
pub use repository::{ListingRepository, Notifier, NotifyError, RepositoryError};
pub use router::moderation_router;
pub use service::{ListingCard, ListingPage, ListingQuery, ModerationError, ModerationService};
pub use status::{BadgeColor, PropertyStatus, StatusBadge, UnknownStatus};
