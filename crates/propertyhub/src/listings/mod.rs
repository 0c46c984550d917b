//! Dashboard-facing views: filters, stats cards, transfer records, and the JSON envelope.

pub mod envelope;
pub mod filters;
pub mod profiles;
pub mod stats;

pub use envelope::{ApiResponse, Pagination};
pub use filters::{
    DateRange, FilterCatalog, FilterDimension, FilterError, FilterKey, FilterOption, FilterOwner,
    FilterPanel, Filters, ALL,
};
pub use profiles::{
    Favorite, Inquiry, InquiryStatus, Notification, NotificationKind, PropertySummary,
    UserProfile, UserRole,
};
pub use stats::{ModerationStats, StatCard};
