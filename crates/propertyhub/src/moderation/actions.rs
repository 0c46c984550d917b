use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::domain::{Listing, ListingId};
use super::status::{PropertyStatus, StatusBadge};

/// Buttons an admin can press on a listing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    Approve,
    Reject,
    Publish,
    Unpublish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonTone {
    Success,
    Danger,
    Primary,
    Neutral,
}

impl ModerationAction {
    /// Display order of the quick actions panel.
    pub const fn all() -> [Self; 4] {
        [Self::Approve, Self::Reject, Self::Publish, Self::Unpublish]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Publish => "publish",
            Self::Unpublish => "unpublish",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Approve => "Setujui",
            Self::Reject => "Tolak",
            Self::Publish => "Publikasikan",
            Self::Unpublish => "Unpublish",
        }
    }

    pub const fn tone(self) -> ButtonTone {
        match self {
            Self::Approve => ButtonTone::Success,
            Self::Reject => ButtonTone::Danger,
            Self::Publish => ButtonTone::Primary,
            Self::Unpublish => ButtonTone::Neutral,
        }
    }

    pub const fn target(self) -> PropertyStatus {
        match self {
            Self::Approve => PropertyStatus::Approved,
            Self::Reject => PropertyStatus::Rejected,
            Self::Publish => PropertyStatus::Published,
            Self::Unpublish => PropertyStatus::Unpublished,
        }
    }

    pub const fn is_visible_for(self, status: PropertyStatus) -> bool {
        use PropertyStatus as S;

        match self {
            Self::Approve => matches!(status, S::Pending),
            Self::Reject => matches!(status, S::Pending | S::Approved),
            Self::Publish => matches!(status, S::Approved | S::Unpublished),
            Self::Unpublish => matches!(status, S::Published),
        }
    }
}

impl FromStr for ModerationAction {
    type Err = UnknownAction;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|action| action.key() == normalized)
            .ok_or_else(|| UnknownAction(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown moderation action '{0}'")]
pub struct UnknownAction(pub String);

/// Actions legal for `status`, in display order.
pub fn visible_actions(status: PropertyStatus) -> Vec<ModerationAction> {
    ModerationAction::all()
        .into_iter()
        .filter(|action| action.is_visible_for(status))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionButton {
    pub action: ModerationAction,
    pub label: &'static str,
    pub tone: ButtonTone,
    pub target_status: PropertyStatus,
}

impl From<ModerationAction> for ActionButton {
    fn from(action: ModerationAction) -> Self {
        Self {
            action,
            label: action.label(),
            tone: action.tone(),
            target_status: action.target(),
        }
    }
}

/// Quick actions panel for a single listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickActions {
    pub listing_id: ListingId,
    pub badge: StatusBadge,
    pub actions: Vec<ActionButton>,
}

impl QuickActions {
    pub fn for_status(listing_id: ListingId, status: PropertyStatus) -> Self {
        Self {
            listing_id,
            badge: status.badge(),
            actions: visible_actions(status)
                .into_iter()
                .map(ActionButton::from)
                .collect(),
        }
    }

    pub fn for_listing(listing: &Listing) -> Self {
        Self::for_status(listing.id.clone(), listing.status)
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.actions.iter().map(|button| button.label).collect()
    }
}
