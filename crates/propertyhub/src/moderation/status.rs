use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Moderation status carried by every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Pending,
    Approved,
    Rejected,
    Published,
    Unpublished,
}

impl PropertyStatus {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Pending,
            Self::Approved,
            Self::Rejected,
            Self::Published,
            Self::Unpublished,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Published => "published",
            Self::Unpublished => "unpublished",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Menunggu",
            Self::Approved => "Disetujui",
            Self::Rejected => "Ditolak",
            Self::Published => "Dipublikasikan",
            Self::Unpublished => "Tidak Dipublikasikan",
        }
    }

    pub const fn badge(self) -> StatusBadge {
        let (color, icon) = match self {
            Self::Pending => (BadgeColor::Yellow, "clock"),
            Self::Approved => (BadgeColor::Blue, "check-circle"),
            Self::Rejected => (BadgeColor::Red, "x-circle"),
            Self::Published => (BadgeColor::Green, "globe"),
            Self::Unpublished => (BadgeColor::Gray, "eye-off"),
        };

        StatusBadge {
            status: self,
            label: self.label(),
            color,
            icon,
        }
    }

    /// Only the moderation table decides legality; the backend itself may
    /// still be asked to move a rejected listing through a direct update.
    pub fn can_transition_to(self, next: PropertyStatus) -> bool {
        super::actions::visible_actions(self)
            .iter()
            .any(|action| action.target() == next)
    }

    pub fn is_terminal(self) -> bool {
        super::actions::visible_actions(self).is_empty()
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown property status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for PropertyStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|status| status.key() == normalized)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Yellow,
    Blue,
    Red,
    Green,
    Gray,
}

/// Label, color, and icon name rendered next to a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub status: PropertyStatus,
    pub label: &'static str,
    pub color: BadgeColor,
    pub icon: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_has_a_distinct_badge() {
        let badges: Vec<StatusBadge> = PropertyStatus::ordered()
            .into_iter()
            .map(PropertyStatus::badge)
            .collect();

        for (idx, badge) in badges.iter().enumerate() {
            for other in &badges[idx + 1..] {
                assert_ne!(badge.color, other.color);
                assert_ne!(badge.icon, other.icon);
            }
        }
        assert_eq!(PropertyStatus::Pending.badge().label, "Menunggu");
        assert_eq!(PropertyStatus::Published.badge().color, BadgeColor::Green);
    }

    #[test]
    fn parses_keys_case_insensitively() {
        assert_eq!(
            "Published".parse::<PropertyStatus>(),
            Ok(PropertyStatus::Published)
        );
        assert_eq!(
            " unpublished ".parse::<PropertyStatus>(),
            Ok(PropertyStatus::Unpublished)
        );
        assert!("archived".parse::<PropertyStatus>().is_err());
    }

    #[test]
    fn transitions_follow_the_action_table() {
        use PropertyStatus::*;

        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Published));
        assert!(Approved.can_transition_to(Published));
        assert!(Approved.can_transition_to(Rejected));
        assert!(Published.can_transition_to(Unpublished));
        assert!(!Published.can_transition_to(Pending));
        assert!(Unpublished.can_transition_to(Published));
        assert!(Rejected.is_terminal());
        assert!(!Unpublished.is_terminal());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&PropertyStatus::Unpublished).expect("serializes");
        assert_eq!(json, "\"unpublished\"");
    }
}
