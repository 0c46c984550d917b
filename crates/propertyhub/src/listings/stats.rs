use serde::Serialize;

use crate::moderation::{BadgeColor, PropertyStatus};

/// Aggregate counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModerationStats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub published: u64,
    pub unpublished: u64,
}

impl ModerationStats {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = PropertyStatus>,
    {
        statuses
            .into_iter()
            .fold(Self::default(), |mut stats, status| {
                stats.total += 1;
                *stats.slot_mut(status) += 1;
                stats
            })
    }

    pub fn count(&self, status: PropertyStatus) -> u64 {
        match status {
            PropertyStatus::Pending => self.pending,
            PropertyStatus::Approved => self.approved,
            PropertyStatus::Rejected => self.rejected,
            PropertyStatus::Published => self.published,
            PropertyStatus::Unpublished => self.unpublished,
        }
    }

    fn slot_mut(&mut self, status: PropertyStatus) -> &mut u64 {
        match status {
            PropertyStatus::Pending => &mut self.pending,
            PropertyStatus::Approved => &mut self.approved,
            PropertyStatus::Rejected => &mut self.rejected,
            PropertyStatus::Published => &mut self.published,
            PropertyStatus::Unpublished => &mut self.unpublished,
        }
    }

    pub fn cards(&self) -> Vec<StatCard> {
        let mut cards = vec![StatCard {
            key: "total",
            label: "Total Properti",
            value: self.total,
            color: None,
        }];
        cards.extend(PropertyStatus::ordered().into_iter().map(|status| {
            let badge = status.badge();
            StatCard {
                key: status.key(),
                label: badge.label,
                value: self.count(status),
                color: Some(badge.color),
            }
        }));
        cards
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub key: &'static str,
    pub label: &'static str,
    pub value: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<BadgeColor>,
}
