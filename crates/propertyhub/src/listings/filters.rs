use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::moderation::{Listing, ListingPurpose, PropertyStatus, PropertyType};

/// Neutral value for every filter dimension.
pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKey {
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "type")]
    PropertyType,
    #[serde(rename = "purpose")]
    Purpose,
    #[serde(rename = "agent")]
    Agent,
    #[serde(rename = "dateRange")]
    DateRange,
}

impl FilterKey {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Status,
            Self::PropertyType,
            Self::Purpose,
            Self::Agent,
            Self::DateRange,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::PropertyType => "type",
            Self::Purpose => "purpose",
            Self::Agent => "agent",
            Self::DateRange => "dateRange",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Status => "Status",
            Self::PropertyType => "Tipe Properti",
            Self::Purpose => "Tujuan",
            Self::Agent => "Agen",
            Self::DateRange => "Rentang Waktu",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FilterKey {
    type Err = FilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|key| key.key().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| FilterError::UnknownKey(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    Today,
    Week,
    Month,
    Year,
}

impl DateRange {
    pub const fn ordered() -> [Self; 4] {
        [Self::Today, Self::Week, Self::Month, Self::Year]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Hari Ini",
            Self::Week => "7 Hari Terakhir",
            Self::Month => "30 Hari Terakhir",
            Self::Year => "1 Tahun Terakhir",
        }
    }

    /// Timestamps after `now` fall in no range.
    pub fn contains(self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if created_at > now {
            return false;
        }
        match self {
            Self::Today => created_at.date_naive() == now.date_naive(),
            Self::Week => now - created_at <= Duration::days(7),
            Self::Month => now - created_at <= Duration::days(30),
            Self::Year => now - created_at <= Duration::days(365),
        }
    }

    fn parse(value: &str) -> Option<Self> {
        Self::ordered().into_iter().find(|range| range.key() == value)
    }
}

/// Current selection of the five filter dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub status: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub purpose: String,
    pub agent: String,
    pub date_range: String,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            status: ALL.to_string(),
            property_type: ALL.to_string(),
            purpose: ALL.to_string(),
            agent: ALL.to_string(),
            date_range: ALL.to_string(),
        }
    }
}

impl Filters {
    pub fn get(&self, key: FilterKey) -> &str {
        match key {
            FilterKey::Status => &self.status,
            FilterKey::PropertyType => &self.property_type,
            FilterKey::Purpose => &self.purpose,
            FilterKey::Agent => &self.agent,
            FilterKey::DateRange => &self.date_range,
        }
    }

    pub fn set(&mut self, key: FilterKey, value: impl Into<String>) {
        let value = value.into();
        match key {
            FilterKey::Status => self.status = value,
            FilterKey::PropertyType => self.property_type = value,
            FilterKey::Purpose => self.purpose = value,
            FilterKey::Agent => self.agent = value,
            FilterKey::DateRange => self.date_range = value,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_neutral(&self) -> bool {
        self.active_count() == 0
    }

    pub fn active_count(&self) -> usize {
        FilterKey::ordered()
            .into_iter()
            .filter(|key| self.get(*key) != ALL)
            .count()
    }

    pub fn matches(&self, listing: &Listing, now: DateTime<Utc>) -> bool {
        let dimension = |value: &str, candidate: &str| value == ALL || value == candidate;

        dimension(&self.status, listing.status.key())
            && dimension(&self.property_type, listing.property_type.key())
            && dimension(&self.purpose, listing.purpose.key())
            && dimension(&self.agent, &listing.agent_id)
            && (self.date_range == ALL
                || DateRange::parse(&self.date_range)
                    .is_some_and(|range| range.contains(listing.created_at, now)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    fn all() -> Self {
        Self::new(ALL, "Semua")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterDimension {
    pub key: FilterKey,
    pub label: &'static str,
    pub options: Vec<FilterOption>,
}

/// Option sets for every dimension; agents are supplied by the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCatalog {
    pub dimensions: Vec<FilterDimension>,
}

impl FilterCatalog {
    pub fn new<I, S>(agents: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let with_all = |options: Vec<FilterOption>| {
            let mut all = vec![FilterOption::all()];
            all.extend(options);
            all
        };

        let statuses: Vec<FilterOption> = PropertyStatus::ordered()
            .into_iter()
            .map(|status| FilterOption::new(status.key(), status.label()))
            .collect();
        let types: Vec<FilterOption> = PropertyType::ordered()
            .into_iter()
            .map(|kind| FilterOption::new(kind.key(), kind.label()))
            .collect();
        let purposes: Vec<FilterOption> = ListingPurpose::ordered()
            .into_iter()
            .map(|purpose| FilterOption::new(purpose.key(), purpose.label()))
            .collect();
        let agents: Vec<FilterOption> = agents
            .into_iter()
            .map(|(id, name)| FilterOption::new(id, name))
            .collect();
        let ranges: Vec<FilterOption> = DateRange::ordered()
            .into_iter()
            .map(|range| FilterOption::new(range.key(), range.label()))
            .collect();

        let dimension = |key: FilterKey, options: Vec<FilterOption>| FilterDimension {
            key,
            label: key.label(),
            options: with_all(options),
        };

        Self {
            dimensions: vec![
                dimension(FilterKey::Status, statuses),
                dimension(FilterKey::PropertyType, types),
                dimension(FilterKey::Purpose, purposes),
                dimension(FilterKey::Agent, agents),
                dimension(FilterKey::DateRange, ranges),
            ],
        }
    }

    pub fn options(&self, key: FilterKey) -> &[FilterOption] {
        self.dimensions
            .iter()
            .find(|dimension| dimension.key == key)
            .map(|dimension| dimension.options.as_slice())
            .unwrap_or_default()
    }

    pub fn accepts(&self, key: FilterKey, value: &str) -> bool {
        self.options(key).iter().any(|option| option.value == value)
    }

    pub fn validate(&self, filters: &Filters) -> Result<(), FilterError> {
        for key in FilterKey::ordered() {
            let value = filters.get(key);
            if !self.accepts(key, value) {
                return Err(FilterError::UnknownOption {
                    key,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("unknown filter '{0}'")]
    UnknownKey(String),
    #[error("'{value}' is not an option for filter {key}")]
    UnknownOption { key: FilterKey, value: String },
}

/// External owner of the filter state.
pub trait FilterOwner {
    fn on_filter_change(&mut self, key: FilterKey, value: &str);
    fn on_reset(&mut self);
}

impl FilterOwner for Filters {
    fn on_filter_change(&mut self, key: FilterKey, value: &str) {
        self.set(key, value);
    }

    fn on_reset(&mut self) {
        self.reset();
    }
}

/// Filter panel: validates selections and notifies the owner, holds no state of its own.
#[derive(Debug, Clone)]
pub struct FilterPanel {
    catalog: FilterCatalog,
}

impl FilterPanel {
    pub fn new(catalog: FilterCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    pub fn change<O: FilterOwner>(
        &self,
        owner: &mut O,
        key: FilterKey,
        value: &str,
    ) -> Result<(), FilterError> {
        if !self.catalog.accepts(key, value) {
            return Err(FilterError::UnknownOption {
                key,
                value: value.to_string(),
            });
        }
        owner.on_filter_change(key, value);
        Ok(())
    }

    pub fn reset<O: FilterOwner>(&self, owner: &mut O) {
        owner.on_reset();
    }
}
