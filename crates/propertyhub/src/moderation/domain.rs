use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::status::PropertyStatus;

/// Identifier wrapper for property listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    House,
    Apartment,
    Villa,
    Land,
    Shophouse,
    Office,
}

impl PropertyType {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::House,
            Self::Apartment,
            Self::Villa,
            Self::Land,
            Self::Shophouse,
            Self::Office,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Apartment => "apartment",
            Self::Villa => "villa",
            Self::Land => "land",
            Self::Shophouse => "shophouse",
            Self::Office => "office",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::House => "Rumah",
            Self::Apartment => "Apartemen",
            Self::Villa => "Villa",
            Self::Land => "Tanah",
            Self::Shophouse => "Ruko",
            Self::Office => "Kantor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingPurpose {
    Sale,
    Rent,
}

impl ListingPurpose {
    pub const fn ordered() -> [Self; 2] {
        [Self::Sale, Self::Rent]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Rent => "rent",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sale => "Dijual",
            Self::Rent => "Disewa",
        }
    }
}

/// A property record under moderation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub property_type: PropertyType,
    pub purpose: ListingPurpose,
    pub agent_id: String,
    pub city: String,
    pub price: u64,
    pub status: PropertyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable listing fields; status changes go through moderation only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub price: Option<u64>,
}

impl ListingPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.city.is_none() && self.price.is_none()
    }

    pub fn apply(self, listing: &mut Listing, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            listing.title = title;
        }
        if let Some(city) = self.city {
            listing.city = city;
        }
        if let Some(price) = self.price {
            listing.price = price;
        }
        listing.updated_at = now;
    }
}
