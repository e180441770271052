//! Extracted guide records and their field identifiers
//!
//! Every field is kept as the raw text found on the page ("7/10", "23.5%",
//! "1,204"). Parsing into typed values only happens when ranking.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One detail page's extracted data, keyed by its canonical link
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub link: String,
    pub platforms: String,
    pub difficulty: String,
    pub time_needed: String,
    pub platinum_rarity: String,
    pub views: String,
    pub guide_rating: String,
    pub guide_rating_count: String,
    pub user_favourites: String,
}

impl Record {
    /// Creates an empty record for the given link
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text stored for a field
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Link => &self.link,
            Field::Platforms => &self.platforms,
            Field::Difficulty => &self.difficulty,
            Field::TimeNeeded => &self.time_needed,
            Field::PlatinumRarity => &self.platinum_rarity,
            Field::Views => &self.views,
            Field::GuideRating => &self.guide_rating,
            Field::GuideRatingCount => &self.guide_rating_count,
            Field::UserFavourites => &self.user_favourites,
        }
    }

    /// Returns every field value in `Field::ALL` order
    pub fn values(&self) -> [&str; 10] {
        Field::ALL.map(|field| self.get(field))
    }
}

/// How a sortable field's raw text is interpreted when ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// "x/N" text, ranked by the integer numerator
    Ordinal,
    /// Plain integer text, optionally with `,` group separators
    Count,
    /// "x.y%" text, ranked as a float with a small tolerance
    Percentage,
    /// "x/5" text, ranked by the integer numerator
    Rating,
}

/// Enumerated record field identifiers, used as column and key labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Link,
    Platforms,
    Difficulty,
    TimeNeeded,
    PlatinumRarity,
    Views,
    GuideRating,
    GuideRatingCount,
    UserFavourites,
}

impl Field {
    /// All fields in export column order
    pub const ALL: [Field; 10] = [
        Field::Name,
        Field::Link,
        Field::Platforms,
        Field::Difficulty,
        Field::TimeNeeded,
        Field::PlatinumRarity,
        Field::Views,
        Field::GuideRating,
        Field::GuideRatingCount,
        Field::UserFavourites,
    ];

    /// Fields that may be used as sort keys
    pub const SORTABLE: [Field; 7] = [
        Field::Difficulty,
        Field::TimeNeeded,
        Field::PlatinumRarity,
        Field::Views,
        Field::GuideRating,
        Field::GuideRatingCount,
        Field::UserFavourites,
    ];

    /// Returns the identifier used in config, CLI and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Link => "link",
            Self::Platforms => "platforms",
            Self::Difficulty => "difficulty",
            Self::TimeNeeded => "time_needed",
            Self::PlatinumRarity => "platinum_rarity",
            Self::Views => "views",
            Self::GuideRating => "guide_rating",
            Self::GuideRatingCount => "guide_rating_count",
            Self::UserFavourites => "user_favourites",
        }
    }

    /// Returns the ranking interpretation, or None for text-only fields
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Self::Difficulty => Some(FieldKind::Ordinal),
            Self::TimeNeeded
            | Self::Views
            | Self::GuideRatingCount
            | Self::UserFavourites => Some(FieldKind::Count),
            Self::PlatinumRarity => Some(FieldKind::Percentage),
            Self::GuideRating => Some(FieldKind::Rating),
            Self::Name | Self::Link | Self::Platforms => None,
        }
    }

    /// Returns true if the field can be used as a sort key
    pub fn is_sortable(&self) -> bool {
        self.kind().is_some()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}
