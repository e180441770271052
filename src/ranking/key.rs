//! Sort key parsing
//!
//! Sort keys are given as `field[;asc|desc]`, the direction defaulting to
//! ascending. Their order in the list is their tie-break priority.

use crate::record::Field;
use crate::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Direction applied to a single sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            other => Err(ConfigError::UnknownSortDirection(other.to_string())),
        }
    }
}

/// A (field, direction) pair used in priority order when ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: Field,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.field, self.direction.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ConfigError;

    /// Parses `field` or `field;direction`
    ///
    /// # Errors
    ///
    /// * `MalformedSortKey` - more than one `;` separator
    /// * `UnknownSortField` - field is not one of the sortable fields
    /// * `UnknownSortDirection` - direction is neither `asc` nor `desc`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(';').collect();
        let (field, direction) = match parts.as_slice() {
            [field] => (*field, SortDirection::Ascending),
            [field, direction] => (*field, direction.parse()?),
            _ => return Err(ConfigError::MalformedSortKey(s.to_string())),
        };

        let field = field
            .parse::<Field>()
            .ok()
            .filter(Field::is_sortable)
            .ok_or_else(|| ConfigError::UnknownSortField(field.to_string()))?;

        Ok(Self { field, direction })
    }
}

/// Parses an ordered list of sort key strings, stopping at the first invalid one
pub fn parse_sort_keys<S: AsRef<str>>(raw: &[S]) -> Result<Vec<SortKey>, ConfigError> {
    raw.iter().map(|s| s.as_ref().parse()).collect()
}
