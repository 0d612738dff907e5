//! Sort keys and directions

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

/// Direction of one sort level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// `+1` for ascending, `-1` for descending.
    pub fn sign(self) -> i8 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }

    /// Orient an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Short label for headers and command lines.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// One level of a multi-key sort.
///
/// `priority` mirrors the key's position in the active list (0 = primary).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
    pub priority: usize,
}

impl SortKey {
    /// Creates a key; priority is assigned by the owning controller.
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
            priority: 0,
        }
    }

    /// Ascending key on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Ascending)
    }

    /// Descending key on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Descending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_apply() {
        assert_eq!(SortDirection::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(
            SortDirection::Descending.apply(Ordering::Less),
            Ordering::Greater
        );
        assert_eq!(SortDirection::Descending.sign(), -1);
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("DESC".parse(), Ok(SortDirection::Descending));
        assert_eq!("ascending".parse(), Ok(SortDirection::Ascending));
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
