use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The SPARQL order modifier.
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        })
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("'{value}' is not a sort direction, use 'asc' or 'desc'")),
        }
    }
}

/// The column a result set query sorts its rows by. It is not a property of the results.
pub const ORDER_BY_COLUMN: &str = "orderBy";

/// A page of a result set. Pages are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
}

impl Pagination {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    /// Returns `(limit, offset)`.
    pub fn window(&self) -> Result<(u64, u64), ValidationError> {
        if self.page_size == 0 {
            return Err(ValidationError::EmptyPage);
        }
        let offset =
            self.page
                .checked_mul(self.page_size)
                .ok_or(ValidationError::PageOutOfRange {
                    page: self.page,
                    page_size: self.page_size,
                })?;
        Ok((self.page_size, offset))
    }
}

/// How a paginated result set is ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sort {
    /// A facet id of the result class. `None` sorts by the class' default key.
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_direction: SortDirection,
}

impl Sort {
    pub fn by(sort_by: impl Into<String>, sort_direction: SortDirection) -> Self {
        Self {
            sort_by: Some(sort_by.into()),
            sort_direction,
        }
    }
}
