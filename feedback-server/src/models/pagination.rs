//! Offset/limit pagination

use std::num::IntErrorKind;

use serde::Deserialize;

use super::ValidationError;

/// Maximum items per page
const MAX_LIMIT: u32 = 100;

/// Default items per page
const DEFAULT_LIMIT: u32 = 10;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Rows to skip
    pub offset: u64,
    /// Rows to return (1..=100)
    pub limit: u32,
}

impl Pagination {
    /// Create pagination, clamping limit to 1..=100.
    pub fn new(offset: u64, limit: u32) -> Self {
        Self {
            offset,
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Parse raw query values.
    ///
    /// Missing or empty values fall back to defaults. Non-numeric or
    /// negative values are rejected, as is a zero limit. Limits above the
    /// maximum are clamped rather than rejected.
    pub fn parse(offset: Option<&str>, limit: Option<&str>) -> Result<Self, ValidationError> {
        let offset = match non_empty(offset) {
            None => 0,
            Some(raw) => raw.parse::<u64>().map_err(|_| ValidationError::InvalidFormat {
                field: "offset",
                reason: "must be a non-negative integer",
            })?,
        };

        let limit = match non_empty(limit) {
            None => DEFAULT_LIMIT,
            Some(raw) => {
                let limit = match raw.parse::<u64>() {
                    Ok(limit) => limit,
                    Err(e) if *e.kind() == IntErrorKind::PosOverflow => u64::MAX,
                    Err(_) => {
                        return Err(ValidationError::InvalidFormat {
                            field: "limit",
                            reason: "must be a non-negative integer",
                        })
                    }
                };
                if limit == 0 {
                    return Err(ValidationError::InvalidFormat {
                        field: "limit",
                        reason: "must be at least 1",
                    });
                }
                u32::try_from(limit).unwrap_or(MAX_LIMIT)
            }
        };

        Ok(Self::new(offset, limit))
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// One page of rows plus the total number of matching rows
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    /// Items for current page
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: i64,
    pub offset: u64,
    pub limit: u32,
}

impl<T> Paginated<T> {
    /// Check if rows remain past this page.
    pub fn has_more(&self) -> bool {
        let seen = self.offset.saturating_add(self.items.len() as u64);
        (seen as i64) < self.total
    }

    /// Convert the items, keeping page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            offset: self.offset,
            limit: self.limit,
        }
    }
}

/// Query parameters for pagination, kept as raw strings so bad input
/// surfaces as a validation error instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
}

impl TryFrom<&PaginationParams> for Pagination {
    type Error = ValidationError;

    fn try_from(params: &PaginationParams) -> Result<Self, Self::Error> {
        Self::parse(params.offset.as_deref(), params.limit.as_deref())
    }
}
