//! Suggestion list filters

use serde::Deserialize;

use super::{Pagination, SuggestionStatus, ValidationError};

/// Validated filter for listing suggestions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuggestionFilter {
    pub category_id: Option<i64>,
    pub status: Option<SuggestionStatus>,
}

impl SuggestionFilter {
    /// Parse raw query values.
    ///
    /// A category of `0` (or none) means "any category". Negative or
    /// non-numeric categories and unknown statuses are rejected.
    pub fn parse(category: Option<&str>, status: Option<&str>) -> Result<Self, ValidationError> {
        let category_id = match category.map(str::trim).filter(|s| !s.is_empty()) {
            None => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(0) => None,
                Ok(id) if id > 0 => Some(id),
                _ => {
                    return Err(ValidationError::InvalidFormat {
                        field: "category",
                        reason: "must be a non-negative integer",
                    })
                }
            },
        };

        let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
            None => None,
            Some(raw) => Some(raw.parse::<SuggestionStatus>()?),
        };

        Ok(Self { category_id, status })
    }
}

/// Raw query string for `GET /suggestions`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSuggestionsParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

impl ListSuggestionsParams {
    /// Validate into a filter and a page.
    pub fn validate(&self) -> Result<(SuggestionFilter, Pagination), ValidationError> {
        let page = Pagination::parse(self.offset.as_deref(), self.limit.as_deref())?;
        let filter = SuggestionFilter::parse(self.category.as_deref(), self.status.as_deref())?;
        Ok((filter, page))
    }
}
