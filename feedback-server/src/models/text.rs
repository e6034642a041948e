//! Title and body text validation

use super::ValidationError;

/// Maximum length for suggestion titles
const MAX_TITLE_LEN: usize = 255;

/// Maximum length for suggestion, comment, and reply bodies
const MAX_CONTENT_LEN: usize = 10_000;

/// Validated suggestion title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionTitle(String);

impl SuggestionTitle {
    /// Create a new suggestion title.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 255 characters
    ///
    /// # Example
    /// ```
    /// use feedback_server::models::SuggestionTitle;
    ///
    /// assert!(SuggestionTitle::new("Add dark mode").is_ok());
    /// assert!(SuggestionTitle::new("").is_err());
    /// assert!(SuggestionTitle::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        Ok(Self(bounded("title", s, MAX_TITLE_LEN)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated body text for suggestions, comments, and replies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent(String);

impl PostContent {
    /// Create new body text.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 10 000 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        Ok(Self(bounded("content", s, MAX_CONTENT_LEN)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn bounded(field: &'static str, s: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(trimmed.to_owned())
}
