//! Success envelope shared by all handlers

use serde::Serialize;

use crate::models::Paginated;

/// `{"success": true, "data": ..., "count"?: n, "message"?: "..."}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    /// Total matching rows, for lists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            count: None,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> Envelope<Vec<T>> {
    /// Wrap a page, reporting the total match count.
    pub fn page(page: Paginated<T>) -> Self {
        Self {
            success: true,
            data: page.items,
            count: Some(page.total),
            message: None,
        }
    }
}
