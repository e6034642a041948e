//! Request models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod filter;
pub mod pagination;
pub mod status;
pub mod text;
pub mod validation;

pub use filter::{ListSuggestionsParams, SuggestionFilter};
pub use pagination::{Paginated, Pagination, PaginationParams};
pub use status::{SuggestionStatus, VoteDirection};
pub use text::{PostContent, SuggestionTitle};
pub use validation::{parse_id, ValidationError};
