//! Route handlers organized by resource

pub mod categories;
pub mod comments;
pub mod health;
pub mod suggestions;
pub mod users;
