//! Member Search Library
//!
//! Dynamic, paginated search over members and their teams, with a
//! PostgreSQL adapter and an in-memory store behind the same repository
//! traits.

pub mod config;
pub mod domain;
pub mod infrastructure;
