//! # Tasklist Shared Library
//!
//! This crate contains the domain types, authentication primitives and
//! business logic used by the Tasklist API server.
//!
//! ## Module Organization
//!
//! - `models`: User and task records plus their SQL queries
//! - `auth`: JWT issuance/verification, bearer middleware, ownership checks
//! - `store`: Repository traits with in-memory and PostgreSQL backends
//! - `services`: User and task use cases on top of the repositories
//! - `db`: Connection pool and schema bootstrap

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Tasklist shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
