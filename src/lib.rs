//! Core library for the blogd blogging backend.
//!
//! This crate is the persistence-and-authorization layer of a small
//! blog: entity records and queries, a bitmask capability system, and
//! salted-hash challenge authentication. HTTP routing, session
//! management, and request parsing live in the hosting application,
//! which calls [`ops`] with parsed arguments and an acting
//! [`identity::Identity`]. Only one database backend (either `sqlite`
//! or `postgres`) should be enabled at a time.
cfg_if::cfg_if! {
    if #[cfg(all(feature = "sqlite", feature = "postgres", not(feature = "lint")))] {
        compile_error!("Choose either sqlite or postgres, not both");
    } else if #[cfg(feature = "sqlite")] {
        pub use diesel::sqlite::Sqlite as DbBackend;
    } else if #[cfg(feature = "postgres")] {
        pub use diesel::pg::Pg as DbBackend;
    } else {
        compile_error!("Either the 'sqlite' or 'postgres' feature must be enabled");
    }
}

pub mod capabilities;
pub mod config;
pub mod credentials;
pub mod db;
pub mod identity;
pub mod models;
pub mod ops;
pub mod payload;
pub mod schema;
