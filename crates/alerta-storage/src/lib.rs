// Postgres storage layer with sqlx
//
// This crate owns the `emergencies` table: connection pooling, embedded
// migrations, and the fixed query shapes the API crate is built on.

pub mod models;
pub mod repositories;

pub use models::*;
pub use repositories::Database;
