//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - Bounded connection pool (max 10 by default), injected, never global
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Engine errors are classified here; handlers only see DbError kinds

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{connect_lazy, verify_connectivity, DbConfig};
pub use repos::*;
pub use schema::{ensure_schema, UniqueKeys};
