//! In-memory adapters.
//!
//! Used by tests and by the binary when no database URL is configured.

mod project_store;

pub use project_store::InMemoryProjectStore;
