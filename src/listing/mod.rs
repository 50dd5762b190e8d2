//! Paginated movie listings.

pub mod loader;

pub use loader::{IncrementalLoader, FIRST_INCREMENTAL_PAGE};
