// Library root: re-exports all modules so integration tests and external
// consumers (the rendering layer) can access the crate's public API.

pub mod aggregate;
pub mod config;
pub mod normalize;
pub mod profile;
pub mod query;
pub mod snapshot;
pub mod valuation;
