//! Rating service integration tests.
//!
//! Every test runs against an in-memory season (see `support`):
//! - score table resolution and versioning
//! - player and tournament result listings
//! - bracket rankings
//! - cache behavior across flushes and failures

mod performance;
mod cache;
#[cfg(feature = "http")]
mod http;
