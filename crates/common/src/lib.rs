//! Reusable utilities shared by the staking services and their test suites, such as initializing
//! the tracing framework.

pub mod logging;

// Re-export tracing crate for convenience.
pub use tracing;
