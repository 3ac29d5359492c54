//! This crate contains general types and pure functions that are shared across the staking crates:
//! the Babylon staking scripts, taproot helpers, the delegation read model and the checks that are
//! run on signed transactions before they leave the process.
//!
//! This crate lies at the bottom of the crate-hierarchy in this workspace i.e., it does not depend
//! on any other crate in this workspace.

pub mod constants;
pub mod delegation;
pub mod errors;
pub mod fees;
pub mod sanitize;
pub mod scripts;
pub mod signatures;
pub mod types;
