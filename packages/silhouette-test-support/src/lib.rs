//! Test helpers shared by the silhouette integration tests: logging
//! setup, credential minting, Problem Details assertions and unique data.
//!
//! Nothing here depends on the silhouette crate itself.

pub mod logging;
pub mod problem_details;
pub mod tokens;
pub mod unique_helpers;
