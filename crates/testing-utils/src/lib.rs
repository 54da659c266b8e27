//! # Reporter Testing Utils
//!
//! Shared testing utilities for the QRS failed-task reporter.
//!
//! - **Mock TaskSource**: in-memory task listing and logs
//! - **Fake QRS server**: axum server speaking the three QRS endpoints
//! - **Test Data Builders**: TaskRecord builder and reload log generator
//!
//! ```toml
//! [dev-dependencies]
//! reporter-testing-utils = { path = "../testing-utils" }
//! ```

pub mod builders;
pub mod fake_qrs;
pub mod mocks;

// Re-export commonly used items
pub use builders::*;
pub use fake_qrs::*;
pub use mocks::*;
