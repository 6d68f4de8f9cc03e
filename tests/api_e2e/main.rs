//! HTTP end-to-end test suite.
//!
//! Drives the `/api/v1` routes against an in-memory SQLite database, so no
//! external services are needed.
//!
//! Run with: cargo test --test api_e2e

mod test_helpers;

mod test_auth;
mod test_catalog;
mod test_parts;
mod test_upload;
