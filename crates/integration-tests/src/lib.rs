//! Integration tests for the Omnisend bridge.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the bridge against a reachable PostgreSQL instance
//! cargo run -p omnisend-bridge
//!
//! # Run integration tests
//! cargo test -p omnisend-bridge-integration-tests -- --ignored
//! ```
//!
//! The tests under `tests/` hit a live bridge over HTTP and are marked
//! `#[ignore]` so they never run in a plain `cargo test`.
