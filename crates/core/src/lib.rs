//! Omnisend Bridge Core - Shared types library.
//!
//! This crate provides the pure domain types used across the bridge
//! components:
//! - `bridge` - The sync service (webhooks, tracking, backfill)
//! - `integration-tests` - Live-server integration tests
//!
//! # Architecture
//!
//! The core crate contains only types and conversions - no I/O, no database
//! access, no HTTP clients. Everything here is deterministic and unit-tested
//! in place.
//!
//! # Modules
//!
//! - [`types`] - Minor-unit prices, epoch timestamps, status mappings, order
//!   event kinds, and backfill sync state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
