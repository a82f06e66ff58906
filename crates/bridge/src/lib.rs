//! Omnisend Bridge library.
//!
//! This crate provides the bridge functionality as a library, allowing it to
//! be tested and reused by the integration-test crate.
//!
//! # Data flow
//!
//! - Live path: SureCart webhook -> [`events`] handler -> [`surecart`]
//!   (refetch full entity graph) -> [`transform`] -> [`omnisend`] client.
//! - Backfill path: scheduler tick -> [`sync`] orchestrator -> [`surecart`]
//!   paged fetch -> [`transform`] (plural mode) -> [`omnisend`] batch send.
//! - Browser path: storefront tracking requests -> [`events::track`] ->
//!   [`snippet`] JS payloads pushed to the Omnisend client library.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod omnisend;
pub mod routes;
pub mod snippet;
pub mod state;
pub mod surecart;
pub mod sync;
pub mod transform;
