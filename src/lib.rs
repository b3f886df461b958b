//! Sealed-bid government tender workflow on a permissioned ledger.
//!
//! [`tender`] holds the contract rules, [`ledger`] the store seam and its
//! in-memory implementation, and [`peer`] plus the HTTP modules expose the
//! contract to authenticated clients.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod middleware;
pub mod peer;
pub mod routes;
pub mod tender;
