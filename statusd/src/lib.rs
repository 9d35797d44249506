//! Device status ingestion API.
//!
//! Devices POST periodic status reports (battery, signal, online flag);
//! consumers read the last known status per device or a sorted summary of
//! the whole fleet. Only the latest report per device is kept.

pub mod auth;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod model;
pub mod rest;
pub mod store;
pub mod validate;
