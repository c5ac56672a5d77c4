//! Properview - real-estate listing service
//!
//! Listings with agent ownership, buyer inquiries, and per-listing view
//! analytics aggregated into daily rollups.
//!
//! # Architecture
//! - `analytics`: View recording, daily aggregation, trend calculation
//! - `storage`: SeaORM-backed persistence
//! - `services`: Listing, inquiry, analytics and dashboard logic
//! - `api`: HTTP handlers and middleware
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
