//! dashboard-probe - SSE parsing and a black-box test harness for the
//! workspace dashboard server
//!
//! This library exposes modules for use in integration tests.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod harness;
pub mod logging;
pub mod models;
pub mod sse;
