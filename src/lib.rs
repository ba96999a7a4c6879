//! Sentinel - terminal console for an AIOps monitoring backend
//!
//! This library provides the session, filter, refresh and rendering logic
//! behind the `sentinel` binary. All analytics are computed by the backend;
//! the console fetches, validates and displays them.

pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod filter;
pub mod logging;
pub mod refresh;
pub mod session;
pub mod view;
