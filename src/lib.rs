//! Core library for the `harstress` CLI.
//!
//! `harstress` replays a recorded HAR session as a load test: the pages and
//! entries of the archive run strictly in order, each entry fanned out to the
//! configured number of simultaneous users, optionally ramping users pass
//! after pass. The primary user-facing interface is the `harstress` binary.
pub mod args;
pub mod auth;
pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod scenario;
mod system;

#[cfg(test)]
mod test_server;
