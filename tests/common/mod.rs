#![allow(dead_code)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: experiment-log and mutation-record builders

pub mod fixtures;
