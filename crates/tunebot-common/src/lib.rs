//! # Tunebot Common
//!
//! Shared functionality for the Tunebot workspace.
//!
//! This crate provides the structured logging setup used by every other crate
//! and, behind the `testing` feature, fixtures for building on-disk resource
//! trees in tests.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod logging;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingError};
