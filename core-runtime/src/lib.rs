//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the music library core:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the other core crates depend on.
//! It establishes the logging conventions and the validated configuration
//! used to compose a library service.

pub mod config;
pub mod error;
pub mod logging;

pub use config::CoreConfig;
pub use error::{Error, Result};
