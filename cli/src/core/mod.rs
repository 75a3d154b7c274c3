//! # Chatterify Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the infrastructure shared by every command:
//! - `config`: Layered configuration loading, environment overrides and validation
//! - `error`: Error types and the crate-wide `Result` alias
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config::AppConfig;
//! use crate::core::error::{ChatterifyError, Result};
//! ```
//!
//! The configuration is loaded once in `main` and passed by reference to the
//! command handlers, which in turn hand the relevant sections to the chat
//! client, the email relay and the server.
//!
pub mod config;
pub mod error;
