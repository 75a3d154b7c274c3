//! # Chatterify Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per top-level command. Each defines its clap arguments struct
//! and a `handle_*` function that takes the parsed arguments and the
//! effective `AppConfig` loaded once in `main.rs`.
//!
//! ## Commands
//!
//! - `ask`: One question, one printed reply
//! - `chat`: Interactive terminal chat widget
//! - `config`: Print the effective configuration
//! - `contact`: Validate and relay a contact request
//! - `srv`: Serve the built site with its API endpoints
//!

pub mod ask;
pub mod chat;
pub mod config;
pub mod contact;
/// Site server: configuration merge, Axum router and API handlers.
pub mod srv;
