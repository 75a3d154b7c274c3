//! # Chatterify Contact Relay
//!
//! File: cli/src/contact/mod.rs
//!
//! The contact form and its delivery through the transactional-email
//! provider. Used by `chatterify contact` and the site's `/api/contact`
//! endpoint.
//!
//! - `form`: Fields, validation and template parameters
//! - `relay`: The HTTP client for the provider and the visitor-facing notices
//!
pub mod form;
pub mod relay;
