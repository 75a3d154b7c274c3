//! # Email Relay
//!
//! File: cli/src/contact/relay.rs
//!
//! ## Overview
//!
//! Forwards a contact request to the transactional-email provider's REST
//! endpoint. The provider renders its stored template with our named
//! parameters and delivers it to the configured destination address.
//!
//! Request body:
//!
//! ```json
//! { "service_id": "...", "template_id": "...", "user_id": "<public key>",
//!   "template_params": { "from_name": "...", "from_email": "...", ... } }
//! ```
//!
//! Any non-2xx answer or transport failure is an
//! `ChatterifyError::EmailDelivery`. There is no retry; the caller shows a
//! generic notice and logs the detail.
//!
use super::form::{ContactForm, TemplateParams};
use crate::core::config::EmailConfig;
use crate::core::error::{ChatterifyError, Result};
use anyhow::{anyhow, Context};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Shown to the visitor after a successful relay.
pub const SENT_NOTICE: &str = "Thank you for your interest! We'll get back to you within 24 hours.";
/// Shown to the visitor when the relay fails for any reason.
pub const FAILED_NOTICE: &str =
    "Sorry, there was an error sending your message. Please try again or email us directly.";

#[derive(Serialize, Debug)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
}

#[derive(Debug, Clone)]
pub struct EmailRelay {
    http: reqwest::Client,
    config: EmailConfig,
}

impl EmailRelay {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("chatterify/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client for email relay")?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// The parameters that `send` would deliver for `form`.
    pub fn params_for(&self, form: &ContactForm) -> TemplateParams {
        form.template_params(&self.config.to_email)
    }

    /// Validates `form` and delivers it.
    pub async fn send(&self, form: &ContactForm) -> Result<()> {
        form.validate()?;
        let params = self.params_for(form);
        let body = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: &params,
        };

        debug!("Relaying contact request from {} to {}", params.from_email, self.config.api_url);
        let response = self
            .http
            .post(&self.config.api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatterifyError::EmailDelivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!(ChatterifyError::EmailDelivery(format!(
                "HTTP {}: {}",
                status.as_u16(),
                text
            ))));
        }

        info!("Contact request from {} delivered", params.from_email);
        Ok(())
    }
}
