//! # Contact Request
//!
//! File: cli/src/commands/contact.rs
//!
//! ## Overview
//!
//! `chatterify contact` submits the site's contact form from the command
//! line: it validates the fields, fills the template parameters and relays
//! them through the email provider.
//!
//! ## Examples
//!
//! ```bash
//! chatterify contact --name "Ada" --email ada@example.com \
//!     --project-type customer-service --budget 10k-25k \
//!     --message "We need a support bot."
//!
//! # The contact page's fields
//! chatterify contact --name Ada --email ada@example.com --phone 555-0100 \
//!     --service "Maintenance & Support" --message "Our bot needs care."
//!
//! # Show what would be sent
//! chatterify contact --name Ada --email ada@example.com --message hi --dry-run
//! ```
//!
use crate::contact::form::{Budget, ContactForm, ProjectType, Selection};
use crate::contact::relay::{EmailRelay, FAILED_NOTICE, SENT_NOTICE};
use crate::core::config::AppConfig;
use crate::core::error::{ChatterifyError, Result};
use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::warn;

/// Send a contact request to the Chatterify team.
#[derive(Parser, Debug)]
pub struct ContactArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub message: String,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long, value_enum)]
    pub project_type: Option<ProjectType>,

    /// Free-text service name, used when no project type is given.
    #[arg(long)]
    pub service: Option<String>,

    #[arg(long, value_enum)]
    pub budget: Option<Budget>,

    /// Print the template parameters as JSON instead of sending them.
    #[arg(long)]
    pub dry_run: bool,
}

impl From<ContactArgs> for ContactForm {
    fn from(args: ContactArgs) -> Self {
        ContactForm {
            name: args.name,
            email: args.email,
            phone: args.phone,
            company: args.company,
            project_type: args.project_type.map(Selection::Known),
            service: args.service,
            budget: args.budget.map(Selection::Known),
            message: args.message,
        }
    }
}

/// Entry point for `chatterify contact`.
pub async fn handle_contact(args: ContactArgs, config: &AppConfig) -> Result<()> {
    let dry_run = args.dry_run;
    let form = ContactForm::from(args);
    let relay = EmailRelay::new(&config.email)?;

    if dry_run {
        form.validate()?;
        let params = relay.params_for(&form);
        let json = serde_json::to_string_pretty(&params)
            .context("Failed to serialize template parameters")?;
        println!("{}", json);
        return Ok(());
    }

    match relay.send(&form).await {
        Ok(()) => {
            println!("{}", SENT_NOTICE);
            Ok(())
        }
        Err(e) if matches!(
            e.downcast_ref::<ChatterifyError>(),
            Some(ChatterifyError::InvalidContactForm(_))
        ) =>
        {
            Err(e)
        }
        Err(e) => {
            warn!("Contact relay failed: {:#}", e);
            eprintln!("{}", FAILED_NOTICE);
            Err(anyhow!(ChatterifyError::ContactNotSent))
        }
    }
}
