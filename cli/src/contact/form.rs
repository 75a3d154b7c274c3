//! # Contact Form
//!
//! File: cli/src/contact/form.rs
//!
//! The fields collected by the site's contact forms, their validation, and
//! the named template parameters handed to the email provider. Optional
//! fields that were left empty are sent as `"Not provided"` or
//! `"Not specified"` so the rendered email never has blank lines.
//!
//! The site has two forms. The home-page section sends `projectType` and a
//! bracket such as `"10k-25k"`; the contact page sends `phone`, a free-text
//! `service` and budgets such as `"< $5,000"`. Select boxes post `""` when
//! nothing was picked. `Selection` accepts a known option or any text, so
//! both payloads deserialize and unknown text is passed through verbatim.
//!
use crate::core::error::{ChatterifyError, Result};
use anyhow::anyhow;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const NOT_PROVIDED: &str = "Not provided";
pub const NOT_SPECIFIED: &str = "Not specified";

/// A select-box choice with a human-readable label for the email.
pub trait Labeled {
    fn label(&self) -> &'static str;
}

/// A select-box value: one of the known options, or the text the page sent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Selection<T> {
    Known(T),
    Other(String),
}

impl<T: Labeled> Selection<T> {
    /// The label to put in the email, or `None` for a blank choice.
    pub fn label(&self) -> Option<&str> {
        match self {
            Selection::Known(value) => Some(value.label()),
            Selection::Other(text) => Some(text.trim()).filter(|t| !t.is_empty()),
        }
    }
}

/// Kind of project the visitor is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    CustomerService,
    Sales,
    Internal,
    Custom,
}

impl Labeled for ProjectType {
    fn label(&self) -> &'static str {
        match self {
            ProjectType::CustomerService => "Customer Service Bot",
            ProjectType::Sales => "Sales Assistant",
            ProjectType::Internal => "Internal Tool",
            ProjectType::Custom => "Custom Solution",
        }
    }
}

/// Budget brackets offered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Budget {
    #[serde(rename = "5k-10k")]
    #[value(name = "5k-10k")]
    From5kTo10k,
    #[serde(rename = "10k-25k")]
    #[value(name = "10k-25k")]
    From10kTo25k,
    #[serde(rename = "25k-50k")]
    #[value(name = "25k-50k")]
    From25kTo50k,
    #[serde(rename = "50k+")]
    #[value(name = "50k+")]
    Over50k,
}

impl Labeled for Budget {
    fn label(&self) -> &'static str {
        match self {
            Budget::From5kTo10k => "$5,000 - $10,000",
            Budget::From10kTo25k => "$10,000 - $25,000",
            Budget::From25kTo50k => "$25,000 - $50,000",
            Budget::Over50k => "$50,000+",
        }
    }
}

/// One contact request as submitted by a visitor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub project_type: Option<Selection<ProjectType>>,
    /// Free-text service name from the contact page.
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub budget: Option<Selection<Budget>>,
    pub message: String,
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Named parameters for the provider's email template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub phone: String,
    pub company: String,
    pub service: String,
    pub budget: String,
    pub message: String,
    pub to_email: String,
}

impl ContactForm {
    /// Checks the required fields. The error text is safe to show a visitor.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return invalid("name is required");
        }
        if self.message.trim().is_empty() {
            return invalid("message is required");
        }
        match self.email.trim().split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => invalid("a valid email address is required"),
        }
    }

    /// Project type wins over the free-text service when both are sent.
    pub fn template_params(&self, to_email: &str) -> TemplateParams {
        let service = self
            .project_type
            .as_ref()
            .and_then(Selection::label)
            .or_else(|| filled(&self.service));
        let budget = self.budget.as_ref().and_then(Selection::label);

        TemplateParams {
            from_name: self.name.trim().to_string(),
            from_email: self.email.trim().to_string(),
            phone: filled(&self.phone).unwrap_or(NOT_PROVIDED).to_string(),
            company: filled(&self.company).unwrap_or(NOT_PROVIDED).to_string(),
            service: service.unwrap_or(NOT_SPECIFIED).to_string(),
            budget: budget.unwrap_or(NOT_SPECIFIED).to_string(),
            message: self.message.trim().to_string(),
            to_email: to_email.to_string(),
        }
    }
}

fn invalid(reason: &str) -> Result<()> {
    Err(anyhow!(ChatterifyError::InvalidContactForm(reason.to_string())))
}
