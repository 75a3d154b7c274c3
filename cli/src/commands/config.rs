//! # Show Configuration
//!
//! File: cli/src/commands/config.rs
//!
//! `chatterify config` prints the effective configuration after files and
//! environment overrides are applied, as TOML that can be pasted into a
//! config file. Credentials are left out; a comment such as
//! `# api_key: not set` stands in their place.
//!
use crate::core::config::{AppConfig, PLACEHOLDER_PUBLIC_KEY};
use crate::core::error::Result;
use clap::Parser;
use std::fmt::Write;

/// Print the effective configuration.
#[derive(Parser, Debug)]
pub struct ConfigArgs {}

/// Entry point for `chatterify config`.
pub async fn handle_config(_args: ConfigArgs, config: &AppConfig) -> Result<()> {
    print!("{}", render(config)?);
    Ok(())
}

fn set_or_not(present: bool) -> &'static str {
    if present {
        "set"
    } else {
        "not set"
    }
}

fn render(config: &AppConfig) -> Result<String> {
    let mut out = String::new();
    let c = &config.completion;
    writeln!(out, "[completion]")?;
    writeln!(out, "api_url = {:?}", c.api_url)?;
    writeln!(out, "# api_key: {}", set_or_not(c.api_key.is_some()))?;
    writeln!(out, "timeout_secs = {}", c.timeout.as_secs())?;

    let e = &config.email;
    writeln!(out, "\n[email]")?;
    writeln!(out, "api_url = {:?}", e.api_url)?;
    writeln!(out, "service_id = {:?}", e.service_id)?;
    writeln!(out, "template_id = {:?}", e.template_id)?;
    writeln!(
        out,
        "# public_key: {}",
        set_or_not(e.public_key != PLACEHOLDER_PUBLIC_KEY)
    )?;
    writeln!(out, "to_email = {:?}", e.to_email)?;

    writeln!(out, "\n[chat]")?;
    writeln!(out, "fallback = {:?}", config.chat.fallback.as_str())?;

    let s = &config.site;
    writeln!(out, "\n[site]")?;
    writeln!(out, "directory = {:?}", s.directory)?;
    writeln!(out, "index_file = {:?}", s.index_file)?;
    writeln!(out, "port = {}", s.port)?;
    writeln!(out, "host = \"{}\"", s.host)?;
    writeln!(out, "enable_cors = {}", s.enable_cors)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_are_masked() {
        let mut config = AppConfig::default();
        config.completion.api_key = Some("sk-secret".into());
        config.email.public_key = "pk-secret".into();

        let text = render(&config).unwrap();
        assert!(text.contains("# api_key: set"));
        assert!(text.contains("# public_key: set"));
        assert!(!text.contains("secret"));
    }

    #[test]
    fn test_defaults_render() {
        let text = render(&AppConfig::default()).unwrap();
        assert!(text.contains("# api_key: not set"));
        assert!(text.contains("# public_key: not set"));
        assert!(text.contains("fallback = \"apology\""));
        assert!(text.contains("port = 8000"));
    }

    #[test]
    fn test_output_is_valid_toml() {
        let mut config = AppConfig::default();
        config.completion.api_key = Some("sk-secret".into());

        let parsed: toml::Value = toml::from_str(&render(&config).unwrap()).unwrap();
        assert_eq!(parsed["site"]["port"].as_integer(), Some(8000));
        assert_eq!(parsed["chat"]["fallback"].as_str(), Some("apology"));
        assert!(parsed["completion"].get("api_key").is_none());
    }
}
