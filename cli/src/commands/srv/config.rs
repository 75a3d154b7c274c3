//! # Site Server Configuration
//!
//! File: cli/src/commands/srv/config.rs
//!
//! ## Overview
//!
//! Resolves the settings for `chatterify srv`. The `[site]` section of the
//! application config supplies the base values; any flag given on the
//! command line wins over it.
//!
//! ## Resolution
//!
//! 1. Start from `AppConfig.site` (defaults, files and environment already applied)
//! 2. Overlay the flags that were actually passed
//! 3. Make the serving directory absolute and check that it is a directory
//! 4. Warn when the index file is missing, since client routes fall back to it
//!
use crate::core::config::SiteConfig;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Serve the built site together with its chat and contact endpoints.
#[derive(Parser, Debug, Default)]
pub struct SrvArgs {
    /// Directory holding the built site. Defaults to `site.directory` (`dist`).
    pub directory: Option<PathBuf>,

    /// Port to listen on. The next free port is used if it is busy.
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Address to bind, e.g. `0.0.0.0` to accept connections from the network.
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Do not send permissive CORS headers.
    #[arg(long)]
    pub no_cors: bool,

    /// File served for `/` and for client-side routes.
    #[arg(long, short)]
    pub index: Option<String>,

    /// Answer chat requests from the canned table instead of the remote endpoint.
    #[arg(long)]
    pub offline: bool,
}

/// Fully resolved server settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub host: IpAddr,
    pub directory: PathBuf,
    pub enable_cors: bool,
    pub index_file: String,
}

impl ServerConfig {
    /// Overlays the flags in `args` on the `[site]` settings.
    pub fn merge(site: &SiteConfig, args: &SrvArgs) -> Self {
        Self {
            port: args.port.unwrap_or(site.port),
            host: args.host.unwrap_or(site.host),
            directory: args
                .directory
                .clone()
                .unwrap_or_else(|| PathBuf::from(&site.directory)),
            enable_cors: site.enable_cors && !args.no_cors,
            index_file: args.index.clone().unwrap_or_else(|| site.index_file.clone()),
        }
    }

    /// Makes `directory` absolute and canonical, failing if it is not a directory.
    pub async fn resolve_directory(&mut self) -> Result<()> {
        let absolute = if self.directory.is_absolute() {
            self.directory.clone()
        } else {
            env::current_dir()
                .context("Failed to get current working directory")?
                .join(&self.directory)
        };

        let canonical = tokio::fs::canonicalize(&absolute).await.with_context(|| {
            format!("Site directory '{}' could not be found or accessed", absolute.display())
        })?;
        let metadata = tokio::fs::metadata(&canonical)
            .await
            .with_context(|| format!("Failed to read metadata for '{}'", canonical.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("Path is not a directory: {}", canonical.display());
        }

        if !canonical.join(&self.index_file).is_file() {
            warn!(
                "Index file '{}' not found in {}; client-side routes will return 404",
                self.index_file,
                canonical.display()
            );
        }

        debug!("Resolved site directory to: {}", canonical.display());
        self.directory = canonical;
        Ok(())
    }
}

/// Builds the effective server settings for one `srv` invocation.
pub async fn load_and_merge_config(site: &SiteConfig, args: &SrvArgs) -> Result<ServerConfig> {
    let mut config = ServerConfig::merge(site, args);
    config.resolve_directory().await?;
    Ok(config)
}
