//! # Chatterify Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module builds the single `AppConfig` value that the rest of the
//! application reads. Nothing outside this module looks at the process
//! environment: `main` calls `load_config` once and passes the result by
//! reference to whichever command runs.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence, highest first):
//! 1. Command-line flags (applied by the individual commands, e.g. `srv --port`)
//! 2. Environment variables (`OPENAI_API_KEY`, `EMAILJS_SERVICE_ID`, ...)
//! 3. The file given with `--config`, or else:
//!    - Project-specific `.chatterify.toml` in the current directory or ancestors
//!    - User-specific `<config dir>/chatterify/config.toml`
//! 4. Default values defined in the code
//!
//! Files may set any subset of keys; each present key overrides the layer
//! beneath it. Unknown keys are rejected.
//!
//! ## Examples
//!
//! ```toml
//! [completion]
//! api_key = "sk-..."
//! timeout_secs = 20
//!
//! [email]
//! service_id = "service_abc"
//! template_id = "template_xyz"
//! public_key = "pk_123"
//!
//! [chat]
//! fallback = "canned"
//!
//! [site]
//! directory = "~/sites/chatterify/dist"
//! port = 8080
//! ```
//!
use crate::chat::fallback::FallbackPolicy;
use crate::core::error::{ChatterifyError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

const PROJECT_CONFIG_FILENAME: &str = ".chatterify.toml";

/// Default chat-completion endpoint.
pub const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Default transactional-email REST endpoint.
pub const DEFAULT_EMAIL_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";
/// Fixed destination for contact requests unless configured otherwise.
pub const DEFAULT_TO_EMAIL: &str = "chatterifyservice@gmail.com";

pub const PLACEHOLDER_SERVICE_ID: &str = "YOUR_SERVICE_ID";
pub const PLACEHOLDER_TEMPLATE_ID: &str = "YOUR_TEMPLATE_ID";
pub const PLACEHOLDER_PUBLIC_KEY: &str = "YOUR_PUBLIC_KEY";

// Environment variable names recognised by `apply_env_overrides`.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_COMPLETION_URL: &str = "CHATTERIFY_COMPLETION_URL";
pub const ENV_EMAIL_SERVICE_ID: &str = "EMAILJS_SERVICE_ID";
pub const ENV_EMAIL_TEMPLATE_ID: &str = "EMAILJS_TEMPLATE_ID";
pub const ENV_EMAIL_PUBLIC_KEY: &str = "EMAILJS_PUBLIC_KEY";
pub const ENV_EMAIL_URL: &str = "CHATTERIFY_EMAIL_URL";

/// The effective application configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub completion: CompletionConfig,
    pub email: EmailConfig,
    pub chat: ChatConfig,
    pub site: SiteConfig,
}

/// Settings for the remote chat-completion endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    pub api_url: String,
    /// Bearer credential. `None` means requests go out unauthenticated and fail.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

/// Settings for the transactional-email provider used by the contact form.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailConfig {
    pub api_url: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub to_email: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatConfig {
    pub fallback: FallbackPolicy,
}

/// Settings for `chatterify srv`.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub directory: String,
    pub index_file: String,
    pub port: u16,
    pub host: IpAddr,
    pub enable_cors: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_COMPLETION_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_EMAIL_URL.to_string(),
            service_id: PLACEHOLDER_SERVICE_ID.to_string(),
            template_id: PLACEHOLDER_TEMPLATE_ID.to_string(),
            public_key: PLACEHOLDER_PUBLIC_KEY.to_string(),
            to_email: DEFAULT_TO_EMAIL.to_string(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            directory: "dist".to_string(),
            index_file: "index.html".to_string(),
            port: 8000,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            enable_cors: true,
        }
    }
}

impl EmailConfig {
    /// True when every provider identifier has been replaced with a real value.
    pub fn is_configured(&self) -> bool {
        self.service_id != PLACEHOLDER_SERVICE_ID
            && self.template_id != PLACEHOLDER_TEMPLATE_ID
            && self.public_key != PLACEHOLDER_PUBLIC_KEY
    }
}

// --- On-disk representation ---
// Every key is optional so a file can override only what it names.

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    completion: CompletionFile,
    #[serde(default)]
    email: EmailFile,
    #[serde(default)]
    chat: ChatFile,
    #[serde(default)]
    site: SiteFile,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct CompletionFile {
    api_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct EmailFile {
    api_url: Option<String>,
    service_id: Option<String>,
    template_id: Option<String>,
    public_key: Option<String>,
    to_email: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct ChatFile {
    fallback: Option<FallbackPolicy>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct SiteFile {
    directory: Option<String>,
    index_file: Option<String>,
    port: Option<u16>,
    host: Option<IpAddr>,
    enable_cors: Option<bool>,
}

/// Loads, merges and validates the configuration.
///
/// When `explicit_path` is given only that file is read; otherwise the user
/// and project files are discovered and layered. Environment overrides are
/// applied last.
pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    match explicit_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            let file = load_config_from_path(path)?;
            apply_file(&mut config, file);
        }
        None => {
            if let Some(user) = load_user_config()? {
                apply_file(&mut config, user);
            }
            if let Some(project) = load_project_config()? {
                apply_file(&mut config, project);
            }
        }
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    expand_config_paths(&mut config);
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", redacted(&config));
    Ok(config)
}

fn load_user_config() -> Result<Option<ConfigFile>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Chatterify", "chatterify") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigFile>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(path) = find_project_config_path(&current_dir) {
        info!("Loading project configuration from: {}", path.display());
        load_config_from_path(&path).map(Some)
    } else {
        debug!("No {} found in current directory or ancestors.", PROJECT_CONFIG_FILENAME);
        Ok(None)
    }
}

/// Walks from `start` towards the filesystem root looking for the project
/// file. The search stops at the first directory containing `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let candidate = path.join(PROJECT_CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn apply_file(config: &mut AppConfig, file: ConfigFile) {
    let ConfigFile {
        completion,
        email,
        chat,
        site,
    } = file;

    if let Some(v) = completion.api_url {
        config.completion.api_url = v;
    }
    if let Some(v) = completion.api_key {
        config.completion.api_key = Some(v);
    }
    if let Some(v) = completion.timeout_secs {
        config.completion.timeout = Duration::from_secs(v);
    }

    if let Some(v) = email.api_url {
        config.email.api_url = v;
    }
    if let Some(v) = email.service_id {
        config.email.service_id = v;
    }
    if let Some(v) = email.template_id {
        config.email.template_id = v;
    }
    if let Some(v) = email.public_key {
        config.email.public_key = v;
    }
    if let Some(v) = email.to_email {
        config.email.to_email = v;
    }

    if let Some(v) = chat.fallback {
        config.chat.fallback = v;
    }

    if let Some(v) = site.directory {
        config.site.directory = v;
    }
    if let Some(v) = site.index_file {
        config.site.index_file = v;
    }
    if let Some(v) = site.port {
        config.site.port = v;
    }
    if let Some(v) = site.host {
        config.site.host = v;
    }
    if let Some(v) = site.enable_cors {
        config.site.enable_cors = v;
    }
}

/// Applies environment overrides. `lookup` abstracts the environment so the
/// merge rules can be tested without mutating process state. Empty values
/// are treated as unset.
fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get(ENV_API_KEY) {
        debug!("Using completion API key from {}", ENV_API_KEY);
        config.completion.api_key = Some(v);
    }
    if let Some(v) = get(ENV_COMPLETION_URL) {
        config.completion.api_url = v;
    }
    if let Some(v) = get(ENV_EMAIL_SERVICE_ID) {
        config.email.service_id = v;
    }
    if let Some(v) = get(ENV_EMAIL_TEMPLATE_ID) {
        config.email.template_id = v;
    }
    if let Some(v) = get(ENV_EMAIL_PUBLIC_KEY) {
        config.email.public_key = v;
    }
    if let Some(v) = get(ENV_EMAIL_URL) {
        config.email.api_url = v;
    }
}

fn expand_config_paths(config: &mut AppConfig) {
    config.site.directory = shellexpand::tilde(&config.site.directory).into_owned();
    debug!("Expanded site directory: {}", config.site.directory);
}

fn validate_config(config: &AppConfig) -> Result<()> {
    if config.completion.api_url.trim().is_empty() {
        return Err(anyhow!(ChatterifyError::Config(
            "completion.api_url cannot be empty".to_string()
        )));
    }
    if config.completion.timeout.is_zero() {
        return Err(anyhow!(ChatterifyError::Config(
            "completion.timeout_secs must be greater than zero".to_string()
        )));
    }
    if config.email.api_url.trim().is_empty() {
        return Err(anyhow!(ChatterifyError::Config(
            "email.api_url cannot be empty".to_string()
        )));
    }
    if !config.email.to_email.contains('@') {
        return Err(anyhow!(ChatterifyError::Config(format!(
            "email.to_email '{}' is not an email address",
            config.email.to_email
        ))));
    }
    if config.completion.api_key.is_none() {
        warn!(
            "No completion API key configured (set {} or completion.api_key); chat replies will use the fallback.",
            ENV_API_KEY
        );
    }
    if !config.email.is_configured() {
        warn!("Email provider identifiers are placeholders; contact requests will fail to send.");
    }
    Ok(())
}

/// Copy of the config with secrets replaced, safe to log.
pub fn redacted(config: &AppConfig) -> AppConfig {
    let mut copy = config.clone();
    copy.completion.api_key = copy.completion.api_key.map(|_| "<redacted>".to_string());
    if copy.email.public_key != PLACEHOLDER_PUBLIC_KEY {
        copy.email.public_key = "<redacted>".to_string();
    }
    copy
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_use_placeholders() {
        let config = AppConfig::default();
        assert_eq!(config.completion.api_url, DEFAULT_COMPLETION_URL);
        assert_eq!(config.completion.api_key, None);
        assert_eq!(config.email.service_id, "YOUR_SERVICE_ID");
        assert_eq!(config.email.to_email, "chatterifyservice@gmail.com");
        assert_eq!(config.chat.fallback, FallbackPolicy::Apology);
        assert!(!config.email.is_configured());
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let toml_content = r#"
            [completion]
            api_key = "sk-test"
            timeout_secs = 5

            [chat]
            fallback = "canned"

            [site]
            port = 9000
        "#;

        let file: ConfigFile = toml::from_str(toml_content).expect("Failed to parse TOML");
        let mut config = AppConfig::default();
        apply_file(&mut config, file);

        assert_eq!(config.completion.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.completion.timeout, Duration::from_secs(5));
        assert_eq!(config.completion.api_url, DEFAULT_COMPLETION_URL); // Default kept
        assert_eq!(config.chat.fallback, FallbackPolicy::Canned);
        assert_eq!(config.site.port, 9000);
        assert_eq!(config.site.index_file, "index.html"); // Default kept
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: std::result::Result<ConfigFile, _> = toml::from_str(
            r#"
            [completion]
            model = "gpt-4"
        "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_later_file_overrides_earlier() {
        let mut config = AppConfig::default();
        let user: ConfigFile = toml::from_str(
            r#"
            [email]
            service_id = "user_service"
            template_id = "user_template"
        "#,
        )
        .unwrap();
        let project: ConfigFile = toml::from_str(
            r#"
            [email]
            service_id = "project_service"
        "#,
        )
        .unwrap();

        apply_file(&mut config, user);
        apply_file(&mut config, project);

        assert_eq!(config.email.service_id, "project_service");
        assert_eq!(config.email.template_id, "user_template");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = AppConfig::default();
        config.completion.api_key = Some("from-file".into());

        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_KEY, "from-env"),
            (ENV_EMAIL_PUBLIC_KEY, "pk_env"),
            (ENV_EMAIL_SERVICE_ID, "   "),
        ]);
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.completion.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.email.public_key, "pk_env");
        // Blank values do not override.
        assert_eq!(config.email.service_id, PLACEHOLDER_SERVICE_ID);
    }

    #[test]
    fn test_path_expansion() {
        let mut config = AppConfig::default();
        config.site.directory = "~/site_dist".to_string();

        expand_config_paths(&mut config);

        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(
            config.site.directory,
            home_dir.join("site_dist").to_string_lossy()
        );
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = AppConfig::default();
        config.completion.timeout = Duration::ZERO;
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_validate_rejects_bad_destination() {
        let mut config = AppConfig::default();
        config.email.to_email = "nobody".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_find_project_config_in_ancestor() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();

        let found = find_project_config_path(&nested).expect("config should be found");
        assert_eq!(found, temp_dir.path().join(PROJECT_CONFIG_FILENAME));
    }

    #[test]
    fn test_project_search_stops_at_git_root() {
        let temp_dir = tempdir().unwrap();
        let repo = temp_dir.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();
        fs::write(temp_dir.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();

        assert!(find_project_config_path(&repo).is_none());
    }

    #[test]
    fn test_load_config_explicit_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("custom.toml");
        fs::write(
            &path,
            r#"
            [email]
            to_email = "sales@example.com"
        "#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.email.to_email, "sales@example.com");
    }

    #[test]
    fn test_redacted_hides_secrets() {
        let mut config = AppConfig::default();
        config.completion.api_key = Some("sk-secret".into());
        config.email.public_key = "pk_live".into();

        let safe = redacted(&config);
        assert_eq!(safe.completion.api_key.as_deref(), Some("<redacted>"));
        assert_eq!(safe.email.public_key, "<redacted>");
        assert!(!format!("{:?}", safe).contains("sk-secret"));
    }
}
