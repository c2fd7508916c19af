//! Shared configuration for the akaform CLI.
//!
//! TOML profiles, EdgeGrid credential resolution (env + keyring +
//! plaintext), and translation to `akaform_core::ClientConfig`. The CLI
//! layers its global flags on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use akaform_api::edgegrid::DEFAULT_MAX_BODY;
use akaform_api::{EdgeGridCredentials, TlsMode};
use akaform_core::ClientConfig;

const KEYRING_SERVICE: &str = "akaform";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    ProfileNotFound { profile: String },

    #[error("no {secret} configured for profile '{profile}'")]
    NoCredentials { profile: String, secret: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named EdgeGrid profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, &Profile), ConfigError> {
        let name = name
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into());
        self.profiles
            .get(&name)
            .map(|p| (name.clone(), p))
            .ok_or(ConfigError::ProfileNotFound { profile: name })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between GTM propagation polls.
    #[serde(default = "default_gtm_poll_interval")]
    pub gtm_poll_interval_secs: u64,

    #[serde(default = "default_gtm_poll_attempts")]
    pub gtm_poll_attempts: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
            gtm_poll_interval_secs: default_gtm_poll_interval(),
            gtm_poll_attempts: default_gtm_poll_attempts(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_gtm_poll_interval() -> u64 {
    15
}
fn default_gtm_poll_attempts() -> u32 {
    40
}

/// A named EdgeGrid API client.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// API host, e.g. "akab-xxxx.luna.akamaiapis.net".
    pub host: String,

    pub client_token: String,

    /// Client secret (plaintext; prefer keyring or env var).
    pub client_secret: Option<String>,

    /// Environment variable name containing the client secret.
    pub client_secret_env: Option<String>,

    /// Access token (plaintext; prefer keyring or env var).
    pub access_token: Option<String>,

    /// Environment variable name containing the access token.
    pub access_token_env: Option<String>,

    /// Max request body bytes included in the signature.
    pub max_body: Option<usize>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "akaform", "akaform").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("akaform");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("AKAFORM_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write it to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve one secret: named env var, then keyring, then plaintext.
fn resolve_secret(
    profile_name: &str,
    secret: &str,
    env_name: Option<&str>,
    plaintext: Option<&str>,
) -> Result<SecretString, ConfigError> {
    if let Some(env_name) = env_name {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{secret}")) {
        if let Ok(val) = entry.get_password() {
            return Ok(SecretString::from(val));
        }
    }

    if let Some(val) = plaintext {
        return Ok(SecretString::from(val.to_owned()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
        secret: secret.into(),
    })
}

pub fn resolve_client_secret(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    resolve_secret(
        profile_name,
        "client-secret",
        profile.client_secret_env.as_deref(),
        profile.client_secret.as_deref(),
    )
}

pub fn resolve_access_token(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    resolve_secret(
        profile_name,
        "access-token",
        profile.access_token_env.as_deref(),
        profile.access_token.as_deref(),
    )
}

/// Resolve the full EdgeGrid credential set of a profile.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<EdgeGridCredentials, ConfigError> {
    if profile.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }
    if profile.client_token.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "client_token".into(),
            reason: "must not be empty".into(),
        });
    }

    let mut creds = EdgeGridCredentials::new(
        profile.host.clone(),
        profile.client_token.clone(),
        resolve_client_secret(profile, profile_name)?,
        resolve_access_token(profile, profile_name)?,
    );
    creds.max_body = profile.max_body.unwrap_or(DEFAULT_MAX_BODY);
    Ok(creds)
}

/// Build a `ClientConfig` from a profile and the global defaults.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let credentials = resolve_credentials(profile, profile_name)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let mut config = ClientConfig::new(credentials);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.gtm_poll_interval = Duration::from_secs(defaults.gtm_poll_interval_secs);
    config.gtm_poll_attempts = defaults.gtm_poll_attempts;
    Ok(config)
}
