//! # Service Configuration
//!
//! Layered: built-in defaults, then an optional YAML file named by
//! `SOVC_CONFIG`, then individual environment variables.
//!
//! | Variable | YAML key | Default |
//! |---|---|---|
//! | `PORT` | `port` | `8080` |
//! | `AUTH_TOKEN` | `auth_token` | none (auth disabled) |
//! | `SOVC_COMMITMENT_SCHEME` | `commitment_scheme` | `keyed` |
//! | `SOVC_COMMITMENT_KEY` | `commitment_key` | ephemeral |
//! | `SOVC_PROOF_POLICY` | `proof_policy` | build profile |
//! | `SOVC_REPORT_VERIFICATION` | `report_verification` | `unconditional` |
//!
//! ```yaml
//! port: 8080
//! commitment_scheme: keyed
//! commitment_key: 6f1c…   # 64 hex chars, see `sovc keygen`
//! proof_policy: production
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use sovc_zkp::{
    CommitmentKey, KeyError, PolicyError, PolicyMode, ReportVerification, SchemeKind,
    UnknownReportVerificationError, UnknownSchemeError,
};

pub const CONFIG_PATH_VAR: &str = "SOVC_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid port {0:?}")]
    InvalidPort(String),
    #[error("invalid commitment key: {0}")]
    Key(#[from] KeyError),
    #[error(transparent)]
    Scheme(#[from] UnknownSchemeError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    ReportVerification(#[from] UnknownReportVerificationError),
}

/// Raw YAML document. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    port: Option<u16>,
    auth_token: Option<String>,
    commitment_scheme: Option<String>,
    commitment_key: Option<String>,
    proof_policy: Option<String>,
    report_verification: Option<String>,
}

/// Resolved service configuration.
///
/// `Debug` redacts the bearer secret and prints only the key fingerprint.
#[derive(Clone)]
pub struct ServiceConfig {
    pub port: u16,
    /// Bearer secret. `None` disables authentication.
    pub auth_token: Option<String>,
    pub commitment_scheme: SchemeKind,
    /// HMAC key for the keyed scheme. `None` means an ephemeral key is
    /// generated at startup.
    pub commitment_key: Option<CommitmentKey>,
    pub proof_policy: PolicyMode,
    pub report_verification: ReportVerification,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
            commitment_scheme: SchemeKind::Keyed,
            commitment_key: None,
            proof_policy: PolicyMode::build_default(),
            report_verification: ReportVerification::Unconditional,
        }
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("commitment_scheme", &self.commitment_scheme)
            .field("commitment_key", &self.commitment_key)
            .field("proof_policy", &self.proof_policy)
            .field("report_verification", &self.report_verification)
            .finish()
    }
}

impl ServiceConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` in place of the process environment.
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let file = match lookup(CONFIG_PATH_VAR) {
            Some(path) => read_file(Path::new(&path))?,
            None => FileConfig::default(),
        };

        let mut config = Self::default();

        if let Some(port) = file.port {
            config.port = port;
        }
        if let Some(raw) = lookup("PORT") {
            config.port = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?;
        }

        config.auth_token = lookup("AUTH_TOKEN")
            .or(file.auth_token)
            .filter(|t| !t.is_empty());

        if let Some(raw) = lookup("SOVC_COMMITMENT_SCHEME").or(file.commitment_scheme) {
            config.commitment_scheme = raw.parse()?;
        }
        if let Some(raw) = lookup("SOVC_COMMITMENT_KEY").or(file.commitment_key) {
            config.commitment_key = Some(CommitmentKey::from_hex(&raw)?);
        }
        if let Some(raw) = lookup("SOVC_PROOF_POLICY").or(file.proof_policy) {
            config.proof_policy = raw.parse()?;
        }
        if let Some(raw) = lookup("SOVC_REPORT_VERIFICATION").or(file.report_verification) {
            config.report_verification = raw.parse()?;
        }

        Ok(config)
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}
