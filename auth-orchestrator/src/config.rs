//! Configuration for the authorization orchestrator

use risk_engine::ScoringConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::audit::AuditLogConfig;
use crate::{Error, Result};

/// Orchestrator configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Risk scoring policy
    pub scoring: ScoringConfig,

    /// Decision audit log; `None` disables auditing
    pub audit: Option<AuditLogConfig>,

    /// Log output format
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl OrchestratorConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: OrchestratorConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = OrchestratorConfig {
            scoring: ScoringConfig::from_env()?,
            ..OrchestratorConfig::default()
        };

        if let Ok(path) = std::env::var("AUTH_AUDIT_LOG") {
            config.audit = Some(AuditLogConfig {
                log_path: PathBuf::from(path),
                ..AuditLogConfig::default()
            });
        }

        if let Ok(format) = std::env::var("AUTH_LOG_FORMAT") {
            config.log_format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                other => return Err(Error::Config(format!("unknown log format: {}", other))),
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        if let Some(audit) = &self.audit {
            if audit.log_path.as_os_str().is_empty() {
                return Err(Error::Config("audit log_path is empty".to_string()));
            }
        }
        Ok(())
    }
}
