// src/core/config_manager.rs
//! Client configuration: optional `config.yaml` plus environment overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigManager {
    pub environment: String,
    pub service: ServiceConfig,
    pub session_path: PathBuf,
    pub log_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub api_base_url: String,
    /// `None` leaves requests without a client-side timeout.
    pub timeout_seconds: Option<u64>,
}

/// One environment section of `config.yaml`; every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
struct EnvironmentSection {
    api_base_url: Option<String>,
    timeout_seconds: Option<u64>,
    session_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: EnvironmentSection,
    #[serde(default)]
    production: EnvironmentSection,
}

impl ConfigManager {
    /// Load configuration from `./config.yaml` (if present) and the process
    /// environment.
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let section = Self::load_section(Path::new(CONFIG_FILE), &environment)?;
        Ok(Self::resolve(environment, section, |key| std::env::var(key).ok()))
    }

    fn get_environment() -> String {
        std::env::var("JOB_ANALYZER_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_section(path: &Path, environment: &str) -> Result<EnvironmentSection> {
        if !path.exists() {
            return Ok(EnvironmentSection::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config_file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    /// Environment variables win over the file section, which wins over
    /// defaults.
    fn resolve<F>(environment: String, section: EnvironmentSection, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = env("JOB_ANALYZER_API_URL")
            .or(section.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_seconds = env("JOB_ANALYZER_TIMEOUT_SECS")
            .and_then(|raw| raw.parse().ok())
            .or(section.timeout_seconds);

        let session_path = env("JOB_ANALYZER_SESSION_PATH")
            .map(PathBuf::from)
            .or(section.session_path)
            .unwrap_or_else(default_session_path);

        let log_path = env("JOB_ANALYZER_LOG_PATH")
            .map(PathBuf::from)
            .or(section.log_path)
            .unwrap_or_else(|| std::env::temp_dir().join("job-analyzer.log"));

        Self {
            environment,
            service: ServiceConfig {
                api_base_url: api_base_url.trim_end_matches('/').to_string(),
                timeout_seconds,
            },
            session_path,
            log_path,
        }
    }

    pub fn with_api_url(mut self, url: String) -> Self {
        self.service.api_base_url = url.trim_end_matches('/').to_string();
        self
    }
}

fn default_session_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("job-analyzer"))
        .unwrap_or_else(|| PathBuf::from(".job-analyzer"))
        .join("session.toml")
}
