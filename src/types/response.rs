use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::analysis::{AnalysisRecord, AnalysisResult};

// ===== Request Bodies =====

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    pub job_description: String,
}

// ===== Service Response Types =====

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// `GET /analyses`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysesResponse {
    #[serde(default)]
    pub analyses: Vec<AnalysisRecord>,
    #[serde(default)]
    pub total_count: Option<usize>,
    #[serde(default)]
    pub username: Option<String>,
}

/// `GET /stats`. Distributions are passed through for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub total_analyses: u64,
    #[serde(default)]
    pub role_distribution: BTreeMap<String, u64>,
    #[serde(default)]
    pub experience_distribution: BTreeMap<String, u64>,
}

impl StatsResponse {
    pub fn role_type_count(&self) -> usize {
        self.role_distribution.len()
    }

    pub fn experience_level_count(&self) -> usize {
        self.experience_distribution.len()
    }
}

/// `GET /user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserProfile {
    /// Placeholder shown when the profile lookup fails.
    pub fn fallback(username: &str) -> Self {
        Self {
            username: Some(username.to_string()),
            name: Some(username.to_string()),
            email: Some("N/A".to_string()),
            role: Some("User".to_string()),
        }
    }
}

/// `POST /analyze` returns the bare analysis, not a stored record.
pub type AnalyzeResponse = AnalysisResult;
