//! Regional model quota pre-check.
//!
//! Usage entries come from `az cognitiveservices usage list` and look like
//! `OpenAI.GlobalStandard.gpt-4o` with a current value and a limit, both in
//! thousands of tokens per minute.

use super::ControlPlane;
use serde::Deserialize;
use std::fmt;

/// Usage categories that never back a chat deployment
pub const DEFAULT_SKIP_PATTERNS: &[&str] = &[
    "finetune",
    "batch",
    "realtime",
    "audio",
    "transcribe",
    "tts",
    "diarize",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawUsage")]
pub struct QuotaUsage {
    pub name: String,
    pub current_value: i64,
    pub limit: i64,
}

impl QuotaUsage {
    pub fn available(&self) -> i64 {
        self.limit - self.current_value
    }
}

#[derive(Deserialize)]
struct RawUsage {
    #[serde(default)]
    name: RawUsageName,
    #[serde(rename = "currentValue", default)]
    current_value: f64,
    #[serde(default)]
    limit: f64,
}

#[derive(Deserialize, Default)]
struct RawUsageName {
    #[serde(default)]
    value: String,
}

impl From<RawUsage> for QuotaUsage {
    fn from(raw: RawUsage) -> Self {
        Self {
            name: raw.name.value,
            current_value: raw.current_value as i64,
            limit: raw.limit as i64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaStatus {
    /// Capacity left on a matching Standard or GlobalStandard SKU
    Available { sku: String, tpm: i64 },
    /// Matching entries exist (or none do) and all are exhausted
    Unavailable,
    /// The check itself failed; callers proceed as if quota were available
    Unknown(String),
}

impl QuotaStatus {
    pub fn allows_deploy(&self) -> bool {
        !matches!(self, QuotaStatus::Unavailable)
    }
}

impl fmt::Display for QuotaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuotaStatus::Available { sku, tpm } => write!(f, "{}: {}K TPM available", sku, tpm),
            QuotaStatus::Unavailable => write!(f, "No Standard/GlobalStandard quota available"),
            QuotaStatus::Unknown(reason) => write!(f, "(quota check unavailable: {})", reason),
        }
    }
}

/// Decide whether `model` can be deployed given a region's usage entries
pub fn evaluate_quota(usages: &[QuotaUsage], model: &str, skip_patterns: &[String]) -> QuotaStatus {
    let model = model.to_lowercase();

    for usage in usages {
        let name = usage.name.to_lowercase();

        if skip_patterns
            .iter()
            .any(|p| name.contains(&p.to_lowercase()))
        {
            continue;
        }

        // "globalstandard" contains "standard"
        if !name.contains(&model) || !name.contains("standard") {
            continue;
        }

        let available = usage.available();
        if available > 0 {
            let sku = if name.contains("globalstandard") {
                "GlobalStandard"
            } else {
                "Standard"
            };
            return QuotaStatus::Available {
                sku: sku.to_string(),
                tpm: available,
            };
        }
    }

    QuotaStatus::Unavailable
}

/// Query usage for `location` and evaluate it; query failures are not fatal
pub fn check_quota(
    plane: &dyn ControlPlane,
    location: &str,
    model: &str,
    skip_patterns: &[String],
) -> QuotaStatus {
    match plane.quota_usages(location) {
        Ok(usages) => evaluate_quota(&usages, model, skip_patterns),
        Err(e) => {
            tracing::warn!(location, model, error = %e, "quota check failed, assuming available");
            QuotaStatus::Unknown(e.to_string())
        }
    }
}

pub fn default_skip_patterns() -> Vec<String> {
    DEFAULT_SKIP_PATTERNS.iter().map(|s| s.to_string()).collect()
}
