//! Analysis report payload and the remote analysis port.
//!
//! The session controller treats the report as opaque JSON: it only checks
//! that something non-null came back and hands it to the presentation layer
//! unmodified. [`FeasibilityReport`] is an optional typed view over the flat
//! report schema for adapters that want one.

use crate::error::{LensError, Result};
use crate::idea::StartupIdea;
use crate::token::SessionToken;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The report object returned by the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AnalysisReport(Value);

impl AnalysisReport {
    /// Wraps a response body. A JSON `null` is not a report.
    pub fn from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Err(LensError::analysis_request("analysis response was null"));
        }
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Pretty-printed JSON, as written by the report export.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }

    /// Interprets the payload as a flat [`FeasibilityReport`], if it has that shape.
    pub fn feasibility(&self) -> Option<FeasibilityReport> {
        serde_json::from_value(self.0.clone()).ok()
    }
}

/// The remote analysis service.
#[async_trait::async_trait]
pub trait AnalysisService: Send + Sync {
    /// Submits `idea` for analysis, authenticated with `token`.
    ///
    /// # Errors
    ///
    /// `LensError::AnalysisRequest` on transport failure, a non-success
    /// status, or a null body.
    async fn analyze(&self, idea: &StartupIdea, token: &SessionToken) -> Result<AnalysisReport>;
}

// ============================================================================
// Typed view (flat schema)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityReport {
    pub market_analysis: MarketAnalysis,
    pub competitors: Competitors,
    pub swot: Swot,
    pub financials: Financials,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    pub market_size: String,
    pub target_market: String,
    #[serde(default)]
    pub market_trends: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitors {
    #[serde(default)]
    pub direct_competitors: Vec<Competitor>,
    #[serde(default)]
    pub indirect_competitors: Vec<String>,
    #[serde(default)]
    pub competitive_advantage: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swot {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    #[serde(default)]
    pub threats: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    pub estimated_startup_cost: String,
    pub revenue_model: String,
    pub break_even_time: String,
    pub funding_requirements: String,
    #[serde(default)]
    pub key_metrics: Vec<KeyMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetric {
    pub metric: String,
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub feasibility_score: f64,
    pub recommendation: String,
    #[serde(default)]
    pub next_steps: Vec<String>,
    pub timeline: String,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}
