use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User-configurable constraints guiding the recommendation request. The
/// remote service owns the canonical copy; the client holds an editable
/// mirror of the last successful load or save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub cuisine: String,
    pub max_eta_minutes: u32,
    pub budget_max_cents: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            cuisine: "thai".to_string(),
            max_eta_minutes: 45,
            budget_max_cents: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub preferences: Option<Preferences>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub label: String,
    pub savings_cents: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedOrder {
    pub restaurant: String,
    pub items: Vec<String>,
    pub eta_minutes: u32,
    pub estimated_total_usd: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal: Option<Deal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub restaurant: String,
    pub why_not: String,
}

/// A single primary suggested order plus rejected alternatives with reasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommended: RecommendedOrder,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

/// Payload of the minimal recommendation endpoint, which returns arbitrary
/// JSON. Bodies matching the structured schema are promoted; anything else
/// is kept for the unknown-shape fallback rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoPayload {
    Structured(Recommendation),
    Unknown(Value),
}

impl From<Value> for RecoPayload {
    fn from(value: Value) -> Self {
        match serde_json::from_value::<Recommendation>(value.clone()) {
            Ok(reco) => Self::Structured(reco),
            Err(_) => Self::Unknown(value),
        }
    }
}
