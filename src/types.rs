use serde::{Deserialize, Serialize};

use crate::query_state::{DateRangePolicy, EntityId};

/// Default reporting backend for local development.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Main configuration loaded from ~/.carbonlens/config.json
///
/// Every field has a default, so a missing or empty file yields a working
/// mock-data setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub date_range_policy: DateRangePolicy,
    /// Carbon prices (EUR/tCO2e) used for compliance exposure scenarios.
    #[serde(default = "default_scenario_prices")]
    pub scenario_prices: Vec<f64>,
    /// Allowance usage percentage that raises the compliance alert.
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold_pct: f64,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_scenario_prices() -> Vec<f64> {
    vec![90.0, 120.0, 150.0]
}

fn default_alert_threshold() -> f64 {
    95.0
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            features: FeatureFlags::default(),
            date_range_policy: DateRangePolicy::default(),
            scenario_prices: default_scenario_prices(),
            alert_threshold_pct: default_alert_threshold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    /// Serve dashboard data from the built-in fixtures instead of the backend.
    #[serde(default = "default_true")]
    pub mock: bool,
    #[serde(default = "default_true")]
    pub llm_insights: bool,
    #[serde(default = "default_true")]
    pub file_upload: bool,
    #[serde(default = "default_true")]
    pub ai_explanations: bool,
    #[serde(default = "default_true")]
    pub dark_mode: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            mock: true,
            llm_insights: true,
            file_upload: true,
            ai_explanations: true,
            dark_mode: true,
        }
    }
}

// =============================================================================
// Backend payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    pub code: String,
    pub name: String,
    pub unit: String,
    pub factor_kgco2_per_unit: f64,
    pub scope_hint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsSummary {
    pub summary: EmissionsTotals,
    #[serde(default)]
    pub series: Vec<SeriesPoint>,
    #[serde(default)]
    pub scopes: Vec<ScopeShare>,
    #[serde(default)]
    pub top_categories: Vec<CategoryEmission>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsTotals {
    pub total_tco2e: f64,
    pub yoy_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: String,
    pub tco2e: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeShare {
    pub scope: String,
    pub tco2e: f64,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEmission {
    pub category: String,
    pub tco2e: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtsPrice {
    pub price_eur_per_tco2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowanceSummary {
    pub entity_id: EntityId,
    pub owned: f64,
    pub committed: f64,
    pub available: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub current_overshoot_tco2e: f64,
    pub ytd_cost_eur: f64,
    #[serde(default)]
    pub allowances: Vec<MonthlyAllowance>,
    #[serde(default)]
    pub scenarios: Vec<ExposureScenario>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAllowance {
    pub year: i32,
    pub allocated: f64,
    pub actual: f64,
    pub over_by: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureScenario {
    pub price_eur: f64,
    pub exposure_eur: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensityReport {
    #[serde(default)]
    pub data: Vec<IntensityPoint>,
    pub summary: IntensitySummary,
    #[serde(default)]
    pub site_scatter: Vec<SiteIntensity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensityPoint {
    pub date: String,
    pub intensity: f64,
    pub revenue: f64,
    pub emissions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensitySummary {
    pub average_intensity: f64,
    pub trend: String,
    pub target: f64,
}

/// One facility on the revenue-vs-emissions scatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteIntensity {
    pub site: String,
    pub revenue_meur: f64,
    pub tco2e: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    pub id: EntityId,
    pub name: String,
    pub city: String,
    pub country: String,
}
