use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DashboardError;
use crate::metrics::{self, PARETO_SHARE};
use crate::query_state::Clock;
use crate::source::{DashboardSource, HttpSource, MockSource};
use crate::types::{ComplianceReport, Config, EmissionsSummary};
use crate::view::{Page, PageView, ViewFilterState};

/// Environment variable overriding `backendUrl` from the config file.
pub const BACKEND_URL_ENV: &str = "CARBONLENS_BACKEND_URL";

/// Application state shared by every page: configuration plus the data
/// source it selects.
pub struct AppState {
    pub config: Config,
    source: Box<dyn DashboardSource>,
}

impl AppState {
    /// Pick the data source from `features.mock`.
    pub fn new(config: Config) -> Self {
        let source: Box<dyn DashboardSource> = if config.features.mock {
            Box::new(MockSource::new())
        } else {
            Box::new(HttpSource::new(&config.backend_url))
        };
        log::info!("Dashboard data source: {}", source.name());
        Self { config, source }
    }

    pub fn with_source(config: Config, source: Box<dyn DashboardSource>) -> Self {
        Self { config, source }
    }

    pub fn source(&self) -> &dyn DashboardSource {
        self.source.as_ref()
    }

    /// Filter-state resolver for `page` under the configured date policy.
    pub fn page_view<'a>(&self, page: Page, clock: &'a dyn Clock) -> PageView<'a> {
        PageView::new(page, clock, self.config.date_range_policy)
    }

    /// Emissions summary for the view, narrowed to the top contributors
    /// when the pareto toggle is on.
    pub fn emissions(&self, view: &ViewFilterState) -> Result<EmissionsSummary, DashboardError> {
        let mut summary = self.source.emissions_summary(view).map_err(|e| {
            log::warn!("Failed to load emissions from {}: {}", self.source.name(), e);
            e
        })?;
        if view.pareto_enabled {
            summary.top_categories = metrics::pareto_categories(&summary.top_categories, PARETO_SHARE);
        }
        Ok(summary)
    }

    /// Compliance report at the configured scenario prices, plus whether
    /// allowance usage crossed the alert threshold.
    pub fn compliance(
        &self,
        view: &ViewFilterState,
    ) -> Result<(ComplianceReport, bool), DashboardError> {
        let report = self
            .source
            .compliance(view, &self.config.scenario_prices)
            .map_err(|e| {
                log::warn!("Failed to load compliance from {}: {}", self.source.name(), e);
                e
            })?;
        let alert = metrics::usage_alert(&report.allowances, self.config.alert_threshold_pct);
        if alert {
            log::info!(
                "Allowance usage reached {}% threshold",
                self.config.alert_threshold_pct
            );
        }
        Ok((report, alert))
    }
}

/// Path of the user config file (~/.carbonlens/config.json)
pub fn config_path() -> Result<PathBuf, DashboardError> {
    let home = dirs::home_dir()
        .ok_or_else(|| DashboardError::Config("Could not find home directory".to_string()))?;
    Ok(home.join(".carbonlens").join("config.json"))
}

/// Load configuration from ~/.carbonlens/config.json, then apply the
/// environment override.
pub fn load_config() -> Result<Config, DashboardError> {
    let mut config = load_config_from(&config_path()?)?;
    apply_backend_override(&mut config, std::env::var(BACKEND_URL_ENV).ok());
    Ok(config)
}

/// Load configuration from `path`. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, DashboardError> {
    if !path.exists() {
        log::info!(
            "No config at {}, using defaults (mock data)",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config =
        serde_json::from_str(&content).map_err(|e| DashboardError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let policy = config.date_range_policy;
    if policy.min_year > policy.max_year {
        return Err(DashboardError::Config(format!(
            "dateRangePolicy.minYear ({}) is after maxYear ({})",
            policy.min_year, policy.max_year
        )));
    }

    Ok(config)
}

/// Replace `backend_url` with a non-empty override.
pub fn apply_backend_override(config: &mut Config, value: Option<String>) {
    if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
        log::debug!("Backend URL overridden from environment: {}", url);
        config.backend_url = url;
    }
}
