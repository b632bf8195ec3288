//! Live reporting backend over HTTP.
//!
//! Plain blocking GETs against `backend_url`; query strings are built with
//! the same codec the pages use for their URLs.

use serde::de::DeserializeOwned;

use crate::error::DashboardError;
use crate::query_state::{encode, stringify_entity_ids, EntityId, QueryParams};
use crate::types::{
    AllowanceSummary, ComplianceReport, EmissionFactor, EmissionsSummary, EtsPrice, Facility,
    IntensityReport,
};
use crate::view::ViewFilterState;

use super::DashboardSource;

pub struct HttpSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full URL for `path`, with `?query` appended only when there is one.
    pub fn url_for(&self, path: &str, query: &QueryParams) -> String {
        let query = encode(query);
        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &QueryParams) -> Result<T, DashboardError> {
        let url = self.url_for(path, query);
        log::debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DashboardError::Network {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(DashboardError::Http {
                path: path.to_string(),
                status: resp.status().as_u16(),
            });
        }

        resp.json::<T>().map_err(|e| DashboardError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Date range and entity filters as the backend expects them.
fn filter_params(view: &ViewFilterState) -> QueryParams {
    let mut params = view.date_range.to_params();
    params.insert("entity_ids", stringify_entity_ids(&view.entity_ids));
    params
}

fn compliance_params(view: &ViewFilterState, prices: &[f64]) -> QueryParams {
    let prices = prices
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(",");
    QueryParams::new()
        .with("start", view.date_range.start.as_str())
        .with("end", view.date_range.end.as_str())
        .with("entities", stringify_entity_ids(&view.entity_ids))
        .with("prices", prices)
}

impl DashboardSource for HttpSource {
    fn name(&self) -> &'static str {
        "http"
    }

    fn factors(&self) -> Result<Vec<EmissionFactor>, DashboardError> {
        self.get("/factors/", &QueryParams::new())
    }

    fn emissions_summary(
        &self,
        view: &ViewFilterState,
    ) -> Result<EmissionsSummary, DashboardError> {
        let params = filter_params(view).with("pareto", view.pareto_enabled);
        self.get("/api/emissions", &params)
    }

    fn ets_price(&self) -> Result<EtsPrice, DashboardError> {
        self.get("/eu-ets/price", &QueryParams::new())
    }

    fn allowances_summary(&self, entity_id: EntityId) -> Result<AllowanceSummary, DashboardError> {
        self.get(
            "/allowances/summary",
            &QueryParams::new().with("entity_id", entity_id),
        )
    }

    fn compliance(
        &self,
        view: &ViewFilterState,
        prices: &[f64],
    ) -> Result<ComplianceReport, DashboardError> {
        self.get("/compliance", &compliance_params(view, prices))
    }

    fn intensity(&self, view: &ViewFilterState) -> Result<IntensityReport, DashboardError> {
        self.get("/api/intensity", &filter_params(view))
    }

    fn facilities(&self) -> Result<Vec<Facility>, DashboardError> {
        self.get("/api/facilities", &QueryParams::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_state::DateRange;
    use crate::view::Tab;

    fn view(entity_ids: Vec<EntityId>) -> ViewFilterState {
        ViewFilterState {
            date_range: DateRange::new("2025-01-01", "2025-12-31"),
            entity_ids,
            active_tab: Tab::Overview,
            pareto_enabled: true,
        }
    }

    #[test]
    fn test_url_for_without_query() {
        let source = HttpSource::new("http://localhost:8000/");
        assert_eq!(
            source.url_for("/factors/", &QueryParams::new()),
            "http://localhost:8000/factors/"
        );
    }

    #[test]
    fn test_filter_params_skip_empty_entities() {
        let source = HttpSource::new("http://localhost:8000");
        let url = source.url_for("/api/intensity", &filter_params(&view(vec![])));
        assert_eq!(
            url,
            "http://localhost:8000/api/intensity?start_date=2025-01-01&end_date=2025-12-31"
        );
    }

    #[test]
    fn test_emissions_query_carries_filters() {
        let source = HttpSource::new("http://localhost:8000");
        let v = view(vec![1, 2]);
        let params = filter_params(&v).with("pareto", v.pareto_enabled);
        assert_eq!(
            source.url_for("/api/emissions", &params),
            "http://localhost:8000/api/emissions?start_date=2025-01-01&end_date=2025-12-31&entity_ids=1%2C2&pareto=true"
        );
    }

    #[test]
    fn test_compliance_params() {
        let params = compliance_params(&view(vec![3]), &[90.0, 120.5]);
        assert_eq!(
            encode(&params),
            "start=2025-01-01&end=2025-12-31&entities=3&prices=90%2C120.5"
        );
    }

    #[test]
    fn test_allowances_query() {
        let source = HttpSource::new("https://carbon.example.com");
        let params = QueryParams::new().with("entity_id", 7u64);
        assert_eq!(
            source.url_for("/allowances/summary", &params),
            "https://carbon.example.com/allowances/summary?entity_id=7"
        );
    }
}
