//! Where dashboard data comes from.
//!
//! Pages talk to a [`DashboardSource`]; whether that is the built-in
//! fixture set or the live reporting backend is decided once, from
//! `features.mock` in the config.

mod http;
mod mock;

pub use http::HttpSource;
pub use mock::MockSource;

use crate::error::DashboardError;
use crate::query_state::EntityId;
use crate::types::{
    AllowanceSummary, ComplianceReport, EmissionFactor, EmissionsSummary, EtsPrice, Facility,
    IntensityReport,
};
use crate::view::ViewFilterState;

pub trait DashboardSource {
    /// Short label for logs ("mock", "http").
    fn name(&self) -> &'static str;

    fn factors(&self) -> Result<Vec<EmissionFactor>, DashboardError>;

    fn emissions_summary(&self, view: &ViewFilterState)
        -> Result<EmissionsSummary, DashboardError>;

    fn ets_price(&self) -> Result<EtsPrice, DashboardError>;

    fn allowances_summary(&self, entity_id: EntityId)
        -> Result<AllowanceSummary, DashboardError>;

    /// Compliance position for the view, with an exposure scenario per price.
    fn compliance(
        &self,
        view: &ViewFilterState,
        prices: &[f64],
    ) -> Result<ComplianceReport, DashboardError>;

    fn intensity(&self, view: &ViewFilterState) -> Result<IntensityReport, DashboardError>;

    fn facilities(&self) -> Result<Vec<Facility>, DashboardError>;
}
