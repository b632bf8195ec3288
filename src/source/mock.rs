//! Static fixtures served when `features.mock` is on.
//!
//! Filters are accepted but ignored, apart from compliance prices, which
//! drive the exposure scenarios.

use crate::error::DashboardError;
use crate::metrics::exposure_scenarios;
use crate::query_state::EntityId;
use crate::types::{
    AllowanceSummary, CategoryEmission, ComplianceReport, EmissionFactor, EmissionsSummary,
    EmissionsTotals, EtsPrice, Facility, IntensityPoint, IntensityReport, IntensitySummary,
    MonthlyAllowance, ScopeShare, SeriesPoint,
};
use crate::view::ViewFilterState;

use super::DashboardSource;

const MONTHLY_ALLOCATION_TCO2E: f64 = 208.33;
const OVERSHOOT_TCO2E: f64 = 329.82;
const YTD_COST_EUR: f64 = 28199.61;
static DEFAULT_PRICES: [f64; 3] = [90.0, 120.0, 150.0];

/// Actual monthly emissions used for the compliance fixture.
const MONTHLY_ACTUALS_TCO2E: [f64; 12] = [
    244.27, 264.48, 244.8, 203.09, 227.84, 214.4, 171.52, 204.91, 206.4, 226.99, 238.93, 325.92,
];

#[derive(Debug, Clone, Copy, Default)]
pub struct MockSource;

impl MockSource {
    pub fn new() -> Self {
        Self
    }
}

fn factor(code: &str, name: &str, unit: &str, factor: f64, scope: &str) -> EmissionFactor {
    EmissionFactor {
        code: code.to_string(),
        name: name.to_string(),
        unit: unit.to_string(),
        factor_kgco2_per_unit: factor,
        scope_hint: scope.to_string(),
    }
}

fn facility(id: EntityId, name: &str, city: &str) -> Facility {
    Facility {
        id,
        name: name.to_string(),
        city: city.to_string(),
        country: "Turkey".to_string(),
    }
}

impl DashboardSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn factors(&self) -> Result<Vec<EmissionFactor>, DashboardError> {
        Ok(vec![
            factor("electricity_TR", "Electricity TR Grid", "kWh", 0.42, "Scope2"),
            factor("diesel", "Diesel", "L", 2.68, "Scope1"),
            factor("petrol", "Petrol", "L", 2.31, "Scope1"),
            factor("natural_gas", "Natural Gas", "m3", 1.90, "Scope1"),
            factor("road_km", "Road Freight", "km", 0.12, "Scope3"),
            factor("air_km", "Business Air Travel", "km", 0.25, "Scope3"),
        ])
    }

    fn emissions_summary(
        &self,
        _view: &ViewFilterState,
    ) -> Result<EmissionsSummary, DashboardError> {
        let series = MONTHLY_ACTUALS_TCO2E
            .iter()
            .enumerate()
            .map(|(i, &tco2e)| SeriesPoint {
                date: format!("2025-{:02}-01", i + 1),
                tco2e,
            })
            .collect();

        let scopes = [
            ("Scope 1", 1109.42, 40.0),
            ("Scope 2", 970.74, 35.0),
            ("Scope 3", 693.39, 25.0),
        ]
        .into_iter()
        .map(|(scope, tco2e, pct)| ScopeShare {
            scope: scope.to_string(),
            tco2e,
            pct,
        })
        .collect();

        let top_categories = [
            ("Energy Consumption", 1200.5),
            ("Transportation", 800.3),
            ("Manufacturing", 600.7),
            ("Waste Disposal", 147.0),
            ("Business Travel", 99.0),
        ]
        .into_iter()
        .map(|(category, tco2e)| CategoryEmission {
            category: category.to_string(),
            tco2e,
        })
        .collect();

        Ok(EmissionsSummary {
            summary: EmissionsTotals {
                total_tco2e: 2773.55,
                yoy_pct: 12.3,
            },
            series,
            scopes,
            top_categories,
        })
    }

    fn ets_price(&self) -> Result<EtsPrice, DashboardError> {
        Ok(EtsPrice {
            price_eur_per_tco2: 85.0,
        })
    }

    fn allowances_summary(&self, entity_id: EntityId) -> Result<AllowanceSummary, DashboardError> {
        let owned = match entity_id {
            1 => 5000.0,
            2 => 3000.0,
            _ => 1000.0,
        };
        Ok(AllowanceSummary {
            entity_id,
            owned,
            committed: 0.0,
            available: owned,
        })
    }

    fn compliance(
        &self,
        _view: &ViewFilterState,
        prices: &[f64],
    ) -> Result<ComplianceReport, DashboardError> {
        let prices = if prices.is_empty() {
            &DEFAULT_PRICES[..]
        } else {
            prices
        };

        let allowances = MONTHLY_ACTUALS_TCO2E
            .iter()
            .map(|&actual| MonthlyAllowance {
                year: 2025,
                allocated: MONTHLY_ALLOCATION_TCO2E,
                actual,
                over_by: (actual - MONTHLY_ALLOCATION_TCO2E).max(0.0),
            })
            .collect();

        Ok(ComplianceReport {
            current_overshoot_tco2e: OVERSHOOT_TCO2E,
            ytd_cost_eur: YTD_COST_EUR,
            allowances,
            scenarios: exposure_scenarios(OVERSHOOT_TCO2E, prices),
        })
    }

    fn intensity(&self, _view: &ViewFilterState) -> Result<IntensityReport, DashboardError> {
        let data = [
            ("2025-01-01", 0.45, 50000.0, 100.0),
            ("2025-01-02", 0.44, 52000.0, 102.0),
            ("2025-01-03", 0.43, 48000.0, 98.0),
        ]
        .into_iter()
        .map(|(date, intensity, revenue, emissions)| IntensityPoint {
            date: date.to_string(),
            intensity,
            revenue,
            emissions,
        })
        .collect();

        Ok(IntensityReport {
            data,
            summary: IntensitySummary {
                average_intensity: 0.44,
                trend: "decreasing".to_string(),
                target: 0.3,
            },
            site_scatter: Vec::new(),
        })
    }

    fn facilities(&self) -> Result<Vec<Facility>, DashboardError> {
        Ok(vec![
            facility(1, "Istanbul Headquarters", "Istanbul"),
            facility(2, "Izmir Manufacturing", "Izmir"),
            facility(3, "Ankara Office", "Ankara"),
            facility(4, "Bursa Factory", "Bursa"),
            facility(5, "Antalya Branch", "Antalya"),
        ])
    }
}
