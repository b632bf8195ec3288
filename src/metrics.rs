//! Display-side derivations over dashboard payloads.

use crate::types::{CategoryEmission, ExposureScenario, MonthlyAllowance, SiteIntensity};

/// Cumulative share kept by the pareto toggle (the 80/20 rule).
pub const PARETO_SHARE: f64 = 0.8;

/// Top contributors, largest first, up to the first category that brings
/// the cumulative share to `share`.
///
/// Ties keep their input order. When the total is not positive there is
/// nothing to rank, so every category is returned unchanged.
pub fn pareto_categories(categories: &[CategoryEmission], share: f64) -> Vec<CategoryEmission> {
    let total: f64 = categories.iter().map(|c| c.tco2e).sum();
    if total <= 0.0 || !total.is_finite() {
        return categories.to_vec();
    }

    let mut ranked = categories.to_vec();
    // Stable sort keeps ties in input order.
    ranked.sort_by(|a, b| b.tco2e.total_cmp(&a.tco2e));

    let mut kept = Vec::new();
    let mut cumulative = 0.0;
    for category in ranked {
        cumulative += category.tco2e;
        kept.push(category);
        if cumulative / total >= share {
            break;
        }
    }
    kept
}

/// Cost exposure at each candidate carbon price.
pub fn exposure_scenarios(overshoot_tco2e: f64, prices: &[f64]) -> Vec<ExposureScenario> {
    prices
        .iter()
        .map(|&price_eur| ExposureScenario {
            price_eur,
            exposure_eur: overshoot_tco2e * price_eur,
        })
        .collect()
}

/// Actual emissions as a percentage of allocated allowances, or `None`
/// when nothing was allocated.
pub fn allowance_usage_pct(allowances: &[MonthlyAllowance]) -> Option<f64> {
    let allocated: f64 = allowances.iter().map(|a| a.allocated).sum();
    if allocated <= 0.0 {
        return None;
    }
    let actual: f64 = allowances.iter().map(|a| a.actual).sum();
    Some(actual * 100.0 / allocated)
}

/// True when allowance usage has reached `threshold_pct`.
pub fn usage_alert(allowances: &[MonthlyAllowance], threshold_pct: f64) -> bool {
    allowance_usage_pct(allowances).is_some_and(|pct| pct >= threshold_pct)
}

/// Revenue (MEUR) per tonne emitted across all sites; 0 with no emissions.
pub fn carbon_productivity(sites: &[SiteIntensity]) -> f64 {
    let emissions: f64 = sites.iter().map(|s| s.tco2e).sum();
    if emissions <= 0.0 {
        return 0.0;
    }
    let revenue: f64 = sites.iter().map(|s| s.revenue_meur).sum();
    revenue / emissions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(name: &str, tco2e: f64) -> CategoryEmission {
        CategoryEmission {
            category: name.to_string(),
            tco2e,
        }
    }

    fn month(allocated: f64, actual: f64) -> MonthlyAllowance {
        MonthlyAllowance {
            year: 2025,
            allocated,
            actual,
            over_by: (actual - allocated).max(0.0),
        }
    }

    fn names(categories: &[CategoryEmission]) -> Vec<&str> {
        categories.iter().map(|c| c.category.as_str()).collect()
    }

    #[test]
    fn test_pareto_keeps_top_contributors() {
        let categories = vec![
            cat("Waste Disposal", 147.0),
            cat("Energy Consumption", 1200.5),
            cat("Manufacturing", 600.7),
            cat("Transportation", 800.3),
            cat("Business Travel", 99.0),
        ];
        let kept = pareto_categories(&categories, PARETO_SHARE);
        assert_eq!(
            names(&kept),
            vec!["Energy Consumption", "Transportation", "Manufacturing"]
        );
    }

    #[test]
    fn test_pareto_full_share_keeps_everything_sorted() {
        let categories = vec![cat("a", 1.0), cat("b", 3.0), cat("c", 2.0)];
        let kept = pareto_categories(&categories, 1.0);
        assert_eq!(names(&kept), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_pareto_ties_keep_input_order() {
        let categories = vec![cat("first", 5.0), cat("second", 5.0), cat("third", 1.0)];
        let kept = pareto_categories(&categories, 0.4);
        assert_eq!(names(&kept), vec!["first"]);
        let kept = pareto_categories(&categories, 0.9);
        assert_eq!(names(&kept), vec!["first", "second"]);
    }

    #[test]
    fn test_pareto_zero_total() {
        let categories = vec![cat("a", 0.0), cat("b", 0.0)];
        assert_eq!(pareto_categories(&categories, PARETO_SHARE), categories);
        assert!(pareto_categories(&[], PARETO_SHARE).is_empty());
    }

    #[test]
    fn test_exposure_scenarios() {
        let scenarios = exposure_scenarios(10.0, &[90.0, 120.0]);
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].exposure_eur, 900.0);
        assert_eq!(scenarios[1].price_eur, 120.0);
        assert_eq!(scenarios[1].exposure_eur, 1200.0);
        assert!(exposure_scenarios(10.0, &[]).is_empty());
    }

    #[test]
    fn test_usage_alert_threshold() {
        let allowances = vec![month(100.0, 96.0), month(100.0, 94.0)];
        assert_eq!(allowance_usage_pct(&allowances), Some(95.0));
        assert!(usage_alert(&allowances, 95.0));
        assert!(!usage_alert(&allowances, 96.0));
    }

    #[test]
    fn test_usage_alert_without_allocation() {
        assert_eq!(allowance_usage_pct(&[]), None);
        assert!(!usage_alert(&[month(0.0, 50.0)], 0.0));
    }

    #[test]
    fn test_carbon_productivity() {
        let sites = vec![
            SiteIntensity {
                site: "Istanbul".to_string(),
                revenue_meur: 30.0,
                tco2e: 10.0,
            },
            SiteIntensity {
                site: "Izmir".to_string(),
                revenue_meur: 10.0,
                tco2e: 10.0,
            },
        ];
        assert_eq!(carbon_productivity(&sites), 2.0);
        assert_eq!(carbon_productivity(&[]), 0.0);
    }
}
