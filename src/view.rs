//! Typed per-page filter state.
//!
//! A page decodes the URL, folds in its defaults, and ends up with a
//! [`ViewFilterState`]. Changes go back through the URL: the page builds a
//! partial update, the codec merges and replaces the history entry, and
//! the state is resolved again from the new params.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::query_state::{
    self, default_date_range, merge_and_navigate, parse_entity_ids, stringify_entity_ids,
    BrowsingContext, Clock, DateRange, DateRangePolicy, EntityId, Location, Navigate,
    QueryParams, END_DATE, ENTITY_IDS, PARETO, START_DATE, TAB,
};

// =============================================================================
// Pages and tabs
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Dashboard,
    Emissions,
    Intensity,
    Compliance,
    Allowances,
    Entities,
}

pub const ALL_PAGES: [Page; 6] = [
    Page::Dashboard,
    Page::Emissions,
    Page::Intensity,
    Page::Compliance,
    Page::Allowances,
    Page::Entities,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Overview,
    Total,
    Scopes,
    Categories,
    Scenarios,
}

impl Tab {
    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Total => "total",
            Tab::Scopes => "scopes",
            Tab::Categories => "categories",
            Tab::Scenarios => "scenarios",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "overview" => Some(Tab::Overview),
            "total" => Some(Tab::Total),
            "scopes" => Some(Tab::Scopes),
            "categories" => Some(Tab::Categories),
            "scenarios" => Some(Tab::Scenarios),
            _ => None,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Page {
    pub fn as_str(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Emissions => "emissions",
            Page::Intensity => "intensity",
            Page::Compliance => "compliance",
            Page::Allowances => "allowances",
            Page::Entities => "entities",
        }
    }

    /// Route path of the page.
    pub fn path(self) -> String {
        format!("/{}", self.as_str())
    }

    /// Tabs the page renders, default first.
    pub fn tabs(self) -> &'static [Tab] {
        match self {
            Page::Emissions => &[Tab::Total, Tab::Scopes, Tab::Categories],
            Page::Compliance => &[Tab::Overview, Tab::Scenarios],
            Page::Dashboard | Page::Intensity | Page::Allowances | Page::Entities => {
                &[Tab::Overview]
            }
        }
    }

    pub fn default_tab(self) -> Tab {
        self.tabs()[0]
    }

    /// Defaults applied for fields missing from the URL.
    pub fn defaults(self, clock: &dyn Clock) -> PageDefaults {
        let entity_ids = match self {
            Page::Emissions => vec![1, 2],
            _ => Vec::new(),
        };
        PageDefaults {
            date_range: default_date_range(clock),
            entity_ids,
            tab: self.default_tab(),
            pareto_enabled: false,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim_start_matches('/');
        ALL_PAGES
            .into_iter()
            .find(|page| page.as_str() == name)
            .ok_or_else(|| format!("Unknown page: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDefaults {
    pub date_range: DateRange,
    pub entity_ids: Vec<EntityId>,
    pub tab: Tab,
    pub pareto_enabled: bool,
}

// =============================================================================
// Filter state
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewFilterState {
    pub date_range: DateRange,
    pub entity_ids: Vec<EntityId>,
    pub active_tab: Tab,
    pub pareto_enabled: bool,
}

impl ViewFilterState {
    /// All five filter keys in field-contract order. An empty entity list
    /// is left out.
    pub fn to_params(&self) -> QueryParams {
        let mut params = self.date_range.to_params();
        let ids = stringify_entity_ids(&self.entity_ids);
        if !ids.is_empty() {
            params.insert(ENTITY_IDS, ids);
        }
        params.insert(TAB, self.active_tab.as_str());
        params.insert(PARETO, self.pareto_enabled);
        params
    }

    /// Partial update flipping the pareto toggle.
    pub fn pareto_toggle(&self) -> QueryParams {
        QueryParams::new().with(PARETO, !self.pareto_enabled)
    }
}

/// Filter state resolution for one page; the counterpart of a page's
/// query-state hook.
pub struct PageView<'a> {
    page: Page,
    clock: &'a dyn Clock,
    policy: DateRangePolicy,
}

impl<'a> PageView<'a> {
    pub fn new(page: Page, clock: &'a dyn Clock, policy: DateRangePolicy) -> Self {
        Self {
            page,
            clock,
            policy,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Typed state from decoded params plus page defaults.
    ///
    /// An invalid or half-specified date range is replaced as a whole by
    /// the default range; unknown tabs fall back to the default tab.
    pub fn resolve(&self, params: &QueryParams) -> ViewFilterState {
        let defaults = self.page.defaults(self.clock);

        let date_range = match (params.get_str(START_DATE), params.get_str(END_DATE)) {
            (None, None) => defaults.date_range,
            (Some(start), Some(end)) if self.policy.accepts(start, end) => {
                DateRange::new(start, end)
            }
            (start, end) => {
                log::debug!(
                    "Ignoring invalid date range {:?}..{:?} on {}",
                    start,
                    end,
                    self.page
                );
                defaults.date_range
            }
        };

        let entity_ids = match params.get_str(ENTITY_IDS) {
            Some(raw) => parse_entity_ids(raw),
            None => defaults.entity_ids,
        };

        let active_tab = match params.get_str(TAB) {
            Some(raw) => match Tab::parse(raw).filter(|tab| self.page.tabs().contains(tab)) {
                Some(tab) => tab,
                None => {
                    log::debug!("Unknown tab '{}' on {}, using default", raw, self.page);
                    defaults.tab
                }
            },
            None => defaults.tab,
        };

        let pareto_enabled = match params.get_str(PARETO) {
            Some(raw) => raw == "true",
            None => defaults.pareto_enabled,
        };

        ViewFilterState {
            date_range,
            entity_ids,
            active_tab,
            pareto_enabled,
        }
    }

    /// Resolve straight from the current URL.
    pub fn load(&self, location: &dyn Location) -> ViewFilterState {
        self.resolve(&query_state::current_query_params(location))
    }

    /// Apply a partial update: merge it over `state`, replace the history
    /// entry, and return the state the new URL resolves to.
    pub fn update(
        &self,
        state: &ViewFilterState,
        update: &QueryParams,
        context: &mut dyn BrowsingContext,
        navigate: Option<&mut dyn Navigate>,
    ) -> ViewFilterState {
        let target = merge_and_navigate(update, &state.to_params(), context, navigate);
        let search = target.find('?').map(|idx| &target[idx..]).unwrap_or("");
        self.resolve(&query_state::decode(search))
    }

    /// Drop every filter from the URL and fall back to defaults.
    pub fn reset(
        &self,
        context: &mut dyn BrowsingContext,
        navigate: Option<&mut dyn Navigate>,
    ) -> ViewFilterState {
        query_state::clear(context, navigate);
        self.resolve(&QueryParams::new())
    }
}
