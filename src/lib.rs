//! CarbonLens dashboard core.
//!
//! Page filter state lives in the URL query string (`query_state`), is
//! resolved per page into typed state (`view`), and drives requests to a
//! dashboard data source that is either the built-in fixtures or the live
//! reporting backend (`source`).

pub mod error;
pub mod metrics;
pub mod query_state;
pub mod source;
pub mod state;
pub mod types;
pub mod view;

pub use error::{DashboardError, ErrorBanner};
pub use query_state::{decode, encode, merge, QueryParams, QueryValue};
pub use state::AppState;
pub use view::{Page, PageView, Tab, ViewFilterState};
