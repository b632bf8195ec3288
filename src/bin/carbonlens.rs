//! CarbonLens CLI — resolve a dashboard page's filter state from a query
//! string and optionally load the page's data.
//!
//! Usage:
//!   carbonlens <page> [QUERY] [--preset today|week|month|quarter|year]
//!              [--set key=value]... [--clear] [--fetch]
//!
//! `--set key=` drops the key. Logging is controlled by `RUST_LOG`.

use std::process::ExitCode;

use serde_json::{json, Value};

use carbonlens_lib::query_state::{DateRangePreset, MemoryHistory, QueryValue, SystemClock};
use carbonlens_lib::state::load_config;
use carbonlens_lib::{AppState, DashboardError, ErrorBanner, Page, QueryParams, ViewFilterState};

struct Args {
    page: Page,
    query: String,
    preset: Option<DateRangePreset>,
    sets: Vec<(String, String)>,
    clear: bool,
    fetch: bool,
}

fn usage() -> String {
    "usage: carbonlens <page> [QUERY] [--preset NAME] [--set key=value]... [--clear] [--fetch]"
        .to_string()
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let page = raw.next().ok_or_else(usage)?.parse::<Page>()?;
    let mut args = Args {
        page,
        query: String::new(),
        preset: None,
        sets: Vec::new(),
        clear: false,
        fetch: false,
    };

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--preset" => {
                let name = raw.next().ok_or("--preset needs a value")?;
                args.preset = Some(name.parse()?);
            }
            "--set" => {
                let pair = raw.next().ok_or("--set needs key=value")?;
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| format!("--set expects key=value, got '{}'", pair))?;
                args.sets.push((key.to_string(), value.to_string()));
            }
            "--clear" => args.clear = true,
            "--fetch" => args.fetch = true,
            "-h" | "--help" => return Err(usage()),
            other if other.starts_with("--") => {
                return Err(format!("Unknown option: {}\n{}", other, usage()))
            }
            other => args.query = other.to_string(),
        }
    }
    Ok(args)
}

fn fetch_page(app: &AppState, page: Page, state: &ViewFilterState) -> Result<Value, DashboardError> {
    let source = app.source();
    let data = match page {
        Page::Dashboard | Page::Emissions => json!(app.emissions(state)?),
        Page::Intensity => json!(source.intensity(state)?),
        Page::Compliance => {
            let (report, alert) = app.compliance(state)?;
            json!({ "report": report, "alert": alert })
        }
        Page::Allowances => {
            let summaries = state
                .entity_ids
                .iter()
                .map(|&id| source.allowances_summary(id))
                .collect::<Result<Vec<_>, _>>()?;
            json!({ "summaries": summaries, "price": source.ets_price()? })
        }
        Page::Entities => json!(source.facilities()?),
    };
    Ok(data)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}\n{}", e, e.recovery_suggestion());
            return ExitCode::FAILURE;
        }
    };
    let app = AppState::new(config);
    let clock = SystemClock;
    let view = app.page_view(args.page, &clock);

    let query = args.query.trim_start_matches('?');
    let start_url = if query.is_empty() {
        args.page.path()
    } else {
        format!("{}?{}", args.page.path(), query)
    };
    let mut history = MemoryHistory::new(&start_url);

    let mut state = view.load(&history);
    if args.clear {
        state = view.reset(&mut history, None);
    }

    let mut update = QueryParams::new();
    if let Some(preset) = args.preset {
        let range = preset.range(&clock);
        update = carbonlens_lib::merge(&update, &range.to_params());
    }
    for (key, value) in &args.sets {
        if value.is_empty() {
            update.insert(key.as_str(), QueryValue::Null);
        } else {
            update.insert(key.as_str(), value.as_str());
        }
    }
    if !update.is_empty() {
        state = view.update(&state, &update, &mut history, None);
    }

    let mut output = json!({
        "page": args.page,
        "url": history.url(),
        "state": state,
    });

    if args.fetch {
        match fetch_page(&app, args.page, &state) {
            Ok(data) => output["data"] = data,
            Err(e) => {
                let banner = ErrorBanner::from(&e);
                eprintln!("{}", json!(banner));
                return ExitCode::FAILURE;
            }
        }
    }

    match serde_json::to_string_pretty(&output) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to render output: {}", e);
            ExitCode::FAILURE
        }
    }
}
