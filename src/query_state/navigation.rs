//! Writing filter state back to the address bar.
//!
//! Filter changes always replace the current history entry so they never
//! pile up behind the back button. The location and the replace capability
//! are passed in explicitly; nothing here reaches for a global.

use super::{decode, encode, merge, QueryParams};

/// Read access to the current URL.
pub trait Location {
    fn pathname(&self) -> &str;
    /// Query string including its leading `?`, or `""`.
    fn search(&self) -> &str;
}

/// A location whose current history entry can be replaced in place.
pub trait BrowsingContext: Location {
    fn replace_state(&mut self, url: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigateOptions {
    pub replace: bool,
}

/// Router-supplied navigation callback.
pub trait Navigate {
    fn navigate(&mut self, to: &str, options: NavigateOptions);
}

impl<F> Navigate for F
where
    F: FnMut(&str, NavigateOptions),
{
    fn navigate(&mut self, to: &str, options: NavigateOptions) {
        self(to, options)
    }
}

/// Merge `update` over `current`, encode, and replace the current entry.
///
/// Goes through `navigate` when a router callback is supplied, otherwise
/// replaces directly on `context`. Returns the new path and query.
pub fn merge_and_navigate(
    update: &QueryParams,
    current: &QueryParams,
    context: &mut dyn BrowsingContext,
    navigate: Option<&mut dyn Navigate>,
) -> String {
    let merged = merge(current, update);
    let target = format!("{}?{}", context.pathname(), encode(&merged));
    replace(context, navigate, &target);
    target
}

/// Drop the whole query string, keeping the current path.
pub fn clear(context: &mut dyn BrowsingContext, navigate: Option<&mut dyn Navigate>) -> String {
    let target = context.pathname().to_string();
    replace(context, navigate, &target);
    target
}

/// Decode the filter keys from `location`'s query string.
pub fn current_query_params(location: &dyn Location) -> QueryParams {
    decode(location.search())
}

fn replace(context: &mut dyn BrowsingContext, navigate: Option<&mut dyn Navigate>, target: &str) {
    match navigate {
        Some(navigate) => {
            log::debug!("Navigating (replace) to {}", target);
            navigate.navigate(target, NavigateOptions { replace: true });
        }
        None => {
            log::debug!("Replacing history entry with {}", target);
            context.replace_state(target);
        }
    }
}

// =============================================================================
// In-memory history
// =============================================================================

/// History stack for hosts without a browser: the CLI and tests.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    pathname: String,
    search: String,
}

impl MemoryHistory {
    /// Start with a single entry, e.g. `"/emissions?tab=scopes"`.
    pub fn new(url: &str) -> Self {
        let (pathname, search) = split_url(url);
        Self {
            entries: vec![url.to_string()],
            pathname,
            search,
        }
    }

    /// Append a new entry, as a link click would.
    pub fn push(&mut self, url: &str) {
        self.entries.push(url.to_string());
        self.set_current(url);
    }

    pub fn url(&self) -> &str {
        self.entries.last().map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn set_current(&mut self, url: &str) {
        let (pathname, search) = split_url(url);
        self.pathname = pathname;
        self.search = search;
    }
}

fn split_url(url: &str) -> (String, String) {
    match url.find('?') {
        Some(idx) => (url[..idx].to_string(), url[idx..].to_string()),
        None => (url.to_string(), String::new()),
    }
}

impl Location for MemoryHistory {
    fn pathname(&self) -> &str {
        &self.pathname
    }

    fn search(&self) -> &str {
        &self.search
    }
}

impl BrowsingContext for MemoryHistory {
    fn replace_state(&mut self, url: &str) {
        match self.entries.last_mut() {
            Some(last) => *last = url.to_string(),
            None => self.entries.push(url.to_string()),
        }
        self.set_current(url);
    }
}
