//! Panel navigation.
//!
//! The navigation always starts with the dashboard, followed by one entry
//! per resource that has a default action. Entries are stored in build
//! order; [`Navigation::sorted`] gives the display order.

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::resource::ResourceRegistry;
use crate::text;
use crate::url::{UrlGenerator, names};

/// Identifier of the dashboard entry.
pub const DASHBOARD_IDENTIFIER: &str = "atrium::dashboard";

/// Icon of the dashboard entry.
pub const DASHBOARD_ICON: &str = "heroicon-o-home";

/// How an entry decides it is the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ActiveMatcher {
    /// Active when the current route has this name.
    Route(String),
    /// Active when the request path (without its leading slash) matches
    /// this pattern; `*` matches any run of characters.
    Path(String),
}

impl ActiveMatcher {
    pub fn matches(&self, route_name: Option<&str>, path: &str) -> bool {
        match self {
            ActiveMatcher::Route(name) => route_name == Some(name.as_str()),
            ActiveMatcher::Path(pattern) => wildcard_match(pattern, path.trim_start_matches('/')),
        }
    }
}

fn wildcard_match(pattern: &str, value: &str) -> bool {
    if pattern == value {
        return true;
    }

    let escaped = regex::escape(pattern).replace(r"\*", ".*");
    Regex::new(&format!("^{escaped}$"))
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationItem {
    pub identifier: String,
    pub active: ActiveMatcher,
    pub icon: String,
    pub label: String,
    pub sort: i32,
    pub url: String,
}

impl NavigationItem {
    pub fn is_active(&self, route_name: Option<&str>, path: &str) -> bool {
        self.active.matches(route_name, path)
    }
}

/// Navigation entries of one panel request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Navigation {
    items: Vec<NavigationItem>,
}

impl Navigation {
    /// Build the navigation from the resource registry.
    pub fn build(resources: &ResourceRegistry, urls: &UrlGenerator, dashboard_label: &str) -> Self {
        let mut items = vec![NavigationItem {
            identifier: DASHBOARD_IDENTIFIER.to_string(),
            active: ActiveMatcher::Route(names::DASHBOARD.to_string()),
            icon: DASHBOARD_ICON.to_string(),
            label: dashboard_label.to_string(),
            sort: 0,
            url: urls.dashboard(),
        }];

        for (slug, entry) in resources.iter() {
            let resource = entry.resource();
            if !resource.has_default_action() {
                debug!(slug = %slug, "resource has no default action, skipping navigation");
                continue;
            }

            let url = urls.resource(slug);
            items.push(NavigationItem {
                identifier: entry.identifier().to_string(),
                active: ActiveMatcher::Path(active_pattern(&url)),
                icon: resource.icon().to_string(),
                label: text::title(&text::plural(resource.label())),
                sort: resource.sort(),
                url,
            });
        }

        Self { items }
    }

    /// Entries in build order.
    pub fn items(&self) -> &[NavigationItem] {
        &self.items
    }

    /// Entries ordered by sort weight, then label.
    pub fn sorted(&self) -> Vec<&NavigationItem> {
        let mut items: Vec<_> = self.items.iter().collect();
        items.sort_by(|a, b| a.sort.cmp(&b.sort).then_with(|| a.label.cmp(&b.label)));
        items
    }

    pub fn get(&self, identifier: &str) -> Option<&NavigationItem> {
        self.items.iter().find(|i| i.identifier == identifier)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Path of `url` after its leading slash, followed by `*`.
fn active_pattern(url: &str) -> String {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    format!("{}*", path.strip_prefix('/').unwrap_or(&path))
}
