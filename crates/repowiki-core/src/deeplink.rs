//! Deep-link query strings.
//!
//! The current view is reflected into a `?page=…` / `?search=…` query
//! string and parsed back on startup, so a view can be restored from a
//! shared link.

use url::form_urlencoded;

/// A navigable view of the wiki.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// The landing view.
    Home,
    /// A single page, by logical path.
    Page(String),
    /// A search result view, by query text.
    Search(String),
}

impl ViewState {
    /// Encodes this view as a query string, leading `?` included.
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Home => "?".to_string(),
            Self::Page(logical_path) => {
                let encoded = form_urlencoded::Serializer::new(String::new())
                    .append_pair("page", logical_path)
                    .finish();
                format!("?{encoded}")
            }
            Self::Search(query) => {
                let encoded = form_urlencoded::Serializer::new(String::new())
                    .append_pair("search", query)
                    .finish();
                format!("?{encoded}")
            }
        }
    }

    /// Parses a query string (with or without the leading `?`). A `search`
    /// parameter takes precedence over `page`; anything else is the home
    /// view.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let trimmed = query.trim_start_matches('?');

        let mut page = None;
        let mut search = None;
        for (key, value) in form_urlencoded::parse(trimmed.as_bytes()) {
            match key.as_ref() {
                "page" if !value.is_empty() => page = Some(value.into_owned()),
                "search" if !value.is_empty() => search = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(query) = search {
            Self::Search(query)
        } else if let Some(logical_path) = page {
            Self::Page(logical_path)
        } else {
            Self::Home
        }
    }
}
