//! Client-side navigation table.
//!
//! Each entry pairs a path pattern with a view and a pure function that
//! derives the view's props from the matched location. The matcher here is
//! deliberately small: literal segments, `:name` captures, and a query string.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    PlantDetails,
    ResultViewer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewProps {
    None,
    PlantDetails {
        plant_name: String,
    },
    ResultViewer {
        kind: Option<String>,
        plant: Option<String>,
    },
}

/// Path captures and query parameters of a matched location.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteMatch {
    pub params: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

pub type PropsFn = fn(&RouteMatch) -> ViewProps;

#[derive(Debug, Clone, Copy)]
pub struct RouteEntry {
    pub pattern: &'static str,
    pub name: &'static str,
    pub view: View,
    pub props: PropsFn,
}

pub static ROUTES: &[RouteEntry] = &[
    RouteEntry {
        pattern: "/",
        name: "HomePage",
        view: View::Home,
        props: home_props,
    },
    RouteEntry {
        pattern: "/plant-details/:plantName",
        name: "PlantDetails",
        view: View::PlantDetails,
        props: plant_details_props,
    },
    RouteEntry {
        pattern: "/analyze",
        name: "ResultViewer",
        view: View::ResultViewer,
        props: result_viewer_props,
    },
];

pub fn home_props(_: &RouteMatch) -> ViewProps {
    ViewProps::None
}

pub fn plant_details_props(matched: &RouteMatch) -> ViewProps {
    ViewProps::PlantDetails {
        plant_name: matched.param("plantName").unwrap_or_default().to_string(),
    }
}

pub fn result_viewer_props(matched: &RouteMatch) -> ViewProps {
    ViewProps::ResultViewer {
        kind: matched.query("type").map(ToOwned::to_owned),
        plant: matched.query("plant").map(ToOwned::to_owned),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub name: &'static str,
    pub view: View,
    pub props: ViewProps,
}

/// Resolves `location` (path plus optional `?query`) against [`ROUTES`].
///
/// A `#fragment` is dropped before the query is split off. Path captures
/// are percent-decoded; query values are form-decoded.
///
/// Props are derived fresh on every call.
pub fn resolve(location: &str) -> Option<ResolvedRoute> {
    resolve_in(ROUTES, location)
}

pub fn resolve_in(table: &[RouteEntry], location: &str) -> Option<ResolvedRoute> {
    let location = location.split_once('#').map_or(location, |(before, _)| before);
    let (path, query) = location.split_once('?').unwrap_or((location, ""));

    table.iter().find_map(|entry| {
        let params = match_pattern(entry.pattern, path)?;
        let matched = RouteMatch {
            params,
            query: parse_query(query),
        };
        Some(ResolvedRoute {
            name: entry.name,
            view: entry.view,
            props: (entry.props)(&matched),
        })
    })
}

fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let wanted = segments(pattern);
    let actual = segments(path);
    if wanted.len() != actual.len() {
        return None;
    }

    let mut params = BTreeMap::new();
    for (want, got) in wanted.iter().zip(actual.iter()) {
        if let Some(name) = want.strip_prefix(':') {
            params.insert(name.to_string(), decode_segment(got));
        } else if want != got {
            return None;
        }
    }
    Some(params)
}

// Invalid UTF-8 after decoding keeps the segment as written.
fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment)
        .decode_utf8()
        .map_or_else(|_| segment.to_string(), |decoded| decoded.into_owned())
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

// First occurrence wins for repeated keys.
fn parse_query(query: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        out.entry(key.into_owned()).or_insert_with(|| value.into_owned());
    }
    out
}
