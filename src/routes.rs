// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

/// A route the application declares, e.g. `/group/:groupId`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RouteRecord {
    pub(crate) name: &'static str,
    pub(crate) pattern: &'static str,
}

impl RouteRecord {
    /// Match `path` against this route, capturing `:param` segments.
    fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let mut wanted = self.pattern.split('/');
        let mut actual = path.split('/');
        let mut params = BTreeMap::new();
        loop {
            match (wanted.next(), actual.next()) {
                (None, None) => return Some(params),
                (Some(w), Some(a)) => match w.strip_prefix(':') {
                    Some(param) if !a.is_empty() => {
                        let _previous = params.insert(param.to_owned(), a.to_owned());
                    }
                    Some(_) => return None,
                    None if w == a => {}
                    None => return None,
                },
                (Some(_), None) | (None, Some(_)) => return None,
            }
        }
    }
}

pub(crate) const EXPENSE_ROUTES: &[RouteRecord] = &[
    RouteRecord {
        name: "home",
        pattern: "/",
    },
    RouteRecord {
        name: "login",
        pattern: "/login",
    },
    RouteRecord {
        name: "register",
        pattern: "/register",
    },
    RouteRecord {
        name: "profile",
        pattern: "/profile",
    },
    RouteRecord {
        name: "group",
        pattern: "/group/:groupId",
    },
];

/// Where a navigation is headed, or where it currently is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RouteLocation {
    pub(crate) path: String,
    pub(crate) name: Option<&'static str>,
    pub(crate) params: BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
pub(crate) struct RouteTable {
    routes: Vec<RouteRecord>,
}

impl RouteTable {
    pub(crate) fn new(routes: &[RouteRecord]) -> Self {
        Self {
            routes: routes.to_vec(),
        }
    }

    pub(crate) fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    /// Resolve `path` to a location. The query string and fragment are
    /// dropped; a path no route declares still resolves, just without a name.
    pub(crate) fn resolve(&self, path: &str) -> RouteLocation {
        let path = path
            .split(|c: char| c == '?' || c == '#')
            .next()
            .filter(|p| !p.is_empty())
            .unwrap_or("/");

        self.routes
            .iter()
            .find_map(|route| {
                route.matches(path).map(|params| RouteLocation {
                    path: path.to_owned(),
                    name: Some(route.name),
                    params,
                })
            })
            .unwrap_or_else(|| RouteLocation {
                path: path.to_owned(),
                name: None,
                params: BTreeMap::new(),
            })
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(EXPENSE_ROUTES)
    }
}
