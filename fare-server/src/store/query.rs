//! Route lookup filters.

use crate::domain::{Route, StationName};

/// A filter over route records by endpoint names.
///
/// Matching is by plain string equality against the stored `from` and `to`.
/// The constructors expand a station pair into both travel orders, each with
/// and without the station suffix, so records written under either spelling
/// are found.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    pairs: Vec<(String, String)>,
    direct_only: bool,
}

impl RouteQuery {
    /// Any route joining `a` and `b`.
    pub fn between(a: &StationName, b: &StationName) -> Self {
        Self {
            pairs: name_variants(a, b),
            direct_only: false,
        }
    }

    /// A direct route joining `a` and `b`.
    pub fn direct_between(a: &StationName, b: &StationName) -> Self {
        Self {
            pairs: name_variants(a, b),
            direct_only: true,
        }
    }

    /// The `(from, to)` spellings this query accepts.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn matches(&self, route: &Route) -> bool {
        if self.direct_only && !route.is_direct_route {
            return false;
        }
        self.pairs
            .iter()
            .any(|(from, to)| route.from.as_str() == from && route.to.as_str() == to)
    }
}

fn name_variants(a: &StationName, b: &StationName) -> Vec<(String, String)> {
    let (a_full, b_full) = (a.as_str(), b.as_str());
    let (a_base, b_base) = (a.base(), b.base());
    vec![
        (a_full.to_string(), b_full.to_string()),
        (b_full.to_string(), a_full.to_string()),
        (a_base.to_string(), b_base.to_string()),
        (b_base.to_string(), a_base.to_string()),
    ]
}
