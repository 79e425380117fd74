//! Journey types.
//!
//! A `Journey` is computed per request and never stored. Its legs are
//! contiguous: each leg starts where the previous one ended.

use serde::Serialize;

use super::station::{Station, StationName};

/// One priced hop between two consecutive stations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub from: StationName,
    pub to: StationName,
    pub price: f64,
}

impl Leg {
    pub fn new(from: StationName, to: StationName, price: f64) -> Self {
        Self { from, to, price }
    }
}

/// A resolved trip between two stations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Journey {
    /// Stations visited, origin first
    pub stations: Vec<Station>,
    /// Price charged for the whole trip
    pub total_price: f64,
    /// Per-hop breakdown
    pub legs: Vec<Leg>,
}

impl Journey {
    /// A trip that starts and ends at the same station. Free, with no legs.
    pub fn single_stop(station: Station) -> Self {
        Self {
            stations: vec![station],
            total_price: 0.0,
            legs: Vec::new(),
        }
    }

    /// A trip made of one leg between two stations.
    pub fn direct(from: Station, to: Station, price: f64) -> Self {
        let leg = Leg::new(from.name.clone(), to.name.clone(), price);
        Self {
            stations: vec![from, to],
            total_price: price,
            legs: vec![leg],
        }
    }

    /// Sum of the leg prices.
    ///
    /// Equal to `total_price` up to rounding for well-formed data.
    pub fn leg_total(&self) -> f64 {
        self.legs.iter().map(|leg| leg.price).sum()
    }
}
