//! Distance-based fare estimation.

/// Fare brackets as `(upper bound in km, fare)`, ascending.
///
/// A distance takes the fare of the first bracket whose bound it does not
/// exceed.
pub const FARE_BRACKETS: [(f64, f64); 12] = [
    (2.5, 10.0),
    (5.0, 15.0),
    (7.5, 20.0),
    (10.0, 25.0),
    (12.5, 30.0),
    (15.0, 35.0),
    (17.5, 40.0),
    (20.0, 45.0),
    (22.5, 50.0),
    (25.0, 55.0),
    (27.5, 60.0),
    (30.0, 65.0),
];

/// Rate per kilometre beyond the last bracket.
pub const PER_KM_RATE: f64 = 2.17;

/// Estimate the fare for a trip of `distance_km` kilometres.
///
/// Total: negative (or NaN) distances cost nothing, and beyond the last
/// bracket the fare is `distance × PER_KM_RATE` truncated toward zero.
///
/// # Examples
///
/// ```
/// use fare_server::fare::estimate_fare;
///
/// assert_eq!(estimate_fare(-1.0), 0.0);
/// assert_eq!(estimate_fare(2.5), 10.0);
/// assert_eq!(estimate_fare(2.6), 15.0);
/// assert_eq!(estimate_fare(31.0), 67.0);
/// ```
pub fn estimate_fare(distance_km: f64) -> f64 {
    if distance_km.is_nan() || distance_km < 0.0 {
        return 0.0;
    }

    FARE_BRACKETS
        .iter()
        .find(|(bound, _)| distance_km <= *bound)
        .map(|&(_, fare)| fare)
        .unwrap_or_else(|| (distance_km * PER_KM_RATE).trunc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_distance_is_free() {
        assert_eq!(estimate_fare(-0.1), 0.0);
        assert_eq!(estimate_fare(-100.0), 0.0);
        assert_eq!(estimate_fare(f64::NAN), 0.0);
    }

    #[test]
    fn zero_distance_takes_first_bracket() {
        assert_eq!(estimate_fare(0.0), 10.0);
    }

    #[test]
    fn bracket_bounds_are_inclusive() {
        for (bound, fare) in FARE_BRACKETS {
            assert_eq!(estimate_fare(bound), fare, "at {bound} km");
        }
    }

    #[test]
    fn just_past_a_bound_moves_up() {
        assert_eq!(estimate_fare(5.01), 20.0);
        assert_eq!(estimate_fare(29.99), 65.0);
    }

    #[test]
    fn long_trips_use_per_km_rate() {
        assert_eq!(estimate_fare(31.0), 67.0);
        assert_eq!(estimate_fare(30.5), 66.0);
        assert_eq!(estimate_fare(100.0), 217.0);
    }
}
