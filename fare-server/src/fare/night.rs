//! Evening surcharge.

use chrono::{NaiveTime, Timelike};

/// A fixed multiplier applied to fares during an evening window.
///
/// Both ends of the window are inclusive, to the minute. A window whose end
/// is earlier than its start wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NightFarePolicy {
    /// First minute the surcharge applies
    pub start: NaiveTime,
    /// Last minute the surcharge applies
    pub end: NaiveTime,
    /// Factor applied to every price while active
    pub multiplier: f64,
}

impl Default for NightFarePolicy {
    /// 18:30 to 22:30, fares × 1.4.
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(18, 30, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(22, 30, 0).unwrap_or_default(),
            multiplier: 1.4,
        }
    }
}

fn minute_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

impl NightFarePolicy {
    /// Whether the surcharge applies at local time `now`.
    pub fn is_active(&self, now: NaiveTime) -> bool {
        let now = minute_of_day(now);
        let start = minute_of_day(self.start);
        let end = minute_of_day(self.end);

        if start <= end {
            (start..=end).contains(&now)
        } else {
            now >= start || now <= end
        }
    }

    /// Apply the multiplier to a price.
    pub fn surcharge(&self, price: f64) -> f64 {
        price * self.multiplier
    }
}
