//! Application state for the web layer.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveTime, Utc};

use crate::contribution::{CloudinaryClient, ContributionDesk, ResendClient};
use crate::directions::OsrmClient;
use crate::fare::NightFarePolicy;
use crate::store::{DocumentStore, TimedStore};

/// Store as seen by handlers: every call has a deadline.
pub type Store = TimedStore<DocumentStore>;

/// Contribution handling with the production integrations.
pub type Contributions = ContributionDesk<CloudinaryClient, ResendClient>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,

    /// Driving directions for map responses
    pub directions: Arc<OsrmClient>,

    pub contributions: Arc<Contributions>,

    pub night_policy: NightFarePolicy,

    /// Offset of the local clock the night policy is read against
    pub fare_offset: FixedOffset,
}

impl AppState {
    pub fn new(
        store: Store,
        directions: OsrmClient,
        contributions: Contributions,
        night_policy: NightFarePolicy,
        fare_offset: FixedOffset,
    ) -> Self {
        Self {
            store: Arc::new(store),
            directions: Arc::new(directions),
            contributions: Arc::new(contributions),
            night_policy,
            fare_offset,
        }
    }

    /// Current wall-clock time in the fare timezone.
    pub fn local_time(&self) -> NaiveTime {
        Utc::now().with_timezone(&self.fare_offset).time()
    }
}
