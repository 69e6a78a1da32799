//! Canonical domain value types shared by providers, matching, templating,
//! and EPG generation. Distinct from `entities`, which are the persisted
//! row shapes — these are immutable values produced by a fetch or a match.

mod event;
pub mod records;
mod template;

pub use event::{Broadcast, Event, EventStatus, EventStatusState, Odds, Team, Venue};
pub use template::{DescriptionOption, FillerConfig, PostgamePeriod, PregamePeriod};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single entry in a generated (not yet merged) XMLTV fragment.
///
/// `start` is inclusive, `stop` is exclusive; consecutive programmes on the
/// same channel must be contiguous and non-overlapping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Programme {
    pub channel_id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub description: Option<String>,
    pub category: String,
    pub icon: Option<String>,
}

impl Programme {
    pub fn sports_category() -> &'static str {
        "Sports"
    }
}
