use serde::{Deserialize, Serialize};

/// One window of filler programming placed before a game's start time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PregamePeriod {
    pub start_hours_before: f64,
    pub end_hours_before: f64,
    pub title: String,
    pub description: Option<String>,
}

/// Mirror of `PregamePeriod`, anchored after the game's computed stop time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PostgamePeriod {
    pub start_hours_after: f64,
    pub end_hours_after: f64,
    pub title: String,
    pub description: Option<String>,
}

/// Filler windows a team generator threads between scheduled games so that
/// the channel's programme list stays contiguous and non-overlapping.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FillerConfig {
    pub pregame_periods: Vec<PregamePeriod>,
    pub postgame_periods: Vec<PostgamePeriod>,
    pub idle_title: String,
    pub idle_description: Option<String>,
    pub no_game_title: String,
    pub no_game_description: Option<String>,
}

/// One entry in a template's ordered conditional-description list.
///
/// `priority` 1-99 are conditional, evaluated ascending; 100 is an
/// unconditional fallback, the last of which wins among fallbacks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DescriptionOption {
    pub priority: u8,
    pub condition: Option<String>,
    pub body: String,
}

impl DescriptionOption {
    pub fn is_fallback(&self) -> bool {
        self.priority >= 100
    }
}
