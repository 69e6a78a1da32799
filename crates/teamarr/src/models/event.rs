use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Provider-scoped team identity and display attributes.
///
/// Owned by the provider adapter that produced it; immutable within the
/// fetch that created it. Two `Team` values for the same real-world team
/// fetched in different runs are distinct values, not updated in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Team {
    pub id: String,
    pub provider: String,
    pub name: String,
    pub short_name: String,
    pub abbreviation: String,
    pub location: String,
    pub league: String,
    pub logo: Option<String>,
    pub color: Option<String>,
    pub score: Option<i32>,
    pub streak: Option<String>,
    pub record: Option<String>,
    pub rank: Option<i32>,
}

impl Team {
    /// Full name, short name, abbreviation, and location — the set used to
    /// build fuzzy-match candidate patterns for this team.
    pub fn pattern_sources(&self) -> Vec<&str> {
        let mut sources = vec![
            self.name.as_str(),
            self.short_name.as_str(),
            self.abbreviation.as_str(),
            self.location.as_str(),
        ];
        sources.dedup();
        sources
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventStatusState {
    Scheduled,
    Live,
    Final,
    Postponed,
    Cancelled,
}

/// Part of the "dynamic fields" set refreshed on a stream-match cache hit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventStatus {
    pub state: EventStatusState,
    pub detail: String,
    pub period: Option<i32>,
    pub clock: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Venue {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub indoor: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Broadcast {
    pub network: String,
    pub market: Option<String>,
}

/// Spread/moneyline/over-under, part of the dynamic fields set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Odds {
    pub spread: Option<f64>,
    pub over_under: Option<f64>,
    pub home_moneyline: Option<i32>,
    pub away_moneyline: Option<i32>,
    pub details: Option<String>,
}

/// Canonical event shape every provider adapter normalizes into.
///
/// A new fetch always yields a new `Event` value; nothing here is mutated
/// in place. Cache refresh on a hit works by merging only the dynamic
/// fields of a freshly fetched `Event` into the previously cached one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: String,
    pub provider: String,
    pub league: String,
    pub season: Option<String>,
    pub name: String,
    pub short_name: String,
    pub start_time: DateTime<Utc>,
    pub status: EventStatus,
    pub home_team: Team,
    pub away_team: Team,
    pub venue: Option<Venue>,
    pub broadcasts: Vec<Broadcast>,
    pub odds: Option<Odds>,
    pub has_odds: bool,
    pub competitions: Option<serde_json::Value>,
}

impl Event {
    /// Full + short event name, used as fallback fuzzy-match candidates
    /// when a stream cannot be decomposed into a home/away matchup.
    pub fn event_patterns(&self) -> Vec<&str> {
        let mut patterns = vec![self.name.as_str(), self.short_name.as_str()];
        patterns.dedup();
        patterns
    }

    /// Copies the dynamic-field set from `fresh` onto `self`, per the
    /// stream-match cache refresh contract. Everything else (teams, venue,
    /// broadcasts, logos) is left untouched.
    pub fn merge_dynamic_fields(&mut self, fresh: &Event) {
        self.status = fresh.status.clone();
        self.home_team.score = fresh.home_team.score;
        self.away_team.score = fresh.away_team.score;
        self.home_team.streak = fresh.home_team.streak.clone();
        self.away_team.streak = fresh.away_team.streak.clone();
        self.odds = fresh.odds.clone();
        self.has_odds = fresh.has_odds;
        self.competitions = fresh.competitions.clone();
    }
}
