//! Upstream sports-data providers.
//!
//! [`SportsProvider`] is the trait every adapter implements; [`espn`] is
//! the one bundled implementation. [`http`] holds the pooled, retrying
//! transport shared by every adapter.

pub mod espn;
pub mod http;

use async_trait::async_trait;

use crate::errors::ProviderResult;
use crate::models::Event;

/// A league code mapped to the (sport, league) pair a provider actually
/// queries with, plus an optional scoreboard `groups` parameter for
/// providers that need one to disambiguate college conferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueRoute {
    pub sport: String,
    pub league: String,
    pub scoreboard_group: Option<String>,
}

impl LeagueRoute {
    pub fn new(sport: &str, league: &str) -> Self {
        Self {
            sport: sport.to_string(),
            league: league.to_string(),
            scoreboard_group: None,
        }
    }

    pub fn with_group(sport: &str, league: &str, group: &str) -> Self {
        Self {
            sport: sport.to_string(),
            league: league.to_string(),
            scoreboard_group: Some(group.to_string()),
        }
    }
}

/// A source of sports events and team schedules. Adapters register
/// themselves with [`crate::services::sports_data::SportsDataService`]
/// in a fixed, ordered list; the first provider whose
/// [`SportsProvider::supports_league`] returns `true` for a given league
/// handles every lookup for that league.
#[async_trait]
pub trait SportsProvider: Send + Sync {
    /// A short, stable identifier used in logs and cache records.
    fn name(&self) -> &'static str;

    /// Whether this provider has data for the given league code.
    fn supports_league(&self, league: &str) -> bool;

    /// All events on a league's scoreboard for the current window.
    async fn get_events(&self, league: &str) -> ProviderResult<Vec<Event>>;

    /// A single team's full schedule for the season.
    async fn get_team_schedule(&self, league: &str, team_id: &str) -> ProviderResult<Vec<Event>>;

    /// A single event by its provider-native id.
    async fn get_event(&self, league: &str, event_id: &str) -> ProviderResult<Option<Event>>;
}
