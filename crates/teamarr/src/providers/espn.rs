//! The bundled ESPN provider, talking to ESPN's public scoreboard,
//! team-schedule, and summary JSON endpoints.
//!
//! League-to-(sport,league) routing and the college scoreboard `groups`
//! parameter are fixed constants baked into this adapter, not
//! configuration — ESPN's own URL scheme ties them together and a new
//! league can't be added without adapter code regardless.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use super::{LeagueRoute, SportsProvider};
use crate::errors::ProviderResult;
use crate::models::{Broadcast, Event, EventStatus, EventStatusState, Odds, Team, Venue};
use crate::providers::http::ProviderHttpClient;

const BASE_URL: &str = "https://site.api.espn.com/apis/site/v2/sports";

/// Maps a league code to the (sport, league, scoreboard group) ESPN
/// actually routes on.
pub fn route_for_league(league: &str) -> LeagueRoute {
    match league {
        "nfl" => LeagueRoute::new("football", "nfl"),
        "nba" => LeagueRoute::new("basketball", "nba"),
        "mlb" => LeagueRoute::new("baseball", "mlb"),
        "nhl" => LeagueRoute::new("hockey", "nhl"),
        "wnba" => LeagueRoute::new("basketball", "wnba"),
        "mls" => LeagueRoute::new("soccer", "usa.1"),
        "mens-college-basketball" | "womens-college-basketball" => {
            LeagueRoute::with_group("basketball", league, "50")
        }
        "college-football" => LeagueRoute::with_group("football", "college-football", "80"),
        "mens-college-hockey" | "womens-college-hockey" => LeagueRoute::new("hockey", league),
        other if other.contains('.') => LeagueRoute::new("soccer", other),
        other => LeagueRoute::new("football", other),
    }
}

fn map_status_state(name: &str) -> EventStatusState {
    match name {
        "STATUS_SCHEDULED" => EventStatusState::Scheduled,
        "STATUS_IN_PROGRESS" | "STATUS_HALFTIME" | "STATUS_END_PERIOD" => EventStatusState::Live,
        "STATUS_FINAL" | "STATUS_FINAL_OT" => EventStatusState::Final,
        "STATUS_POSTPONED" => EventStatusState::Postponed,
        "STATUS_CANCELED" => EventStatusState::Cancelled,
        "STATUS_DELAYED" => EventStatusState::Scheduled,
        other => {
            warn!("unrecognized ESPN status '{}', defaulting to scheduled", other);
            EventStatusState::Scheduled
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScoreboardResponse {
    #[serde(default)]
    events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct TeamScheduleResponse {
    #[serde(default)]
    events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct EventSummaryResponse {
    #[serde(default)]
    header: Option<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    id: String,
    name: String,
    #[serde(rename = "shortName", default)]
    short_name: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    season: Option<RawSeason>,
    #[serde(default)]
    competitions: Vec<RawCompetition>,
}

#[derive(Debug, Deserialize)]
struct RawSeason {
    #[serde(default)]
    year: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawCompetition {
    #[serde(default)]
    competitors: Vec<RawCompetitor>,
    #[serde(default)]
    status: Option<RawStatus>,
    #[serde(default)]
    venue: Option<RawVenue>,
    #[serde(default)]
    broadcasts: Vec<RawBroadcast>,
    #[serde(default)]
    odds: Vec<RawOdds>,
}

#[derive(Debug, Deserialize)]
struct RawCompetitor {
    #[serde(rename = "homeAway", default)]
    home_away: String,
    team: RawTeam,
    #[serde(default)]
    score: Option<serde_json::Value>,
    #[serde(default)]
    records: Vec<RawRecord>,
    #[serde(rename = "curatedRank", default)]
    curated_rank: Option<RawRank>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRank {
    #[serde(default)]
    current: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    id: String,
    #[serde(rename = "displayName", default)]
    display_name: String,
    #[serde(rename = "shortDisplayName", default)]
    short_display_name: String,
    #[serde(default)]
    abbreviation: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    logo: Option<String>,
    #[serde(default)]
    logos: Vec<RawLogo>,
}

#[derive(Debug, Deserialize)]
struct RawLogo {
    href: String,
    #[serde(default)]
    rel: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    #[serde(rename = "type", default)]
    status_type: Option<RawStatusType>,
    #[serde(default)]
    period: Option<i32>,
    #[serde(rename = "displayClock", default)]
    display_clock: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStatusType {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawVenue {
    #[serde(rename = "fullName", default)]
    full_name: String,
    #[serde(default)]
    address: Option<RawVenueAddress>,
    #[serde(default)]
    indoor: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawVenueAddress {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBroadcast {
    #[serde(default)]
    market: Option<String>,
    #[serde(default)]
    names: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawOdds {
    #[serde(default)]
    details: Option<String>,
    #[serde(rename = "overUnder", default)]
    over_under: Option<f64>,
    #[serde(default)]
    spread: Option<f64>,
    #[serde(rename = "homeTeamOdds", default)]
    home_team_odds: Option<RawTeamOdds>,
    #[serde(rename = "awayTeamOdds", default)]
    away_team_odds: Option<RawTeamOdds>,
}

#[derive(Debug, Deserialize)]
struct RawTeamOdds {
    #[serde(rename = "moneyLine", default)]
    money_line: Option<i32>,
}

/// Parses an absent/bare-int/bare-string/object score, matching the
/// original's `int(float(score))` coercion so `"3.0"` parses to `3`.
fn parse_score(value: &Option<serde_json::Value>) -> Option<i32> {
    let value = value.as_ref()?;
    match value {
        serde_json::Value::Number(n) => n.as_f64().map(|f| f as i32),
        serde_json::Value::String(s) => s.parse::<f64>().ok().map(|f| f as i32),
        serde_json::Value::Object(map) => map
            .get("displayValue")
            .or_else(|| map.get("value"))
            .and_then(|inner| match inner {
                serde_json::Value::Number(n) => n.as_f64(),
                serde_json::Value::String(s) => s.parse::<f64>().ok(),
                _ => None,
            })
            .map(|f| f as i32),
        _ => None,
    }
}

/// Prefers a direct `logo` field, then a `logos[]` entry tagged
/// `"default"`, then the first logo present, else `None`.
fn extract_logo(logo: &Option<String>, logos: &[RawLogo]) -> Option<String> {
    if let Some(direct) = logo {
        return Some(direct.clone());
    }
    logos
        .iter()
        .find(|l| l.rel.iter().any(|r| r == "default"))
        .or_else(|| logos.first())
        .map(|l| l.href.clone())
}

fn build_team(raw: &RawCompetitor, provider: &str, league: &str) -> Team {
    let score = parse_score(&raw.score);
    let record = raw.records.first().and_then(|r| r.summary.clone());
    let rank = raw.curated_rank.as_ref().and_then(|r| r.current);
    Team {
        id: raw.team.id.clone(),
        provider: provider.to_string(),
        name: raw.team.display_name.clone(),
        short_name: raw.team.short_display_name.clone(),
        abbreviation: raw.team.abbreviation.clone(),
        location: raw.team.location.clone(),
        league: league.to_string(),
        logo: extract_logo(&raw.team.logo, &raw.team.logos),
        color: raw.team.color.clone(),
        score,
        streak: None,
        record,
        rank,
    }
}

fn parse_event(raw: RawEvent, provider: &str, league: &str) -> Option<Event> {
    let competition = raw.competitions.into_iter().next()?;

    let start_time = raw
        .date
        .as_deref()
        .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|d| d.with_timezone(&Utc));
    let Some(start_time) = start_time else {
        warn!("ESPN event {} has an unparsable date, skipping", raw.id);
        return None;
    };

    let home_raw = competition
        .competitors
        .iter()
        .find(|c| c.home_away == "home");
    let away_raw = competition
        .competitors
        .iter()
        .find(|c| c.home_away == "away");
    let (Some(home_raw), Some(away_raw)) = (home_raw, away_raw) else {
        warn!(
            "ESPN event {} is missing a home or away competitor, skipping",
            raw.id
        );
        return None;
    };

    let home_team = build_team(home_raw, provider, league);
    let away_team = build_team(away_raw, provider, league);

    let status_type = competition.status.as_ref().and_then(|s| s.status_type.as_ref());
    let status = EventStatus {
        state: status_type
            .and_then(|t| t.name.as_deref())
            .map(map_status_state)
            .unwrap_or(EventStatusState::Scheduled),
        detail: status_type
            .and_then(|t| t.detail.clone())
            .unwrap_or_default(),
        period: competition.status.as_ref().and_then(|s| s.period),
        clock: competition
            .status
            .as_ref()
            .and_then(|s| s.display_clock.clone()),
    };

    let venue = competition.venue.as_ref().map(|v| Venue {
        name: v.full_name.clone(),
        city: v.address.as_ref().and_then(|a| a.city.clone()),
        state: v.address.as_ref().and_then(|a| a.state.clone()),
        indoor: v.indoor,
    });

    let broadcasts = competition
        .broadcasts
        .iter()
        .flat_map(|b| {
            b.names.iter().map(|name| Broadcast {
                network: name.clone(),
                market: b.market.clone(),
            })
        })
        .collect();

    let odds = competition.odds.first().map(|o| Odds {
        spread: o.spread,
        over_under: o.over_under,
        home_moneyline: o.home_team_odds.as_ref().and_then(|t| t.money_line),
        away_moneyline: o.away_team_odds.as_ref().and_then(|t| t.money_line),
        details: o.details.clone(),
    });
    let has_odds = odds.is_some();

    Some(Event {
        id: raw.id,
        provider: provider.to_string(),
        league: league.to_string(),
        season: raw
            .season
            .and_then(|s| s.year)
            .map(|y| y.to_string()),
        name: raw.name,
        short_name: raw.short_name,
        start_time,
        status,
        home_team,
        away_team,
        venue,
        broadcasts,
        odds,
        has_odds,
        competitions: None,
    })
}

pub struct EspnProvider {
    http: ProviderHttpClient,
}

impl EspnProvider {
    pub fn new(http: ProviderHttpClient) -> Self {
        Self { http }
    }

    fn scoreboard_url(&self, route: &LeagueRoute) -> String {
        let mut url = format!(
            "{}/{}/{}/scoreboard",
            BASE_URL, route.sport, route.league
        );
        if let Some(group) = &route.scoreboard_group {
            url.push_str(&format!("?groups={group}"));
        }
        url
    }
}

#[async_trait]
impl SportsProvider for EspnProvider {
    fn name(&self) -> &'static str {
        "espn"
    }

    fn supports_league(&self, _league: &str) -> bool {
        // ESPN is the catch-all bundled provider: every league code routes
        // to some (sport, league) pair via `route_for_league`.
        true
    }

    async fn get_events(&self, league: &str) -> ProviderResult<Vec<Event>> {
        let route = route_for_league(league);
        let url = self.scoreboard_url(&route);
        let response: ScoreboardResponse = self.http.get_json(&url).await?;

        Ok(response
            .events
            .into_iter()
            .filter_map(|raw| {
                let id = raw.id.clone();
                parse_event(raw, self.name(), league).or_else(|| {
                    warn!("skipping unparsable ESPN event {}", id);
                    None
                })
            })
            .collect())
    }

    async fn get_team_schedule(&self, league: &str, team_id: &str) -> ProviderResult<Vec<Event>> {
        let route = route_for_league(league);
        let url = format!(
            "{}/{}/{}/teams/{}/schedule",
            BASE_URL, route.sport, route.league, team_id
        );
        let response: TeamScheduleResponse = self.http.get_json(&url).await?;

        Ok(response
            .events
            .into_iter()
            .filter_map(|raw| parse_event(raw, self.name(), league))
            .collect())
    }

    async fn get_event(&self, league: &str, event_id: &str) -> ProviderResult<Option<Event>> {
        let route = route_for_league(league);
        let url = format!(
            "{}/{}/{}/summary?event={}",
            BASE_URL, route.sport, route.league, event_id
        );
        let response: EventSummaryResponse = self.http.get_json(&url).await?;
        Ok(response.header.and_then(|raw| parse_event(raw, self.name(), league)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_known_leagues() {
        assert_eq!(route_for_league("nfl"), LeagueRoute::new("football", "nfl"));
        assert_eq!(route_for_league("mls"), LeagueRoute::new("soccer", "usa.1"));
        assert_eq!(
            route_for_league("college-football"),
            LeagueRoute::with_group("football", "college-football", "80")
        );
        assert_eq!(
            route_for_league("esp.1"),
            LeagueRoute::new("soccer", "esp.1")
        );
        assert_eq!(
            route_for_league("made-up-league"),
            LeagueRoute::new("football", "made-up-league")
        );
    }

    #[test]
    fn maps_known_and_unknown_status_names() {
        assert_eq!(map_status_state("STATUS_SCHEDULED"), EventStatusState::Scheduled);
        assert_eq!(map_status_state("STATUS_IN_PROGRESS"), EventStatusState::Live);
        assert_eq!(map_status_state("STATUS_FINAL_OT"), EventStatusState::Final);
        assert_eq!(map_status_state("STATUS_WEIRD"), EventStatusState::Scheduled);
    }

    #[test]
    fn parses_float_string_scores_via_truncation() {
        let score = Some(serde_json::Value::String("3.0".to_string()));
        assert_eq!(parse_score(&score), Some(3));
        assert_eq!(parse_score(&None), None);
    }

    #[test]
    fn logo_extraction_falls_back_through_the_chain() {
        let logos = vec![
            RawLogo {
                href: "full.png".to_string(),
                rel: vec!["full".to_string()],
            },
            RawLogo {
                href: "default.png".to_string(),
                rel: vec!["default".to_string()],
            },
        ];
        assert_eq!(
            extract_logo(&None, &logos),
            Some("default.png".to_string())
        );
        assert_eq!(
            extract_logo(&Some("direct.png".to_string()), &logos),
            Some("direct.png".to_string())
        );
        assert_eq!(extract_logo(&None, &[]), None);
    }
}
