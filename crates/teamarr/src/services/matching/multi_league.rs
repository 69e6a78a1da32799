//! Wraps [`super::single_league::SingleLeagueMatcher`] across a group's
//! configured ordered league list, applying the exception-keyword gate
//! and whitelist inclusion rule.

use std::sync::Arc;

use super::normalize::normalize;
use super::single_league::SingleLeagueMatcher;
use crate::database::repositories::team_alias::TeamAliasRepository;
use crate::errors::ProviderResult;
use crate::models::Event;
use crate::providers::SportsProvider;

#[derive(Debug, Clone)]
pub enum MatchResult {
    /// Matched an event in an included league.
    Matched { event: Event, league: String },
    /// Matched an event, but its league isn't in the group's whitelist;
    /// recorded for statistics, produces no channel.
    MatchedNotIncluded {
        event: Event,
        league: String,
        reason: &'static str,
    },
    /// Contains an exception keyword; excluded from normal matching.
    Exception,
    /// No event found in any configured league.
    Unmatched,
}

pub struct MultiLeagueMatcher {
    leagues: Vec<String>,
    include_leagues: Vec<String>,
    exception_keywords: Vec<String>,
    team_aliases: TeamAliasRepository,
    threshold: u8,
}

impl MultiLeagueMatcher {
    pub fn new(
        leagues: Vec<String>,
        include_leagues: Vec<String>,
        exception_keywords: Vec<String>,
        team_aliases: TeamAliasRepository,
        threshold: u8,
    ) -> Self {
        Self {
            leagues,
            include_leagues,
            exception_keywords,
            team_aliases,
            threshold,
        }
    }

    pub async fn match_stream(
        &self,
        provider: &Arc<dyn SportsProvider>,
        stream_name: &str,
    ) -> ProviderResult<MatchResult> {
        let normalized_stream = normalize(stream_name);
        if self
            .exception_keywords
            .iter()
            .any(|keyword| normalized_stream.contains(&normalize(keyword)))
        {
            return Ok(MatchResult::Exception);
        }

        for league in &self.leagues {
            if !provider.supports_league(league) {
                continue;
            }
            let matcher = SingleLeagueMatcher::new(provider.clone(), self.team_aliases.clone(), self.threshold);
            if let Some(outcome) = matcher.find_event(league, stream_name).await? {
                if self.include_leagues.iter().any(|l| l == league) {
                    return Ok(MatchResult::Matched {
                        event: outcome.event,
                        league: league.clone(),
                    });
                }
                return Ok(MatchResult::MatchedNotIncluded {
                    event: outcome.event,
                    league: league.clone(),
                    reason: "league_not_in_whitelist",
                });
            }
        }

        Ok(MatchResult::Unmatched)
    }
}

/// Aggregate counts over a batch of streams, used for run statistics.
#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    pub total: u32,
    pub matched: u32,
    pub included: u32,
    pub excluded: u32,
    pub unmatched: u32,
    pub exception: u32,
}

impl BatchStats {
    pub fn record(&mut self, result: &MatchResult) {
        self.total += 1;
        match result {
            MatchResult::Matched { .. } => {
                self.matched += 1;
                self.included += 1;
            }
            MatchResult::MatchedNotIncluded { .. } => {
                self.matched += 1;
                self.excluded += 1;
            }
            MatchResult::Exception => self.exception += 1,
            MatchResult::Unmatched => self.unmatched += 1,
        }
    }

    /// `matched / (total - exception)`, `0.0` if there's nothing to match.
    pub fn match_rate(&self) -> f64 {
        let denominator = self.total.saturating_sub(self.exception);
        if denominator == 0 {
            0.0
        } else {
            self.matched as f64 / denominator as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_rate_excludes_exceptions_from_the_denominator() {
        let mut stats = BatchStats::default();
        stats.record(&MatchResult::Matched {
            event: dummy_event(),
            league: "nfl".into(),
        });
        stats.record(&MatchResult::Exception);
        stats.record(&MatchResult::Unmatched);

        // 1 matched out of (3 total - 1 exception) = 1/2
        assert_eq!(stats.match_rate(), 0.5);
    }

    fn dummy_event() -> Event {
        use crate::models::{EventStatus, EventStatusState, Team};
        let team = Team {
            id: "1".into(),
            provider: "espn".into(),
            name: "Dallas Cowboys".into(),
            short_name: "Cowboys".into(),
            abbreviation: "DAL".into(),
            location: "Dallas".into(),
            league: "nfl".into(),
            logo: None,
            color: None,
            score: None,
            streak: None,
            record: None,
            rank: None,
        };
        Event {
            id: "evt-1".into(),
            provider: "espn".into(),
            league: "nfl".into(),
            season: None,
            name: "Cowboys at Eagles".into(),
            short_name: "DAL @ PHI".into(),
            start_time: chrono::Utc::now(),
            status: EventStatus {
                state: EventStatusState::Scheduled,
                detail: String::new(),
                period: None,
                clock: None,
            },
            home_team: team.clone(),
            away_team: team,
            venue: None,
            broadcasts: vec![],
            odds: None,
            has_odds: false,
            competitions: None,
        }
    }
}
