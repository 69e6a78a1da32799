//! Resolves a single stream against a single league's event list.

use std::sync::Arc;

use tracing::warn;

use super::fuzzy::matches_any;
use super::normalize::normalize;
use crate::database::repositories::team_alias::TeamAliasRepository;
use crate::errors::ProviderResult;
use crate::models::Event;
use crate::providers::SportsProvider;

/// Separators tried in order; the first that occurs in the normalized
/// stream name wins and splits it into `(away, home)`.
const MATCHUP_SEPARATORS: &[&str] = &[" vs. ", " vs ", " at ", " @ ", " v. ", " v ", " x "];

fn extract_matchup(normalized_stream: &str) -> Option<(&str, &str)> {
    for separator in MATCHUP_SEPARATORS {
        if let Some(idx) = normalized_stream.find(separator) {
            let away = &normalized_stream[..idx];
            let home = &normalized_stream[idx + separator.len()..];
            return Some((away, home));
        }
    }
    None
}

struct EventPatterns {
    event: Event,
    home_patterns: Vec<String>,
    away_patterns: Vec<String>,
    event_patterns: Vec<String>,
}

fn precompute(event: Event) -> EventPatterns {
    let home_patterns = event
        .home_team
        .pattern_sources()
        .into_iter()
        .map(normalize)
        .collect();
    let away_patterns = event
        .away_team
        .pattern_sources()
        .into_iter()
        .map(normalize)
        .collect();
    let event_patterns = event.event_patterns().into_iter().map(normalize).collect();
    EventPatterns {
        event,
        home_patterns,
        away_patterns,
        event_patterns,
    }
}

#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub event: Event,
    pub combined_score: f64,
}

/// A deterministic alias match scores as if both metrics agreed perfectly,
/// so it always outranks a fuzzy-only match for the same candidate.
const ALIAS_SIDE_SCORE: f64 = 100.0;

pub struct SingleLeagueMatcher {
    provider: Arc<dyn SportsProvider>,
    team_aliases: TeamAliasRepository,
    threshold: u8,
}

impl SingleLeagueMatcher {
    pub fn new(provider: Arc<dyn SportsProvider>, team_aliases: TeamAliasRepository, threshold: u8) -> Self {
        Self {
            provider,
            team_aliases,
            threshold,
        }
    }

    pub async fn find_event(&self, league: &str, stream_name: &str) -> ProviderResult<Option<MatchOutcome>> {
        let events = self.provider.get_events(league).await?;
        let normalized_stream = normalize(stream_name);
        let candidates: Vec<EventPatterns> = events.into_iter().map(precompute).collect();

        if let Some((away_text, home_text)) = extract_matchup(&normalized_stream) {
            let away_alias = self.resolve_alias(league, away_text).await;
            let home_alias = self.resolve_alias(league, home_text).await;
            if let Some(outcome) = self.best_matchup_match(
                &candidates,
                away_text,
                home_text,
                away_alias.as_deref(),
                home_alias.as_deref(),
            ) {
                return Ok(Some(outcome));
            }
        }

        Ok(self.best_event_name_match(&candidates, &normalized_stream))
    }

    /// Looks up a manual `TeamAlias` override for `text` in `league`,
    /// resolving it deterministically instead of via fuzzy scoring.
    /// A lookup failure degrades to "no alias" rather than failing the
    /// whole match — this is a convenience override, not load-bearing.
    async fn resolve_alias(&self, league: &str, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        match self.team_aliases.find_by_alias(text, league).await {
            Ok(found) => found.map(|alias| alias.provider_team_id),
            Err(error) => {
                warn!("team alias lookup failed for '{}' in {}: {}", text, league, error);
                None
            }
        }
    }

    fn best_matchup_match(
        &self,
        candidates: &[EventPatterns],
        away_text: &str,
        home_text: &str,
        away_alias_team_id: Option<&str>,
        home_alias_team_id: Option<&str>,
    ) -> Option<MatchOutcome> {
        let mut best: Option<MatchOutcome> = None;

        for candidate in candidates {
            let home_score = match home_alias_team_id {
                Some(team_id) => (candidate.event.home_team.id == team_id).then_some(ALIAS_SIDE_SCORE),
                None => {
                    let home_refs: Vec<&str> = candidate.home_patterns.iter().map(String::as_str).collect();
                    matches_any(&home_refs, home_text, self.threshold).map(|m| m.score)
                }
            };
            let Some(home_score) = home_score else {
                continue;
            };

            let away_score = match away_alias_team_id {
                Some(team_id) => (candidate.event.away_team.id == team_id).then_some(ALIAS_SIDE_SCORE),
                None => {
                    let away_refs: Vec<&str> = candidate.away_patterns.iter().map(String::as_str).collect();
                    matches_any(&away_refs, away_text, self.threshold).map(|m| m.score)
                }
            };
            let Some(away_score) = away_score else {
                continue;
            };

            let combined_score = home_score + away_score;
            best = Self::prefer(best, candidate, combined_score);
        }

        best
    }

    fn best_event_name_match(&self, candidates: &[EventPatterns], haystack: &str) -> Option<MatchOutcome> {
        let mut best: Option<MatchOutcome> = None;

        for candidate in candidates {
            let pattern_refs: Vec<&str> = candidate.event_patterns.iter().map(String::as_str).collect();
            let Some(event_match) = matches_any(&pattern_refs, haystack, self.threshold) else {
                continue;
            };
            best = Self::prefer(best, candidate, event_match.score);
        }

        best
    }

    /// Highest combined score wins; ties broken by earliest `start_time`.
    fn prefer(current: Option<MatchOutcome>, candidate: &EventPatterns, score: f64) -> Option<MatchOutcome> {
        match current {
            None => Some(MatchOutcome {
                event: candidate.event.clone(),
                combined_score: score,
            }),
            Some(existing) => {
                let replace = score > existing.combined_score
                    || (score == existing.combined_score
                        && candidate.event.start_time < existing.event.start_time);
                if replace {
                    Some(MatchOutcome {
                        event: candidate.event.clone(),
                        combined_score: score,
                    })
                } else {
                    Some(existing)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_the_first_occurring_separator() {
        assert_eq!(extract_matchup("cowboys at eagles"), Some(("cowboys", "eagles")));
        assert_eq!(extract_matchup("cowboys vs eagles"), Some(("cowboys", "eagles")));
        assert_eq!(extract_matchup("cowboys and eagles"), None);
    }
}
