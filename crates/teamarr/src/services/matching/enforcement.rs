//! Reconciliation passes run across a run's matches once every group has
//! matched independently. A single stream is matched against each group in
//! isolation, so nothing in [`super::multi_league`] can see that the same
//! stream also hit a keyword exception in one group and a real event in
//! another, or that two groups claimed the same event. These passes look
//! across the whole run to settle that.
//!
//! Each pass only acts when a group's configuration can unambiguously
//! resolve ownership; otherwise it records nothing and leaves every group's
//! own result untouched. This is a consistency pass over statistics and
//! channel ownership, not a correctness requirement of matching itself.

use std::collections::HashMap;
use uuid::Uuid;

use super::multi_league::MatchResult;
use crate::database::repositories::managed_channel::ManagedChannelRepository;
use crate::errors::AppResult;
use crate::models::records::EventEpgGroupRecord;

/// One group's outcome for one stream, carrying enough of the group's
/// configuration to resolve cross-group ownership.
#[derive(Debug, Clone)]
pub struct StreamGroupOutcome {
    pub group_id: Uuid,
    pub stream_id: String,
    pub result: MatchResult,
}

fn triggering_keyword(group: &EventEpgGroupRecord, stream_name: &str) -> Option<String> {
    let normalized = super::normalize::normalize(stream_name);
    group
        .exception_keywords
        .iter()
        .find(|keyword| normalized.contains(&super::normalize::normalize(keyword)))
        .cloned()
}

/// Exception-flagged streams default to staying on their excepted group.
/// They're only rerouted to a real match when exactly one other group's
/// exception keywords name the same keyword that triggered the exception —
/// that group is then the unambiguous owner.
pub fn enforce_keyword_routing(
    groups: &HashMap<Uuid, EventEpgGroupRecord>,
    outcomes: &mut [StreamGroupOutcome],
    stream_names: &HashMap<String, String>,
) {
    let stream_ids: Vec<String> = outcomes
        .iter()
        .map(|o| o.stream_id.clone())
        .collect::<std::collections::HashSet<_>>()
        .into_iter()
        .collect();

    for stream_id in stream_ids {
        let Some(stream_name) = stream_names.get(&stream_id) else {
            continue;
        };

        let exception_groups: Vec<Uuid> = outcomes
            .iter()
            .filter(|o| o.stream_id == stream_id && matches!(o.result, MatchResult::Exception))
            .map(|o| o.group_id)
            .collect();
        if exception_groups.is_empty() {
            continue;
        }

        let keyword = exception_groups
            .iter()
            .filter_map(|id| groups.get(id))
            .find_map(|group| triggering_keyword(group, stream_name));
        let Some(keyword) = keyword else { continue };

        let matched_elsewhere: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| {
                o.stream_id == stream_id
                    && matches!(o.result, MatchResult::Matched { .. } | MatchResult::MatchedNotIncluded { .. })
            })
            .map(|(idx, _)| idx)
            .collect();
        if matched_elsewhere.is_empty() {
            continue;
        }

        let keyword_owners: Vec<usize> = matched_elsewhere
            .iter()
            .copied()
            .filter(|&idx| {
                groups
                    .get(&outcomes[idx].group_id)
                    .is_some_and(|g| g.exception_keywords.iter().any(|k| k == &keyword))
            })
            .collect();

        if keyword_owners.len() == 1 {
            for &idx in &matched_elsewhere {
                if idx != keyword_owners[0] {
                    demote(&mut outcomes[idx], "keyword_owned_by_another_group");
                }
            }
        } else {
            for &idx in &matched_elsewhere {
                demote(&mut outcomes[idx], "exception_keyword_precedence");
            }
        }
    }
}

/// When the same `(event_id, league)` is claimed by more than one group,
/// ownership goes to the group whose include-list names exactly that one
/// league. If no single group qualifies, every claim is left as-is.
pub fn enforce_cross_group_consolidation(
    groups: &HashMap<Uuid, EventEpgGroupRecord>,
    outcomes: &mut [StreamGroupOutcome],
) {
    let mut claims: HashMap<(String, String), Vec<usize>> = HashMap::new();
    for (idx, outcome) in outcomes.iter().enumerate() {
        if let MatchResult::Matched { event, league } = &outcome.result {
            claims
                .entry((event.id.clone(), league.clone()))
                .or_default()
                .push(idx);
        }
    }

    for ((_, league), indices) in claims {
        if indices.len() < 2 {
            continue;
        }

        let specific_owners: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&idx| {
                groups
                    .get(&outcomes[idx].group_id)
                    .is_some_and(|g| g.include_leagues.len() == 1 && g.include_leagues[0] == league)
            })
            .collect();

        if specific_owners.len() == 1 {
            for idx in indices {
                if idx != specific_owners[0] {
                    demote(&mut outcomes[idx], "claimed_by_more_specific_group");
                }
            }
        }
    }
}

fn demote(outcome: &mut StreamGroupOutcome, reason: &'static str) {
    if let MatchResult::Matched { event, league } = &outcome.result {
        outcome.result = MatchResult::MatchedNotIncluded {
            event: event.clone(),
            league: league.clone(),
            reason,
        };
    }
}

/// For an event matched on both a main-language group and a keyword group,
/// the main channel's number must be lower than the keyword channel's. If a
/// prior allocation left them inverted, swap the two local channel numbers.
/// The host's own numbering is not re-issued — only the local mirror and a
/// best-effort rename are updated.
pub async fn enforce_keyword_ordering(
    managed_channels: &ManagedChannelRepository,
    main_group_id: &Uuid,
    keyword_group_id: &Uuid,
    event_id: &str,
) -> AppResult<()> {
    let (Some(main_channel), Some(keyword_channel)) = (
        managed_channels.find_active_by_event(main_group_id, event_id).await?,
        managed_channels.find_active_by_event(keyword_group_id, event_id).await?,
    ) else {
        return Ok(());
    };

    if main_channel.channel_number > keyword_channel.channel_number {
        managed_channels
            .swap_channel_numbers(&main_channel.id, &keyword_channel.id)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, EventStatus, EventStatusState, Team};
    use chrono::Utc;

    fn group(include_leagues: Vec<&str>, exception_keywords: Vec<&str>) -> EventEpgGroupRecord {
        EventEpgGroupRecord {
            id: Uuid::new_v4(),
            host_group_id: "hg".into(),
            name: "g".into(),
            leagues: vec!["nfl".into()],
            include_leagues: include_leagues.into_iter().map(String::from).collect(),
            exception_keywords: exception_keywords.into_iter().map(String::from).collect(),
            refresh_interval_minutes: 15,
            channel_start: Some(500),
            create_timing: "day_of".into(),
            delete_timing: "stream_removed".into(),
            timezone: "UTC".into(),
            template_id: Uuid::new_v4(),
            epg_source_id: None,
            stream_count: 0,
            matched_count: 0,
            last_refresh: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn event() -> Event {
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

    #[test]
    fn exception_stream_yields_to_its_matching_keyword_group() {
        let excepted = group(vec!["nfl"], vec!["redzone"]);
        let keyword_owner = group(vec!["nfl"], vec!["redzone"]);
        let plain = group(vec!["nfl"], vec![]);

        let mut groups = HashMap::new();
        groups.insert(excepted.id, excepted.clone());
        groups.insert(keyword_owner.id, keyword_owner.clone());
        groups.insert(plain.id, plain.clone());

        let mut stream_names = HashMap::new();
        stream_names.insert("s1".to_string(), "NFL RedZone".to_string());

        let mut outcomes = vec![
            StreamGroupOutcome {
                group_id: excepted.id,
                stream_id: "s1".into(),
                result: MatchResult::Exception,
            },
            StreamGroupOutcome {
                group_id: keyword_owner.id,
                stream_id: "s1".into(),
                result: MatchResult::Matched {
                    event: event(),
                    league: "nfl".into(),
                },
            },
            StreamGroupOutcome {
                group_id: plain.id,
                stream_id: "s1".into(),
                result: MatchResult::Matched {
                    event: event(),
                    league: "nfl".into(),
                },
            },
        ];

        enforce_keyword_routing(&groups, &mut outcomes, &stream_names);

        assert!(matches!(outcomes[1].result, MatchResult::Matched { .. }));
        assert!(matches!(
            outcomes[2].result,
            MatchResult::MatchedNotIncluded { .. }
        ));
    }

    #[test]
    fn most_specific_group_keeps_a_contested_event() {
        let specific = group(vec!["nfl"], vec![]);
        let broad = group(vec!["nfl", "ncaaf"], vec![]);

        let mut groups = HashMap::new();
        groups.insert(specific.id, specific.clone());
        groups.insert(broad.id, broad.clone());

        let mut outcomes = vec![
            StreamGroupOutcome {
                group_id: specific.id,
                stream_id: "s1".into(),
                result: MatchResult::Matched {
                    event: event(),
                    league: "nfl".into(),
                },
            },
            StreamGroupOutcome {
                group_id: broad.id,
                stream_id: "s1".into(),
                result: MatchResult::Matched {
                    event: event(),
                    league: "nfl".into(),
                },
            },
        ];

        enforce_cross_group_consolidation(&groups, &mut outcomes);

        assert!(matches!(outcomes[0].result, MatchResult::Matched { .. }));
        assert!(matches!(
            outcomes[1].result,
            MatchResult::MatchedNotIncluded { .. }
        ));
    }
}
