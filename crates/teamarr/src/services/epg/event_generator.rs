//! Builds programmes for an event group's managed channels: one programme
//! per matched-and-included stream, serialized onto its channel and
//! trimmed against neighbours so nothing overlaps.

use crate::models::records::{ManagedChannelRecord, TemplateRecord};
use crate::models::{Event, Programme};
use crate::services::template::{resolve_description, VariableDictionary};

/// One matched-and-included stream ready to be rendered onto its channel.
pub struct MatchedEvent<'a> {
    pub channel: &'a ManagedChannelRecord,
    pub event: &'a Event,
}

pub struct EventGenerator<'a> {
    template: &'a TemplateRecord,
    /// Overrides the template's own pregame/duration window for this run,
    /// e.g. when an admin kicks off an ad-hoc regeneration with different
    /// timing than what's stored on the template.
    pregame_minutes_override: Option<i64>,
    duration_minutes_override: Option<i64>,
}

impl<'a> EventGenerator<'a> {
    pub fn new(template: &'a TemplateRecord) -> Self {
        Self {
            template,
            pregame_minutes_override: None,
            duration_minutes_override: None,
        }
    }

    pub fn with_overrides(
        template: &'a TemplateRecord,
        pregame_minutes: Option<i64>,
        duration_minutes: Option<i64>,
    ) -> Self {
        Self {
            template,
            pregame_minutes_override: pregame_minutes,
            duration_minutes_override: duration_minutes,
        }
    }

    pub fn generate(&self, matches: &[MatchedEvent<'_>]) -> Vec<Programme> {
        let pregame_minutes = self
            .pregame_minutes_override
            .unwrap_or(self.template.pregame_minutes as i64);
        let duration_minutes = self
            .duration_minutes_override
            .unwrap_or(self.template.default_duration_minutes as i64);

        let mut by_channel: std::collections::HashMap<&str, Vec<&MatchedEvent>> =
            std::collections::HashMap::new();
        for m in matches {
            by_channel.entry(m.channel.host_channel_id.as_str()).or_default().push(m);
        }

        let mut programmes = Vec::new();
        for (_, mut entries) in by_channel {
            entries.sort_by_key(|m| m.event.start_time);

            let mut last_stop = None;
            for m in entries {
                let start = m.event.start_time - chrono::Duration::minutes(pregame_minutes);
                let mut stop = m.event.start_time + chrono::Duration::minutes(duration_minutes);

                let start = match last_stop {
                    Some(prev_stop) if prev_stop > start => prev_stop,
                    _ => start,
                };
                if stop <= start {
                    // The earlier event's programme already runs past this
                    // one's natural window; it cedes the remainder.
                    stop = start + chrono::Duration::minutes(1);
                }

                let vars = VariableDictionary::build(Some((m.event, true)), None, None);
                let title = vars.render(&self.template.title_pattern);
                let description = resolve_description(&self.template.description_options, &vars)
                    .or_else(|| self.template.description_pattern.as_ref().map(|p| vars.render(p)));

                programmes.push(Programme {
                    channel_id: m.channel.host_channel_id.clone(),
                    title,
                    start,
                    stop,
                    description,
                    category: Programme::sports_category().to_string(),
                    icon: m.event.home_team.logo.clone(),
                });
                last_stop = Some(stop);
            }
        }

        programmes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DescriptionOption, EventStatus, EventStatusState, FillerConfig, Team};
    use chrono::Utc;
    use uuid::Uuid;

    fn channel(id: &str, host_channel_id: &str) -> ManagedChannelRecord {
        ManagedChannelRecord {
            id: Uuid::new_v4(),
            event_epg_group_id: Uuid::new_v4(),
            host_channel_id: host_channel_id.into(),
            host_stream_id: id.into(),
            channel_number: 500,
            event_id: "evt-1".into(),
            league: "nfl".into(),
            channel_name: "Away @ Home".into(),
            scheduled_delete_at: None,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn team(name: &str) -> Team {
        Team {
            id: name.into(),
            provider: "espn".into(),
            name: name.into(),
            short_name: name.into(),
            abbreviation: name.chars().take(3).collect::<String>().to_uppercase(),
            location: "City".into(),
            league: "nfl".into(),
            logo: None,
            color: None,
            score: None,
            streak: None,
            record: None,
            rank: None,
        }
    }

    fn event(start: chrono::DateTime<Utc>) -> Event {
        Event {
            id: "evt-1".into(),
            provider: "espn".into(),
            league: "nfl".into(),
            season: None,
            name: "Away at Home".into(),
            short_name: "A @ H".into(),
            start_time: start,
            status: EventStatus {
                state: EventStatusState::Scheduled,
                detail: String::new(),
                period: None,
                clock: None,
            },
            home_team: team("Home"),
            away_team: team("Away"),
            venue: None,
            broadcasts: vec![],
            odds: None,
            has_odds: false,
            competitions: None,
        }
    }

    fn template() -> TemplateRecord {
        TemplateRecord {
            id: Uuid::new_v4(),
            name: "event".into(),
            template_type: "event".into(),
            title_pattern: "{opponent_name} @ {team_name}".into(),
            subtitle_pattern: None,
            description_pattern: None,
            pregame_minutes: 15,
            default_duration_minutes: 180,
            filler_config: FillerConfig::default(),
            description_options: vec![DescriptionOption {
                priority: 100,
                condition: None,
                body: "Game on".into(),
            }],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn trims_the_start_of_a_second_event_when_the_first_runs_long() {
        let now = Utc::now();
        let first = event(now);
        let second = event(now + chrono::Duration::hours(1));
        let chan = channel("s1", "hc-1");
        let tmpl = template();

        let matches = vec![
            MatchedEvent { channel: &chan, event: &first },
            MatchedEvent { channel: &chan, event: &second },
        ];

        let generator = EventGenerator::new(&tmpl);
        let mut programmes = generator.generate(&matches);
        programmes.sort_by_key(|p| p.start);

        assert_eq!(programmes.len(), 2);
        assert_eq!(programmes[1].start, programmes[0].stop);
    }
}
