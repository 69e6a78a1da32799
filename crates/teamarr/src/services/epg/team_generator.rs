//! Builds a single team channel's programme list: one entry per scheduled
//! game plus the filler windows (pregame, postgame, idle, no-game) that
//! keep the channel's schedule contiguous and non-overlapping.

use chrono::{DateTime, Duration, Utc};

use crate::errors::ProviderResult;
use crate::models::records::{TeamConfigRecord, TemplateRecord};
use crate::models::{Event, Programme};
use crate::services::sports_data::SportsDataService;
use crate::services::template::{resolve_description, VariableDictionary};

/// A gap longer than this is treated as a day with no game at all (the
/// template's `no_game` filler) rather than a short between-games lull
/// (the `idle` filler).
const NO_GAME_GAP_THRESHOLD_HOURS: i64 = 18;

/// Per-category programme counts for a generation run. `no_game` windows
/// are filler just like `idle` ones and share its counter — there's no
/// separate slot for them in [`crate::database::repositories::processing_run::ProcessingRunCounts`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgrammeCounts {
    pub events: i32,
    pub pregame: i32,
    pub postgame: i32,
    pub idle: i32,
}

impl ProgrammeCounts {
    pub fn total(&self) -> i32 {
        self.events + self.pregame + self.postgame + self.idle
    }

    pub fn merge(&mut self, other: ProgrammeCounts) {
        self.events += other.events;
        self.pregame += other.pregame;
        self.postgame += other.postgame;
        self.idle += other.idle;
    }
}

pub struct TeamGenerator<'a> {
    sports_data: &'a SportsDataService,
}

impl<'a> TeamGenerator<'a> {
    pub fn new(sports_data: &'a SportsDataService) -> Self {
        Self { sports_data }
    }

    pub async fn generate(
        &self,
        team: &TeamConfigRecord,
        template: &TemplateRecord,
        days_ahead: u32,
        now: DateTime<Utc>,
    ) -> ProviderResult<(Vec<Programme>, ProgrammeCounts)> {
        let window_end = now + Duration::days(days_ahead as i64);
        let mut games: Vec<Event> = self
            .sports_data
            .get_team_schedule(&team.league, &team.provider_team_id)
            .await?
            .into_iter()
            .filter(|e| e.start_time >= now && e.start_time <= window_end)
            .collect();
        games.sort_by(|a, b| a.start_time.cmp(&b.start_time));

        let mut programmes = Vec::new();
        let mut counts = ProgrammeCounts::default();
        let mut cursor = now;

        for game in &games {
            let is_home = game.home_team.id == team.provider_team_id;
            let game_start = game.start_time - Duration::minutes(template.pregame_minutes as i64);
            let game_stop = game.start_time + Duration::minutes(template.default_duration_minutes as i64);

            for period in &template.filler_config.pregame_periods {
                let period_start =
                    game.start_time - Duration::minutes((period.start_hours_before * 60.0) as i64);
                let period_stop =
                    game.start_time - Duration::minutes((period.end_hours_before * 60.0) as i64);
                if period_start >= cursor && period_stop > period_start && period_stop <= game_start {
                    self.fill_gap(&mut programmes, &mut counts, team, template, cursor, period_start);
                    programmes.push(Programme {
                        channel_id: team.channel_id.clone(),
                        title: period.title.clone(),
                        start: period_start,
                        stop: period_stop,
                        description: period.description.clone(),
                        category: Programme::sports_category().to_string(),
                        icon: None,
                    });
                    counts.pregame += 1;
                    cursor = period_stop;
                }
            }

            if cursor < game_start {
                self.fill_gap(&mut programmes, &mut counts, team, template, cursor, game_start);
            }

            let vars = VariableDictionary::build(Some((game, is_home)), None, None);
            let title = vars.render(&template.title_pattern);
            let description = resolve_description(&template.description_options, &vars)
                .or_else(|| template.description_pattern.as_ref().map(|p| vars.render(p)));

            programmes.push(Programme {
                channel_id: team.channel_id.clone(),
                title,
                start: game_start,
                stop: game_stop,
                description,
                category: Programme::sports_category().to_string(),
                icon: if is_home {
                    game.home_team.logo.clone()
                } else {
                    game.away_team.logo.clone()
                },
            });
            counts.events += 1;
            cursor = game_stop.max(cursor);

            for period in &template.filler_config.postgame_periods {
                let period_start = game_stop + Duration::minutes((period.start_hours_after * 60.0) as i64);
                let period_stop = game_stop + Duration::minutes((period.end_hours_after * 60.0) as i64);
                if period_start >= cursor && period_stop > period_start {
                    self.fill_gap(&mut programmes, &mut counts, team, template, cursor, period_start);
                    programmes.push(Programme {
                        channel_id: team.channel_id.clone(),
                        title: period.title.clone(),
                        start: period_start,
                        stop: period_stop,
                        description: period.description.clone(),
                        category: Programme::sports_category().to_string(),
                        icon: None,
                    });
                    counts.postgame += 1;
                    cursor = period_stop;
                }
            }
        }

        if cursor < window_end {
            self.fill_gap(&mut programmes, &mut counts, team, template, cursor, window_end);
        }

        Ok((programmes, counts))
    }

    fn fill_gap(
        &self,
        programmes: &mut Vec<Programme>,
        counts: &mut ProgrammeCounts,
        team: &TeamConfigRecord,
        template: &TemplateRecord,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    ) {
        if stop <= start {
            return;
        }
        let filler = &template.filler_config;
        let is_no_game = (stop - start) >= Duration::hours(NO_GAME_GAP_THRESHOLD_HOURS);
        let (title, description) = if is_no_game {
            (filler.no_game_title.clone(), filler.no_game_description.clone())
        } else {
            (filler.idle_title.clone(), filler.idle_description.clone())
        };

        programmes.push(Programme {
            channel_id: team.channel_id.clone(),
            title,
            start,
            stop,
            description,
            category: Programme::sports_category().to_string(),
            icon: None,
        });
        counts.idle += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventStatus, EventStatusState, FillerConfig, Team};
    use uuid::Uuid;

    fn team_config() -> TeamConfigRecord {
        TeamConfigRecord {
            id: Uuid::new_v4(),
            provider: "espn".into(),
            provider_team_id: "1".into(),
            league: "nfl".into(),
            channel_id: "chan-1".into(),
            display_name: None,
            template_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn template() -> TemplateRecord {
        TemplateRecord {
            id: Uuid::new_v4(),
            name: "team".into(),
            template_type: "team".into(),
            title_pattern: "{team_name} vs {opponent_name}".into(),
            subtitle_pattern: None,
            description_pattern: None,
            pregame_minutes: 30,
            default_duration_minutes: 180,
            filler_config: FillerConfig {
                pregame_periods: vec![],
                postgame_periods: vec![],
                idle_title: "Idle".into(),
                idle_description: None,
                no_game_title: "No Game Today".into(),
                no_game_description: None,
            },
            description_options: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn team(id: &str, name: &str) -> Team {
        Team {
            id: id.to_string(),
            provider: "espn".into(),
            name: name.to_string(),
            short_name: name.to_string(),
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

    #[tokio::test]
    async fn fills_the_whole_window_with_no_game_when_nothing_is_scheduled() {
        struct EmptyProvider;
        #[async_trait::async_trait]
        impl crate::providers::SportsProvider for EmptyProvider {
            fn name(&self) -> &'static str {
                "empty"
            }
            fn supports_league(&self, _league: &str) -> bool {
                true
            }
            async fn get_events(&self, _league: &str) -> crate::errors::ProviderResult<Vec<Event>> {
                Ok(vec![])
            }
            async fn get_team_schedule(
                &self,
                _league: &str,
                _team_id: &str,
            ) -> crate::errors::ProviderResult<Vec<Event>> {
                Ok(vec![])
            }
            async fn get_event(
                &self,
                _league: &str,
                _event_id: &str,
            ) -> crate::errors::ProviderResult<Option<Event>> {
                Ok(None)
            }
        }

        let sports_data = SportsDataService::new(vec![std::sync::Arc::new(EmptyProvider)]);
        let generator = TeamGenerator::new(&sports_data);
        let now = Utc::now();
        let (programmes, counts) = generator.generate(&team_config(), &template(), 3, now).await.unwrap();

        assert_eq!(programmes.len(), 1);
        assert_eq!(programmes[0].title, "No Game Today");
        assert_eq!(programmes[0].start, now);
        assert_eq!(counts.idle, 1);
        assert_eq!(counts.total(), 1);
    }

    #[test]
    fn event_struct_helper_builds_valid_fixtures() {
        let _ = Event {
            id: "e".into(),
            provider: "espn".into(),
            league: "nfl".into(),
            season: None,
            name: "A at B".into(),
            short_name: "A @ B".into(),
            start_time: Utc::now(),
            status: EventStatus {
                state: EventStatusState::Scheduled,
                detail: String::new(),
                period: None,
                clock: None,
            },
            home_team: team("1", "A"),
            away_team: team("2", "B"),
            venue: None,
            broadcasts: vec![],
            odds: None,
            has_odds: false,
            competitions: None,
        };
    }
}
