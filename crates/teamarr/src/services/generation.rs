//! Orchestrates a full generation run: team schedules, or the matched-stream
//! and channel-lifecycle pipeline for event groups. Both entry points open a
//! [`ProcessingRunRecord`], do their work, and close the run whether they
//! succeed or fail — a fatal error fails the run but never the process.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::database::repositories::event_epg_group::EventEpgGroupRepository;
use crate::database::repositories::failed_match::{FailedMatchCreateRequest, FailedMatchRepository};
use crate::database::repositories::managed_channel::ManagedChannelRepository;
use crate::database::repositories::matched_stream::{MatchedStreamCreateRequest, MatchedStreamRepository};
use crate::database::repositories::processing_run::{
    ProcessingRunCounts, ProcessingRunRepository, ProcessingRunStart,
};
use crate::database::repositories::settings::SettingsRepository;
use crate::database::repositories::team_alias::TeamAliasRepository;
use crate::database::repositories::team_config::TeamConfigRepository;
use crate::database::repositories::template::TemplateRepository;
use crate::errors::{AppError, AppResult};
use crate::models::records::{EventEpgGroupRecord, ProcessingRunRecord};
use crate::models::Event;
use crate::services::cache::{CacheLookup, CacheService};
use crate::services::epg::consolidator::Consolidator;
use crate::services::epg::event_generator::{EventGenerator, MatchedEvent};
use crate::services::epg::team_generator::{ProgrammeCounts, TeamGenerator};
use crate::services::host_client::HostClient;
use crate::services::lifecycle::{LifecycleManager, PendingChannelCreate};
use crate::services::matching::enforcement::{
    enforce_cross_group_consolidation, enforce_keyword_ordering, enforce_keyword_routing, StreamGroupOutcome,
};
use crate::services::matching::multi_league::{MatchResult, MultiLeagueMatcher};
use crate::services::sports_data::SportsDataService;

pub struct GenerationService {
    sports_data: Arc<SportsDataService>,
    cache: CacheService,
    lifecycle: Arc<LifecycleManager>,
    host: Arc<dyn HostClient>,
    consolidator: Consolidator,
    runs: ProcessingRunRepository,
    settings: SettingsRepository,
    team_configs: TeamConfigRepository,
    event_groups: EventEpgGroupRepository,
    templates: TemplateRepository,
    managed_channels: ManagedChannelRepository,
    matched_streams: MatchedStreamRepository,
    failed_matches: FailedMatchRepository,
    team_aliases: TeamAliasRepository,
    fuzzy_threshold: u8,
}

impl GenerationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sports_data: Arc<SportsDataService>,
        cache: CacheService,
        lifecycle: Arc<LifecycleManager>,
        host: Arc<dyn HostClient>,
        consolidator: Consolidator,
        runs: ProcessingRunRepository,
        settings: SettingsRepository,
        team_configs: TeamConfigRepository,
        event_groups: EventEpgGroupRepository,
        templates: TemplateRepository,
        managed_channels: ManagedChannelRepository,
        matched_streams: MatchedStreamRepository,
        failed_matches: FailedMatchRepository,
        team_aliases: TeamAliasRepository,
        fuzzy_threshold: u8,
    ) -> Self {
        Self {
            sports_data,
            cache,
            lifecycle,
            host,
            consolidator,
            runs,
            settings,
            team_configs,
            event_groups,
            templates,
            managed_channels,
            matched_streams,
            failed_matches,
            team_aliases,
            fuzzy_threshold,
        }
    }

    /// Regenerates `teams.xml` for the given teams (or every configured
    /// team, if `team_ids` is `None`).
    pub async fn generate_teams(
        &self,
        team_ids: Option<Vec<Uuid>>,
        days_ahead: u32,
    ) -> AppResult<ProcessingRunRecord> {
        let run = self
            .runs
            .start(ProcessingRunStart {
                run_type: "team".into(),
                group_id: None,
            })
            .await?;

        match self.run_team_generation(team_ids, days_ahead).await {
            Ok((programmes, programme_counts, teams_processed)) => {
                tracing::info!("generated {} programme(s) across {} team(s)", programmes.len(), teams_processed);
                let counts = ProcessingRunCounts {
                    programmes_total: programme_counts.total(),
                    programmes_events: programme_counts.events,
                    programmes_pregame: programme_counts.pregame,
                    programmes_postgame: programme_counts.postgame,
                    programmes_idle: programme_counts.idle,
                    ..Default::default()
                };
                self.consolidator.write_teams(&programmes).await?;
                self.runs.complete(&run.id, counts, Utc::now()).await?;
            }
            Err(error) => {
                self.runs.fail(&run.id, error.to_string(), Utc::now()).await?;
                return Err(error);
            }
        }

        self.runs
            .find_by_id(&run.id)
            .await?
            .ok_or_else(|| AppError::internal("processing run vanished after completion"))
    }

    async fn run_team_generation(
        &self,
        team_ids: Option<Vec<Uuid>>,
        days_ahead: u32,
    ) -> AppResult<(Vec<crate::models::Programme>, ProgrammeCounts, usize)> {
        let teams = self.team_configs.find_all().await?;
        let teams: Vec<_> = match &team_ids {
            Some(ids) => teams.into_iter().filter(|t| ids.contains(&t.id)).collect(),
            None => teams,
        };

        let now = Utc::now();
        let mut programmes = Vec::new();
        let mut counts = ProgrammeCounts::default();
        let mut processed = 0;

        for team in &teams {
            let Some(template) = self.templates.find_by_id(&team.template_id).await? else {
                warn!("team {} references missing template {}, skipping", team.id, team.template_id);
                continue;
            };

            match TeamGenerator::new(&self.sports_data)
                .generate(team, &template, days_ahead, now)
                .await
            {
                Ok((team_programmes, team_counts)) => {
                    programmes.extend(team_programmes);
                    counts.merge(team_counts);
                    processed += 1;
                }
                Err(error) => {
                    warn!("failed to generate schedule for team {}: {}", team.id, error);
                }
            }
        }

        Ok((programmes, counts, processed))
    }

    /// Runs the matched-stream and channel-lifecycle pipeline for every
    /// configured event group whose leagues intersect `leagues` (all groups,
    /// if `leagues` is empty). `pregame_minutes`/`duration_hours` override
    /// each group's stored template for this run; `channel_prefix` is
    /// prepended to the default `"{away} @ {home}"` channel name.
    pub async fn generate_events(
        &self,
        leagues: Vec<String>,
        target_date: Option<NaiveDate>,
        channel_prefix: String,
        pregame_minutes: i64,
        duration_hours: i64,
    ) -> AppResult<ProcessingRunRecord> {
        let run = self
            .runs
            .start(ProcessingRunStart {
                run_type: "event".into(),
                group_id: None,
            })
            .await?;

        let result = self
            .run_event_generation(
                &run.id,
                &leagues,
                target_date,
                &channel_prefix,
                pregame_minutes,
                duration_hours,
            )
            .await;

        match result {
            Ok(counts) => {
                self.runs.complete(&run.id, counts, Utc::now()).await?;
            }
            Err(error) => {
                self.runs.fail(&run.id, error.to_string(), Utc::now()).await?;
                return Err(error);
            }
        }

        self.runs
            .find_by_id(&run.id)
            .await?
            .ok_or_else(|| AppError::internal("processing run vanished after completion"))
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_event_generation(
        &self,
        run_id: &Uuid,
        leagues: &[String],
        target_date: Option<NaiveDate>,
        channel_prefix: &str,
        pregame_minutes: i64,
        duration_hours: i64,
    ) -> AppResult<ProcessingRunCounts> {
        let all_groups = self.event_groups.find_all().await?;
        let groups: Vec<EventEpgGroupRecord> = all_groups
            .into_iter()
            .filter(|g| leagues.is_empty() || g.leagues.iter().any(|l| leagues.contains(l)))
            .collect();
        if groups.is_empty() {
            return Ok(ProcessingRunCounts::default());
        }

        let generation = self.settings.next_generation().await?;
        let now = Utc::now();
        let target_date = target_date.unwrap_or_else(|| now.date_naive());

        let host_streams = self.host.list_streams().await?;
        let current_host_stream_ids: HashSet<String> =
            host_streams.iter().map(|s| s.id.clone()).collect();
        let stream_names: HashMap<String, String> =
            host_streams.iter().map(|s| (s.id.clone(), s.name.clone())).collect();

        let groups_by_id: HashMap<Uuid, EventEpgGroupRecord> =
            groups.iter().map(|g| (g.id, g.clone())).collect();

        // Phase 1: match every stream against every group, independently.
        let mut outcomes: Vec<StreamGroupOutcome> = Vec::new();
        let mut events_by_key: HashMap<(Uuid, String), Event> = HashMap::new();
        let mut streams_fetched = 0i32;
        let mut streams_cached = 0i32;

        for group in &groups {
            let Some(provider) = group.leagues.first().and_then(|l| self.sports_data.provider_for(l)) else {
                warn!("event group {} has no league with a configured provider, skipping", group.id);
                continue;
            };
            let matcher = MultiLeagueMatcher::new(
                group.leagues.clone(),
                group.include_leagues.clone(),
                group.exception_keywords.clone(),
                self.team_aliases.clone(),
                self.fuzzy_threshold,
            );

            for stream in &host_streams {
                streams_fetched += 1;
                let cache_league = group.leagues.first().cloned().unwrap_or_default();
                let cached = self
                    .cache
                    .lookup(&provider, &group.id, &stream.id, &stream.name, &cache_league, generation)
                    .await?;

                let result = match cached {
                    CacheLookup::Hit(event) => {
                        streams_cached += 1;
                        let league = event.league.clone();
                        let included = group.include_leagues.iter().any(|l| l == &league);
                        if included {
                            MatchResult::Matched { event, league }
                        } else {
                            MatchResult::MatchedNotIncluded {
                                event,
                                league,
                                reason: "league_not_in_whitelist",
                            }
                        }
                    }
                    CacheLookup::Miss => match matcher.match_stream(&provider, &stream.name).await {
                        Ok(result) => {
                            if let MatchResult::Matched { event, league } | MatchResult::MatchedNotIncluded { event, league, .. } = &result {
                                self.cache
                                    .store(&group.id, &stream.id, &stream.name, &event.id, league, event, generation)
                                    .await?;
                            }
                            result
                        }
                        Err(error) => {
                            warn!("matching failed for stream {} in group {}: {}", stream.id, group.id, error);
                            MatchResult::Unmatched
                        }
                    },
                };

                if let MatchResult::Matched { event, .. } | MatchResult::MatchedNotIncluded { event, .. } = &result {
                    if event.start_time.date_naive() == target_date {
                        events_by_key.insert((group.id, event.id.clone()), event.clone());
                    }
                }

                outcomes.push(StreamGroupOutcome {
                    group_id: group.id,
                    stream_id: stream.id.clone(),
                    result,
                });
            }
        }

        // Phase 2: cross-group reconciliation.
        enforce_keyword_routing(&groups_by_id, &mut outcomes, &stream_names);
        enforce_cross_group_consolidation(&groups_by_id, &mut outcomes);

        // Phase 3: per-group lifecycle + programme generation.
        let mut streams_matched = 0i32;
        let mut streams_unmatched = 0i32;
        let mut programmes_events = 0i32;

        for group in &groups {
            let group_outcomes: Vec<&StreamGroupOutcome> =
                outcomes.iter().filter(|o| o.group_id == group.id).collect();

            let mut pending = Vec::new();
            for outcome in &group_outcomes {
                let stream_name = stream_names.get(&outcome.stream_id).cloned().unwrap_or_default();
                match &outcome.result {
                    MatchResult::Matched { event, league } => {
                        if event.start_time.date_naive() != target_date {
                            continue;
                        }
                        streams_matched += 1;
                        self.matched_streams
                            .create(MatchedStreamCreateRequest {
                                run_id: *run_id,
                                group_id: group.id,
                                stream_id: outcome.stream_id.clone(),
                                stream_name: stream_name.clone(),
                                event_id: event.id.clone(),
                                league: league.clone(),
                                included: true,
                                reason: None,
                            })
                            .await?;
                        let channel_name = if channel_prefix.is_empty() {
                            format!("{} @ {}", event.away_team.name, event.home_team.name)
                        } else {
                            format!("{channel_prefix}{} @ {}", event.away_team.name, event.home_team.name)
                        };
                        pending.push(PendingChannelCreate {
                            event_id: event.id.clone(),
                            league: league.clone(),
                            stream_id: outcome.stream_id.clone(),
                            stream_name,
                            start_time: event.start_time,
                            channel_name,
                        });
                    }
                    MatchResult::MatchedNotIncluded { reason, .. } => {
                        streams_matched += 1;
                        self.matched_streams
                            .create(MatchedStreamCreateRequest {
                                run_id: *run_id,
                                group_id: group.id,
                                stream_id: outcome.stream_id.clone(),
                                stream_name,
                                event_id: String::new(),
                                league: String::new(),
                                included: false,
                                reason: Some((*reason).to_string()),
                            })
                            .await?;
                    }
                    MatchResult::Exception => {
                        self.failed_matches
                            .create(FailedMatchCreateRequest {
                                run_id: *run_id,
                                group_id: group.id,
                                stream_id: outcome.stream_id.clone(),
                                stream_name,
                                reason: "exception_keyword".into(),
                            })
                            .await?;
                    }
                    MatchResult::Unmatched => {
                        streams_unmatched += 1;
                        self.failed_matches
                            .create(FailedMatchCreateRequest {
                                run_id: *run_id,
                                group_id: group.id,
                                stream_id: outcome.stream_id.clone(),
                                stream_name,
                                reason: "no_match".into(),
                            })
                            .await?;
                    }
                }
            }

            self.lifecycle.process_creations(group, &pending, now).await?;
            self.lifecycle
                .process_reactive_deletions(group, &current_host_stream_ids, now)
                .await?;

            let Some(template) = self.templates.find_by_id(&group.template_id).await? else {
                warn!("event group {} references missing template {}, skipping fragment", group.id, group.template_id);
                continue;
            };

            let active_channels = self.managed_channels.find_active_by_group(&group.id).await?;
            let channel_events: Vec<(crate::models::records::ManagedChannelRecord, Event)> = active_channels
                .into_iter()
                .filter_map(|channel| {
                    events_by_key
                        .get(&(group.id, channel.event_id.clone()))
                        .cloned()
                        .map(|event| (channel, event))
                })
                .collect();
            let matches: Vec<MatchedEvent> = channel_events
                .iter()
                .map(|(channel, event)| MatchedEvent { channel, event })
                .collect();

            let generator = EventGenerator::with_overrides(
                &template,
                Some(pregame_minutes),
                Some(duration_hours * 60),
            );
            let programmes = generator.generate(&matches);
            programmes_events += programmes.len() as i32;

            self.consolidator.write_group_fragment(&group.id, &programmes).await?;
            self.event_groups
                .record_refresh(&group.id, host_streams.len() as i32, matches.len() as i32, now)
                .await?;
        }

        // Phase 4: keyword-ordering pass for events shared between a plain
        // group and an exception-keyword group.
        let mut events_to_groups: HashMap<&str, Vec<&StreamGroupOutcome>> = HashMap::new();
        for outcome in &outcomes {
            if let MatchResult::Matched { event, .. } = &outcome.result {
                events_to_groups.entry(event.id.as_str()).or_default().push(outcome);
            }
        }
        for (event_id, owners) in events_to_groups {
            let group_ids: HashSet<Uuid> = owners.iter().map(|o| o.group_id).collect();
            if group_ids.len() != 2 {
                continue;
            }
            let mut ids = group_ids.into_iter();
            let (a, b) = (ids.next().unwrap(), ids.next().unwrap());
            let (Some(group_a), Some(group_b)) = (groups_by_id.get(&a), groups_by_id.get(&b)) else {
                continue;
            };
            let (main_id, keyword_id) = if group_a.exception_keywords.is_empty() && !group_b.exception_keywords.is_empty() {
                (a, b)
            } else if group_b.exception_keywords.is_empty() && !group_a.exception_keywords.is_empty() {
                (b, a)
            } else {
                continue;
            };
            enforce_keyword_ordering(&self.managed_channels, &main_id, &keyword_id, event_id).await?;
        }

        Ok(ProcessingRunCounts {
            streams_fetched,
            streams_matched,
            streams_unmatched,
            streams_cached,
            programmes_total: programmes_events,
            programmes_events,
            ..Default::default()
        })
    }

    /// Diagnostic lookup backing the admin "test a match" endpoint: fetches
    /// a league's schedule for `target_date` and narrows it down by team id
    /// (exact) or team name (fuzzy), without touching the database.
    pub async fn diagnose_match(
        &self,
        league: &str,
        target_date: Option<NaiveDate>,
        team1_id: Option<String>,
        team2_id: Option<String>,
        team1_name: Option<String>,
        team2_name: Option<String>,
    ) -> AppResult<Vec<Event>> {
        let target_date = target_date.unwrap_or_else(|| Utc::now().date_naive());
        let events = self.sports_data.get_events(league).await?;
        let mut candidates: Vec<Event> = events
            .into_iter()
            .filter(|event| event.start_time.date_naive() == target_date)
            .collect();

        if team1_id.is_some() || team2_id.is_some() {
            candidates.retain(|event| {
                let ids = [event.home_team.id.as_str(), event.away_team.id.as_str()];
                team1_id.as_deref().is_none_or(|id| ids.contains(&id))
                    && team2_id.as_deref().is_none_or(|id| ids.contains(&id))
            });
        } else if team1_name.is_some() || team2_name.is_some() {
            use crate::services::matching::fuzzy::matches_any;
            use crate::services::matching::normalize::normalize;

            candidates.retain(|event| {
                let home: Vec<String> = event.home_team.pattern_sources().into_iter().map(normalize).collect();
                let away: Vec<String> = event.away_team.pattern_sources().into_iter().map(normalize).collect();
                let home_refs: Vec<&str> = home.iter().map(String::as_str).collect();
                let away_refs: Vec<&str> = away.iter().map(String::as_str).collect();

                let team_matches = |name: &Option<String>, refs: &[&str]| -> bool {
                    match name {
                        Some(name) => matches_any(refs, &normalize(name), self.fuzzy_threshold).is_some(),
                        None => true,
                    }
                };

                (team_matches(&team1_name, &home_refs) && team_matches(&team2_name, &away_refs))
                    || (team_matches(&team1_name, &away_refs) && team_matches(&team2_name, &home_refs))
            });
        }

        Ok(candidates)
    }

    /// Renders an XMLTV document for the given teams (or every configured
    /// team) on demand, without touching a processing run or the on-disk
    /// `teams.xml` — backs the read-only `GET /epg/xmltv` admin route.
    pub async fn render_teams_xmltv(
        &self,
        team_ids: Option<Vec<Uuid>>,
        days_ahead: u32,
    ) -> AppResult<String> {
        let (programmes, _, _) = self.run_team_generation(team_ids, days_ahead).await?;
        let tv = crate::services::epg::consolidator::build_document(&programmes);
        crate::services::epg::xmltv::write_xml(&tv)
    }

    /// Renders an XMLTV document for the currently active channels of every
    /// event group whose leagues intersect `leagues` (all groups, if empty)
    /// on `target_date`, without touching a processing run or any on-disk
    /// fragment — backs the read-only `GET /epg/events/xmltv` admin route.
    pub async fn render_events_xmltv(
        &self,
        leagues: Vec<String>,
        target_date: Option<NaiveDate>,
    ) -> AppResult<String> {
        let target_date = target_date.unwrap_or_else(|| Utc::now().date_naive());
        let all_groups = self.event_groups.find_all().await?;
        let groups: Vec<EventEpgGroupRecord> = all_groups
            .into_iter()
            .filter(|g| leagues.is_empty() || g.leagues.iter().any(|l| leagues.contains(l)))
            .collect();

        let mut programmes = Vec::new();
        for group in &groups {
            let Some(template) = self.templates.find_by_id(&group.template_id).await? else {
                warn!("event group {} references missing template {}, skipping render", group.id, group.template_id);
                continue;
            };
            let active_channels = self.managed_channels.find_active_by_group(&group.id).await?;
            if active_channels.is_empty() {
                continue;
            }

            let mut events_by_id: HashMap<String, Event> = HashMap::new();
            for league in &group.leagues {
                for event in self.sports_data.get_events(league).await? {
                    if event.start_time.date_naive() == target_date {
                        events_by_id.insert(event.id.clone(), event);
                    }
                }
            }

            let channel_events: Vec<(crate::models::records::ManagedChannelRecord, Event)> = active_channels
                .into_iter()
                .filter_map(|channel| {
                    events_by_id
                        .get(&channel.event_id)
                        .cloned()
                        .map(|event| (channel, event))
                })
                .collect();
            let matches: Vec<MatchedEvent> = channel_events
                .iter()
                .map(|(channel, event)| MatchedEvent { channel, event })
                .collect();

            programmes.extend(EventGenerator::new(&template).generate(&matches));
        }

        let tv = crate::services::epg::consolidator::build_document(&programmes);
        crate::services::epg::xmltv::write_xml(&tv)
    }
}
