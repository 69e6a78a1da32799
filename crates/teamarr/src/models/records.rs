//! Domain shapes repositories hand back to services — entity rows with
//! their `Json` columns deserialized into the typed structs above.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{DescriptionOption, FillerConfig};

#[derive(Clone, Debug, PartialEq)]
pub struct TemplateRecord {
    pub id: Uuid,
    pub name: String,
    pub template_type: String,
    pub title_pattern: String,
    pub subtitle_pattern: Option<String>,
    pub description_pattern: Option<String>,
    pub pregame_minutes: i32,
    pub default_duration_minutes: i32,
    pub filler_config: FillerConfig,
    pub description_options: Vec<DescriptionOption>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TeamConfigRecord {
    pub id: Uuid,
    pub provider: String,
    pub provider_team_id: String,
    pub league: String,
    pub channel_id: String,
    pub display_name: Option<String>,
    pub template_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EventEpgGroupRecord {
    pub id: Uuid,
    pub host_group_id: String,
    pub name: String,
    pub leagues: Vec<String>,
    pub include_leagues: Vec<String>,
    pub exception_keywords: Vec<String>,
    pub refresh_interval_minutes: i32,
    pub channel_start: Option<i32>,
    pub create_timing: String,
    pub delete_timing: String,
    pub timezone: String,
    pub template_id: Uuid,
    pub epg_source_id: Option<String>,
    pub stream_count: i32,
    pub matched_count: i32,
    pub last_refresh: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventEpgGroupRecord {
    /// `None` means the group is matched/cached but never drives channels.
    pub fn manages_channels(&self) -> bool {
        self.channel_start.is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ManagedChannelRecord {
    pub id: Uuid,
    pub event_epg_group_id: Uuid,
    pub host_channel_id: String,
    pub host_stream_id: String,
    pub channel_number: i32,
    pub event_id: String,
    pub league: String,
    pub channel_name: String,
    pub scheduled_delete_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ManagedChannelRecord {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StreamMatchCacheRecord {
    pub id: Uuid,
    pub fingerprint: String,
    pub group_id: Uuid,
    pub stream_id: String,
    pub stream_name: String,
    pub event_id: String,
    pub league: String,
    pub cached_event_data: super::Event,
    pub last_seen_generation: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessingRunMetrics {
    #[allow(dead_code)]
    pub extra: std::collections::BTreeMap<String, serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProcessingRunRecord {
    pub id: Uuid,
    pub run_type: String,
    pub group_id: Option<Uuid>,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub streams_fetched: i32,
    pub streams_matched: i32,
    pub streams_unmatched: i32,
    pub streams_cached: i32,
    pub programmes_total: i32,
    pub programmes_events: i32,
    pub programmes_pregame: i32,
    pub programmes_postgame: i32,
    pub programmes_idle: i32,
    pub error_message: Option<String>,
    pub metrics: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchedStreamRecord {
    pub id: Uuid,
    pub run_id: Uuid,
    pub group_id: Uuid,
    pub stream_id: String,
    pub stream_name: String,
    pub event_id: String,
    pub league: String,
    pub included: bool,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FailedMatchRecord {
    pub id: Uuid,
    pub run_id: Uuid,
    pub group_id: Uuid,
    pub stream_id: String,
    pub stream_name: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TeamAliasRecord {
    pub id: Uuid,
    pub alias: String,
    pub league: String,
    pub provider_team_id: String,
    pub provider_team_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SettingsRecord {
    pub generation_counter: i64,
    pub schema_version: i32,
    pub updated_at: DateTime<Utc>,
}
