//! One SeaORM-backed repository per persisted entity.

pub mod event_epg_group;
pub mod failed_match;
pub mod managed_channel;
pub mod matched_stream;
pub mod processing_run;
pub mod settings;
pub mod stream_match_cache;
pub mod team_alias;
pub mod team_config;
pub mod template;
pub mod traits;

pub use event_epg_group::EventEpgGroupRepository;
pub use failed_match::FailedMatchRepository;
pub use managed_channel::ManagedChannelRepository;
pub use matched_stream::MatchedStreamRepository;
pub use processing_run::ProcessingRunRepository;
pub use settings::SettingsRepository;
pub use stream_match_cache::StreamMatchCacheRepository;
pub use team_alias::TeamAliasRepository;
pub use team_config::TeamConfigRepository;
pub use template::TemplateRepository;
