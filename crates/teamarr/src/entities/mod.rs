//! SeaORM entity definitions, one module per table.

pub mod failed_match;
pub mod managed_channel;
pub mod matched_stream;
pub mod processing_run;
pub mod settings;
pub mod stream_match_cache;
pub mod team_alias;
pub mod team_config;
pub mod event_epg_group;
pub mod template;

pub mod prelude {
    pub use super::event_epg_group::Entity as EventEpgGroups;
    pub use super::failed_match::Entity as FailedMatches;
    pub use super::managed_channel::Entity as ManagedChannels;
    pub use super::matched_stream::Entity as MatchedStreams;
    pub use super::processing_run::Entity as ProcessingRuns;
    pub use super::settings::Entity as Settings;
    pub use super::stream_match_cache::Entity as StreamMatchCache;
    pub use super::team_alias::Entity as TeamAliases;
    pub use super::team_config::Entity as TeamConfigs;
    pub use super::template::Entity as Templates;
}
