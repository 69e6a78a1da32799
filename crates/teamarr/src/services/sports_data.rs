//! Thin orchestration over an ordered list of [`SportsProvider`]s.
//!
//! A league is routed to the first configured provider that claims to
//! support it; if that provider returns an empty result the next provider
//! in the list is tried. No caching happens here — that lives in the
//! stream-match cache and the on-disk EPG artefacts further downstream.

use std::sync::Arc;

use crate::errors::ProviderResult;
use crate::models::Event;
use crate::providers::SportsProvider;

pub struct SportsDataService {
    providers: Vec<Arc<dyn SportsProvider>>,
}

impl SportsDataService {
    pub fn new(providers: Vec<Arc<dyn SportsProvider>>) -> Self {
        Self { providers }
    }

    /// The provider list, in priority order, for leagues the caller already
    /// knows it wants to query (used by the matchers to build per-league
    /// provider handles).
    pub fn provider_for(&self, league: &str) -> Option<Arc<dyn SportsProvider>> {
        self.providers
            .iter()
            .find(|p| p.supports_league(league))
            .cloned()
    }

    pub async fn get_events(&self, league: &str) -> ProviderResult<Vec<Event>> {
        for provider in &self.providers {
            if !provider.supports_league(league) {
                continue;
            }
            let events = provider.get_events(league).await?;
            if !events.is_empty() {
                return Ok(events);
            }
        }
        Ok(Vec::new())
    }

    pub async fn get_team_schedule(&self, league: &str, team_id: &str) -> ProviderResult<Vec<Event>> {
        for provider in &self.providers {
            if !provider.supports_league(league) {
                continue;
            }
            let events = provider.get_team_schedule(league, team_id).await?;
            if !events.is_empty() {
                return Ok(events);
            }
        }
        Ok(Vec::new())
    }

    pub async fn get_event(&self, league: &str, event_id: &str) -> ProviderResult<Option<Event>> {
        for provider in &self.providers {
            if !provider.supports_league(league) {
                continue;
            }
            if let Some(event) = provider.get_event(league, event_id).await? {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }
}
