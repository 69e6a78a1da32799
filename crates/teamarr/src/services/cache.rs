//! Service-layer wrapper around [`StreamMatchCacheRepository`] implementing
//! the refresh contract: a cache hit re-fetches only the single matched
//! event from its provider and merges the dynamic fields (score, status,
//! clock) into the cached snapshot, rather than re-running the fuzzy
//! matcher against the whole league every run.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use uuid::Uuid;

use crate::database::repositories::stream_match_cache::StreamMatchCacheRepository;
use crate::errors::AppResult;
use crate::models::Event;
use crate::providers::SportsProvider;

/// Cached entries whose event can no longer be resolved by the provider are
/// kept around for this many consecutive generations before eviction, in
/// case the miss is a transient provider outage rather than the event
/// having actually disappeared.
const UNRESOLVABLE_EVICTION_THRESHOLD: u32 = 3;

pub enum CacheLookup {
    /// No cached entry; caller should run the full matcher.
    Miss,
    /// A cached entry, refreshed against the provider where possible.
    Hit(Event),
}

pub struct CacheService {
    repository: StreamMatchCacheRepository,
    /// Consecutive generations an entry's event id failed to resolve,
    /// keyed by cache fingerprint. Not persisted: a process restart simply
    /// resets the grace period, which is an acceptable simplification for
    /// what's ultimately a performance optimization, not a correctness
    /// requirement.
    unresolved_streak: Mutex<HashMap<String, u32>>,
}

impl CacheService {
    pub fn new(repository: StreamMatchCacheRepository) -> Self {
        Self {
            repository,
            unresolved_streak: Mutex::new(HashMap::new()),
        }
    }

    pub async fn lookup(
        &self,
        provider: &Arc<dyn SportsProvider>,
        group_id: &Uuid,
        stream_id: &str,
        stream_name: &str,
        league: &str,
        generation: i64,
    ) -> AppResult<CacheLookup> {
        let Some(cached) = self.repository.get(group_id, stream_id, stream_name).await? else {
            return Ok(CacheLookup::Miss);
        };

        let fingerprint = crate::database::repositories::stream_match_cache::fingerprint(
            group_id,
            stream_id,
            stream_name,
        );

        match provider.get_event(league, &cached.event_id).await {
            Ok(Some(fresh)) => {
                self.unresolved_streak.lock().unwrap().remove(&fingerprint);
                let mut merged = cached.cached_event_data.clone();
                merged.merge_dynamic_fields(&fresh);
                self.repository
                    .set(group_id, stream_id, stream_name, &cached.event_id, league, &merged, generation)
                    .await?;
                Ok(CacheLookup::Hit(merged))
            }
            Ok(None) => {
                let mut streaks = self.unresolved_streak.lock().unwrap();
                let streak = streaks.entry(fingerprint.clone()).or_insert(0);
                *streak += 1;
                if *streak >= UNRESOLVABLE_EVICTION_THRESHOLD {
                    drop(streaks);
                    self.unresolved_streak.lock().unwrap().remove(&fingerprint);
                    self.repository.delete(group_id, stream_id, stream_name).await?;
                    return Ok(CacheLookup::Miss);
                }
                drop(streaks);
                self.repository
                    .touch(group_id, stream_id, stream_name, generation)
                    .await?;
                Ok(CacheLookup::Hit(cached.cached_event_data))
            }
            Err(_) => {
                // Transient provider failure: serve the last known snapshot
                // unchanged rather than treating it as unresolvable.
                self.repository
                    .touch(group_id, stream_id, stream_name, generation)
                    .await?;
                Ok(CacheLookup::Hit(cached.cached_event_data))
            }
        }
    }

    pub async fn store(
        &self,
        group_id: &Uuid,
        stream_id: &str,
        stream_name: &str,
        event_id: &str,
        league: &str,
        event: &Event,
        generation: i64,
    ) -> AppResult<()> {
        self.repository
            .set(group_id, stream_id, stream_name, event_id, league, event, generation)
            .await?;
        Ok(())
    }
}
