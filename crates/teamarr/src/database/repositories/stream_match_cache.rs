//! SeaORM-backed repository for
//! [`stream_match_cache`](crate::entities::stream_match_cache).

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use super::traits::ConversionUtils;
use crate::entities::{prelude::StreamMatchCache as StreamMatchCacheEntity, stream_match_cache};
use crate::errors::StorageResult;
use crate::models::Event;
use crate::models::records::StreamMatchCacheRecord;

/// Truncated SHA-256 of `group_id:stream_id:stream_name` (16 hex chars).
/// Collisions at this width are accepted given the cardinality; the hash
/// never leaves the cache.
pub fn fingerprint(group_id: &Uuid, stream_id: &str, stream_name: &str) -> String {
    let input = format!("{group_id}:{stream_id}:{stream_name}");
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(digest)[..16].to_string()
}

#[derive(Clone)]
pub struct StreamMatchCacheRepository {
    connection: Arc<DatabaseConnection>,
}

impl StreamMatchCacheRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn get(
        &self,
        group_id: &Uuid,
        stream_id: &str,
        stream_name: &str,
    ) -> StorageResult<Option<StreamMatchCacheRecord>> {
        let fp = fingerprint(group_id, stream_id, stream_name);
        match StreamMatchCacheEntity::find()
            .filter(stream_match_cache::Column::Fingerprint.eq(fp))
            .one(&*self.connection)
            .await?
        {
            Some(model) => Ok(Some(self.model_to_domain(model)?)),
            None => Ok(None),
        }
    }

    /// Upserts on fingerprint conflict, updating all fields including the
    /// generation.
    pub async fn set(
        &self,
        group_id: &Uuid,
        stream_id: &str,
        stream_name: &str,
        event_id: &str,
        league: &str,
        cached_event_data: &Event,
        generation: i64,
    ) -> StorageResult<()> {
        let fp = fingerprint(group_id, stream_id, stream_name);
        let now = chrono::Utc::now();
        let payload = ConversionUtils::to_json(cached_event_data)?;

        let existing = StreamMatchCacheEntity::find()
            .filter(stream_match_cache::Column::Fingerprint.eq(fp.clone()))
            .one(&*self.connection)
            .await?;

        match existing {
            Some(model) => {
                let mut active: stream_match_cache::ActiveModel = model.into();
                active.event_id = Set(event_id.to_string());
                active.league = Set(league.to_string());
                active.cached_event_data = Set(payload);
                active.last_seen_generation = Set(generation);
                active.updated_at = Set(now);
                active.update(&*self.connection).await?;
            }
            None => {
                let active = stream_match_cache::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    fingerprint: Set(fp),
                    group_id: Set(*group_id),
                    stream_id: Set(stream_id.to_string()),
                    stream_name: Set(stream_name.to_string()),
                    event_id: Set(event_id.to_string()),
                    league: Set(league.to_string()),
                    cached_event_data: Set(payload),
                    last_seen_generation: Set(generation),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                active.insert(&*self.connection).await?;
            }
        }
        Ok(())
    }

    /// Marks a cache hit as still live so `purge_stale` doesn't evict it.
    pub async fn touch(
        &self,
        group_id: &Uuid,
        stream_id: &str,
        stream_name: &str,
        generation: i64,
    ) -> StorageResult<()> {
        let fp = fingerprint(group_id, stream_id, stream_name);
        if let Some(model) = StreamMatchCacheEntity::find()
            .filter(stream_match_cache::Column::Fingerprint.eq(fp))
            .one(&*self.connection)
            .await?
        {
            let now = chrono::Utc::now();
            let mut active: stream_match_cache::ActiveModel = model.into();
            active.last_seen_generation = Set(generation);
            active.updated_at = Set(now);
            active.update(&*self.connection).await?;
        }
        Ok(())
    }

    /// Deletes entries whose `last_seen_generation < current_generation - n`.
    pub async fn purge_stale(&self, current_generation: i64, n: i64) -> StorageResult<u64> {
        let cutoff = current_generation - n;
        let result = StreamMatchCacheEntity::delete_many()
            .filter(stream_match_cache::Column::LastSeenGeneration.lt(cutoff))
            .exec(&*self.connection)
            .await?;
        Ok(result.rows_affected)
    }

    /// Deletes a single entry by its natural key, used when an entry's
    /// event id has been unresolvable for too many generations in a row.
    pub async fn delete(
        &self,
        group_id: &Uuid,
        stream_id: &str,
        stream_name: &str,
    ) -> StorageResult<()> {
        let fp = fingerprint(group_id, stream_id, stream_name);
        StreamMatchCacheEntity::delete_many()
            .filter(stream_match_cache::Column::Fingerprint.eq(fp))
            .exec(&*self.connection)
            .await?;
        Ok(())
    }

    pub async fn clear_group(&self, group_id: &Uuid) -> StorageResult<u64> {
        let result = StreamMatchCacheEntity::delete_many()
            .filter(stream_match_cache::Column::GroupId.eq(*group_id))
            .exec(&*self.connection)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn clear_all(&self) -> StorageResult<u64> {
        let result = StreamMatchCacheEntity::delete_many().exec(&*self.connection).await?;
        Ok(result.rows_affected)
    }

    fn model_to_domain(
        &self,
        model: stream_match_cache::Model,
    ) -> StorageResult<StreamMatchCacheRecord> {
        Ok(StreamMatchCacheRecord {
            id: model.id,
            fingerprint: model.fingerprint,
            group_id: model.group_id,
            stream_id: model.stream_id,
            stream_name: model.stream_name,
            event_id: model.event_id,
            league: model.league,
            cached_event_data: ConversionUtils::from_json(model.cached_event_data)?,
            last_seen_generation: model.last_seen_generation,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_16_hex_chars_and_deterministic() {
        let group_id = Uuid::new_v4();
        let a = fingerprint(&group_id, "stream-1", "ESPN: Cowboys at Eagles");
        let b = fingerprint(&group_id, "stream-1", "ESPN: Cowboys at Eagles");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
