//! Shared helpers for SeaORM repository implementations.

use crate::errors::{StorageError, StorageResult};
use serde::{Serialize, de::DeserializeOwned};

/// JSON (de)serialization for the `Json` columns entities carry, surfacing
/// failures as [`StorageError::SerializationFailed`] instead of panicking.
pub struct ConversionUtils;

impl ConversionUtils {
    pub fn to_json<T: Serialize>(value: &T) -> StorageResult<serde_json::Value> {
        serde_json::to_value(value).map_err(StorageError::SerializationFailed)
    }

    pub fn from_json<T: DeserializeOwned>(value: serde_json::Value) -> StorageResult<T> {
        serde_json::from_value(value).map_err(StorageError::SerializationFailed)
    }
}
