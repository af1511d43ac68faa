//! Month records on the key-value store.
//!
//! Records are addressed by `habit:v1:<year>-<MM>` and stored as JSON text.
//! Unreadable entries are treated exactly like missing ones.

use anyhow::Result;
use log::{debug, warn};

use crate::state::{MonthState, PersistedRecord};
use crate::store::KvStore;

const KEY_PREFIX: &str = "habit:v1";

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("stored record is empty")]
    Empty,
    #[error("stored record is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Storage address of a month (`month` is 1-based).
pub fn storage_key(year: i32, month: u32) -> String {
    format!("{KEY_PREFIX}:{year}-{month:02}")
}

/// Decodes stored text into a raw record.
pub fn parse(text: &str) -> Result<PersistedRecord, CodecError> {
    if text.is_empty() {
        return Err(CodecError::Empty);
    }
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(PersistedRecord::from_value(&value))
}

pub fn serialize(state: &MonthState) -> String {
    // Plain strings and bools cannot fail to serialize.
    serde_json::to_string(state).unwrap_or_default()
}

/// Reads the record of a month, `None` when it is absent or unreadable.
pub fn load<S: KvStore + ?Sized>(store: &S, year: i32, month: u32) -> Option<PersistedRecord> {
    let key = storage_key(year, month);
    let raw = match store.get(&key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("event=record_load module=codec status=absent key={key}");
            return None;
        }
        Err(err) => {
            warn!("event=record_load module=codec status=store_error key={key} error={err}");
            return None;
        }
    };

    match parse(&raw) {
        Ok(record) => Some(record),
        Err(CodecError::Empty) => None,
        Err(err) => {
            warn!("event=record_load module=codec status=discarded key={key} error={err}");
            None
        }
    }
}

/// Writes the canonical state of a month, replacing any previous record.
pub fn save<S: KvStore + ?Sized>(
    store: &mut S,
    year: i32,
    month: u32,
    state: &MonthState,
) -> Result<()> {
    let key = storage_key(year, month);
    store.set(&key, &serialize(state))
}
