mod load;
mod save;

pub use load::load_game;
pub use save::save_game;

use crate::sim::state::GameState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const SAVE_VERSION: u32 = 1;

/// Fields whose presence marks a document as one of our saves.
const RECOGNIZED_FIELDS: [&str; 3] = ["funds", "volunteers", "activities"];

#[derive(Debug, Serialize, Deserialize)]
struct SaveEnvelope<S> {
    state: S,
    version: u32,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("missing required fields: expected at least one of funds, volunteers, activities")]
    MissingFields,
    #[error("save could not be read: {0}")]
    Other(String),
}

pub fn export_save(state: &GameState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SaveEnvelope {
        state,
        version: SAVE_VERSION,
    })
}

/// Accepts either the `{state, version}` envelope or a bare state object.
pub fn import_save(text: &str) -> Result<GameState, ImportError> {
    let document: Value = serde_json::from_str(text).map_err(ImportError::InvalidJson)?;
    let state = match document {
        Value::Object(mut map) if map.get("state").is_some_and(Value::is_object) => map
            .remove("state")
            .ok_or_else(|| ImportError::Other("state vanished".to_string()))?,
        other => other,
    };
    let Value::Object(fields) = &state else {
        return Err(ImportError::MissingFields);
    };
    if !RECOGNIZED_FIELDS.iter().any(|field| fields.contains_key(*field)) {
        return Err(ImportError::MissingFields);
    }
    serde_json::from_value(state).map_err(|err| ImportError::Other(err.to_string()))
}
