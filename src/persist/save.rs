use super::export_save;
use crate::sim::state::GameState;
use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Writes through a temporary file so a crash never leaves half a save.
pub fn save_game(path: &Path, state: &GameState) -> Result<()> {
    let serialized = export_save(state)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serialized)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), run_id = state.run_id, "game saved");
    Ok(())
}
