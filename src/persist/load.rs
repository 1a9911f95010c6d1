use super::import_save;
use crate::sim::state::GameState;
use anyhow::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub fn load_game(path: &Path) -> Result<Option<GameState>> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let state = import_save(&content)?;
            Ok(Some(state))
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::save_game;

    #[test]
    fn saved_file_loads_back() {
        let path = std::env::temp_dir().join(format!("utopia-save-{}.json", std::process::id()));
        let mut state = GameState::default();
        state.funds = 55.0;
        save_game(&path, &state).unwrap();
        let loaded = load_game(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, Some(state));
    }

    #[test]
    fn missing_file_is_a_fresh_start() {
        let path = std::env::temp_dir().join("utopia-save-does-not-exist.json");
        assert_eq!(load_game(&path).unwrap(), None);
    }
}
