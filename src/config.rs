use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub const CONFIG_FILE: &str = "utopia.ron";

/// Tuning knobs that are not content. Every field falls back to its default
/// so a partial `utopia.ron` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Largest delta a single tick may simulate.
    pub tick_max_delta_ms: u64,
    pub offline_max_seconds: u64,
    /// Absences at or below this are ignored by offline reconciliation.
    pub offline_noise_seconds: u64,
    pub prestige_divisor: f64,
    pub volunteer_bonus: f64,
    pub canvass_base_value: f64,
    pub momentum_per_canvass: f64,
    pub momentum_decay_per_sec: f64,
    /// Each volunteer slows momentum decay by this fraction.
    pub volunteer_decay_dampening: f64,
    pub baseline_happiness: f64,
    pub debate_loss_happiness_penalty: f64,
    pub enemy_turn_delay_ms: u64,
    pub event_interval_secs: u64,
    pub event_chance: f64,
    pub dilemma_interval_secs: u64,
    pub dilemma_chance: f64,
    pub mini_game_duration_ms: u64,
    pub autosave_secs: u64,
    pub save_path: PathBuf,
    /// Target of the export key and source of the import key.
    pub export_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_max_delta_ms: 100,
            offline_max_seconds: 8 * 60 * 60,
            offline_noise_seconds: 10,
            prestige_divisor: 1e12,
            volunteer_bonus: 0.02,
            canvass_base_value: 1.0,
            momentum_per_canvass: 2.0,
            momentum_decay_per_sec: 2.0,
            volunteer_decay_dampening: 0.01,
            baseline_happiness: 50.0,
            debate_loss_happiness_penalty: 10.0,
            enemy_turn_delay_ms: 900,
            event_interval_secs: 45,
            event_chance: 0.5,
            dilemma_interval_secs: 120,
            dilemma_chance: 0.6,
            mini_game_duration_ms: 10_000,
            autosave_secs: 15,
            save_path: PathBuf::from("utopia_save.json"),
            export_path: PathBuf::from("utopia_export.json"),
            log_path: PathBuf::from("utopia.log"),
        }
    }
}

impl GameConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match fs::read_to_string(&path) {
            Ok(content) => ron::from_str(&content)
                .with_context(|| format!("malformed config file {}", path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }
}
