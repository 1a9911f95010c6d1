use super::content::{self, ACTIVITIES};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityState {
    pub owned: u32,
    /// Elapsed milliseconds in the current cycle.
    pub progress: f64,
    pub manager_hired: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuyMode {
    #[default]
    X1,
    X10,
    X100,
    Next,
    Max,
}

impl BuyMode {
    pub fn next(self) -> Self {
        match self {
            BuyMode::X1 => BuyMode::X10,
            BuyMode::X10 => BuyMode::X100,
            BuyMode::X100 => BuyMode::Next,
            BuyMode::Next => BuyMode::Max,
            BuyMode::Max => BuyMode::X1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BuyMode::X1 => "x1",
            BuyMode::X10 => "x10",
            BuyMode::X100 => "x100",
            BuyMode::Next => "NEXT",
            BuyMode::Max => "MAX",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvent {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveDilemma {
    pub id: String,
}

/// Everything the player has earned. Persisted whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub funds: f64,
    pub lifetime_earnings: f64,
    pub highest_lifetime_earnings: f64,
    /// Earnings since the last prestige. Rank and debate gates read this.
    pub run_earnings: f64,
    /// Spendable volunteers; structures and angel upgrades draw from this.
    pub volunteers: f64,
    /// Every volunteer prestige has ever granted, spent or not.
    pub volunteers_earned: f64,
    pub popularity: f64,
    pub momentum: f64,
    pub happiness: f64,
    pub activities: BTreeMap<String, ActivityState>,
    pub unlocked_policies: BTreeSet<String>,
    pub unlocked_structures: BTreeSet<String>,
    pub unlocked_angel_upgrades: BTreeSet<String>,
    pub unlocked_skills: BTreeSet<String>,
    pub unlocked_memories: BTreeSet<String>,
    /// Milestone keys already announced this run.
    pub applied_milestones: BTreeSet<String>,
    pub current_stage_index: usize,
    pub current_rank_id: String,
    pub xp: f64,
    pub level: u32,
    pub skill_points: u32,
    pub buy_mode: BuyMode,
    pub active_event: Option<ActiveEvent>,
    pub active_dilemma: Option<ActiveDilemma>,
    pub total_clicks: u64,
    pub debates_won: u32,
    pub debates_lost: u32,
    pub prestige_count: u32,
    pub last_save_timestamp: i64,
    pub run_id: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            funds: 0.0,
            lifetime_earnings: 0.0,
            highest_lifetime_earnings: 0.0,
            run_earnings: 0.0,
            volunteers: 0.0,
            volunteers_earned: 0.0,
            popularity: 1.0,
            momentum: 0.0,
            happiness: 50.0,
            activities: default_activities(),
            unlocked_policies: BTreeSet::new(),
            unlocked_structures: BTreeSet::new(),
            unlocked_angel_upgrades: BTreeSet::new(),
            unlocked_skills: BTreeSet::new(),
            unlocked_memories: BTreeSet::new(),
            applied_milestones: BTreeSet::new(),
            current_stage_index: 0,
            current_rank_id: content::baseline_rank().id.to_string(),
            xp: 0.0,
            level: 1,
            skill_points: 0,
            buy_mode: BuyMode::default(),
            active_event: None,
            active_dilemma: None,
            total_clicks: 0,
            debates_won: 0,
            debates_lost: 0,
            prestige_count: 0,
            last_save_timestamp: 0,
            run_id: 0,
        }
    }
}

pub fn default_activities() -> BTreeMap<String, ActivityState> {
    ACTIVITIES
        .iter()
        .map(|def| (def.id.to_string(), ActivityState::default()))
        .collect()
}

impl GameState {
    pub fn total_owned(&self) -> u32 {
        self.activities.values().map(|entry| entry.owned).sum()
    }

    pub fn owned(&self, activity_id: &str) -> u32 {
        self.activities
            .get(activity_id)
            .map(|entry| entry.owned)
            .unwrap_or(0)
    }

    /// Credits earned funds to both balances at once.
    pub fn credit(&mut self, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        self.funds += amount;
        self.lifetime_earnings += amount;
        self.run_earnings += amount;
        if self.lifetime_earnings > self.highest_lifetime_earnings {
            self.highest_lifetime_earnings = self.lifetime_earnings;
        }
    }

    /// Debits spendable funds without touching lifetime earnings.
    pub fn debit(&mut self, amount: f64) {
        self.funds = (self.funds - amount.max(0.0)).max(0.0);
    }

    pub fn clamp_meters(&mut self) {
        self.momentum = self.momentum.clamp(0.0, 100.0);
        self.happiness = self.happiness.clamp(0.0, 100.0);
        self.popularity = self.popularity.max(0.1);
        self.funds = self.funds.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_moves_both_balances_and_high_water_mark() {
        let mut state = GameState::default();
        state.credit(25.0);
        state.debit(10.0);
        assert_eq!(state.funds, 15.0);
        assert_eq!(state.lifetime_earnings, 25.0);
        assert_eq!(state.run_earnings, 25.0);
        assert_eq!(state.highest_lifetime_earnings, 25.0);
        state.credit(-5.0);
        state.credit(f64::NAN);
        assert_eq!(state.lifetime_earnings, 25.0);
    }

    #[test]
    fn debit_never_drives_funds_negative() {
        let mut state = GameState::default();
        state.credit(3.0);
        state.debit(10.0);
        assert_eq!(state.funds, 0.0);
    }

    #[test]
    fn buy_mode_cycles_through_every_variant() {
        let mut mode = BuyMode::X1;
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(mode, BuyMode::X1);
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn default_state_has_an_entry_per_activity() {
        let state = GameState::default();
        assert_eq!(state.activities.len(), ACTIVITIES.len());
        assert_eq!(state.total_owned(), 0);
    }
}
