use super::content::{
    self, ACTIVITIES, ActivityDef, AngelEffect, GLOBAL_MILESTONES, MOMENTUM_TIERS, PolicyEffect,
    SkillEffect,
};
use super::debate::DebateMove;
use super::formulas::{self, RevenueFactors};
use super::interactions::{DebateSession, MiniGame};
use super::state::{ActivityState, BuyMode, GameState, default_activities};
use crate::config::GameConfig;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const MAX_NOTIFICATIONS: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
}

/// The most recent policy purchase, staged for the UI to animate.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicySummary {
    pub id: &'static str,
    pub name: &'static str,
    pub happiness_delta: f64,
    pub popularity_delta: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("not enough funds (requires {cost:.0})")]
    InsufficientFunds { cost: f64 },
    #[error("not enough volunteers (requires {cost:.0})")]
    InsufficientVolunteers { cost: f64 },
    #[error("not enough skill points (requires {cost})")]
    InsufficientSkillPoints { cost: u32 },
    #[error("{0} is already owned")]
    AlreadyOwned(String),
    #[error("{0} is not available yet")]
    Locked(String),
    #[error("unknown id {0}")]
    UnknownId(String),
    #[error("finish the current interaction first")]
    ModalActive,
    #[error("nothing to gain right now")]
    NothingToGain,
    #[error("Utopia is built; there is no one left to debate")]
    CampaignComplete,
    #[error("no active interaction")]
    NotActive,
    #[error("{0}")]
    Move(#[from] super::debate::MoveError),
}

pub struct Game {
    pub state: GameState,
    pub(super) config: GameConfig,
    pub(super) rng: StdRng,
    pub(super) notifications: VecDeque<Notification>,
    pub(super) next_notification_id: u64,
    pub(super) last_policy: Option<PolicySummary>,
    pub(super) debate: Option<DebateSession>,
    pub(super) next_encounter_id: u64,
    pub(super) mini_game: Option<MiniGame>,
    pub(super) event_timer: Duration,
    pub(super) dilemma_timer: Duration,
    /// Raised before a hard reset clears state; the next tick discards its delta.
    pub(super) reset_in_progress: bool,
}

impl Game {
    pub fn fresh(config: GameConfig) -> Self {
        let state = GameState {
            happiness: config.baseline_happiness,
            ..GameState::default()
        };
        Self::from_state(state, config)
    }

    pub fn from_state(state: GameState, config: GameConfig) -> Self {
        Self::with_rng(state, config, StdRng::from_entropy())
    }

    pub fn with_seed(state: GameState, config: GameConfig, seed: u64) -> Self {
        Self::with_rng(state, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(state: GameState, config: GameConfig, rng: StdRng) -> Self {
        Self {
            state: normalize(state),
            config,
            rng,
            notifications: VecDeque::with_capacity(MAX_NOTIFICATIONS),
            next_notification_id: 1,
            last_policy: None,
            debate: None,
            next_encounter_id: 1,
            mini_game: None,
            event_timer: Duration::ZERO,
            dilemma_timer: Duration::ZERO,
            reset_in_progress: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    pub fn notify<S: Into<String>>(&mut self, message: S) {
        if self.notifications.len() >= MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        let id = self.next_notification_id;
        self.next_notification_id += 1;
        self.notifications.push_back(Notification {
            id,
            message: message.into(),
        });
    }

    pub fn dismiss_notification(&mut self, id: u64) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|notification| notification.id != id);
        before != self.notifications.len()
    }

    pub fn dismiss_oldest_notification(&mut self) -> bool {
        let oldest = self.notifications.front().map(|notification| notification.id);
        oldest.is_some_and(|id| self.dismiss_notification(id))
    }

    pub fn last_policy(&self) -> Option<&PolicySummary> {
        self.last_policy.as_ref()
    }

    pub fn clear_last_policy(&mut self) {
        self.last_policy = None;
    }

    // -- derived values ---------------------------------------------------

    pub(super) fn skill_product(&self, pick: impl Fn(SkillEffect) -> Option<f64>) -> f64 {
        self.state
            .unlocked_skills
            .iter()
            .filter_map(|id| content::skill(id))
            .filter_map(|def| pick(def.effect))
            .product()
    }

    fn angel_product(&self, pick: impl Fn(AngelEffect) -> Option<f64>) -> f64 {
        self.state
            .unlocked_angel_upgrades
            .iter()
            .filter_map(|id| content::angel_upgrade(id))
            .filter_map(|def| pick(def.effect))
            .product()
    }

    fn policy_product(&self, pick: impl Fn(PolicyEffect) -> Option<f64>) -> f64 {
        self.state
            .unlocked_policies
            .iter()
            .filter_map(|id| content::policy(id))
            .filter_map(|def| pick(def.effect))
            .product()
    }

    pub fn revenue_factors(&self) -> RevenueFactors {
        let structures: f64 = self
            .state
            .unlocked_structures
            .iter()
            .filter_map(|id| content::power_structure(id))
            .map(|def| def.revenue_multiplier)
            .product();
        let angels = self.angel_product(|effect| match effect {
            AngelEffect::GlobalRevenue(multiplier) => Some(multiplier),
            _ => None,
        });
        RevenueFactors {
            popularity: self.state.popularity,
            volunteer: formulas::volunteer_multiplier(
                self.state.volunteers,
                self.config.volunteer_bonus,
            ),
            momentum: formulas::momentum_multiplier(self.state.momentum, &MOMENTUM_TIERS),
            policy: self.policy_product(|effect| match effect {
                PolicyEffect::GlobalRevenue(multiplier) => Some(multiplier),
                _ => None,
            }),
            global_milestone: formulas::threshold_product(
                self.state.total_owned(),
                GLOBAL_MILESTONES
                    .iter()
                    .map(|step| (step.threshold, step.multiplier)),
            ),
            power_structure: structures * angels,
        }
    }

    /// Global revenue multiplier; the tick loop and every display use this.
    pub fn revenue_multiplier(&self) -> f64 {
        self.revenue_factors().total()
    }

    pub fn activity_speed_multiplier(&self, def: &ActivityDef) -> f64 {
        let owned = self.state.owned(def.id);
        let milestones = formulas::threshold_product(
            owned,
            def.milestones.iter().filter_map(|step| match step.effect {
                content::MilestoneEffect::Speed(multiplier) => Some((step.threshold, multiplier)),
                content::MilestoneEffect::Revenue(_) => None,
            }),
        );
        let policies = self.policy_product(|effect| match effect {
            PolicyEffect::ActivitySpeed {
                activity,
                multiplier,
            } if activity == def.id => Some(multiplier),
            _ => None,
        });
        let skills = self.skill_product(|effect| match effect {
            SkillEffect::ActivitySpeed(multiplier) => Some(multiplier),
            _ => None,
        });
        let angels = self.angel_product(|effect| match effect {
            AngelEffect::GlobalSpeed(multiplier) => Some(multiplier),
            _ => None,
        });
        milestones * policies * skills * angels
    }

    pub fn activity_revenue_multiplier(&self, def: &ActivityDef) -> f64 {
        let owned = self.state.owned(def.id);
        let milestones = formulas::threshold_product(
            owned,
            def.milestones.iter().filter_map(|step| match step.effect {
                content::MilestoneEffect::Revenue(multiplier) => Some((step.threshold, multiplier)),
                content::MilestoneEffect::Speed(_) => None,
            }),
        );
        let policies = self.policy_product(|effect| match effect {
            PolicyEffect::ActivityRevenue {
                activity,
                multiplier,
            } if activity == def.id => Some(multiplier),
            _ => None,
        });
        milestones * policies
    }

    /// Revenue of one completed cycle given an already-evaluated global multiplier.
    pub fn revenue_per_completion(&self, def: &ActivityDef, global_multiplier: f64) -> f64 {
        let owned = self.state.owned(def.id) as f64;
        def.base_revenue * owned * self.activity_revenue_multiplier(def) * global_multiplier
    }

    /// Steady-state earnings per second of every managed activity.
    pub fn income_per_second(&self) -> f64 {
        let global = self.revenue_multiplier();
        ACTIVITIES
            .iter()
            .filter(|def| {
                self.state
                    .activities
                    .get(def.id)
                    .is_some_and(|entry| entry.owned > 0 && entry.manager_hired)
            })
            .map(|def| {
                let cycle_secs = def.cycle_ms.max(1) as f64 / 1000.0;
                let cycles_per_sec = self.activity_speed_multiplier(def) / cycle_secs;
                self.revenue_per_completion(def, global) * cycles_per_sec
            })
            .sum()
    }

    pub fn polling(&self) -> f64 {
        formulas::polling(
            self.state.lifetime_earnings,
            self.state.popularity,
            self.state.momentum,
            self.state.happiness,
        )
    }

    pub fn canvass_value(&self) -> f64 {
        let rank = content::rank(&self.state.current_rank_id)
            .map(|def| def.canvass_multiplier)
            .unwrap_or(1.0);
        let skills = self.skill_product(|effect| match effect {
            SkillEffect::CanvassPower(multiplier) => Some(multiplier),
            _ => None,
        });
        let angels = self.angel_product(|effect| match effect {
            AngelEffect::CanvassPower(multiplier) => Some(multiplier),
            _ => None,
        });
        self.config.canvass_base_value * rank * skills * angels
    }

    /// Units the current buy mode would purchase of `def`.
    pub fn purchase_quantity(&self, def: &ActivityDef) -> u32 {
        let owned = self.state.owned(def.id);
        match self.state.buy_mode {
            BuyMode::X1 => 1,
            BuyMode::X10 => 10,
            BuyMode::X100 => 100,
            BuyMode::Next => def
                .milestones
                .iter()
                .map(|step| step.threshold)
                .find(|threshold| *threshold > owned)
                .map(|threshold| threshold - owned)
                .unwrap_or(1),
            BuyMode::Max => {
                formulas::max_affordable(def.base_cost, def.growth_rate, owned, self.state.funds)
            }
        }
    }

    pub fn activity_cost(&self, def: &ActivityDef, quantity: u32) -> f64 {
        formulas::bulk_cost(
            def.base_cost,
            def.growth_rate,
            self.state.owned(def.id),
            quantity,
        )
    }

    pub fn potential_volunteers(&self) -> f64 {
        formulas::prestige_volunteers(self.state.lifetime_earnings, self.config.prestige_divisor)
    }

    pub fn debate_moves(&self) -> Vec<DebateMove> {
        let mut moves = vec![DebateMove {
            id: content::STUMP_SPEECH_ID.to_string(),
            name: "Stump Speech".to_string(),
            policy_cost: content::STUMP_SPEECH_COST,
            cooldown: 0,
        }];
        moves.extend(
            content::POLICIES
                .iter()
                .filter(|def| self.state.unlocked_policies.contains(def.id))
                .map(|def| DebateMove {
                    id: def.id.to_string(),
                    name: def.name.to_string(),
                    policy_cost: def.cost,
                    cooldown: def.debate_cooldown,
                }),
        );
        moves
    }

    // -- actions ----------------------------------------------------------

    pub fn canvass(&mut self) -> f64 {
        let value = self.canvass_value();
        self.state.credit(value);
        self.state.momentum = (self.state.momentum + self.config.momentum_per_canvass).min(100.0);
        self.state.total_clicks += 1;
        self.grant_xp(1.0);
        self.update_rank();
        value
    }

    pub fn set_buy_mode(&mut self, mode: BuyMode) {
        self.state.buy_mode = mode;
    }

    pub fn cycle_buy_mode(&mut self) -> BuyMode {
        self.state.buy_mode = self.state.buy_mode.next();
        self.state.buy_mode
    }

    /// Buys as many units as the current buy mode asks for.
    pub fn buy_activity(&mut self, activity_id: &str) -> Result<u32, ActionError> {
        let def = content::activity(activity_id)
            .ok_or_else(|| ActionError::UnknownId(activity_id.to_string()))?;
        let quantity = self.purchase_quantity(def);
        self.buy_activity_quantity(activity_id, quantity)
    }

    pub fn buy_activity_quantity(
        &mut self,
        activity_id: &str,
        quantity: u32,
    ) -> Result<u32, ActionError> {
        let def = content::activity(activity_id)
            .ok_or_else(|| ActionError::UnknownId(activity_id.to_string()))?;
        if quantity == 0 {
            let cost = self.activity_cost(def, 1);
            return Err(ActionError::InsufficientFunds { cost });
        }
        let cost = self.activity_cost(def, quantity);
        if self.state.funds < cost {
            return Err(ActionError::InsufficientFunds { cost });
        }

        self.state.debit(cost);
        let entry = self
            .state
            .activities
            .entry(def.id.to_string())
            .or_insert_with(ActivityState::default);
        entry.owned += quantity;
        let owned = entry.owned;
        self.grant_xp(quantity as f64);
        debug!(activity = def.id, quantity, cost, owned, "activity purchased");
        Ok(quantity)
    }

    pub fn hire_manager(&mut self, activity_id: &str) -> Result<(), ActionError> {
        let def = content::activity(activity_id)
            .ok_or_else(|| ActionError::UnknownId(activity_id.to_string()))?;
        if self
            .state
            .activities
            .get(def.id)
            .is_some_and(|entry| entry.manager_hired)
        {
            return Err(ActionError::AlreadyOwned(format!("{} manager", def.name)));
        }
        let cost = def.manager_cost();
        if self.state.funds < cost {
            return Err(ActionError::InsufficientFunds { cost });
        }
        self.state.debit(cost);
        self.state
            .activities
            .entry(def.id.to_string())
            .or_insert_with(ActivityState::default)
            .manager_hired = true;
        info!(activity = def.id, cost, "manager hired");
        self.notify(format!("Hired a manager for {}.", def.name));
        Ok(())
    }

    pub fn buy_policy(&mut self, policy_id: &str) -> Result<(), ActionError> {
        let def = content::policy(policy_id)
            .ok_or_else(|| ActionError::UnknownId(policy_id.to_string()))?;
        if self.state.unlocked_policies.contains(def.id) {
            return Err(ActionError::AlreadyOwned(def.name.to_string()));
        }
        if self.state.current_stage_index < def.stage_gate {
            return Err(ActionError::Locked(def.name.to_string()));
        }
        if self.state.funds < def.cost {
            return Err(ActionError::InsufficientFunds { cost: def.cost });
        }

        self.state.debit(def.cost);
        self.state.unlocked_policies.insert(def.id.to_string());
        self.state.happiness = (self.state.happiness + def.happiness_delta).clamp(0.0, 100.0);
        self.state.popularity = (self.state.popularity + def.popularity_delta).max(0.1);
        self.last_policy = Some(PolicySummary {
            id: def.id,
            name: def.name,
            happiness_delta: def.happiness_delta,
            popularity_delta: def.popularity_delta,
        });
        info!(policy = def.id, cost = def.cost, "policy enacted");
        self.notify(format!("Enacted {}.", def.name));
        Ok(())
    }

    pub fn buy_angel_upgrade(&mut self, upgrade_id: &str) -> Result<(), ActionError> {
        let def = content::angel_upgrade(upgrade_id)
            .ok_or_else(|| ActionError::UnknownId(upgrade_id.to_string()))?;
        if self.state.unlocked_angel_upgrades.contains(def.id) {
            return Err(ActionError::AlreadyOwned(def.name.to_string()));
        }
        if self.state.volunteers < def.volunteer_cost {
            return Err(ActionError::InsufficientVolunteers {
                cost: def.volunteer_cost,
            });
        }
        self.state.volunteers -= def.volunteer_cost;
        self.state
            .unlocked_angel_upgrades
            .insert(def.id.to_string());
        info!(upgrade = def.id, cost = def.volunteer_cost, "angel upgrade bought");
        self.notify(format!("{} joins the cause.", def.name));
        Ok(())
    }

    /// Commits volunteers to build a power structure.
    pub fn assign_volunteers(&mut self, structure_id: &str) -> Result<(), ActionError> {
        let def = content::power_structure(structure_id)
            .ok_or_else(|| ActionError::UnknownId(structure_id.to_string()))?;
        if self.state.unlocked_structures.contains(def.id) {
            return Err(ActionError::AlreadyOwned(def.name.to_string()));
        }
        if self.state.volunteers < def.volunteer_cost {
            return Err(ActionError::InsufficientVolunteers {
                cost: def.volunteer_cost,
            });
        }
        self.state.volunteers -= def.volunteer_cost;
        self.state.unlocked_structures.insert(def.id.to_string());
        info!(structure = def.id, cost = def.volunteer_cost, "power structure built");
        self.notify(format!("Volunteers established {}.", def.name));
        Ok(())
    }

    pub fn unlock_skill(&mut self, skill_id: &str) -> Result<(), ActionError> {
        let def =
            content::skill(skill_id).ok_or_else(|| ActionError::UnknownId(skill_id.to_string()))?;
        if self.state.unlocked_skills.contains(def.id) {
            return Err(ActionError::AlreadyOwned(def.name.to_string()));
        }
        if self.state.skill_points < def.cost {
            return Err(ActionError::InsufficientSkillPoints { cost: def.cost });
        }
        self.state.skill_points -= def.cost;
        self.state.unlocked_skills.insert(def.id.to_string());
        info!(skill = def.id, "skill unlocked");
        self.notify(format!("Learned {}.", def.name));
        Ok(())
    }

    /// Converts lifetime earnings into volunteers and starts a new run.
    /// Only volunteers beyond those already granted are credited, so spending
    /// volunteers never reopens a prestige.
    pub fn prestige(&mut self) -> Result<f64, ActionError> {
        let potential = self.potential_volunteers();
        let gained = potential - self.state.volunteers_earned;
        if gained <= 0.0 {
            return Err(ActionError::NothingToGain);
        }
        let previous = &self.state;
        // Assemble the next run completely, then swap it in with one assignment.
        let next = GameState {
            volunteers: previous.volunteers + gained,
            volunteers_earned: potential,
            lifetime_earnings: previous.lifetime_earnings,
            highest_lifetime_earnings: previous.highest_lifetime_earnings,
            happiness: self.config.baseline_happiness,
            unlocked_structures: previous.unlocked_structures.clone(),
            unlocked_angel_upgrades: previous.unlocked_angel_upgrades.clone(),
            unlocked_skills: previous.unlocked_skills.clone(),
            unlocked_memories: previous.unlocked_memories.clone(),
            xp: previous.xp,
            level: previous.level,
            skill_points: previous.skill_points,
            buy_mode: previous.buy_mode,
            total_clicks: previous.total_clicks,
            debates_won: previous.debates_won,
            debates_lost: previous.debates_lost,
            prestige_count: previous.prestige_count + 1,
            last_save_timestamp: previous.last_save_timestamp,
            run_id: previous.run_id,
            ..GameState::default()
        };
        self.state = next;
        self.clear_interactions();
        let volunteers = self.state.volunteers;
        info!(volunteers, gained, "prestige completed");
        self.notify(format!("Ran again with {volunteers:.0} volunteers (+{gained:.0})."));
        Ok(gained)
    }

    /// Wipes all progress. The next tick is discarded.
    pub fn hard_reset(&mut self) {
        self.reset_in_progress = true;
        let run_id = self.state.run_id + 1;
        self.state = GameState {
            run_id,
            happiness: self.config.baseline_happiness,
            ..GameState::default()
        };
        self.clear_interactions();
        self.notifications.clear();
        info!(run_id, "hard reset");
    }

    pub fn is_resetting(&self) -> bool {
        self.reset_in_progress
    }

    /// Stamps the save time and hands back a whole snapshot to persist.
    pub fn snapshot_for_save(&mut self, now_ms: i64) -> GameState {
        self.state.last_save_timestamp = now_ms;
        self.state.clone()
    }

    /// Replaces the state with an imported save; untouched on failure.
    pub fn import(&mut self, text: &str) -> Result<(), crate::persist::ImportError> {
        let imported = crate::persist::import_save(text)?;
        self.state = normalize(imported);
        self.clear_interactions();
        info!("save imported");
        self.notify("Save imported.");
        Ok(())
    }

    fn clear_interactions(&mut self) {
        self.debate = None;
        self.mini_game = None;
        self.last_policy = None;
        self.event_timer = Duration::ZERO;
        self.dilemma_timer = Duration::ZERO;
    }
}

/// Repairs a loaded snapshot so every invariant the simulation relies on holds.
fn normalize(mut state: GameState) -> GameState {
    for (id, entry) in default_activities() {
        state.activities.entry(id).or_insert(entry);
    }
    state.clamp_meters();
    state.volunteers = state.volunteers.max(0.0);
    state.volunteers_earned = state.volunteers_earned.max(state.volunteers);
    state.lifetime_earnings = state.lifetime_earnings.max(0.0);
    state.run_earnings = state.run_earnings.clamp(0.0, state.lifetime_earnings);
    if state.highest_lifetime_earnings < state.lifetime_earnings {
        state.highest_lifetime_earnings = state.lifetime_earnings;
    }
    state.level = formulas::level_for_xp(state.xp);
    state.current_stage_index = state.current_stage_index.min(content::final_stage_index());
    if content::rank(&state.current_rank_id).is_none() {
        state.current_rank_id = content::baseline_rank().id.to_string();
    }
    if state
        .active_dilemma
        .as_ref()
        .is_some_and(|active| content::dilemma(&active.id).is_none())
    {
        state.active_dilemma = None;
    }
    if state
        .active_event
        .as_ref()
        .is_some_and(|active| content::event(&active.id).is_none())
    {
        state.active_event = None;
    }
    state
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn quiet_config() -> GameConfig {
        GameConfig {
            event_chance: 0.0,
            dilemma_chance: 0.0,
            ..GameConfig::default()
        }
    }

    pub(crate) fn test_game() -> Game {
        let config = quiet_config();
        let state = GameState {
            happiness: config.baseline_happiness,
            ..GameState::default()
        };
        Game::with_seed(state, config, 7)
    }

    #[test]
    fn canvass_credits_funds_momentum_and_clicks() {
        let mut game = test_game();
        let value = game.canvass();
        assert_eq!(value, 1.0);
        assert_eq!(game.state.funds, 1.0);
        assert_eq!(game.state.lifetime_earnings, 1.0);
        assert_eq!(game.state.momentum, 2.0);
        assert_eq!(game.state.total_clicks, 1);

        for _ in 0..100 {
            game.canvass();
        }
        assert_eq!(game.state.momentum, 100.0);
    }

    #[test]
    fn buying_without_funds_changes_nothing() {
        let mut game = test_game();
        let before = game.state.clone();
        assert!(matches!(
            game.buy_activity("door_knocking"),
            Err(ActionError::InsufficientFunds { .. })
        ));
        assert_eq!(game.state, before);
    }

    #[test]
    fn bulk_purchase_debits_closed_form_cost() {
        let mut game = test_game();
        game.state.funds = 10_000.0;
        game.set_buy_mode(BuyMode::X10);
        let def = content::activity("flyer_drops").unwrap();
        let cost = game.activity_cost(def, 10);
        assert_eq!(game.buy_activity("flyer_drops"), Ok(10));
        assert_eq!(game.state.owned("flyer_drops"), 10);
        assert_eq!(game.state.funds, 10_000.0 - cost);
    }

    #[test]
    fn max_mode_buys_everything_affordable() {
        let mut game = test_game();
        game.state.funds = 500.0;
        game.set_buy_mode(BuyMode::Max);
        let bought = game.buy_activity("door_knocking").unwrap();
        let def = content::activity("door_knocking").unwrap();
        assert!(bought > 1);
        assert!(game.state.funds < game.activity_cost(def, 1));
    }

    #[test]
    fn next_mode_targets_upcoming_milestone() {
        let mut game = test_game();
        game.state.activities.get_mut("flyer_drops").unwrap().owned = 20;
        game.set_buy_mode(BuyMode::Next);
        let def = content::activity("flyer_drops").unwrap();
        assert_eq!(game.purchase_quantity(def), 5);
    }

    #[test]
    fn buying_a_policy_twice_debits_once() {
        let mut game = test_game();
        game.state.funds = 1_000.0;
        game.buy_policy("community_gardens").unwrap();
        let after_first = game.state.funds;
        assert!(matches!(
            game.buy_policy("community_gardens"),
            Err(ActionError::AlreadyOwned(_))
        ));
        assert_eq!(game.state.funds, after_first);
        assert_eq!(game.state.funds, 750.0);
        assert_eq!(
            game.state
                .unlocked_policies
                .iter()
                .filter(|id| id.as_str() == "community_gardens")
                .count(),
            1
        );
        assert_eq!(game.state.happiness, 55.0);
        assert_eq!(game.last_policy().map(|summary| summary.id), Some("community_gardens"));
    }

    #[test]
    fn stage_gated_policy_is_locked() {
        let mut game = test_game();
        game.state.funds = 1e9;
        assert!(matches!(
            game.buy_policy("housing_first"),
            Err(ActionError::Locked(_))
        ));
        game.state.current_stage_index = 2;
        assert!(game.buy_policy("housing_first").is_ok());
    }

    #[test]
    fn manager_is_hired_once() {
        let mut game = test_game();
        let def = content::activity("door_knocking").unwrap();
        game.state.funds = def.manager_cost() * 2.0;
        game.hire_manager("door_knocking").unwrap();
        assert!(matches!(
            game.hire_manager("door_knocking"),
            Err(ActionError::AlreadyOwned(_))
        ));
        assert_eq!(game.state.funds, def.manager_cost());
    }

    #[test]
    fn volunteer_purchases_spend_prestige_currency() {
        let mut game = test_game();
        game.state.volunteers = 3.0;
        game.assign_volunteers("neighborhood_councils").unwrap();
        assert_eq!(game.state.volunteers, 2.0);
        assert!(matches!(
            game.assign_volunteers("worker_coops"),
            Err(ActionError::InsufficientVolunteers { .. })
        ));
        game.buy_angel_upgrade("veteran_organizers").unwrap();
        assert_eq!(game.state.volunteers, 0.0);
        assert_eq!(game.canvass_value(), 5.0);
        assert_eq!(game.revenue_factors().power_structure, 1.5);
    }

    #[test]
    fn revenue_factors_compose_multiplicatively() {
        let mut game = test_game();
        game.state.popularity = 2.0;
        game.state.volunteers = 50.0;
        game.state.momentum = 95.0;
        game.state.unlocked_policies.insert("open_budget".to_string());
        let factors = game.revenue_factors();
        assert!((factors.volunteer - 2.0).abs() < 1e-9);
        assert_eq!(factors.momentum, 2.0);
        assert_eq!(factors.policy, 1.5);
        assert!((game.revenue_multiplier() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_ids_are_neutral_in_multipliers() {
        let mut game = test_game();
        game.state.unlocked_policies.insert("repealed_policy".to_string());
        game.state.unlocked_skills.insert("forgotten_skill".to_string());
        assert_eq!(game.revenue_multiplier(), 1.0);
        assert_eq!(game.canvass_value(), 1.0);
        assert!(matches!(
            game.buy_policy("repealed_policy"),
            Err(ActionError::UnknownId(_))
        ));
    }

    #[test]
    fn prestige_keeps_meta_progress_and_clears_the_run() {
        let mut game = test_game();
        game.state.lifetime_earnings = 4e12;
        game.state.highest_lifetime_earnings = 4e12;
        game.state.funds = 1e9;
        game.state.current_stage_index = 3;
        game.state.momentum = 80.0;
        game.state.activities.get_mut("phone_bank").unwrap().owned = 40;
        game.state.unlocked_policies.insert("open_budget".to_string());
        game.state.unlocked_skills.insert("loud_voice".to_string());
        game.state.unlocked_memories.insert("first_door".to_string());

        assert_eq!(game.prestige(), Ok(2.0));
        assert_eq!(game.state.volunteers, 2.0);
        assert_eq!(game.state.funds, 0.0);
        assert_eq!(game.state.total_owned(), 0);
        assert!(game.state.unlocked_policies.is_empty());
        assert_eq!(game.state.current_stage_index, 0);
        assert_eq!(game.state.momentum, 0.0);
        assert_eq!(game.state.highest_lifetime_earnings, 4e12);
        assert!(game.state.unlocked_skills.contains("loud_voice"));
        assert!(game.state.unlocked_memories.contains("first_door"));
        assert_eq!(game.state.prestige_count, 1);

        assert_eq!(game.prestige(), Err(ActionError::NothingToGain));
    }

    #[test]
    fn spent_volunteers_do_not_reopen_prestige() {
        let mut game = test_game();
        game.state.lifetime_earnings = 4e12;
        assert_eq!(game.prestige(), Ok(2.0));
        game.assign_volunteers("neighborhood_councils").unwrap();
        assert_eq!(game.state.volunteers, 1.0);

        assert_eq!(game.prestige(), Err(ActionError::NothingToGain));
        assert_eq!(game.state.volunteers, 1.0);
        assert!(game.state.unlocked_structures.contains("neighborhood_councils"));

        game.state.lifetime_earnings = 9e12;
        assert_eq!(game.prestige(), Ok(1.0));
        assert_eq!(game.state.volunteers, 2.0);
        assert_eq!(game.state.volunteers_earned, 3.0);
    }

    #[test]
    fn rank_stays_at_baseline_after_prestige() {
        let mut game = test_game();
        game.state.credit(4e12);
        game.update_rank();
        assert_ne!(game.state.current_rank_id, content::baseline_rank().id);

        game.prestige().unwrap();
        assert_eq!(game.state.run_earnings, 0.0);
        game.tick(Duration::from_millis(100));
        game.canvass();
        assert_eq!(game.state.current_rank_id, content::baseline_rank().id);
        assert_eq!(game.state.lifetime_earnings, 4e12 + game.canvass_value());
    }

    #[test]
    fn hard_reset_clears_everything_and_bumps_run() {
        let mut game = test_game();
        game.state.volunteers = 10.0;
        game.state.funds = 99.0;
        game.state.unlocked_skills.insert("loud_voice".to_string());
        game.hard_reset();
        assert!(game.is_resetting());
        assert_eq!(game.state.run_id, 1);
        assert_eq!(game.state.volunteers, 0.0);
        assert!(game.state.unlocked_skills.is_empty());
        assert_eq!(game.notifications().count(), 0);
    }

    #[test]
    fn skills_spend_points() {
        let mut game = test_game();
        assert!(matches!(
            game.unlock_skill("loud_voice"),
            Err(ActionError::InsufficientSkillPoints { cost: 1 })
        ));
        game.state.skill_points = 1;
        game.unlock_skill("loud_voice").unwrap();
        assert_eq!(game.state.skill_points, 0);
        assert_eq!(game.canvass_value(), 2.0);
    }

    #[test]
    fn notifications_are_bounded_and_dismissable() {
        let mut game = test_game();
        for index in 0..12 {
            game.notify(format!("note {index}"));
        }
        assert_eq!(game.notifications().count(), MAX_NOTIFICATIONS);
        let first = game.notifications().next().map(|note| note.id).unwrap();
        assert!(game.dismiss_notification(first));
        assert!(!game.dismiss_notification(first));
    }

    #[test]
    fn oldest_notification_is_dismissed_first() {
        let mut game = test_game();
        game.notify("first");
        game.notify("second");
        assert!(game.dismiss_oldest_notification());
        let left: Vec<_> = game.notifications().map(|note| note.message.as_str()).collect();
        assert_eq!(left, ["second"]);
        assert!(game.dismiss_oldest_notification());
        assert!(!game.dismiss_oldest_notification());
    }

    #[test]
    fn loaded_state_is_normalized() {
        let mut state = GameState::default();
        state.activities.clear();
        state.momentum = 400.0;
        state.current_stage_index = 99;
        state.current_rank_id = "emperor".to_string();
        state.xp = 100.0;
        let game = Game::with_seed(state, quiet_config(), 1);
        assert_eq!(game.state.activities.len(), ACTIVITIES.len());
        assert_eq!(game.state.momentum, 100.0);
        assert_eq!(game.state.current_stage_index, content::final_stage_index());
        assert_eq!(game.state.current_rank_id, "volunteer");
        assert_eq!(game.state.level, 2);
    }
}
