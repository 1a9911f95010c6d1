//! Modal interactions: debates, dilemmas, ambient events and the rapid
//! response mini-game. At most one of them is active at any time.

use super::content::{self, DILEMMAS, EVENTS, Effect, OpponentDef, SkillEffect};
use super::debate::{BattleState, DebateMove, EnemyTurnResult, MoveResult};
use super::formulas;
use super::game::{ActionError, Game};
use super::state::{ActiveDilemma, ActiveEvent};
use rand::Rng;
use std::time::Duration;
use tracing::info;

const DEBATE_WIN_XP: f64 = 50.0;
/// Canvass values earned per mini-game hit.
const MINI_GAME_HIT_VALUE: f64 = 5.0;
/// Hits counted per second of the mini-game window; extra presses are ignored.
const MINI_GAME_MAX_HITS_PER_SEC: u64 = 8;

#[derive(Debug, Clone)]
pub struct DebateSession {
    pub encounter_id: u64,
    pub opponent: &'static OpponentDef,
    pub battle: BattleState,
    pub moves: Vec<DebateMove>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MiniGame {
    pub remaining_ms: u64,
    pub hits: u32,
}

impl Game {
    pub fn modal_active(&self) -> bool {
        self.state.active_event.is_some()
            || self.state.active_dilemma.is_some()
            || self.debate.is_some()
            || self.mini_game.is_some()
    }

    pub fn debate(&self) -> Option<&DebateSession> {
        self.debate.as_ref()
    }

    pub fn mini_game(&self) -> Option<&MiniGame> {
        self.mini_game.as_ref()
    }

    pub fn is_utopia(&self) -> bool {
        self.state.current_stage_index >= content::final_stage_index()
    }

    /// Checks every gate on calling the current stage's debate.
    pub fn debate_opponent(&self) -> Result<&'static OpponentDef, ActionError> {
        let stage = content::stage(self.state.current_stage_index)
            .ok_or_else(|| ActionError::UnknownId(self.state.current_stage_index.to_string()))?;
        let opponent_id = stage.opponent.ok_or(ActionError::CampaignComplete)?;
        if self.modal_active() {
            return Err(ActionError::ModalActive);
        }
        if self.state.run_earnings < stage.win_threshold
            || self.state.happiness < stage.happiness_requirement
        {
            return Err(ActionError::Locked(format!("the {} debate", stage.name)));
        }
        content::opponent(opponent_id).ok_or_else(|| ActionError::UnknownId(opponent_id.to_string()))
    }

    pub fn start_debate(&mut self) -> Result<u64, ActionError> {
        let opponent = self.debate_opponent()?;
        let encounter_id = self.next_encounter_id;
        self.next_encounter_id += 1;
        let battle = BattleState::new(
            formulas::player_max_hp(self.state.happiness),
            formulas::enemy_max_hp(opponent.health),
        );
        self.debate = Some(DebateSession {
            encounter_id,
            opponent,
            battle,
            moves: self.debate_moves(),
        });
        info!(encounter_id, opponent = opponent.id, "debate started");
        Ok(encounter_id)
    }

    /// Damage `move_id` would deal right now.
    pub fn move_damage(&self, policy_cost: f64) -> f64 {
        let skill = self.skill_product(|effect| match effect {
            SkillEffect::DebateDamage(multiplier) => Some(multiplier),
            _ => None,
        });
        let base =
            formulas::debate_base_damage(policy_cost, self.state.current_stage_index, skill);
        formulas::debate_damage(base, formulas::polling_multiplier(self.polling()))
    }

    pub fn use_move(&mut self, move_id: &str) -> Result<MoveResult, ActionError> {
        let session = self.debate.as_ref().ok_or(ActionError::NotActive)?;
        let mv = session
            .moves
            .iter()
            .find(|mv| mv.id == move_id)
            .cloned()
            .ok_or_else(|| ActionError::UnknownId(move_id.to_string()))?;
        let damage = self.move_damage(mv.policy_cost);
        let session = self.debate.as_mut().ok_or(ActionError::NotActive)?;
        let result = session.battle.player_move(&mv, damage)?;
        if result == MoveResult::Won {
            self.apply_debate_outcome(true);
        }
        Ok(result)
    }

    /// Runs the opponent's answer for `encounter_id`. Stale encounters are ignored.
    pub fn resolve_enemy_turn(&mut self, encounter_id: u64) -> Option<EnemyTurnResult> {
        let session = self.debate.as_mut()?;
        if session.encounter_id != encounter_id {
            return None;
        }
        let result = session
            .battle
            .enemy_turn(session.opponent.attacks, &mut self.rng)?;
        if result == EnemyTurnResult::Lost {
            self.apply_debate_outcome(false);
        }
        Some(result)
    }

    /// Tears the encounter down. Any pending enemy turn becomes stale.
    pub fn leave_debate(&mut self) -> bool {
        let left = self.debate.take();
        if let Some(session) = &left {
            info!(
                encounter_id = session.encounter_id,
                complete = session.battle.is_complete,
                "debate closed"
            );
        }
        left.is_some()
    }

    fn apply_debate_outcome(&mut self, won: bool) {
        if won {
            let final_stage = content::final_stage_index();
            self.state.current_stage_index = (self.state.current_stage_index + 1).min(final_stage);
            self.state.debates_won += 1;
            self.grant_xp(DEBATE_WIN_XP);
            let stage_name = content::stage(self.state.current_stage_index)
                .map(|stage| stage.name)
                .unwrap_or("the next stage");
            info!(stage = self.state.current_stage_index, "debate won");
            if self.is_utopia() {
                self.notify("You built Utopia.");
            } else {
                self.notify(format!("Debate won! On to {stage_name}."));
            }
        } else {
            let penalty = self.config.debate_loss_happiness_penalty;
            self.state.happiness = (self.state.happiness - penalty).clamp(0.0, 100.0);
            self.state.debates_lost += 1;
            info!(penalty, "debate lost");
            self.notify(format!("Debate lost. Happiness -{penalty:.0}."));
        }
    }

    pub fn trigger_event(&mut self, event_id: &str) -> Result<(), ActionError> {
        let def =
            content::event(event_id).ok_or_else(|| ActionError::UnknownId(event_id.to_string()))?;
        if self.modal_active() {
            return Err(ActionError::ModalActive);
        }
        self.apply_effect(def.effect);
        self.state.active_event = Some(ActiveEvent {
            id: def.id.to_string(),
        });
        info!(event = def.id, "event fired");
        Ok(())
    }

    pub fn dismiss_event(&mut self) -> bool {
        self.state.active_event.take().is_some()
    }

    pub fn trigger_dilemma(&mut self, dilemma_id: &str) -> Result<(), ActionError> {
        let def = content::dilemma(dilemma_id)
            .ok_or_else(|| ActionError::UnknownId(dilemma_id.to_string()))?;
        if self.modal_active() {
            return Err(ActionError::ModalActive);
        }
        self.state.active_dilemma = Some(ActiveDilemma {
            id: def.id.to_string(),
        });
        info!(dilemma = def.id, "dilemma raised");
        Ok(())
    }

    pub fn resolve_dilemma(&mut self, choice: usize) -> Result<(), ActionError> {
        let active = self
            .state
            .active_dilemma
            .as_ref()
            .ok_or(ActionError::NotActive)?;
        let Some(def) = content::dilemma(&active.id) else {
            self.state.active_dilemma = None;
            return Err(ActionError::NotActive);
        };
        let picked = def
            .choices
            .get(choice)
            .ok_or_else(|| ActionError::UnknownId(format!("choice {choice}")))?;
        self.apply_effect(picked.effect);
        self.state.active_dilemma = None;
        info!(dilemma = def.id, choice, "dilemma resolved");
        self.notify(format!("You chose: {}.", picked.label));
        Ok(())
    }

    pub fn start_mini_game(&mut self) -> Result<(), ActionError> {
        if self.modal_active() {
            return Err(ActionError::ModalActive);
        }
        self.mini_game = Some(MiniGame {
            remaining_ms: self.config.mini_game_duration_ms,
            hits: 0,
        });
        Ok(())
    }

    pub fn mini_game_hit(&mut self) -> bool {
        let cap = self.mini_game_hit_cap();
        match self.mini_game.as_mut() {
            Some(game) if game.hits < cap => {
                game.hits += 1;
                true
            }
            _ => false,
        }
    }

    pub fn mini_game_hit_cap(&self) -> u32 {
        let cap = self.config.mini_game_duration_ms * MINI_GAME_MAX_HITS_PER_SEC / 1000;
        cap.clamp(1, u32::MAX as u64) as u32
    }

    pub fn cancel_mini_game(&mut self) -> bool {
        self.mini_game.take().is_some()
    }

    pub(super) fn advance_mini_game(&mut self, delta: Duration) {
        let Some(game) = self.mini_game.as_mut() else {
            return;
        };
        let delta_ms = delta.as_millis() as u64;
        if game.remaining_ms > delta_ms {
            game.remaining_ms -= delta_ms;
            return;
        }
        let hits = game.hits;
        self.mini_game = None;
        let reward = hits as f64 * self.canvass_value() * MINI_GAME_HIT_VALUE;
        self.state.credit(reward);
        info!(hits, reward, "mini-game complete");
        self.notify(format!("Rapid response: {hits} hits, +{reward:.0} funds."));
    }

    /// Polls the event and dilemma generators on their fixed intervals.
    pub(super) fn advance_ambient_timers(&mut self, delta: Duration) {
        self.event_timer += delta;
        let event_interval = Duration::from_secs(self.config.event_interval_secs.max(1));
        if self.event_timer >= event_interval {
            self.event_timer = Duration::ZERO;
            let chance = self.config.event_chance.clamp(0.0, 1.0);
            if !self.modal_active() && self.rng.gen_bool(chance) {
                let def = &EVENTS[self.rng.gen_range(0..EVENTS.len())];
                let _ = self.trigger_event(def.id);
            }
        }

        self.dilemma_timer += delta;
        let dilemma_interval = Duration::from_secs(self.config.dilemma_interval_secs.max(1));
        if self.dilemma_timer >= dilemma_interval {
            self.dilemma_timer = Duration::ZERO;
            let chance = self.config.dilemma_chance.clamp(0.0, 1.0);
            if !self.modal_active() && self.rng.gen_bool(chance) {
                let def = &DILEMMAS[self.rng.gen_range(0..DILEMMAS.len())];
                let _ = self.trigger_dilemma(def.id);
            }
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        self.state.happiness = (self.state.happiness + effect.happiness).clamp(0.0, 100.0);
        self.state.popularity = (self.state.popularity + effect.popularity).max(0.1);
        self.state.momentum = (self.state.momentum + effect.momentum).clamp(0.0, 100.0);
        let swing = self.state.funds * effect.funds_fraction;
        if swing > 0.0 {
            self.state.credit(swing);
        } else {
            self.state.debit(-swing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::debate::{MoveError, Turn};
    use crate::sim::game::tests::{quiet_config, test_game};
    use crate::sim::state::GameState;
    use crate::config::GameConfig;

    fn debate_ready() -> Game {
        let mut game = test_game();
        game.state.run_earnings = 10_000.0;
        game
    }

    #[test]
    fn debate_requires_threshold_and_happiness() {
        let mut game = test_game();
        assert!(matches!(game.start_debate(), Err(ActionError::Locked(_))));
        game.state.run_earnings = 10_000.0;
        game.state.happiness = 10.0;
        assert!(matches!(game.start_debate(), Err(ActionError::Locked(_))));
        game.state.happiness = 50.0;
        assert!(game.start_debate().is_ok());
        assert!(matches!(game.start_debate(), Err(ActionError::ModalActive)));
    }

    #[test]
    fn debate_snapshot_sets_hit_points() {
        let mut game = debate_ready();
        game.start_debate().unwrap();
        let session = game.debate().unwrap();
        assert_eq!(session.battle.max_player_hp, formulas::player_max_hp(50.0));
        assert_eq!(session.battle.max_enemy_hp, 100.0);
        assert_eq!(session.battle.turn, Turn::Player);
        assert_eq!(session.moves[0].id, content::STUMP_SPEECH_ID);
    }

    #[test]
    fn winning_promotes_stage_exactly_once() {
        let mut game = debate_ready();
        game.start_debate().unwrap();
        if let Some(session) = game.debate.as_mut() {
            session.battle.enemy_hp = 1.0;
        }
        assert_eq!(game.use_move(content::STUMP_SPEECH_ID), Ok(MoveResult::Won));
        assert_eq!(game.state.current_stage_index, 1);
        assert_eq!(game.state.debates_won, 1);
        assert_eq!(
            game.use_move(content::STUMP_SPEECH_ID),
            Err(ActionError::Move(MoveError::Complete))
        );
        assert_eq!(game.state.current_stage_index, 1);
        assert!(game.leave_debate());
        assert!(!game.modal_active());
    }

    #[test]
    fn losing_costs_happiness() {
        let mut game = debate_ready();
        let encounter = game.start_debate().unwrap();
        if let Some(session) = game.debate.as_mut() {
            session.battle.player_hp = 1.0;
        }
        game.use_move(content::STUMP_SPEECH_ID).unwrap();
        assert_eq!(
            game.resolve_enemy_turn(encounter),
            Some(EnemyTurnResult::Lost)
        );
        assert_eq!(game.state.happiness, 40.0);
        assert_eq!(game.state.debates_lost, 1);
        assert_eq!(game.state.current_stage_index, 0);
    }

    #[test]
    fn stale_enemy_turn_is_ignored() {
        let mut game = debate_ready();
        let first = game.start_debate().unwrap();
        game.use_move(content::STUMP_SPEECH_ID).unwrap();
        game.leave_debate();
        assert_eq!(game.resolve_enemy_turn(first), None);

        let second = game.start_debate().unwrap();
        assert_ne!(first, second);
        let hp = game.debate().map(|session| session.battle.player_hp);
        assert_eq!(game.resolve_enemy_turn(first), None);
        assert_eq!(game.debate().map(|session| session.battle.player_hp), hp);
    }

    #[test]
    fn seeded_games_replay_the_same_debate() {
        let play = || {
            let mut state = GameState::default();
            state.run_earnings = 10_000.0;
            let mut game = Game::with_seed(state, quiet_config(), 99);
            let encounter = game.start_debate().unwrap();
            while game.debate().is_some_and(|session| !session.battle.is_complete) {
                let _ = game.use_move(content::STUMP_SPEECH_ID);
                game.resolve_enemy_turn(encounter);
            }
            game.debate().map(|session| session.battle.clone())
        };
        let first = play().unwrap();
        let second = play().unwrap();
        assert_eq!(first.battle_log, second.battle_log);
        assert_eq!(first.player_hp, second.player_hp);
        assert_eq!(first.enemy_hp, second.enemy_hp);
    }

    #[test]
    fn final_stage_has_no_debate() {
        let mut game = debate_ready();
        game.state.current_stage_index = content::final_stage_index();
        assert!(game.is_utopia());
        assert_eq!(game.start_debate(), Err(ActionError::CampaignComplete));
    }

    #[test]
    fn only_one_modal_at_a_time() {
        let mut game = debate_ready();
        game.trigger_event("bake_sale").unwrap();
        assert_eq!(
            game.trigger_dilemma("donor_strings"),
            Err(ActionError::ModalActive)
        );
        assert_eq!(game.start_mini_game(), Err(ActionError::ModalActive));
        assert!(matches!(game.start_debate(), Err(ActionError::ModalActive)));
        assert!(game.dismiss_event());
        game.trigger_dilemma("donor_strings").unwrap();
        assert_eq!(game.trigger_event("op_ed"), Err(ActionError::ModalActive));
    }

    #[test]
    fn dilemma_choice_applies_effect_and_clears_slot() {
        let mut game = test_game();
        game.state.funds = 100.0;
        game.trigger_dilemma("donor_strings").unwrap();
        assert!(matches!(
            game.resolve_dilemma(7),
            Err(ActionError::UnknownId(_))
        ));
        game.resolve_dilemma(0).unwrap();
        assert_eq!(game.state.funds, 125.0);
        assert_eq!(game.state.happiness, 40.0);
        assert!(game.state.active_dilemma.is_none());
        assert_eq!(game.resolve_dilemma(0), Err(ActionError::NotActive));
    }

    #[test]
    fn mini_game_pays_out_on_expiry() {
        let mut game = test_game();
        game.start_mini_game().unwrap();
        for _ in 0..4 {
            game.mini_game_hit();
        }
        let ticks = game.config().mini_game_duration_ms / 100;
        for _ in 0..ticks {
            game.tick(Duration::from_millis(100));
        }
        assert!(game.mini_game().is_none());
        assert_eq!(game.state.funds, 20.0);
        assert_eq!(game.state.lifetime_earnings, 20.0);
    }

    #[test]
    fn mini_game_hits_are_capped() {
        let mut game = test_game();
        game.start_mini_game().unwrap();
        let cap = game.mini_game_hit_cap();
        assert_eq!(cap, 80);
        for _ in 0..cap {
            assert!(game.mini_game_hit());
        }
        assert!(!game.mini_game_hit());
        assert_eq!(game.mini_game().map(|mini| mini.hits), Some(cap));
    }

    #[test]
    fn ambient_generator_respects_active_modal() {
        let config = GameConfig {
            event_chance: 1.0,
            event_interval_secs: 1,
            dilemma_chance: 1.0,
            dilemma_interval_secs: 1,
            ..GameConfig::default()
        };
        let mut game = Game::with_seed(GameState::default(), config, 5);
        for _ in 0..10 {
            game.tick(Duration::from_millis(100));
        }
        assert!(game.state.active_event.is_some());
        assert!(game.state.active_dilemma.is_none());
    }
}
