//! The per-frame simulation step and the checks that run after it.

use super::content::{self, ACTIVITIES, GLOBAL_MILESTONES, MEMORIES, MemoryCondition, RANKS};
use super::formulas;
use super::game::Game;
use super::state::GameState;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Advanced { completions: u64, earned: f64 },
    /// A hard reset was pending; the delta was discarded.
    Halted,
}

impl Game {
    pub fn tick(&mut self, delta: Duration) -> TickOutcome {
        if self.reset_in_progress {
            self.reset_in_progress = false;
            debug!("tick discarded after reset");
            return TickOutcome::Halted;
        }

        let delta = delta.min(Duration::from_millis(self.config.tick_max_delta_ms));
        let delta_ms = delta.as_secs_f64() * 1000.0;
        let global = self.revenue_multiplier();

        let mut completions = 0u64;
        let mut earned = 0.0;
        for def in ACTIVITIES.iter() {
            let speed = self.activity_speed_multiplier(def);
            let revenue = self.revenue_per_completion(def, global);
            let Some(entry) = self.state.activities.get_mut(def.id) else {
                continue;
            };
            if entry.owned == 0 || !entry.manager_hired {
                continue;
            }
            let cycle = def.cycle_ms.max(1) as f64;
            entry.progress += delta_ms * speed;
            if entry.progress >= cycle {
                let cycles = (entry.progress / cycle).floor();
                entry.progress -= cycles * cycle;
                completions += cycles as u64;
                earned += revenue * cycles;
            }
        }
        self.state.credit(earned);

        let decay_skill = self.skill_product(|effect| match effect {
            content::SkillEffect::MomentumDecay(multiplier) => Some(multiplier),
            _ => None,
        });
        self.state.momentum = formulas::decayed_momentum(
            self.state.momentum,
            delta.as_secs_f64(),
            self.config.momentum_decay_per_sec,
            self.state.volunteers,
            self.config.volunteer_decay_dampening,
            decay_skill,
        );

        self.advance_mini_game(delta);
        self.advance_ambient_timers(delta);
        self.update_rank();
        self.check_milestones();
        self.check_memories();

        TickOutcome::Advanced {
            completions,
            earned,
        }
    }

    /// Applies every newly crossed milestone exactly once.
    pub fn check_milestones(&mut self) -> usize {
        let mut crossed = Vec::new();
        for def in ACTIVITIES.iter() {
            let owned = self.state.owned(def.id);
            for step in def.milestones {
                let key = format!("{}:{}", def.id, step.threshold);
                if owned >= step.threshold && !self.state.applied_milestones.contains(&key) {
                    let label = match step.effect {
                        content::MilestoneEffect::Speed(multiplier) => {
                            format!("{} x{multiplier} speed", def.name)
                        }
                        content::MilestoneEffect::Revenue(multiplier) => {
                            format!("{} x{multiplier} revenue", def.name)
                        }
                    };
                    crossed.push((key, format!("{} reached {}: {label}.", def.name, step.threshold)));
                }
            }
        }
        let total = self.state.total_owned();
        for step in GLOBAL_MILESTONES.iter() {
            let key = format!("global:{}", step.threshold);
            if total >= step.threshold && !self.state.applied_milestones.contains(&key) {
                crossed.push((
                    key,
                    format!(
                        "{} total operations: all revenue x{}.",
                        step.threshold, step.multiplier
                    ),
                ));
            }
        }

        let count = crossed.len();
        for (key, message) in crossed {
            debug!(milestone = key.as_str(), "milestone crossed");
            self.state.applied_milestones.insert(key);
            self.notify(message);
        }
        count
    }

    pub fn check_memories(&mut self) -> usize {
        let fresh: Vec<_> = MEMORIES
            .iter()
            .filter(|def| !self.state.unlocked_memories.contains(def.id))
            .filter(|def| memory_condition_met(&self.state, def.condition))
            .collect();
        for def in &fresh {
            self.state.unlocked_memories.insert(def.id.to_string());
            info!(memory = def.id, "memory unlocked");
            self.notify(format!("Memory unlocked: {}.", def.name));
        }
        fresh.len()
    }

    /// Advances the rank to the highest threshold this run has reached; never
    /// regresses within a run.
    pub fn update_rank(&mut self) {
        let current = RANKS
            .iter()
            .position(|def| def.id == self.state.current_rank_id)
            .unwrap_or(0);
        let reached = RANKS
            .iter()
            .rposition(|def| self.state.run_earnings >= def.threshold)
            .unwrap_or(0);
        if reached > current {
            let def = &RANKS[reached];
            self.state.current_rank_id = def.id.to_string();
            info!(rank = def.id, "rank advanced");
            self.notify(format!("Promoted to {}.", def.name));
        }
    }

    pub fn grant_xp(&mut self, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        self.state.xp += amount;
        let level = formulas::level_for_xp(self.state.xp);
        if level > self.state.level {
            let gained = level - self.state.level;
            self.state.level = level;
            self.state.skill_points += gained;
            self.notify(format!("Reached level {level} (+{gained} skill point)."));
        }
    }
}

pub fn memory_condition_met(state: &GameState, condition: MemoryCondition) -> bool {
    match condition {
        MemoryCondition::LifetimeEarnings(amount) => state.lifetime_earnings >= amount,
        MemoryCondition::TotalOwned(count) => state.total_owned() >= count,
        MemoryCondition::StageReached(index) => state.current_stage_index >= index,
        MemoryCondition::DebatesWon(count) => state.debates_won >= count,
        MemoryCondition::CanvassClicks(count) => state.total_clicks >= count,
        MemoryCondition::Volunteers(count) => state.volunteers >= count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::game::tests::test_game;

    fn managed(game: &mut Game, id: &str, owned: u32) {
        let entry = game.state.activities.get_mut(id).unwrap();
        entry.owned = owned;
        entry.manager_hired = true;
    }

    #[test]
    fn unmanaged_activities_do_not_progress() {
        let mut game = test_game();
        game.state.activities.get_mut("door_knocking").unwrap().owned = 5;
        let outcome = game.tick(Duration::from_millis(100));
        assert_eq!(
            outcome,
            TickOutcome::Advanced {
                completions: 0,
                earned: 0.0
            }
        );
        assert_eq!(game.state.activities["door_knocking"].progress, 0.0);
    }

    #[test]
    fn delta_is_clamped() {
        let mut game = test_game();
        managed(&mut game, "door_knocking", 1);
        game.tick(Duration::from_secs(3_600));
        assert_eq!(game.state.activities["door_knocking"].progress, 100.0);
    }

    #[test]
    fn completions_credit_funds_and_lifetime_together() {
        let mut game = test_game();
        managed(&mut game, "door_knocking", 3);
        let mut total_completions = 0;
        for _ in 0..12 {
            if let TickOutcome::Advanced { completions, .. } = game.tick(Duration::from_millis(100)) {
                total_completions += completions;
            }
        }
        assert_eq!(total_completions, 2);
        assert_eq!(game.state.funds, 6.0);
        assert_eq!(game.state.lifetime_earnings, 6.0);
        assert!(game.state.activities["door_knocking"].progress < 600.0);
    }

    #[test]
    fn lifetime_earnings_never_decrease_across_actions() {
        let mut game = test_game();
        managed(&mut game, "door_knocking", 2);
        let mut last = 0.0;
        for step in 0..200 {
            if step % 3 == 0 {
                game.canvass();
            }
            let _ = game.buy_activity("door_knocking");
            game.tick(Duration::from_millis(100));
            assert!(game.state.lifetime_earnings >= last);
            assert!(game.state.funds >= 0.0);
            last = game.state.lifetime_earnings;
        }
    }

    #[test]
    fn momentum_decays_during_ticks() {
        let mut game = test_game();
        game.state.momentum = 10.0;
        for _ in 0..10 {
            game.tick(Duration::from_millis(100));
        }
        assert!((game.state.momentum - 8.0).abs() < 1e-9);
    }

    #[test]
    fn milestones_fire_once() {
        let mut game = test_game();
        game.state.activities.get_mut("flyer_drops").unwrap().owned = 30;
        assert_eq!(game.check_milestones(), 1);
        assert_eq!(game.check_milestones(), 0);
        assert!(game.state.applied_milestones.contains("flyer_drops:25"));
        let def = content::activity("flyer_drops").unwrap();
        assert_eq!(game.activity_speed_multiplier(def), 2.0);
    }

    #[test]
    fn global_milestone_counts_every_activity() {
        let mut game = test_game();
        game.state.activities.get_mut("door_knocking").unwrap().owned = 60;
        game.state.activities.get_mut("phone_bank").unwrap().owned = 40;
        game.check_milestones();
        assert!(game.state.applied_milestones.contains("global:100"));
        assert_eq!(game.revenue_factors().global_milestone, 1.5);
    }

    #[test]
    fn memories_unlock_once() {
        let mut game = test_game();
        game.canvass();
        assert_eq!(game.check_memories(), 1);
        assert_eq!(game.check_memories(), 0);
        assert!(game.state.unlocked_memories.contains("first_door"));
    }

    #[test]
    fn rank_follows_run_earnings_forward_only() {
        let mut game = test_game();
        game.state.run_earnings = 150_000.0;
        game.update_rank();
        assert_eq!(game.state.current_rank_id, "field_organizer");
        game.state.run_earnings = 10.0;
        game.update_rank();
        assert_eq!(game.state.current_rank_id, "field_organizer");
    }

    #[test]
    fn level_ups_grant_skill_points() {
        let mut game = test_game();
        game.grant_xp(400.0);
        assert_eq!(game.state.level, 3);
        assert_eq!(game.state.skill_points, 2);
    }

    #[test]
    fn fresh_campaign_reaches_automated_income() {
        let mut game = test_game();
        let def = content::activity("door_knocking").unwrap();
        assert!(game.buy_activity_quantity(def.id, 1).is_err());
        assert_eq!(game.state.owned(def.id), 0);

        while game.state.funds < def.base_cost {
            game.canvass();
        }
        let before = game.state.funds;
        game.buy_activity_quantity(def.id, 1).unwrap();
        assert_eq!(game.state.owned(def.id), 1);
        assert_eq!(game.state.funds, before - def.base_cost);

        assert!(game.hire_manager(def.id).is_err());
        while game.state.funds < def.manager_cost() {
            game.canvass();
        }
        game.hire_manager(def.id).unwrap();

        let per_completion = game.revenue_per_completion(def, game.revenue_multiplier());
        let funds = game.state.funds;
        let mut completions = 0;
        for _ in 0..10 {
            if let TickOutcome::Advanced { completions: done, .. } =
                game.tick(Duration::from_millis(def.cycle_ms))
            {
                completions += done;
            }
        }
        assert!(completions > 0);
        let expected = funds + completions as f64 * per_completion;
        assert!((game.state.funds - expected).abs() < 1e-6);
    }

    #[test]
    fn stale_tick_after_reset_leaves_state_zeroed() {
        let mut game = test_game();
        managed(&mut game, "door_knocking", 50);
        game.state.funds = 1_000.0;
        game.state.momentum = 70.0;
        game.state.activities.get_mut("door_knocking").unwrap().progress = 599.0;

        game.hard_reset();
        let outcome = game.tick(Duration::from_millis(100));

        assert_eq!(outcome, TickOutcome::Halted);
        let expected = GameState {
            run_id: 1,
            happiness: game.config().baseline_happiness,
            ..GameState::default()
        };
        assert_eq!(game.state, expected);
        assert!(matches!(
            game.tick(Duration::from_millis(100)),
            TickOutcome::Advanced { .. }
        ));
    }
}
