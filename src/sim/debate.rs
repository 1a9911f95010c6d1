//! Turn-based debate encounters.
//!
//! A [`BattleState`] lives for exactly one encounter. The player argues a
//! move, the opponent answers after the host's delay, and the exchange ends
//! as soon as either side runs out of composure. A completed battle accepts
//! no further input.

use super::content::EnemyAttackDef;
use rand::Rng;
use std::collections::BTreeMap;
use thiserror::Error;

const FALLBACK_ATTACK: EnemyAttackDef = EnemyAttackDef {
    name: "Heckling",
    damage: 5.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Player,
    Opponent,
    Moderator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebateMove {
    pub id: String,
    pub name: String,
    pub policy_cost: f64,
    pub cooldown: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// The opponent answers next.
    EnemyTurnPending,
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyTurnResult {
    PlayerTurn,
    Lost,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("wait for your opponent to finish")]
    NotPlayerTurn,
    #[error("the debate is over")]
    Complete,
    #[error("that argument needs {turns} more turn(s)")]
    OnCooldown { turns: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BattleState {
    pub player_hp: f64,
    pub max_player_hp: f64,
    pub enemy_hp: f64,
    pub max_enemy_hp: f64,
    pub turn: Turn,
    pub cooldowns: BTreeMap<String, u32>,
    pub battle_log: Vec<LogEntry>,
    pub is_complete: bool,
    pub did_player_win: bool,
}

impl BattleState {
    pub fn new(max_player_hp: f64, max_enemy_hp: f64) -> Self {
        Self {
            player_hp: max_player_hp,
            max_player_hp,
            enemy_hp: max_enemy_hp,
            max_enemy_hp,
            turn: Turn::Player,
            cooldowns: BTreeMap::new(),
            battle_log: Vec::new(),
            is_complete: false,
            did_player_win: false,
        }
    }

    pub fn cooldown(&self, move_id: &str) -> u32 {
        self.cooldowns.get(move_id).copied().unwrap_or(0)
    }

    pub fn can_use(&self, move_id: &str) -> bool {
        !self.is_complete && self.turn == Turn::Player && self.cooldown(move_id) == 0
    }

    pub fn player_move(&mut self, mv: &DebateMove, damage: f64) -> Result<MoveResult, MoveError> {
        if self.is_complete {
            return Err(MoveError::Complete);
        }
        if self.turn != Turn::Player {
            return Err(MoveError::NotPlayerTurn);
        }
        let remaining = self.cooldown(&mv.id);
        if remaining > 0 {
            return Err(MoveError::OnCooldown { turns: remaining });
        }

        let damage = damage.max(0.0);
        self.enemy_hp = (self.enemy_hp - damage).max(0.0);
        if mv.cooldown > 0 {
            self.cooldowns.insert(mv.id.clone(), mv.cooldown);
        }
        self.push_log(
            Speaker::Player,
            format!("You argue {} for {damage:.0} damage.", mv.name),
        );

        if self.enemy_hp <= 0.0 {
            self.finish(true);
            return Ok(MoveResult::Won);
        }
        self.turn = Turn::Enemy;
        Ok(MoveResult::EnemyTurnPending)
    }

    /// Resolves the opponent's answer. `None` when it is not their turn.
    pub fn enemy_turn(
        &mut self,
        attacks: &[EnemyAttackDef],
        rng: &mut impl Rng,
    ) -> Option<EnemyTurnResult> {
        if self.is_complete || self.turn != Turn::Enemy {
            return None;
        }
        let attack = if attacks.is_empty() {
            &FALLBACK_ATTACK
        } else {
            &attacks[rng.gen_range(0..attacks.len())]
        };
        self.player_hp = (self.player_hp - attack.damage.max(0.0)).max(0.0);

        for turns in self.cooldowns.values_mut() {
            *turns = turns.saturating_sub(1);
        }
        self.cooldowns.retain(|_, turns| *turns > 0);

        self.push_log(
            Speaker::Opponent,
            format!("{} lands for {:.0} damage.", attack.name, attack.damage),
        );

        if self.player_hp <= 0.0 {
            self.finish(false);
            return Some(EnemyTurnResult::Lost);
        }
        self.turn = Turn::Player;
        Some(EnemyTurnResult::PlayerTurn)
    }

    fn finish(&mut self, player_won: bool) {
        self.is_complete = true;
        self.did_player_win = player_won;
        let verdict = if player_won {
            "The crowd is yours. You win the debate!"
        } else {
            "You lose the room. The debate is over."
        };
        self.push_log(Speaker::Moderator, verdict.to_string());
    }

    fn push_log(&mut self, speaker: Speaker, text: String) {
        self.battle_log.push(LogEntry { speaker, text });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const ATTACKS: &[EnemyAttackDef] = &[
        EnemyAttackDef {
            name: "Jab",
            damage: 10.0,
        },
        EnemyAttackDef {
            name: "Haymaker",
            damage: 25.0,
        },
    ];

    fn speech(cooldown: u32) -> DebateMove {
        DebateMove {
            id: "speech".to_string(),
            name: "Speech".to_string(),
            policy_cost: 50.0,
            cooldown,
        }
    }

    #[test]
    fn lethal_move_wins_without_enemy_turn() {
        let mut battle = BattleState::new(100.0, 30.0);
        let result = battle.player_move(&speech(0), 40.0).unwrap();
        assert_eq!(result, MoveResult::Won);
        assert!(battle.is_complete && battle.did_player_win);
        assert_eq!(battle.enemy_hp, 0.0);

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(battle.enemy_turn(ATTACKS, &mut rng), None);
        assert_eq!(
            battle.player_move(&speech(0), 1.0),
            Err(MoveError::Complete)
        );
    }

    #[test]
    fn moves_are_rejected_out_of_turn_and_on_cooldown() {
        let mut battle = BattleState::new(100.0, 500.0);
        let mut rng = StdRng::seed_from_u64(7);
        battle.player_move(&speech(2), 10.0).unwrap();
        assert_eq!(
            battle.player_move(&speech(2), 10.0),
            Err(MoveError::NotPlayerTurn)
        );

        battle.enemy_turn(ATTACKS, &mut rng).unwrap();
        assert_eq!(battle.cooldown("speech"), 1);
        assert_eq!(
            battle.player_move(&speech(2), 10.0),
            Err(MoveError::OnCooldown { turns: 1 })
        );
        assert_eq!(battle.enemy_hp, 490.0);
    }

    #[test]
    fn cooldowns_expire_and_are_removed() {
        let mut battle = BattleState::new(1_000.0, 1_000.0);
        let mut rng = StdRng::seed_from_u64(3);
        let other = DebateMove {
            id: "other".to_string(),
            ..speech(0)
        };
        battle.player_move(&speech(2), 1.0).unwrap();
        battle.enemy_turn(ATTACKS, &mut rng).unwrap();
        battle.player_move(&other, 1.0).unwrap();
        battle.enemy_turn(ATTACKS, &mut rng).unwrap();
        assert!(battle.cooldowns.is_empty());
        assert!(battle.can_use("speech"));
    }

    #[test]
    fn player_collapse_is_a_loss() {
        let mut battle = BattleState::new(20.0, 1_000.0);
        let mut rng = StdRng::seed_from_u64(11);
        let mut outcome = None;
        while !battle.is_complete {
            battle.player_move(&speech(0), 1.0).unwrap();
            outcome = battle.enemy_turn(ATTACKS, &mut rng);
        }
        assert_eq!(outcome, Some(EnemyTurnResult::Lost));
        assert!(!battle.did_player_win);
        assert_eq!(battle.player_hp, 0.0);
    }

    #[test]
    fn seeded_battles_replay_identically() {
        let run = |seed: u64| {
            let mut battle = BattleState::new(120.0, 200.0);
            let mut rng = StdRng::seed_from_u64(seed);
            while !battle.is_complete {
                battle.player_move(&speech(0), 15.0).unwrap();
                battle.enemy_turn(ATTACKS, &mut rng);
            }
            battle
        };
        let first = run(42);
        let second = run(42);
        assert_eq!(first.battle_log, second.battle_log);
        assert_eq!(first.player_hp, second.player_hp);
        assert_eq!(first.enemy_hp, second.enemy_hp);
    }

    #[test]
    fn empty_attack_table_falls_back() {
        let mut battle = BattleState::new(100.0, 100.0);
        let mut rng = StdRng::seed_from_u64(0);
        battle.player_move(&speech(0), 1.0).unwrap();
        battle.enemy_turn(&[], &mut rng).unwrap();
        assert_eq!(battle.player_hp, 95.0);
    }
}
