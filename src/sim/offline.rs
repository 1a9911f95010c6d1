use super::game::Game;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfflineReport {
    pub earnings: f64,
    pub seconds: u64,
}

impl Game {
    /// Grants the earnings of the absence since the last save, capped, as one
    /// lump sum at the steady-state rate. Returns `None` when nothing is owed.
    pub fn reconcile_offline(&mut self, now_ms: i64) -> Option<OfflineReport> {
        let last = self.state.last_save_timestamp;
        if last <= 0 || now_ms <= last {
            return None;
        }
        let elapsed_secs = ((now_ms - last) / 1000) as u64;
        let seconds = elapsed_secs.min(self.config.offline_max_seconds);
        if seconds <= self.config.offline_noise_seconds {
            return None;
        }

        let earnings = self.income_per_second() * seconds as f64;
        if !earnings.is_finite() || earnings <= 0.0 {
            return None;
        }
        self.state.credit(earnings);
        self.state.last_save_timestamp = now_ms;
        info!(seconds, elapsed_secs, earnings, "offline progress granted");
        self.notify(format!(
            "While you were away ({}): +{earnings:.0} funds.",
            format_duration(seconds)
        ));
        Some(OfflineReport { earnings, seconds })
    }
}

fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m {}s", seconds % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::game::tests::test_game;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    const NOW: i64 = 1_800_000_000_000;

    fn earning_game() -> Game {
        let mut game = test_game();
        let entry = game.state.activities.get_mut("flyer_drops").unwrap();
        entry.owned = 10;
        entry.manager_hired = true;
        game
    }

    #[test]
    fn absence_is_capped() {
        let mut game = earning_game();
        game.state.last_save_timestamp = NOW - 100 * DAY_MS;
        let rate = game.income_per_second();
        let report = game.reconcile_offline(NOW).unwrap();
        assert_eq!(report.seconds, 8 * 60 * 60);
        assert_eq!(report.earnings, rate * 28_800.0);
        assert_eq!(game.state.funds, report.earnings);
        assert_eq!(game.state.lifetime_earnings, report.earnings);
    }

    #[test]
    fn absence_is_paid_only_once() {
        let mut game = earning_game();
        game.state.last_save_timestamp = NOW - DAY_MS;
        assert!(game.reconcile_offline(NOW).is_some());
        let funds = game.state.funds;
        assert_eq!(game.state.last_save_timestamp, NOW);
        assert_eq!(game.reconcile_offline(NOW), None);
        assert_eq!(game.state.funds, funds);
    }

    #[test]
    fn short_absence_is_noise() {
        let mut game = earning_game();
        game.state.last_save_timestamp = NOW - 5_000;
        assert_eq!(game.reconcile_offline(NOW), None);
        assert_eq!(game.state.funds, 0.0);
    }

    #[test]
    fn nothing_automated_grants_nothing() {
        let mut game = test_game();
        game.state.last_save_timestamp = NOW - DAY_MS;
        assert_eq!(game.reconcile_offline(NOW), None);
        assert_eq!(game.state.lifetime_earnings, 0.0);
    }

    #[test]
    fn steady_state_rate_matches_ticking() {
        let game = earning_game();
        // flyer drops: 60 revenue x 10 owned every 3 seconds
        assert!((game.income_per_second() - 200.0).abs() < 1e-9);
    }
}
