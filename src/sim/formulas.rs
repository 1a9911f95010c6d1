//! Pure economic formulas shared by the tick loop, the store actions, offline
//! reconciliation and the UI. Nothing here reads content tables directly;
//! every tunable arrives as a parameter.

/// Upper bound for bulk purchase searches.
pub const MAX_BULK_QUANTITY: u32 = 100_000;
const XP_PER_LEVEL_SQUARED: f64 = 100.0;
const MIN_COMBAT_HP: f64 = 10.0;

pub fn unit_cost(base_cost: f64, growth_rate: f64, owned: u32) -> f64 {
    base_cost * growth_rate.powi(owned as i32)
}

/// Closed-form cost of buying `quantity` units starting at `owned`, floored.
pub fn bulk_cost(base_cost: f64, growth_rate: f64, owned: u32, quantity: u32) -> f64 {
    if quantity == 0 {
        return 0.0;
    }
    let first = unit_cost(base_cost, growth_rate, owned);
    let series = (1.0 - growth_rate.powi(quantity as i32)) / (1.0 - growth_rate);
    (first * series).floor()
}

/// Largest `n` with `bulk_cost(n) <= funds`, found by binary search.
pub fn max_affordable(base_cost: f64, growth_rate: f64, owned: u32, funds: f64) -> u32 {
    if funds.is_nan() || funds < 0.0 {
        return 0;
    }
    let affordable = |n: u32| bulk_cost(base_cost, growth_rate, owned, n) <= funds;

    let mut hi = 1u32;
    while affordable(hi) {
        if hi >= MAX_BULK_QUANTITY {
            return MAX_BULK_QUANTITY;
        }
        hi = (hi * 2).min(MAX_BULK_QUANTITY);
    }
    let mut lo = 0u32;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if affordable(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

pub fn manager_cost(base_cost: f64, multiplier: f64) -> f64 {
    base_cost * multiplier
}

/// Highest tier whose threshold the momentum has reached; 1x below all tiers.
pub fn momentum_multiplier(momentum: f64, tiers: &[(f64, f64)]) -> f64 {
    tiers
        .iter()
        .filter(|(threshold, _)| momentum >= *threshold)
        .map(|(_, multiplier)| *multiplier)
        .fold(1.0, f64::max)
}

pub fn volunteer_multiplier(volunteers: f64, bonus_per_volunteer: f64) -> f64 {
    1.0 + volunteers.max(0.0) * bonus_per_volunteer
}

/// Product of the multipliers of every `(threshold, multiplier)` reached.
pub fn threshold_product<I>(count: u32, steps: I) -> f64
where
    I: IntoIterator<Item = (u32, f64)>,
{
    steps
        .into_iter()
        .filter(|(threshold, _)| count >= *threshold)
        .map(|(_, multiplier)| multiplier)
        .product()
}

/// Every factor that feeds the revenue multiplier. Built once per tick and
/// shared with any projection so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevenueFactors {
    pub popularity: f64,
    pub volunteer: f64,
    pub momentum: f64,
    pub policy: f64,
    pub global_milestone: f64,
    pub power_structure: f64,
}

impl RevenueFactors {
    pub fn total(&self) -> f64 {
        self.popularity
            * self.volunteer
            * self.momentum
            * self.policy
            * self.global_milestone
            * self.power_structure
    }
}

impl Default for RevenueFactors {
    fn default() -> Self {
        Self {
            popularity: 1.0,
            volunteer: 1.0,
            momentum: 1.0,
            policy: 1.0,
            global_milestone: 1.0,
            power_structure: 1.0,
        }
    }
}

/// Approval in `[0, 100]`.
pub fn polling(lifetime_earnings: f64, popularity: f64, momentum: f64, happiness: f64) -> f64 {
    let reach = (5.0 * (lifetime_earnings.max(0.0) + 1.0).log10()).min(40.0);
    let raw = 20.0 + reach + (popularity - 1.0) * 20.0 + momentum * 0.15 + (happiness - 50.0) * 0.3;
    raw.clamp(0.0, 100.0)
}

/// 50% polling is neutral.
pub fn polling_multiplier(polling: f64) -> f64 {
    polling / 50.0
}

pub fn prestige_volunteers(lifetime_earnings: f64, divisor: f64) -> f64 {
    if divisor <= 0.0 || lifetime_earnings <= 0.0 {
        return 0.0;
    }
    (lifetime_earnings / divisor).sqrt().floor()
}

pub fn level_for_xp(xp: f64) -> u32 {
    1 + (xp.max(0.0) / XP_PER_LEVEL_SQUARED).sqrt().floor() as u32
}

/// Cumulative xp at which `level` is reached.
pub fn xp_for_level(level: u32) -> f64 {
    let steps = level.saturating_sub(1) as f64;
    steps * steps * XP_PER_LEVEL_SQUARED
}

/// Momentum after `dt_secs` of decay. Volunteers dampen the rate.
pub fn decayed_momentum(
    momentum: f64,
    dt_secs: f64,
    rate_per_sec: f64,
    volunteers: f64,
    dampening_per_volunteer: f64,
    skill_multiplier: f64,
) -> f64 {
    let rate = rate_per_sec * skill_multiplier / (1.0 + volunteers.max(0.0) * dampening_per_volunteer);
    (momentum - rate * dt_secs).clamp(0.0, 100.0)
}

pub fn debate_base_damage(policy_cost: f64, stage_index: usize, skill_multiplier: f64) -> f64 {
    let weight = 10.0 + 6.0 * (policy_cost.max(0.0) + 1.0).log10();
    weight * (1.0 + 0.25 * stage_index as f64) * skill_multiplier
}

pub fn debate_damage(base_damage: f64, polling_multiplier: f64) -> f64 {
    (base_damage * polling_multiplier).max(0.0)
}

pub fn player_max_hp(happiness: f64) -> f64 {
    (50.0 + happiness * 1.5).max(MIN_COMBAT_HP)
}

pub fn enemy_max_hp(health: f64) -> f64 {
    if health.is_finite() {
        health.max(MIN_COMBAT_HP)
    } else {
        MIN_COMBAT_HP
    }
}
