//! Static content tables consumed by the simulation.
//!
//! Everything here is read-only data keyed by string id. Lookups return
//! `Option`; callers treat a missing id as the neutral element.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MilestoneEffect {
    Speed(f64),
    Revenue(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MilestoneDef {
    pub threshold: u32,
    pub effect: MilestoneEffect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalMilestoneDef {
    pub threshold: u32,
    pub multiplier: f64,
}

#[derive(Debug)]
pub struct ActivityDef {
    pub id: &'static str,
    pub name: &'static str,
    pub base_cost: f64,
    pub growth_rate: f64,
    pub base_revenue: f64,
    pub cycle_ms: u64,
    pub manager_cost_multiplier: f64,
    pub milestones: &'static [MilestoneDef],
}

impl ActivityDef {
    pub fn manager_cost(&self) -> f64 {
        super::formulas::manager_cost(self.base_cost, self.manager_cost_multiplier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolicyEffect {
    GlobalRevenue(f64),
    ActivityRevenue {
        activity: &'static str,
        multiplier: f64,
    },
    ActivitySpeed {
        activity: &'static str,
        multiplier: f64,
    },
}

#[derive(Debug)]
pub struct PolicyDef {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: f64,
    /// Lowest stage index at which the policy can be bought.
    pub stage_gate: usize,
    pub effect: PolicyEffect,
    pub happiness_delta: f64,
    pub popularity_delta: f64,
    /// Turns the policy stays on cooldown after being argued in a debate.
    pub debate_cooldown: u32,
}

#[derive(Debug)]
pub struct PowerStructureDef {
    pub id: &'static str,
    pub name: &'static str,
    pub volunteer_cost: f64,
    pub revenue_multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngelEffect {
    GlobalRevenue(f64),
    GlobalSpeed(f64),
    CanvassPower(f64),
}

#[derive(Debug)]
pub struct AngelUpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub volunteer_cost: f64,
    pub effect: AngelEffect,
}

#[derive(Debug)]
pub struct RankDef {
    pub id: &'static str,
    pub name: &'static str,
    pub threshold: f64,
    pub canvass_multiplier: f64,
}

#[derive(Debug)]
pub struct StageDef {
    pub name: &'static str,
    /// Lifetime earnings required before the stage's debate can be called.
    pub win_threshold: f64,
    pub happiness_requirement: f64,
    /// `None` marks the final stage.
    pub opponent: Option<&'static str>,
}

#[derive(Debug)]
pub struct EnemyAttackDef {
    pub name: &'static str,
    pub damage: f64,
}

#[derive(Debug)]
pub struct OpponentDef {
    pub id: &'static str,
    pub name: &'static str,
    pub health: f64,
    pub attacks: &'static [EnemyAttackDef],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkillEffect {
    CanvassPower(f64),
    ActivitySpeed(f64),
    DebateDamage(f64),
    /// Multiplies the momentum decay rate; values below 1 slow decay.
    MomentumDecay(f64),
}

#[derive(Debug)]
pub struct SkillDef {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u32,
    pub effect: SkillEffect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MemoryCondition {
    LifetimeEarnings(f64),
    TotalOwned(u32),
    StageReached(usize),
    DebatesWon(u32),
    CanvassClicks(u64),
    Volunteers(f64),
}

#[derive(Debug)]
pub struct MemoryDef {
    pub id: &'static str,
    pub name: &'static str,
    pub condition: MemoryCondition,
}

/// One-shot deltas shared by dilemma choices and ambient events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Effect {
    pub happiness: f64,
    pub popularity: f64,
    pub momentum: f64,
    /// Fraction of current funds gained (positive) or lost (negative).
    pub funds_fraction: f64,
}

#[derive(Debug)]
pub struct DilemmaChoice {
    pub label: &'static str,
    pub effect: Effect,
}

#[derive(Debug)]
pub struct DilemmaDef {
    pub id: &'static str,
    pub prompt: &'static str,
    pub choices: &'static [DilemmaChoice],
}

#[derive(Debug)]
pub struct EventDef {
    pub id: &'static str,
    pub headline: &'static str,
    pub effect: Effect,
}

const STANDARD_MILESTONES: &[MilestoneDef] = &[
    MilestoneDef {
        threshold: 25,
        effect: MilestoneEffect::Speed(2.0),
    },
    MilestoneDef {
        threshold: 50,
        effect: MilestoneEffect::Speed(2.0),
    },
    MilestoneDef {
        threshold: 100,
        effect: MilestoneEffect::Revenue(3.0),
    },
    MilestoneDef {
        threshold: 200,
        effect: MilestoneEffect::Revenue(4.0),
    },
];

const FAST_MILESTONES: &[MilestoneDef] = &[
    MilestoneDef {
        threshold: 25,
        effect: MilestoneEffect::Revenue(2.0),
    },
    MilestoneDef {
        threshold: 50,
        effect: MilestoneEffect::Speed(2.0),
    },
    MilestoneDef {
        threshold: 100,
        effect: MilestoneEffect::Revenue(2.0),
    },
    MilestoneDef {
        threshold: 200,
        effect: MilestoneEffect::Revenue(5.0),
    },
];

pub static ACTIVITIES: [ActivityDef; 8] = [
    ActivityDef {
        id: "door_knocking",
        name: "Door Knocking",
        base_cost: 4.0,
        growth_rate: 1.07,
        base_revenue: 1.0,
        cycle_ms: 600,
        manager_cost_multiplier: 250.0,
        milestones: FAST_MILESTONES,
    },
    ActivityDef {
        id: "flyer_drops",
        name: "Flyer Drops",
        base_cost: 60.0,
        growth_rate: 1.15,
        base_revenue: 60.0,
        cycle_ms: 3_000,
        manager_cost_multiplier: 250.0,
        milestones: STANDARD_MILESTONES,
    },
    ActivityDef {
        id: "phone_bank",
        name: "Phone Bank",
        base_cost: 720.0,
        growth_rate: 1.14,
        base_revenue: 540.0,
        cycle_ms: 6_000,
        manager_cost_multiplier: 200.0,
        milestones: STANDARD_MILESTONES,
    },
    ActivityDef {
        id: "town_halls",
        name: "Town Halls",
        base_cost: 8_640.0,
        growth_rate: 1.13,
        base_revenue: 4_320.0,
        cycle_ms: 12_000,
        manager_cost_multiplier: 200.0,
        milestones: STANDARD_MILESTONES,
    },
    ActivityDef {
        id: "social_media",
        name: "Social Media Blitz",
        base_cost: 103_680.0,
        growth_rate: 1.12,
        base_revenue: 51_840.0,
        cycle_ms: 24_000,
        manager_cost_multiplier: 150.0,
        milestones: STANDARD_MILESTONES,
    },
    ActivityDef {
        id: "local_radio",
        name: "Local Radio Spots",
        base_cost: 1_244_160.0,
        growth_rate: 1.11,
        base_revenue: 622_080.0,
        cycle_ms: 96_000,
        manager_cost_multiplier: 150.0,
        milestones: STANDARD_MILESTONES,
    },
    ActivityDef {
        id: "tv_ads",
        name: "Prime-Time TV Ads",
        base_cost: 14_929_920.0,
        growth_rate: 1.10,
        base_revenue: 7_464_960.0,
        cycle_ms: 384_000,
        manager_cost_multiplier: 100.0,
        milestones: STANDARD_MILESTONES,
    },
    ActivityDef {
        id: "national_rally",
        name: "National Rally Tour",
        base_cost: 179_159_040.0,
        growth_rate: 1.09,
        base_revenue: 89_579_520.0,
        cycle_ms: 1_536_000,
        manager_cost_multiplier: 100.0,
        milestones: STANDARD_MILESTONES,
    },
];

pub static GLOBAL_MILESTONES: [GlobalMilestoneDef; 4] = [
    GlobalMilestoneDef {
        threshold: 100,
        multiplier: 1.5,
    },
    GlobalMilestoneDef {
        threshold: 250,
        multiplier: 2.0,
    },
    GlobalMilestoneDef {
        threshold: 500,
        multiplier: 2.0,
    },
    GlobalMilestoneDef {
        threshold: 1_000,
        multiplier: 3.0,
    },
];

/// `(momentum threshold, revenue multiplier)`, highest threshold last.
pub static MOMENTUM_TIERS: [(f64, f64); 2] = [(50.0, 1.5), (90.0, 2.0)];

pub static POLICIES: [PolicyDef; 10] = [
    PolicyDef {
        id: "community_gardens",
        name: "Community Gardens",
        cost: 250.0,
        stage_gate: 0,
        effect: PolicyEffect::ActivityRevenue {
            activity: "door_knocking",
            multiplier: 3.0,
        },
        happiness_delta: 5.0,
        popularity_delta: 0.0,
        debate_cooldown: 1,
    },
    PolicyDef {
        id: "bike_lanes",
        name: "Protected Bike Lanes",
        cost: 2_500.0,
        stage_gate: 0,
        effect: PolicyEffect::ActivitySpeed {
            activity: "flyer_drops",
            multiplier: 2.0,
        },
        happiness_delta: 3.0,
        popularity_delta: 0.05,
        debate_cooldown: 2,
    },
    PolicyDef {
        id: "open_budget",
        name: "Open Budget Portal",
        cost: 25_000.0,
        stage_gate: 1,
        effect: PolicyEffect::GlobalRevenue(1.5),
        happiness_delta: 0.0,
        popularity_delta: 0.1,
        debate_cooldown: 2,
    },
    PolicyDef {
        id: "free_transit",
        name: "Fare-Free Transit",
        cost: 150_000.0,
        stage_gate: 1,
        effect: PolicyEffect::ActivityRevenue {
            activity: "phone_bank",
            multiplier: 3.0,
        },
        happiness_delta: 8.0,
        popularity_delta: 0.0,
        debate_cooldown: 2,
    },
    PolicyDef {
        id: "housing_first",
        name: "Housing First",
        cost: 2_000_000.0,
        stage_gate: 2,
        effect: PolicyEffect::GlobalRevenue(2.0),
        happiness_delta: 10.0,
        popularity_delta: 0.1,
        debate_cooldown: 3,
    },
    PolicyDef {
        id: "town_hall_streaming",
        name: "Live-Streamed Town Halls",
        cost: 8_000_000.0,
        stage_gate: 2,
        effect: PolicyEffect::ActivitySpeed {
            activity: "town_halls",
            multiplier: 2.0,
        },
        happiness_delta: 0.0,
        popularity_delta: 0.15,
        debate_cooldown: 2,
    },
    PolicyDef {
        id: "universal_broadband",
        name: "Universal Broadband",
        cost: 60_000_000.0,
        stage_gate: 3,
        effect: PolicyEffect::ActivityRevenue {
            activity: "social_media",
            multiplier: 4.0,
        },
        happiness_delta: 5.0,
        popularity_delta: 0.1,
        debate_cooldown: 3,
    },
    PolicyDef {
        id: "green_new_grid",
        name: "Green Grid Compact",
        cost: 900_000_000.0,
        stage_gate: 3,
        effect: PolicyEffect::GlobalRevenue(2.0),
        happiness_delta: 12.0,
        popularity_delta: 0.0,
        debate_cooldown: 3,
    },
    PolicyDef {
        id: "public_media",
        name: "Public Media Trust",
        cost: 12_000_000_000.0,
        stage_gate: 4,
        effect: PolicyEffect::ActivityRevenue {
            activity: "tv_ads",
            multiplier: 5.0,
        },
        happiness_delta: 0.0,
        popularity_delta: 0.25,
        debate_cooldown: 3,
    },
    PolicyDef {
        id: "universal_basic_dignity",
        name: "Universal Basic Dignity",
        cost: 250_000_000_000.0,
        stage_gate: 4,
        effect: PolicyEffect::GlobalRevenue(3.0),
        happiness_delta: 15.0,
        popularity_delta: 0.2,
        debate_cooldown: 4,
    },
];

pub static POWER_STRUCTURES: [PowerStructureDef; 4] = [
    PowerStructureDef {
        id: "neighborhood_councils",
        name: "Neighborhood Councils",
        volunteer_cost: 1.0,
        revenue_multiplier: 1.5,
    },
    PowerStructureDef {
        id: "worker_coops",
        name: "Worker Co-ops",
        volunteer_cost: 5.0,
        revenue_multiplier: 2.0,
    },
    PowerStructureDef {
        id: "citizens_assembly",
        name: "Citizens' Assembly",
        volunteer_cost: 25.0,
        revenue_multiplier: 3.0,
    },
    PowerStructureDef {
        id: "participatory_budget",
        name: "Participatory Budgeting",
        volunteer_cost: 100.0,
        revenue_multiplier: 5.0,
    },
];

pub static ANGEL_UPGRADES: [AngelUpgradeDef; 4] = [
    AngelUpgradeDef {
        id: "veteran_organizers",
        name: "Veteran Organizers",
        volunteer_cost: 2.0,
        effect: AngelEffect::CanvassPower(5.0),
    },
    AngelUpgradeDef {
        id: "data_team",
        name: "Volunteer Data Team",
        volunteer_cost: 10.0,
        effect: AngelEffect::GlobalSpeed(1.5),
    },
    AngelUpgradeDef {
        id: "grassroots_network",
        name: "Grassroots Network",
        volunteer_cost: 50.0,
        effect: AngelEffect::GlobalRevenue(3.0),
    },
    AngelUpgradeDef {
        id: "movement_legacy",
        name: "Movement Legacy",
        volunteer_cost: 500.0,
        effect: AngelEffect::GlobalRevenue(10.0),
    },
];

pub static RANKS: [RankDef; 8] = [
    RankDef {
        id: "volunteer",
        name: "Volunteer",
        threshold: 0.0,
        canvass_multiplier: 1.0,
    },
    RankDef {
        id: "precinct_captain",
        name: "Precinct Captain",
        threshold: 1_000.0,
        canvass_multiplier: 2.0,
    },
    RankDef {
        id: "field_organizer",
        name: "Field Organizer",
        threshold: 100_000.0,
        canvass_multiplier: 5.0,
    },
    RankDef {
        id: "campaign_manager",
        name: "Campaign Manager",
        threshold: 10_000_000.0,
        canvass_multiplier: 20.0,
    },
    RankDef {
        id: "councillor",
        name: "Councillor",
        threshold: 1e9,
        canvass_multiplier: 100.0,
    },
    RankDef {
        id: "mayor",
        name: "Mayor",
        threshold: 1e11,
        canvass_multiplier: 500.0,
    },
    RankDef {
        id: "governor",
        name: "Governor",
        threshold: 1e13,
        canvass_multiplier: 2_500.0,
    },
    RankDef {
        id: "president",
        name: "President",
        threshold: 1e15,
        canvass_multiplier: 10_000.0,
    },
];

pub static STAGES: [StageDef; 6] = [
    StageDef {
        name: "School Board Race",
        win_threshold: 5_000.0,
        happiness_requirement: 40.0,
        opponent: Some("incumbent_trustee"),
    },
    StageDef {
        name: "City Council",
        win_threshold: 500_000.0,
        happiness_requirement: 45.0,
        opponent: Some("developer_darling"),
    },
    StageDef {
        name: "Mayoral Campaign",
        win_threshold: 100_000_000.0,
        happiness_requirement: 50.0,
        opponent: Some("machine_boss"),
    },
    StageDef {
        name: "Governor's Mansion",
        win_threshold: 50_000_000_000.0,
        happiness_requirement: 55.0,
        opponent: Some("oil_baron"),
    },
    StageDef {
        name: "Presidential Run",
        win_threshold: 1e13,
        happiness_requirement: 60.0,
        opponent: Some("the_establishment"),
    },
    StageDef {
        name: "Utopia",
        win_threshold: f64::INFINITY,
        happiness_requirement: 0.0,
        opponent: None,
    },
];

pub static OPPONENTS: [OpponentDef; 5] = [
    OpponentDef {
        id: "incumbent_trustee",
        name: "Incumbent Trustee Hal Grimsby",
        health: 100.0,
        attacks: &[
            EnemyAttackDef {
                name: "Budget Scare",
                damage: 8.0,
            },
            EnemyAttackDef {
                name: "Think of the Children",
                damage: 10.0,
            },
        ],
    },
    OpponentDef {
        id: "developer_darling",
        name: "Councilwoman Priya Vance",
        health: 220.0,
        attacks: &[
            EnemyAttackDef {
                name: "Property Values",
                damage: 12.0,
            },
            EnemyAttackDef {
                name: "Zoning Filibuster",
                damage: 15.0,
            },
        ],
    },
    OpponentDef {
        id: "machine_boss",
        name: "Boss Tommy Malloy",
        health: 450.0,
        attacks: &[
            EnemyAttackDef {
                name: "Patronage Promise",
                damage: 16.0,
            },
            EnemyAttackDef {
                name: "Union Endorsement",
                damage: 20.0,
            },
            EnemyAttackDef {
                name: "Ward Heeler Rumor",
                damage: 14.0,
            },
        ],
    },
    OpponentDef {
        id: "oil_baron",
        name: "Governor Rex Calloway",
        health: 900.0,
        attacks: &[
            EnemyAttackDef {
                name: "Jobs Jobs Jobs",
                damage: 22.0,
            },
            EnemyAttackDef {
                name: "Attack Ad Blitz",
                damage: 28.0,
            },
        ],
    },
    OpponentDef {
        id: "the_establishment",
        name: "Senator Whitmore III",
        health: 1_800.0,
        attacks: &[
            EnemyAttackDef {
                name: "Fiscal Responsibility",
                damage: 30.0,
            },
            EnemyAttackDef {
                name: "Electability Question",
                damage: 35.0,
            },
            EnemyAttackDef {
                name: "Super PAC Barrage",
                damage: 40.0,
            },
        ],
    },
];

/// Policy cost standing in for the always-available stump speech.
pub const STUMP_SPEECH_COST: f64 = 50.0;
pub const STUMP_SPEECH_ID: &str = "stump_speech";

pub static SKILLS: [SkillDef; 6] = [
    SkillDef {
        id: "loud_voice",
        name: "Loud Voice",
        cost: 1,
        effect: SkillEffect::CanvassPower(2.0),
    },
    SkillDef {
        id: "delegation",
        name: "Delegation",
        cost: 1,
        effect: SkillEffect::ActivitySpeed(1.25),
    },
    SkillDef {
        id: "debate_prep",
        name: "Debate Prep",
        cost: 2,
        effect: SkillEffect::DebateDamage(1.5),
    },
    SkillDef {
        id: "staying_power",
        name: "Staying Power",
        cost: 2,
        effect: SkillEffect::MomentumDecay(0.5),
    },
    SkillDef {
        id: "silver_tongue",
        name: "Silver Tongue",
        cost: 3,
        effect: SkillEffect::DebateDamage(2.0),
    },
    SkillDef {
        id: "machine_politics",
        name: "Machine Politics",
        cost: 3,
        effect: SkillEffect::ActivitySpeed(1.5),
    },
];

pub static MEMORIES: [MemoryDef; 8] = [
    MemoryDef {
        id: "first_door",
        name: "The First Door",
        condition: MemoryCondition::CanvassClicks(1),
    },
    MemoryDef {
        id: "blistered_knuckles",
        name: "Blistered Knuckles",
        condition: MemoryCondition::CanvassClicks(1_000),
    },
    MemoryDef {
        id: "first_thousand",
        name: "First Thousand",
        condition: MemoryCondition::LifetimeEarnings(1_000.0),
    },
    MemoryDef {
        id: "a_real_operation",
        name: "A Real Operation",
        condition: MemoryCondition::TotalOwned(100),
    },
    MemoryDef {
        id: "first_debate",
        name: "Holding the Mic",
        condition: MemoryCondition::DebatesWon(1),
    },
    MemoryDef {
        id: "city_hall",
        name: "Keys to City Hall",
        condition: MemoryCondition::StageReached(3),
    },
    MemoryDef {
        id: "movement",
        name: "It's a Movement",
        condition: MemoryCondition::Volunteers(10.0),
    },
    MemoryDef {
        id: "utopia",
        name: "We Made It",
        condition: MemoryCondition::StageReached(5),
    },
];

pub static DILEMMAS: [DilemmaDef; 3] = [
    DilemmaDef {
        id: "donor_strings",
        prompt: "A wealthy donor offers a large check, with quiet conditions attached.",
        choices: &[
            DilemmaChoice {
                label: "Take the money",
                effect: Effect {
                    happiness: -10.0,
                    popularity: -0.05,
                    momentum: 0.0,
                    funds_fraction: 0.25,
                },
            },
            DilemmaChoice {
                label: "Refuse publicly",
                effect: Effect {
                    happiness: 5.0,
                    popularity: 0.1,
                    momentum: 10.0,
                    funds_fraction: 0.0,
                },
            },
        ],
    },
    DilemmaDef {
        id: "leaked_memo",
        prompt: "A staffer leaked an embarrassing internal memo to the press.",
        choices: &[
            DilemmaChoice {
                label: "Own it",
                effect: Effect {
                    happiness: 3.0,
                    popularity: -0.05,
                    momentum: 0.0,
                    funds_fraction: 0.0,
                },
            },
            DilemmaChoice {
                label: "Deny everything",
                effect: Effect {
                    happiness: -8.0,
                    popularity: 0.05,
                    momentum: 5.0,
                    funds_fraction: 0.0,
                },
            },
            DilemmaChoice {
                label: "Fire the staffer",
                effect: Effect {
                    happiness: -3.0,
                    popularity: 0.0,
                    momentum: -10.0,
                    funds_fraction: -0.05,
                },
            },
        ],
    },
    DilemmaDef {
        id: "strike_support",
        prompt: "Transit workers are striking and ask for your endorsement.",
        choices: &[
            DilemmaChoice {
                label: "Join the picket line",
                effect: Effect {
                    happiness: 8.0,
                    popularity: -0.05,
                    momentum: 15.0,
                    funds_fraction: 0.0,
                },
            },
            DilemmaChoice {
                label: "Stay neutral",
                effect: Effect {
                    happiness: -5.0,
                    popularity: 0.05,
                    momentum: 0.0,
                    funds_fraction: 0.0,
                },
            },
        ],
    },
];

pub static EVENTS: [EventDef; 4] = [
    EventDef {
        id: "viral_clip",
        headline: "Your canvassing clip goes viral overnight.",
        effect: Effect {
            happiness: 0.0,
            popularity: 0.1,
            momentum: 20.0,
            funds_fraction: 0.0,
        },
    },
    EventDef {
        id: "bake_sale",
        headline: "Supporters hold a record-breaking bake sale.",
        effect: Effect {
            happiness: 2.0,
            popularity: 0.0,
            momentum: 0.0,
            funds_fraction: 0.05,
        },
    },
    EventDef {
        id: "heatwave",
        headline: "A brutal heatwave keeps volunteers indoors.",
        effect: Effect {
            happiness: -4.0,
            popularity: 0.0,
            momentum: -15.0,
            funds_fraction: 0.0,
        },
    },
    EventDef {
        id: "op_ed",
        headline: "A glowing op-ed runs in the local paper.",
        effect: Effect {
            happiness: 3.0,
            popularity: 0.05,
            momentum: 5.0,
            funds_fraction: 0.0,
        },
    },
];

pub fn activity(id: &str) -> Option<&'static ActivityDef> {
    ACTIVITIES.iter().find(|def| def.id == id)
}

pub fn policy(id: &str) -> Option<&'static PolicyDef> {
    POLICIES.iter().find(|def| def.id == id)
}

pub fn power_structure(id: &str) -> Option<&'static PowerStructureDef> {
    POWER_STRUCTURES.iter().find(|def| def.id == id)
}

pub fn angel_upgrade(id: &str) -> Option<&'static AngelUpgradeDef> {
    ANGEL_UPGRADES.iter().find(|def| def.id == id)
}

pub fn rank(id: &str) -> Option<&'static RankDef> {
    RANKS.iter().find(|def| def.id == id)
}

pub fn stage(index: usize) -> Option<&'static StageDef> {
    STAGES.get(index)
}

pub fn opponent(id: &str) -> Option<&'static OpponentDef> {
    OPPONENTS.iter().find(|def| def.id == id)
}

pub fn skill(id: &str) -> Option<&'static SkillDef> {
    SKILLS.iter().find(|def| def.id == id)
}

pub fn dilemma(id: &str) -> Option<&'static DilemmaDef> {
    DILEMMAS.iter().find(|def| def.id == id)
}

pub fn event(id: &str) -> Option<&'static EventDef> {
    EVENTS.iter().find(|def| def.id == id)
}

pub fn baseline_rank() -> &'static RankDef {
    &RANKS[0]
}

pub fn final_stage_index() -> usize {
    STAGES.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_per_table() {
        let activity_ids: HashSet<_> = ACTIVITIES.iter().map(|def| def.id).collect();
        assert_eq!(activity_ids.len(), ACTIVITIES.len());
        let policy_ids: HashSet<_> = POLICIES.iter().map(|def| def.id).collect();
        assert_eq!(policy_ids.len(), POLICIES.len());
        let memory_ids: HashSet<_> = MEMORIES.iter().map(|def| def.id).collect();
        assert_eq!(memory_ids.len(), MEMORIES.len());
    }

    #[test]
    fn policy_targets_and_stage_opponents_resolve() {
        for def in &POLICIES {
            match def.effect {
                PolicyEffect::ActivityRevenue { activity: id, .. }
                | PolicyEffect::ActivitySpeed { activity: id, .. } => {
                    assert!(activity(id).is_some(), "{} targets unknown {id}", def.id);
                }
                PolicyEffect::GlobalRevenue(_) => {}
            }
        }
        for (index, def) in STAGES.iter().enumerate() {
            match def.opponent {
                Some(id) => assert!(opponent(id).is_some()),
                None => assert_eq!(index, final_stage_index()),
            }
        }
    }

    #[test]
    fn ranks_are_sorted_and_growth_rates_exceed_one() {
        assert!(RANKS.windows(2).all(|pair| pair[0].threshold < pair[1].threshold));
        assert!(ACTIVITIES.iter().all(|def| def.growth_rate > 1.0));
        assert_eq!(baseline_rank().threshold, 0.0);
    }
}
