use crate::sim::content::{
    ANGEL_UPGRADES, AngelUpgradeDef, POLICIES, POWER_STRUCTURES, PolicyDef, PowerStructureDef,
    SKILLS, SkillDef,
};
use crate::sim::game::{ActionError, Game};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    Activities,
    Upgrades,
}

/// One row of the upgrades panel.
#[derive(Debug, Clone, Copy)]
pub enum UpgradeEntry {
    Policy(&'static PolicyDef),
    Structure(&'static PowerStructureDef),
    Angel(&'static AngelUpgradeDef),
    Skill(&'static SkillDef),
}

impl UpgradeEntry {
    pub fn name(&self) -> &'static str {
        match self {
            UpgradeEntry::Policy(def) => def.name,
            UpgradeEntry::Structure(def) => def.name,
            UpgradeEntry::Angel(def) => def.name,
            UpgradeEntry::Skill(def) => def.name,
        }
    }

    pub fn is_owned(&self, game: &Game) -> bool {
        let state = &game.state;
        match self {
            UpgradeEntry::Policy(def) => state.unlocked_policies.contains(def.id),
            UpgradeEntry::Structure(def) => state.unlocked_structures.contains(def.id),
            UpgradeEntry::Angel(def) => state.unlocked_angel_upgrades.contains(def.id),
            UpgradeEntry::Skill(def) => state.unlocked_skills.contains(def.id),
        }
    }

    pub fn price_label(&self) -> String {
        match self {
            UpgradeEntry::Policy(def) => format!("{:.0} funds", def.cost),
            UpgradeEntry::Structure(def) => format!("{:.0} vol", def.volunteer_cost),
            UpgradeEntry::Angel(def) => format!("{:.0} vol", def.volunteer_cost),
            UpgradeEntry::Skill(def) => format!("{} SP", def.cost),
        }
    }

    pub fn purchase(&self, game: &mut Game) -> Result<(), ActionError> {
        match self {
            UpgradeEntry::Policy(def) => game.buy_policy(def.id),
            UpgradeEntry::Structure(def) => game.assign_volunteers(def.id),
            UpgradeEntry::Angel(def) => game.buy_angel_upgrade(def.id),
            UpgradeEntry::Skill(def) => game.unlock_skill(def.id),
        }
    }
}

pub fn upgrade_entries() -> Vec<UpgradeEntry> {
    POLICIES
        .iter()
        .map(UpgradeEntry::Policy)
        .chain(POWER_STRUCTURES.iter().map(UpgradeEntry::Structure))
        .chain(ANGEL_UPGRADES.iter().map(UpgradeEntry::Angel))
        .chain(SKILLS.iter().map(UpgradeEntry::Skill))
        .collect()
}

#[derive(Debug, Default)]
pub struct App {
    focus: FocusTarget,
    pub selected_activity: usize,
    pub selected_upgrade: usize,
    /// Set by the first hard-reset keypress; the second one confirms.
    pub confirm_reset: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> FocusTarget {
        self.focus
    }

    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            FocusTarget::Activities => FocusTarget::Upgrades,
            FocusTarget::Upgrades => FocusTarget::Activities,
        };
    }

    pub fn move_selection(&mut self, delta: isize, activities: usize, upgrades: usize) {
        let (selected, len) = match self.focus {
            FocusTarget::Activities => (&mut self.selected_activity, activities),
            FocusTarget::Upgrades => (&mut self.selected_upgrade, upgrades),
        };
        if len == 0 {
            *selected = 0;
            return;
        }
        let mut idx = *selected as isize + delta;
        if idx < 0 {
            idx = len as isize - 1;
        } else if idx >= len as isize {
            idx = 0;
        }
        *selected = idx as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps_in_focused_list() {
        let mut app = App::new();
        app.move_selection(-1, 8, 20);
        assert_eq!(app.selected_activity, 7);
        app.next_focus();
        app.move_selection(1, 8, 20);
        assert_eq!(app.selected_upgrade, 1);
        assert_eq!(app.selected_activity, 7);
    }

    #[test]
    fn upgrade_panel_lists_every_purchasable() {
        let entries = upgrade_entries();
        assert_eq!(
            entries.len(),
            POLICIES.len() + POWER_STRUCTURES.len() + ANGEL_UPGRADES.len() + SKILLS.len()
        );
    }
}
