//! Built-in action and upgrade definitions.
//!
//! The catalog is immutable after startup: lookups return `None` for
//! unknown ids and enumeration preserves registration order.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use contracts::{ActionDefinition, UpgradeDefinition};

/// Registry of action and upgrade definitions with id indexes.
#[derive(Debug)]
pub struct Catalog {
    actions: Vec<ActionDefinition>,
    upgrades: Vec<UpgradeDefinition>,
    actions_by_id: BTreeMap<String, usize>,
    upgrades_by_id: BTreeMap<String, usize>,
}

impl Catalog {
    fn new() -> Self {
        Self {
            actions: Vec::new(),
            upgrades: Vec::new(),
            actions_by_id: BTreeMap::new(),
            upgrades_by_id: BTreeMap::new(),
        }
    }

    /// Register an action definition. Panics on duplicate action_id.
    fn register_action(&mut self, action: ActionDefinition) {
        assert!(
            !self.actions_by_id.contains_key(&action.action_id),
            "duplicate action_id: {}",
            action.action_id
        );
        let idx = self.actions.len();
        self.actions_by_id.insert(action.action_id.clone(), idx);
        self.actions.push(action);
    }

    /// Register an upgrade definition. Panics on duplicate upgrade_id.
    fn register_upgrade(&mut self, upgrade: UpgradeDefinition) {
        assert!(
            !self.upgrades_by_id.contains_key(&upgrade.upgrade_id),
            "duplicate upgrade_id: {}",
            upgrade.upgrade_id
        );
        let idx = self.upgrades.len();
        self.upgrades_by_id.insert(upgrade.upgrade_id.clone(), idx);
        self.upgrades.push(upgrade);
    }

    /// Lookup by action id.
    pub fn action(&self, action_id: &str) -> Option<&ActionDefinition> {
        self.actions_by_id.get(action_id).map(|&i| &self.actions[i])
    }

    /// Lookup by upgrade id.
    pub fn upgrade(&self, upgrade_id: &str) -> Option<&UpgradeDefinition> {
        self.upgrades_by_id
            .get(upgrade_id)
            .map(|&i| &self.upgrades[i])
    }

    /// All action definitions in registration order.
    pub fn actions(&self) -> &[ActionDefinition] {
        &self.actions
    }

    /// All upgrade definitions in registration order.
    pub fn upgrades(&self) -> &[UpgradeDefinition] {
        &self.upgrades
    }
}

fn action(
    action_id: &str,
    title: &str,
    time_cost: i64,
    money_delta: i64,
    health_delta: i64,
    stress_delta: i64,
    skill_delta: &[(&str, i64)],
) -> ActionDefinition {
    ActionDefinition {
        action_id: action_id.to_string(),
        title: title.to_string(),
        time_cost,
        money_delta,
        health_delta,
        stress_delta,
        skill_delta: skill_delta
            .iter()
            .map(|(skill, delta)| ((*skill).to_string(), *delta))
            .collect(),
    }
}

fn upgrade(upgrade_id: &str, title: &str, max_level: i64, cost_base: i64) -> UpgradeDefinition {
    UpgradeDefinition {
        upgrade_id: upgrade_id.to_string(),
        title: title.to_string(),
        max_level,
        cost_base,
    }
}

/// The process-wide built-in catalog, initialized on first access.
pub fn builtin() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let mut catalog = Catalog::new();

        catalog.register_action(action("work", "Work", 50, 1400, -4, 8, &[]));
        catalog.register_action(action(
            "study_dev",
            "Study (Dev)",
            40,
            -200,
            -2,
            4,
            &[("dev", 2)],
        ));
        catalog.register_action(action("invest", "Invest", 20, -500, 0, 3, &[]));
        catalog.register_action(action("rest", "Rest", 30, 0, 6, -8, &[]));
        catalog.register_action(action("leisure", "Leisure", 25, -250, 2, -10, &[]));

        catalog.register_upgrade(upgrade("start_money_bonus", "Start Money Bonus", 5, 8));
        catalog.register_upgrade(upgrade("study_efficiency", "Study Efficiency", 5, 10));

        catalog
    })
}
