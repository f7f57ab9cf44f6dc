//! Game orchestration: loads run/meta records, invokes the turn engine,
//! and commits the results — including the one-time soul-point grant when
//! a run reaches a terminal state.

use contracts::{
    ActionDefinition, MetaState, MonthResolution, RunSnapshot, RunState, TurnResult,
    UpgradeDefinition, UpgradePurchaseResult,
};
use relife_core::{catalog, engine};
use uuid::Uuid;

use crate::store::{JsonStore, StoreError};

#[derive(Debug)]
pub struct GameService {
    store: JsonStore,
}

impl GameService {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    pub fn get_meta(&self) -> Result<MetaState, StoreError> {
        self.store.load_meta()
    }

    pub fn list_actions(&self) -> &'static [ActionDefinition] {
        catalog::builtin().actions()
    }

    pub fn list_upgrades(&self) -> &'static [UpgradeDefinition] {
        catalog::builtin().upgrades()
    }

    pub fn start_run(&self) -> Result<RunSnapshot, StoreError> {
        let meta = self.store.load_meta()?;
        let run_id = new_run_id();
        let run = engine::create_new_run(&run_id, &meta);
        self.store.save_run(&run)?;
        tracing::info!(run_id = %run.run_id, money = run.money, "run started");
        Ok(RunSnapshot::new(run, meta))
    }

    /// `Ok(None)` means the store has no record for this run id.
    pub fn get_run(&self, run_id: &str) -> Result<Option<RunSnapshot>, StoreError> {
        let Some(run) = self.store.load_run(run_id)? else {
            return Ok(None);
        };
        let meta = self.store.load_meta()?;
        Ok(Some(RunSnapshot::new(run, meta)))
    }

    pub fn apply_action(
        &self,
        run_id: &str,
        action_id: &str,
    ) -> Result<Option<TurnResult>, StoreError> {
        let Some(run) = self.store.load_run(run_id)? else {
            return Ok(None);
        };
        let mut meta = self.store.load_meta()?;

        let mut result = engine::apply_action(run, &meta, action_id);
        self.commit(&mut result.run, &mut meta)?;
        Ok(Some(result))
    }

    pub fn resolve_month(&self, run_id: &str) -> Result<Option<MonthResolution>, StoreError> {
        let Some(run) = self.store.load_run(run_id)? else {
            return Ok(None);
        };
        let mut meta = self.store.load_meta()?;

        let mut resolution = engine::resolve_month(run, &mut rand::rng());
        self.commit(&mut resolution.run, &mut meta)?;
        Ok(Some(resolution))
    }

    pub fn purchase_upgrade(&self, upgrade_id: &str) -> Result<UpgradePurchaseResult, StoreError> {
        let mut meta = self.store.load_meta()?;

        let Some(upgrade) = catalog::builtin().upgrade(upgrade_id) else {
            return Ok(UpgradePurchaseResult::new(meta, "Unknown upgrade."));
        };

        let current = meta.upgrade_level(upgrade_id);
        if current >= upgrade.max_level {
            return Ok(UpgradePurchaseResult::new(meta, "Upgrade already maxed."));
        }

        let cost = upgrade.cost_base * (current + 1);
        if meta.soul_points < cost {
            return Ok(UpgradePurchaseResult::new(meta, "Not enough soul points."));
        }

        let next_level = current + 1;
        meta.soul_points -= cost;
        meta.upgrades.insert(upgrade.upgrade_id.clone(), next_level);
        self.store.save_meta(&meta)?;
        tracing::info!(upgrade_id = %upgrade.upgrade_id, level = next_level, cost, "upgrade purchased");

        let message = format!("Purchased {} Lv.{next_level}.", upgrade.title);
        Ok(UpgradePurchaseResult::new(meta, message))
    }

    // Invoked after every action/month-resolution: grant the one-time
    // soul-point reward on newly terminal runs, then always persist the run.
    fn commit(&self, run: &mut RunState, meta: &mut MetaState) -> Result<(), StoreError> {
        if run.finished && !run.points_granted {
            let points = engine::calculate_reincarnation_points(run);
            meta.soul_points += points;
            run.points_granted = true;
            run.log.push(format!("Granted soul points: +{points}."));
            self.store.save_meta(meta)?;
            tracing::info!(run_id = %run.run_id, points, "run finished; soul points granted");
        }
        self.store.save_run(run)?;
        Ok(())
    }
}

fn new_run_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(12);
    id
}
