//! v1 cross-boundary contracts for the relife engine, API, and persistence.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION_V1: &str = "1.0";
pub const MONTH_TIME_BUDGET: i64 = 160;
pub const STARTING_HEALTH: i64 = 70;
pub const STARTING_STRESS: i64 = 20;

/// Why a run ended. Set exactly once; never overwritten.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    HealthDepleted,
    Bankrupt,
    LifespanEnd,
}

impl FinishReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HealthDepleted => "health_depleted",
            Self::Bankrupt => "bankrupt",
            Self::LifespanEnd => "lifespan_end",
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One in-progress or completed simulation run.
///
/// Health and stress are clamped to [0, 100] after every engine operation;
/// `time_left` never goes negative. Once `finished` flips true the run is
/// read-only except for the one-time soul-point grant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunState {
    pub run_id: String,
    pub month_index: u32,
    pub month_time_budget: i64,
    pub time_left: i64,
    pub money: i64,
    pub health: i64,
    pub stress: i64,
    pub career_level: u32,
    #[serde(default)]
    pub skills: BTreeMap<String, i64>,
    pub investments: i64,
    #[serde(default)]
    pub log: Vec<String>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
    #[serde(default)]
    pub points_granted: bool,
}

impl RunState {
    pub fn new(run_id: impl Into<String>, starting_money: i64) -> Self {
        let skills = [("dev", 0), ("sales", 0), ("finance", 0)]
            .into_iter()
            .map(|(name, level)| (name.to_string(), level))
            .collect();

        Self {
            run_id: run_id.into(),
            month_index: 0,
            month_time_budget: MONTH_TIME_BUDGET,
            time_left: MONTH_TIME_BUDGET,
            money: starting_money,
            health: STARTING_HEALTH,
            stress: STARTING_STRESS,
            career_level: 0,
            skills,
            investments: 0,
            log: Vec::new(),
            finished: false,
            finish_reason: None,
            points_granted: false,
        }
    }

    /// Total lookup: a skill the run has never trained is level 0.
    pub fn skill_level(&self, skill: &str) -> i64 {
        self.skills.get(skill).copied().unwrap_or(0)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={} month={} time_left={} money={} health={} stress={} finished={}",
            self.run_id,
            self.month_index,
            self.time_left,
            self.money,
            self.health,
            self.stress,
            self.finished
        )
    }
}

/// The single global meta-progression record. Outlives all runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetaState {
    #[serde(default)]
    pub soul_points: i64,
    #[serde(default)]
    pub upgrades: BTreeMap<String, i64>,
}

impl MetaState {
    /// Total lookup: an upgrade never purchased is level 0.
    pub fn upgrade_level(&self, upgrade_id: &str) -> i64 {
        self.upgrades.get(upgrade_id).copied().unwrap_or(0)
    }
}

impl Default for MetaState {
    fn default() -> Self {
        let upgrades = [("study_efficiency", 0), ("start_money_bonus", 0)]
            .into_iter()
            .map(|(id, level)| (id.to_string(), level))
            .collect();

        Self {
            soul_points: 0,
            upgrades,
        }
    }
}

/// Static catalog entry for a player action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionDefinition {
    pub action_id: String,
    pub title: String,
    pub time_cost: i64,
    #[serde(default)]
    pub money_delta: i64,
    #[serde(default)]
    pub health_delta: i64,
    #[serde(default)]
    pub stress_delta: i64,
    #[serde(default)]
    pub skill_delta: BTreeMap<String, i64>,
}

/// Static catalog entry for a permanent upgrade.
///
/// Purchase cost at level L is `cost_base * (L + 1)`, strictly increasing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpgradeDefinition {
    pub upgrade_id: String,
    pub title: String,
    pub max_level: i64,
    pub cost_base: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSnapshot {
    pub schema_version: String,
    pub run: RunState,
    pub meta: MetaState,
}

impl RunSnapshot {
    pub fn new(run: RunState, meta: MetaState) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            run,
            meta,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnResult {
    pub schema_version: String,
    pub run: RunState,
    pub message: String,
}

impl TurnResult {
    pub fn new(run: RunState, message: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            run,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthResolution {
    pub schema_version: String,
    pub run: RunState,
    pub events: Vec<String>,
}

impl MonthResolution {
    pub fn new(run: RunState, events: Vec<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            run,
            events,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpgradePurchaseResult {
    pub schema_version: String,
    pub meta: MetaState,
    pub message: String,
}

impl UpgradePurchaseResult {
    pub fn new(meta: MetaState, message: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            meta,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    RunNotFound,
    InvalidRequest,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub schema_version: String,
    pub error_code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(error_code: ErrorCode, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            error_code,
            message: message.into(),
            details,
        }
    }
}
