//! Turn-resolution rules: action application, month resolution, run
//! creation, terminal-state detection, and soul-point conversion.
//!
//! Every operation takes run/meta values explicitly and returns the new
//! state inside a result descriptor; the only nondeterminism is the RNG
//! handed to [`resolve_month`] for the monthly investment draw.

use contracts::{FinishReason, MetaState, MonthResolution, RunState, TurnResult};
use rand::Rng;

use crate::catalog;

pub const BASE_LIVING_COST: i64 = 600;
pub const BASE_TIME_BUDGET: i64 = 160;
pub const STARTING_MONEY: i64 = 3000;
pub const START_MONEY_BONUS_STEP: i64 = 500;
pub const INVESTMENT_TRANCHE: i64 = 500;
pub const BANKRUPTCY_FLOOR: i64 = -2000;
pub const LIFESPAN_MONTHS: u32 = 60;

/// Display label for a run's age: runs start at 30 years old.
pub fn age_label(month_index: u32) -> String {
    let years = 30 + month_index / 12;
    let months = month_index % 12;
    format!("{years}y {months}m")
}

/// Create a fresh run, applying the start-money meta upgrade.
pub fn create_new_run(run_id: &str, meta: &MetaState) -> RunState {
    let money_bonus = meta.upgrade_level("start_money_bonus") * START_MONEY_BONUS_STEP;
    let mut run = RunState::new(run_id, STARTING_MONEY + money_bonus);
    run.log
        .push(format!("Run started at age {}.", age_label(run.month_index)));
    run
}

/// Apply one catalog action to the run.
///
/// Rule rejections (finished run, unknown action, not enough time) return
/// the run untouched with an explanatory message; they are expected
/// outcomes, not errors.
pub fn apply_action(mut run: RunState, meta: &MetaState, action_id: &str) -> TurnResult {
    if run.finished {
        return TurnResult::new(run, "Run already finished.");
    }

    let Some(action) = catalog::builtin().action(action_id) else {
        return TurnResult::new(run, "Unknown action.");
    };

    if run.time_left < action.time_cost {
        return TurnResult::new(run, "Not enough time left this month.");
    }

    run.time_left -= action.time_cost;
    run.money += action.money_delta;
    run.health += action.health_delta;
    run.stress += action.stress_delta;

    let study_bonus = meta.upgrade_level("study_efficiency");
    for (skill, delta) in &action.skill_delta {
        let adjusted = if action_id.starts_with("study") {
            scaled_study_delta(*delta, study_bonus)
        } else {
            *delta
        };
        *run.skills.entry(skill.clone()).or_insert(0) += adjusted;
    }

    if action_id == "work" && run.skill_level("dev") >= 20 {
        run.career_level = run.career_level.max(1);
    }
    if action_id == "invest" {
        run.investments += INVESTMENT_TRANCHE;
    }

    apply_limits(&mut run);
    finish_if_needed(&mut run);
    run.log.push(format!("Action {} executed.", action.title));
    let message = format!("{} applied.", action.title);
    TurnResult::new(run, message)
}

/// Resolve the month-end tick: stress decay, investment return, living
/// cost, clock advance, and terminal-condition evaluation.
pub fn resolve_month<R: Rng + ?Sized>(mut run: RunState, rng: &mut R) -> MonthResolution {
    if run.finished {
        return MonthResolution::new(run, vec!["Run already finished.".to_string()]);
    }

    let mut events = Vec::new();

    // Natural decay and pressure.
    run.stress += 3;
    run.health -= ((run.stress - 60) / 10).max(0);

    // Investment return with light randomness.
    if run.investments > 0 {
        let ratio = f64::from(rng.random_range(-12_i32..=18)) / 100.0;
        let delta = (run.investments as f64 * ratio).floor() as i64;
        run.money += delta;
        events.push(format!("Investment result: {delta:+}."));
    }

    // Fixed monthly cost.
    run.money -= BASE_LIVING_COST;
    events.push(format!("Living cost paid: -{BASE_LIVING_COST}."));

    // Reset next month.
    run.month_index += 1;
    run.time_left = BASE_TIME_BUDGET;

    apply_limits(&mut run);
    finish_if_needed(&mut run);

    if run.finished {
        let reason = run.finish_reason.map(FinishReason::as_str).unwrap_or("unknown");
        events.push(format!("Run finished: {reason}."));
    } else {
        events.push(format!("Now at age {}.", age_label(run.month_index)));
    }

    run.log.extend(events.iter().cloned());
    MonthResolution::new(run, events)
}

/// Convert a finished run's final state into soul points.
///
/// Deterministic for a fixed run; the caller guards the one-time grant
/// with `points_granted`.
pub fn calculate_reincarnation_points(run: &RunState) -> i64 {
    let base = run.money as f64 / 1000.0;
    let skill_value = run.skills.values().sum::<i64>() as f64 / 20.0;
    let career_value = f64::from(run.career_level) * 3.0;
    let penalty = if run.finish_reason == Some(FinishReason::Bankrupt) {
        5.0
    } else {
        0.0
    };
    ((base + skill_value + career_value - penalty).floor() as i64).max(0)
}

// Study skill gains scale with the study_efficiency upgrade and round
// toward negative infinity.
fn scaled_study_delta(delta: i64, study_bonus: i64) -> i64 {
    (delta as f64 * (1.0 + 0.1 * study_bonus as f64)).floor() as i64
}

fn apply_limits(run: &mut RunState) {
    run.health = run.health.clamp(0, 100);
    run.stress = run.stress.clamp(0, 100);
    run.time_left = run.time_left.max(0);
}

// First matching condition wins; a run that is already finished keeps its
// original reason.
fn finish_if_needed(run: &mut RunState) {
    if run.finished {
        return;
    }

    if run.health <= 0 {
        run.finished = true;
        run.finish_reason = Some(FinishReason::HealthDepleted);
        return;
    }
    if run.money < BANKRUPTCY_FLOOR {
        run.finished = true;
        run.finish_reason = Some(FinishReason::Bankrupt);
        return;
    }
    if run.month_index >= LIFESPAN_MONTHS {
        run.finished = true;
        run.finish_reason = Some(FinishReason::LifespanEnd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(1337)
    }

    // -- Run creation --

    #[test]
    fn new_run_has_valid_initial_values() {
        let run = create_new_run("test", &MetaState::default());
        assert_eq!(run.money, 3000);
        assert_eq!(run.time_left, 160);
        assert!(!run.finished);
        assert_eq!(run.log, vec!["Run started at age 30y 0m.".to_string()]);
    }

    #[test]
    fn start_money_bonus_scales_starting_money() {
        let mut meta = MetaState::default();
        meta.upgrades.insert("start_money_bonus".to_string(), 3);
        let run = create_new_run("test", &meta);
        assert_eq!(run.money, 3000 + 3 * 500);
    }

    // -- Action application --

    #[test]
    fn action_consumes_time_and_pays() {
        let run = create_new_run("test", &MetaState::default());
        let result = apply_action(run, &MetaState::default(), "work");
        assert_eq!(result.run.time_left, 110);
        assert_eq!(result.run.money, 4400);
        assert_eq!(result.message, "Work applied.");
        assert_eq!(
            result.run.log.last().map(String::as_str),
            Some("Action Work executed.")
        );
    }

    #[test]
    fn unknown_action_leaves_run_untouched() {
        let run = create_new_run("test", &MetaState::default());
        let before = run.clone();
        let result = apply_action(run, &MetaState::default(), "nap");
        assert_eq!(result.message, "Unknown action.");
        assert_eq!(result.run, before);
    }

    #[test]
    fn insufficient_time_leaves_run_untouched() {
        let mut run = create_new_run("test", &MetaState::default());
        run.time_left = 10;
        let before = run.clone();
        let result = apply_action(run, &MetaState::default(), "work");
        assert_eq!(result.message, "Not enough time left this month.");
        assert_eq!(result.run, before);
    }

    #[test]
    fn finished_run_rejects_actions() {
        let mut run = create_new_run("test", &MetaState::default());
        run.finished = true;
        run.finish_reason = Some(FinishReason::LifespanEnd);
        let before = run.clone();
        let result = apply_action(run, &MetaState::default(), "work");
        assert_eq!(result.message, "Run already finished.");
        assert_eq!(result.run, before);
    }

    #[test]
    fn study_efficiency_floors_the_scaled_delta() {
        // Raw +2 at level 3 is 2.6, floored to 2; at level 5 it is exactly 3.
        let mut meta = MetaState::default();
        meta.upgrades.insert("study_efficiency".to_string(), 3);
        let run = create_new_run("test", &MetaState::default());
        let result = apply_action(run, &meta, "study_dev");
        assert_eq!(result.run.skill_level("dev"), 2);

        meta.upgrades.insert("study_efficiency".to_string(), 5);
        let run = create_new_run("test", &MetaState::default());
        let result = apply_action(run, &meta, "study_dev");
        assert_eq!(result.run.skill_level("dev"), 3);
    }

    #[test]
    fn work_unlocks_career_once_dev_reaches_twenty() {
        let meta = MetaState::default();
        let mut run = create_new_run("test", &meta);
        run.skills.insert("dev".to_string(), 20);
        let result = apply_action(run, &meta, "work");
        assert_eq!(result.run.career_level, 1);

        // Career level never regresses.
        let mut run = result.run;
        run.time_left = 160;
        run.career_level = 2;
        let result = apply_action(run, &meta, "work");
        assert_eq!(result.run.career_level, 2);
    }

    #[test]
    fn invest_adds_tranche_on_top_of_upfront_cost() {
        let meta = MetaState::default();
        let run = create_new_run("test", &meta);
        let result = apply_action(run, &meta, "invest");
        assert_eq!(result.run.money, 3000 - 500);
        assert_eq!(result.run.investments, 500);
    }

    #[test]
    fn health_and_stress_stay_clamped() {
        let meta = MetaState::default();
        let mut run = create_new_run("test", &meta);
        run.health = 99;
        run.stress = 3;
        // Rest pushes health past 100 and stress below 0.
        let result = apply_action(run, &meta, "rest");
        assert_eq!(result.run.health, 100);
        assert_eq!(result.run.stress, 0);
    }

    #[test]
    fn action_can_finish_a_run_and_still_logs_execution() {
        let meta = MetaState::default();
        let mut run = create_new_run("test", &meta);
        run.health = 4;
        let result = apply_action(run, &meta, "work");
        assert!(result.run.finished);
        assert_eq!(result.run.finish_reason, Some(FinishReason::HealthDepleted));
        assert_eq!(
            result.run.log.last().map(String::as_str),
            Some("Action Work executed.")
        );
    }

    // -- Month resolution --

    #[test]
    fn resolve_month_advances_clock() {
        let run = create_new_run("test", &MetaState::default());
        let resolution = resolve_month(run, &mut seeded_rng());
        assert_eq!(resolution.run.month_index, 1);
        assert_eq!(resolution.run.time_left, 160);
    }

    #[test]
    fn work_rest_resolve_scenario_matches_fixed_numbers() {
        let meta = MetaState::default();
        let run = create_new_run("test", &meta);

        let result = apply_action(run, &meta, "work");
        assert_eq!(result.run.time_left, 110);
        assert_eq!(result.run.money, 4400);
        assert_eq!(result.run.health, 66);
        assert_eq!(result.run.stress, 28);

        let result = apply_action(result.run, &meta, "rest");
        assert_eq!(result.run.time_left, 80);
        assert_eq!(result.run.money, 4400);
        assert_eq!(result.run.health, 72);
        assert_eq!(result.run.stress, 20);

        // No investments, so resolution is fully deterministic.
        let resolution = resolve_month(result.run, &mut seeded_rng());
        assert_eq!(resolution.run.month_index, 1);
        assert_eq!(resolution.run.time_left, 160);
        assert_eq!(resolution.run.stress, 23);
        assert_eq!(resolution.run.health, 72);
        assert_eq!(resolution.run.money, 3800);
        assert_eq!(
            resolution.events,
            vec![
                "Living cost paid: -600.".to_string(),
                "Now at age 30y 1m.".to_string(),
            ]
        );
    }

    #[test]
    fn stress_pressure_erodes_health_above_sixty() {
        let mut run = create_new_run("test", &MetaState::default());
        run.stress = 80;
        let resolution = resolve_month(run, &mut seeded_rng());
        // Stress ticks to 83; pressure is (83 - 60) / 10 = 2.
        assert_eq!(resolution.run.stress, 83);
        assert_eq!(resolution.run.health, 68);
    }

    #[test]
    fn investment_return_stays_within_declared_bounds() {
        let mut rng = seeded_rng();
        for _ in 0..50 {
            let mut run = create_new_run("test", &MetaState::default());
            run.investments = 1000;
            run.money = 10_000;
            let resolution = resolve_month(run, &mut rng);
            let delta = resolution.run.money - (10_000 - 600);
            assert!((-120..=180).contains(&delta), "delta out of range: {delta}");
            assert!(resolution
                .events
                .iter()
                .any(|event| event.starts_with("Investment result: ")));
        }
    }

    #[test]
    fn no_investment_skips_the_investment_event() {
        let run = create_new_run("test", &MetaState::default());
        let resolution = resolve_month(run, &mut seeded_rng());
        assert!(resolution
            .events
            .iter()
            .all(|event| !event.starts_with("Investment result")));
    }

    #[test]
    fn resolve_month_on_finished_run_is_a_no_op() {
        let mut run = create_new_run("test", &MetaState::default());
        run.finished = true;
        run.finish_reason = Some(FinishReason::Bankrupt);
        let before = run.clone();
        let resolution = resolve_month(run, &mut seeded_rng());
        assert_eq!(resolution.events, vec!["Run already finished.".to_string()]);
        assert_eq!(resolution.run, before);
    }

    #[test]
    fn month_events_are_appended_to_the_run_log() {
        let run = create_new_run("test", &MetaState::default());
        let resolution = resolve_month(run, &mut seeded_rng());
        for event in &resolution.events {
            assert!(resolution.run.log.contains(event));
        }
    }

    // -- Terminal conditions --

    #[test]
    fn health_depletion_takes_priority_over_bankruptcy() {
        let meta = MetaState::default();
        let mut run = create_new_run("test", &meta);
        run.health = 4;
        run.money = -2400;
        // Work drains the last health while money is already past the floor.
        let result = apply_action(run, &meta, "work");
        assert!(result.run.finished);
        assert_eq!(result.run.finish_reason, Some(FinishReason::HealthDepleted));
    }

    #[test]
    fn deep_debt_bankrupts_the_run() {
        let meta = MetaState::default();
        let mut run = create_new_run("test", &meta);
        run.money = -1900;
        let resolution = resolve_month(run, &mut seeded_rng());
        assert!(resolution.run.finished);
        assert_eq!(resolution.run.finish_reason, Some(FinishReason::Bankrupt));
        assert!(resolution
            .events
            .contains(&"Run finished: bankrupt.".to_string()));
    }

    #[test]
    fn lifespan_ends_after_sixty_months() {
        let mut run = create_new_run("test", &MetaState::default());
        run.month_index = 59;
        let resolution = resolve_month(run, &mut seeded_rng());
        assert_eq!(resolution.run.month_index, 60);
        assert!(resolution.run.finished);
        assert_eq!(resolution.run.finish_reason, Some(FinishReason::LifespanEnd));
    }

    #[test]
    fn finish_reason_is_never_overwritten() {
        let mut run = create_new_run("test", &MetaState::default());
        run.health = 0;
        finish_if_needed(&mut run);
        assert_eq!(run.finish_reason, Some(FinishReason::HealthDepleted));

        run.money = -5000;
        finish_if_needed(&mut run);
        assert_eq!(run.finish_reason, Some(FinishReason::HealthDepleted));
    }

    // -- Reincarnation points --

    #[test]
    fn reincarnation_points_floor_the_component_sum() {
        let mut run = create_new_run("test", &MetaState::default());
        run.money = 4400;
        run.skills.insert("dev".to_string(), 2);
        run.finished = true;
        run.finish_reason = Some(FinishReason::HealthDepleted);
        // 4.4 + 0.1 + 0 = 4.5, floored to 4.
        assert_eq!(calculate_reincarnation_points(&run), 4);
    }

    #[test]
    fn bankruptcy_penalty_applies_and_result_never_goes_negative() {
        let mut run = create_new_run("test", &MetaState::default());
        run.money = 2000;
        run.finished = true;
        run.finish_reason = Some(FinishReason::Bankrupt);
        // 2.0 - 5.0 = -3.0, clamped to 0.
        assert_eq!(calculate_reincarnation_points(&run), 0);
    }

    #[test]
    fn reincarnation_points_are_deterministic() {
        let mut run = create_new_run("test", &MetaState::default());
        run.money = 12_345;
        run.skills.insert("dev".to_string(), 30);
        run.skills.insert("sales".to_string(), 10);
        run.career_level = 1;
        run.finished = true;
        run.finish_reason = Some(FinishReason::LifespanEnd);
        let first = calculate_reincarnation_points(&run);
        let second = calculate_reincarnation_points(&run);
        assert_eq!(first, second);
        // 12.345 + 2.0 + 3.0 = 17.345, floored to 17.
        assert_eq!(first, 17);
    }

    #[test]
    fn age_label_rolls_years_every_twelve_months() {
        assert_eq!(age_label(0), "30y 0m");
        assert_eq!(age_label(11), "30y 11m");
        assert_eq!(age_label(12), "31y 0m");
        assert_eq!(age_label(25), "32y 1m");
    }
}
