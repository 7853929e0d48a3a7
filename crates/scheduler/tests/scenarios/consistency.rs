//! The modeled capabilities track the fake database across many seeds.

use gauntlet_scheduler::model::OutcomeKind;
use gauntlet_scheduler::{Budget, RunConfig, Scheduler, StepPhase, TerminalReason};
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::common::{FakeDatabase, RUNNING, TABLE, database_catalog, init_tracing, initial_state};

#[rstest]
#[case::seed_zero(0)]
#[case::seed_small(7)]
#[case::seed_large(0xDEAD_BEEF)]
#[case::seed_max(u64::MAX)]
#[tokio::test]
async fn model_matches_database_after_run(#[case] seed: u64) {
	init_tracing();
	let mut db = FakeDatabase::new(150);
	let report = Scheduler::new(database_catalog(), initial_state(), RunConfig::new(seed, Budget::steps(200)))
		.run(&mut db)
		.await;

	assert_eq!(report.terminal, TerminalReason::StepBudgetExhausted, "seed {seed}: {:?}", report.steps.last());
	assert_eq!(report.explored(), 200);
	assert!(db.is_running());
	assert!(report.final_state.has_kind(RUNNING));

	let modeled: Vec<String> = report
		.final_state
		.capabilities()
		.instances(TABLE)
		.filter_map(|cap| cap.instance_name().map(str::to_string))
		.collect();
	assert_eq!(modeled, db.table_names());
	assert!(modeled.len() <= super::common::MAX_TABLES);

	let verify = report.phase(StepPhase::Finalize).last().expect("verification ran");
	assert_eq!(verify.action, "verify_tables");
	assert_eq!(verify.outcome.kind(), OutcomeKind::Success);
}

#[tokio::test]
async fn statement_timeouts_are_expected_failures() {
	let mut db = FakeDatabase::new(0);
	let report = Scheduler::new(database_catalog(), initial_state(), RunConfig::new(3, Budget::steps(100)))
		.run(&mut db)
		.await;

	assert!(!report.terminal.is_fatal(), "{}", report.terminal);
	let inserts: Vec<OutcomeKind> = report.steps.iter().filter(|s| s.action == "insert").map(|s| s.outcome.kind()).collect();
	assert!(!inserts.is_empty());
	assert!(inserts.iter().all(|kind| *kind == OutcomeKind::ExpectedFailure));
}

#[tokio::test]
async fn same_seed_replays_the_same_run() {
	let run = |seed| async move {
		let mut db = FakeDatabase::new(150);
		let report = Scheduler::new(database_catalog(), initial_state(), RunConfig::new(seed, Budget::steps(80)))
			.run(&mut db)
			.await;
		(report.steps, report.final_state, db.table_names(), db.restarts)
	};

	assert_eq!(run(1234).await, run(1234).await);
	assert_ne!(run(1234).await.0, run(4321).await.0);
}

#[tokio::test]
async fn scenario_configuration_reaches_the_report() {
	let report = Scheduler::new(database_catalog(), initial_state(), RunConfig::new(5, Budget::steps(1)))
		.run(&mut FakeDatabase::new(10))
		.await;
	let config = report.final_state.configuration();
	assert_eq!(config.target_service(), "fake-db");
	assert_eq!(config.setting("isolation"), Some("serializable"));
	assert_eq!(report.seed, 5);
}
