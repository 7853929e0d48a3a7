//! Fake database composition and its action catalog.

use std::collections::BTreeMap;

use async_trait::async_trait;
use gauntlet_scheduler::model::{
	Action, Capability, CapabilityKind, Catalog, Effect, FatalError, Outcome, Preconditions, ScenarioConfig, State, StepContext,
};

pub const RUNNING: CapabilityKind = CapabilityKind::new("database_running");
pub const TABLE: CapabilityKind = CapabilityKind::new("table");

/// Upper bound on concurrently existing tables.
pub const MAX_TABLES: usize = 3;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DbError {
	#[error("connection refused")]
	Unreachable,
	#[error("statement timeout")]
	StatementTimeout,
	#[error("table {0} does not exist")]
	NoSuchTable(String),
	#[error("table {0} already exists")]
	TableExists(String),
}

/// In-memory stand-in for a database under test.
#[derive(Debug, Default)]
pub struct FakeDatabase {
	running: bool,
	tables: BTreeMap<String, u64>,
	pub restarts: u32,
	/// Inserts pushing a table past this many rows time out.
	pub row_limit: u64,
}

impl FakeDatabase {
	pub fn new(row_limit: u64) -> Self {
		Self {
			row_limit,
			..Self::default()
		}
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn table_names(&self) -> Vec<String> {
		self.tables.keys().cloned().collect()
	}

	pub fn start(&mut self) {
		self.running = true;
		self.restarts += 1;
	}

	pub fn kill(&mut self) {
		self.running = false;
	}

	pub fn create_table(&mut self, name: &str) -> Result<(), DbError> {
		self.connected()?;
		if self.tables.contains_key(name) {
			return Err(DbError::TableExists(name.to_string()));
		}
		self.tables.insert(name.to_string(), 0);
		Ok(())
	}

	pub fn drop_table(&mut self, name: &str) -> Result<(), DbError> {
		self.connected()?;
		self.tables.remove(name).map(|_| ()).ok_or_else(|| DbError::NoSuchTable(name.to_string()))
	}

	pub fn insert(&mut self, name: &str, rows: u64) -> Result<u64, DbError> {
		self.connected()?;
		let limit = self.row_limit;
		let count = self.tables.get_mut(name).ok_or_else(|| DbError::NoSuchTable(name.to_string()))?;
		if *count + rows > limit {
			return Err(DbError::StatementTimeout);
		}
		*count += rows;
		Ok(*count)
	}

	fn connected(&self) -> Result<(), DbError> {
		if self.running { Ok(()) } else { Err(DbError::Unreachable) }
	}
}

pub struct StartDatabase;

#[async_trait]
impl Action<FakeDatabase> for StartDatabase {
	fn name(&self) -> &str {
		"start_database"
	}

	fn requires(&self) -> Preconditions {
		Preconditions::none().unless([RUNNING])
	}

	async fn run(&self, db: &mut FakeDatabase, _ctx: &mut StepContext<'_>) -> Outcome {
		db.start();
		Outcome::Success(Effect::none().grant(RUNNING))
	}
}

pub struct KillDatabase;

#[async_trait]
impl Action<FakeDatabase> for KillDatabase {
	fn name(&self) -> &str {
		"kill_database"
	}

	fn requires(&self) -> Preconditions {
		Preconditions::all([RUNNING])
	}

	async fn run(&self, db: &mut FakeDatabase, _ctx: &mut StepContext<'_>) -> Outcome {
		db.kill();
		Outcome::Success(Effect::none().revoke(RUNNING))
	}
}

pub struct CreateTable;

#[async_trait]
impl Action<FakeDatabase> for CreateTable {
	fn name(&self) -> &str {
		"create_table"
	}

	fn requires(&self) -> Preconditions {
		Preconditions::all([RUNNING])
	}

	async fn run(&self, db: &mut FakeDatabase, ctx: &mut StepContext<'_>) -> Outcome {
		let Some(name) = ctx.free_instance_name(TABLE, MAX_TABLES) else {
			return Outcome::success();
		};
		let result = db.create_table(&name);
		Outcome::classify(result, Effect::none().grant(Capability::instance(TABLE, name)), "create table", |_| false)
	}
}

pub struct DropTable;

#[async_trait]
impl Action<FakeDatabase> for DropTable {
	fn name(&self) -> &str {
		"drop_table"
	}

	fn requires(&self) -> Preconditions {
		Preconditions::all([RUNNING, TABLE])
	}

	async fn run(&self, db: &mut FakeDatabase, ctx: &mut StepContext<'_>) -> Outcome {
		let Some(table) = ctx.pick_instance(TABLE).cloned() else {
			return Outcome::fatal(FatalError::UnexpectedAssertion("no table held".into()));
		};
		let result = db.drop_table(table.instance_name().unwrap_or_default());
		Outcome::classify(result, Effect::none().revoke(table), "drop table", |_| false)
	}
}

pub struct Insert;

#[async_trait]
impl Action<FakeDatabase> for Insert {
	fn name(&self) -> &str {
		"insert"
	}

	fn requires(&self) -> Preconditions {
		Preconditions::all([RUNNING, TABLE])
	}

	async fn run(&self, db: &mut FakeDatabase, ctx: &mut StepContext<'_>) -> Outcome {
		let Some(table) = ctx.pick_instance(TABLE) else {
			return Outcome::fatal(FatalError::UnexpectedAssertion("no table held".into()));
		};
		let rows = ctx.choose(&[1u64, 10, 100]).copied().unwrap_or(1);
		let result = db.insert(table.instance_name().unwrap_or_default(), rows);
		Outcome::classify(result, Effect::none(), "insert", |err| *err == DbError::StatementTimeout)
	}
}

/// Checks that the database holds exactly the tables the model believes exist.
pub struct VerifyTables;

#[async_trait]
impl Action<FakeDatabase> for VerifyTables {
	fn name(&self) -> &str {
		"verify_tables"
	}

	fn requires(&self) -> Preconditions {
		Preconditions::all([RUNNING])
	}

	async fn run(&self, db: &mut FakeDatabase, ctx: &mut StepContext<'_>) -> Outcome {
		let modeled: Vec<String> = ctx
			.state()
			.capabilities()
			.instances(TABLE)
			.filter_map(|cap| cap.instance_name().map(str::to_string))
			.collect();
		let actual = db.table_names();
		if modeled == actual {
			Outcome::success()
		} else {
			Outcome::fatal(FatalError::UnexpectedAssertion(format!("tables {actual:?}, model {modeled:?}")))
		}
	}
}

/// Full catalog: boot the database, then mix DDL, DML, and restarts.
pub fn database_catalog() -> Catalog<FakeDatabase> {
	Catalog::<FakeDatabase>::builder()
		.bootstrap(StartDatabase)
		.weighted(StartDatabase, 5)
		.weighted(KillDatabase, 1)
		.weighted(CreateTable, 5)
		.weighted(DropTable, 2)
		.weighted(Insert, 10)
		.finalize_with(StartDatabase)
		.finalize_with(VerifyTables)
		.build()
		.expect("database catalog is valid")
}

pub fn initial_state() -> State {
	State::new(ScenarioConfig::new("fake-db").with_setting("isolation", "serializable"))
}

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
