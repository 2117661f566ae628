//! Test support for the Notiq workspace.
//!
//! [`MemoryStore`] backs service and HTTP tests with no database at all. [`TestDatabase`] gives
//! each Postgres test a private database with the Notiq schema applied; those tests stay ignored
//! unless `NOTIQ_PG_DSN` points at a server that has pgvector installed.

mod error;
mod memory;

pub use error::{Error, Result};
pub use memory::MemoryStore;

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

use notiq_config::Postgres;
use notiq_storage::db::Db;

/// Environment variable naming the server used by ignored Postgres tests.
pub const PG_DSN_ENV: &str = "NOTIQ_PG_DSN";

const MAINTENANCE_DATABASES: [&str; 2] = ["postgres", "template1"];

/// A private `notiq_test_*` database, dropped by [`TestDatabase::dispose`] or on drop.
pub struct TestDatabase {
	name: String,
	dsn: String,
	maintenance: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("{PG_DSN_ENV} is not a valid DSN: {err}.")))?;
		let (maintenance, mut conn) = connect_maintenance(&base).await?;
		let name = format!("notiq_test_{}", Uuid::new_v4().simple());

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str())
			.await
			.map_err(|err| Error::Message(format!("Failed to create {name}: {err}.")))?;

		let dsn = base.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, maintenance, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	/// Connects a small pool and applies the Notiq schema with `vector_dim`-sized embeddings.
	pub async fn open(&self, vector_dim: u32) -> Result<Db> {
		let cfg = Postgres { dsn: self.dsn.clone(), pool_max_conns: 2 };
		let db = Db::connect(&cfg).await?;

		db.ensure_schema(vector_dim).await?;

		Ok(db)
	}

	/// Drops the database now and reports failures, unlike the best-effort drop guard.
	pub async fn dispose(mut self) -> Result<()> {
		drop_database(&self.name, &self.maintenance).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let maintenance = self.maintenance.clone();
		// Tests usually panic inside a tokio runtime, which cannot be blocked on from here.
		let handle = thread::spawn(move || {
			let outcome = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| Error::Message(err.to_string()))
				.and_then(|runtime| runtime.block_on(drop_database(&name, &maintenance)));

			if let Err(err) = outcome {
				eprintln!("Leaving test database {name} behind: {err}");
			}
		});
		let _ = handle.join();
	}
}

/// The DSN for ignored Postgres tests, if one is configured.
pub fn env_dsn() -> Option<String> {
	env::var(PG_DSN_ENV).ok().filter(|dsn| !dsn.trim().is_empty())
}

async fn connect_maintenance(base: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let mut failures = Vec::new();

	for database in MAINTENANCE_DATABASES {
		let options = base.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => failures.push(format!("{database}: {err}")),
		}
	}

	Err(Error::Message(format!("No maintenance database reachable ({}).", failures.join("; "))))
}

async fn drop_database(name: &str, maintenance: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(maintenance).await?;

	sqlx::query(&format!(r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE)"#))
		.execute(&mut conn)
		.await
		.map_err(|err| Error::Message(format!("Failed to drop {name}: {err}.")))?;

	Ok(())
}
