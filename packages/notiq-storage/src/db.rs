use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Result, schema};

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &notiq_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	/// Wraps an existing pool, e.g. one built with `PgPool::connect_lazy`.
	pub fn from_pool(pool: PgPool) -> Self {
		Self { pool }
	}

	pub async fn ensure_schema(&self, vector_dim: u32) -> Result<()> {
		let sql = schema::render_schema(vector_dim);
		let lock_id: i64 = 6_817_405;
		// Advisory locks are held per connection. A single transaction keeps the lock on one
		// connection and releases it when the transaction ends.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() || is_comment_only(trimmed) {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}

fn is_comment_only(statement: &str) -> bool {
	statement.lines().all(|line| {
		let line = line.trim();

		line.is_empty() || line.starts_with("--")
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn comment_only_fragments_are_skipped() {
		assert!(is_comment_only("-- trailing note\n\n"));
		assert!(!is_comment_only("-- header\nCREATE TABLE t (id int)"));
	}
}
