use sqlx::PgPool;
use uuid::Uuid;

use crate::{
	Result,
	models::{ErrorLog, NewErrorLog},
};

const ERROR_LOG_COLUMNS: &str = "id, user_id, note_id, error_text, language, framework, ai_explanation, ai_solution, is_resolved, created_at";

pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<ErrorLog>> {
	let sql = format!(
		"\
SELECT {ERROR_LOG_COLUMNS}
FROM error_logs
WHERE user_id = $1
ORDER BY created_at DESC"
	);
	let rows = sqlx::query_as::<_, ErrorLog>(&sql).bind(user_id).fetch_all(pool).await?;

	Ok(rows)
}

pub async fn insert(pool: &PgPool, log: &NewErrorLog) -> Result<ErrorLog> {
	let sql = format!(
		"\
INSERT INTO error_logs (
	id,
	user_id,
	note_id,
	error_text,
	language,
	framework,
	ai_explanation,
	ai_solution
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
RETURNING {ERROR_LOG_COLUMNS}"
	);
	let row = sqlx::query_as::<_, ErrorLog>(&sql)
		.bind(log.id)
		.bind(log.user_id)
		.bind(log.note_id)
		.bind(log.error_text.as_str())
		.bind(log.language.as_str())
		.bind(log.framework.as_deref())
		.bind(log.ai_explanation.as_str())
		.bind(&log.ai_solution)
		.fetch_one(pool)
		.await?;

	Ok(row)
}

pub async fn set_resolved(
	pool: &PgPool,
	user_id: Uuid,
	log_id: Uuid,
	resolved: bool,
) -> Result<bool> {
	let result =
		sqlx::query("UPDATE error_logs SET is_resolved = $3 WHERE id = $1 AND user_id = $2")
			.bind(log_id)
			.bind(user_id)
			.bind(resolved)
			.execute(pool)
			.await?;

	Ok(result.rows_affected() > 0)
}
