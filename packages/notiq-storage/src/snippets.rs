use sqlx::PgPool;
use uuid::Uuid;

use crate::{
	Result,
	models::{NewSnippet, Snippet},
};

const SNIPPET_COLUMNS: &str = "id, user_id, note_id, title, code, language, description, tags, usage_count, created_at, updated_at";

pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<Snippet>> {
	let sql = format!(
		"\
SELECT {SNIPPET_COLUMNS}
FROM snippets
WHERE user_id = $1
ORDER BY usage_count DESC, updated_at DESC"
	);
	let rows = sqlx::query_as::<_, Snippet>(&sql).bind(user_id).fetch_all(pool).await?;

	Ok(rows)
}

pub async fn insert(pool: &PgPool, snippet: &NewSnippet) -> Result<Snippet> {
	let sql = format!(
		"\
INSERT INTO snippets (id, user_id, note_id, title, code, language, description, tags)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
RETURNING {SNIPPET_COLUMNS}"
	);
	let row = sqlx::query_as::<_, Snippet>(&sql)
		.bind(snippet.id)
		.bind(snippet.user_id)
		.bind(snippet.note_id)
		.bind(snippet.title.as_str())
		.bind(snippet.code.as_str())
		.bind(snippet.language.as_str())
		.bind(snippet.description.as_deref())
		.bind(&snippet.tags)
		.fetch_one(pool)
		.await?;

	Ok(row)
}

/// Atomic increment through the `increment_snippet_usage` database function. Fails when the
/// function is not installed.
pub async fn increment_usage(pool: &PgPool, user_id: Uuid, snippet_id: Uuid) -> Result<()> {
	sqlx::query("SELECT increment_snippet_usage($1, $2)")
		.bind(snippet_id)
		.bind(user_id)
		.execute(pool)
		.await?;

	Ok(())
}

pub async fn usage(pool: &PgPool, user_id: Uuid, snippet_id: Uuid) -> Result<Option<i32>> {
	let count = sqlx::query_scalar::<_, i32>(
		"SELECT usage_count FROM snippets WHERE id = $1 AND user_id = $2",
	)
	.bind(snippet_id)
	.bind(user_id)
	.fetch_optional(pool)
	.await?;

	Ok(count)
}

pub async fn set_usage(
	pool: &PgPool,
	user_id: Uuid,
	snippet_id: Uuid,
	usage_count: i32,
) -> Result<()> {
	sqlx::query("UPDATE snippets SET usage_count = $3 WHERE id = $1 AND user_id = $2")
		.bind(snippet_id)
		.bind(user_id)
		.bind(usage_count)
		.execute(pool)
		.await?;

	Ok(())
}
