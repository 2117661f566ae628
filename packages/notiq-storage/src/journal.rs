use sqlx::PgPool;
use uuid::Uuid;

use crate::{
	Result,
	models::{JournalEntry, JournalUpsert},
};

const JOURNAL_COLUMNS: &str = "id, user_id, date, content, mood, tech_used, achievements, blockers, created_at, updated_at";

pub async fn list(pool: &PgPool, user_id: Uuid, limit: i64) -> Result<Vec<JournalEntry>> {
	let sql = format!(
		"\
SELECT {JOURNAL_COLUMNS}
FROM dev_journal
WHERE user_id = $1
ORDER BY date DESC
LIMIT $2"
	);
	let rows = sqlx::query_as::<_, JournalEntry>(&sql)
		.bind(user_id)
		.bind(limit)
		.fetch_all(pool)
		.await?;

	Ok(rows)
}

/// Inserts the entry, or replaces the existing one for the same `(user_id, date)`.
pub async fn upsert(pool: &PgPool, entry: &JournalUpsert) -> Result<JournalEntry> {
	let sql = format!(
		"\
INSERT INTO dev_journal (
	id,
	user_id,
	date,
	content,
	mood,
	tech_used,
	achievements,
	blockers
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
ON CONFLICT (user_id, date) DO UPDATE
SET
	content = EXCLUDED.content,
	mood = EXCLUDED.mood,
	tech_used = EXCLUDED.tech_used,
	achievements = EXCLUDED.achievements,
	blockers = EXCLUDED.blockers,
	updated_at = now()
RETURNING {JOURNAL_COLUMNS}"
	);
	let row = sqlx::query_as::<_, JournalEntry>(&sql)
		.bind(entry.id)
		.bind(entry.user_id)
		.bind(entry.date)
		.bind(entry.content.as_deref())
		.bind(entry.mood.as_deref())
		.bind(&entry.tech_used)
		.bind(&entry.achievements)
		.bind(&entry.blockers)
		.fetch_one(pool)
		.await?;

	Ok(row)
}
