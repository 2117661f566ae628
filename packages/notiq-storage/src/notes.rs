use sqlx::PgPool;
use uuid::Uuid;

use crate::{
	Result,
	models::{NewNote, Note, NoteMatch, NotePatch},
	vector,
};

const NOTE_COLUMNS: &str = "id, user_id, title, content, summary, tags, created_at, updated_at";

pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<Note>> {
	let sql = format!(
		"\
SELECT {NOTE_COLUMNS}
FROM notes
WHERE user_id = $1
ORDER BY updated_at DESC"
	);
	let rows = sqlx::query_as::<_, Note>(&sql).bind(user_id).fetch_all(pool).await?;

	Ok(rows)
}

pub async fn insert(pool: &PgPool, note: &NewNote) -> Result<Note> {
	let sql = format!(
		"\
INSERT INTO notes (id, user_id, title, content, tags)
VALUES ($1, $2, $3, $4, $5)
RETURNING {NOTE_COLUMNS}"
	);
	let row = sqlx::query_as::<_, Note>(&sql)
		.bind(note.id)
		.bind(note.user_id)
		.bind(note.title.as_str())
		.bind(note.content.as_str())
		.bind(&note.tags)
		.fetch_one(pool)
		.await?;

	Ok(row)
}

pub async fn get(pool: &PgPool, user_id: Uuid, note_id: Uuid) -> Result<Option<Note>> {
	let sql = format!(
		"\
SELECT {NOTE_COLUMNS}
FROM notes
WHERE id = $1 AND user_id = $2"
	);
	let row = sqlx::query_as::<_, Note>(&sql)
		.bind(note_id)
		.bind(user_id)
		.fetch_optional(pool)
		.await?;

	Ok(row)
}

pub async fn owner(pool: &PgPool, note_id: Uuid) -> Result<Option<Uuid>> {
	let owner = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM notes WHERE id = $1")
		.bind(note_id)
		.fetch_optional(pool)
		.await?;

	Ok(owner)
}

pub async fn update(
	pool: &PgPool,
	user_id: Uuid,
	note_id: Uuid,
	patch: &NotePatch,
) -> Result<Option<Note>> {
	let sql = format!(
		"\
UPDATE notes
SET
	title = COALESCE($3, title),
	content = COALESCE($4, content),
	summary = COALESCE($5, summary),
	tags = COALESCE($6, tags),
	updated_at = now()
WHERE id = $1 AND user_id = $2
RETURNING {NOTE_COLUMNS}"
	);
	let row = sqlx::query_as::<_, Note>(&sql)
		.bind(note_id)
		.bind(user_id)
		.bind(patch.title.as_deref())
		.bind(patch.content.as_deref())
		.bind(patch.summary.as_deref())
		.bind(patch.tags.as_ref())
		.fetch_optional(pool)
		.await?;

	Ok(row)
}

pub async fn delete(pool: &PgPool, user_id: Uuid, note_id: Uuid) -> Result<bool> {
	let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
		.bind(note_id)
		.bind(user_id)
		.execute(pool)
		.await?;

	Ok(result.rows_affected() > 0)
}

/// Calls the database-side similarity function. Rows come back ordered by similarity.
pub async fn search_semantic(
	pool: &PgPool,
	query_embedding: &[f32],
	match_threshold: f32,
	match_count: u32,
	user_id: Uuid,
) -> Result<Vec<NoteMatch>> {
	let rows = sqlx::query_as::<_, NoteMatch>(
		"\
SELECT id, user_id, title, content, summary, tags, created_at, updated_at, similarity
FROM search_notes_semantic($1::text::vector, $2, $3, $4)",
	)
	.bind(vector::vector_to_pg(query_embedding))
	.bind(f64::from(match_threshold))
	.bind(i32::try_from(match_count).unwrap_or(i32::MAX))
	.bind(user_id)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}
