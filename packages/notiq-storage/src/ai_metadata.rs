use sqlx::PgPool;
use uuid::Uuid;

use crate::{Result, models::AiMetadata, vector};

pub async fn upsert_embedding(
	pool: &PgPool,
	note_id: Uuid,
	embedding: &[f32],
	content_hash: &str,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO ai_metadata (note_id, embedding, content_hash, updated_at)
VALUES ($1, $2::text::vector, $3, now())
ON CONFLICT (note_id) DO UPDATE
SET
	embedding = EXCLUDED.embedding,
	content_hash = EXCLUDED.content_hash,
	updated_at = EXCLUDED.updated_at",
	)
	.bind(note_id)
	.bind(vector::vector_to_pg(embedding))
	.bind(content_hash)
	.execute(pool)
	.await?;

	Ok(())
}

pub async fn get(pool: &PgPool, note_id: Uuid) -> Result<Option<AiMetadata>> {
	let row = sqlx::query_as::<_, AiMetadata>(
		"\
SELECT note_id, sentiment, keywords, content_hash, updated_at
FROM ai_metadata
WHERE note_id = $1",
	)
	.bind(note_id)
	.fetch_optional(pool)
	.await?;

	Ok(row)
}
