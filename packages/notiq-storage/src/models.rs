use serde_json::Value;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Note {
	pub id: Uuid,
	pub user_id: Uuid,
	pub title: String,
	pub content: String,
	pub summary: Option<String>,
	pub tags: Vec<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// A row returned by `search_notes_semantic`.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct NoteMatch {
	#[sqlx(flatten)]
	pub note: Note,
	pub similarity: f64,
}

#[derive(Clone, Debug)]
pub struct NewNote {
	pub id: Uuid,
	pub user_id: Uuid,
	pub title: String,
	pub content: String,
	pub tags: Vec<String>,
}

/// Fields left as `None` keep their stored value.
#[derive(Clone, Debug, Default)]
pub struct NotePatch {
	pub title: Option<String>,
	pub content: Option<String>,
	pub summary: Option<String>,
	pub tags: Option<Vec<String>>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct AiMetadata {
	pub note_id: Uuid,
	pub sentiment: Option<String>,
	pub keywords: Vec<String>,
	pub content_hash: Option<String>,
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Snippet {
	pub id: Uuid,
	pub user_id: Uuid,
	pub note_id: Option<Uuid>,
	pub title: String,
	pub code: String,
	pub language: String,
	pub description: Option<String>,
	pub tags: Vec<String>,
	pub usage_count: i32,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug)]
pub struct NewSnippet {
	pub id: Uuid,
	pub user_id: Uuid,
	pub note_id: Option<Uuid>,
	pub title: String,
	pub code: String,
	pub language: String,
	pub description: Option<String>,
	pub tags: Vec<String>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ErrorLog {
	pub id: Uuid,
	pub user_id: Uuid,
	pub note_id: Option<Uuid>,
	pub error_text: String,
	pub language: String,
	pub framework: Option<String>,
	pub ai_explanation: String,
	pub ai_solution: Value,
	pub is_resolved: bool,
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug)]
pub struct NewErrorLog {
	pub id: Uuid,
	pub user_id: Uuid,
	pub note_id: Option<Uuid>,
	pub error_text: String,
	pub language: String,
	pub framework: Option<String>,
	pub ai_explanation: String,
	pub ai_solution: Value,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct JournalEntry {
	pub id: Uuid,
	pub user_id: Uuid,
	pub date: Date,
	pub content: Option<String>,
	pub mood: Option<String>,
	pub tech_used: Vec<String>,
	pub achievements: Vec<String>,
	pub blockers: Vec<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// Insert-or-replace payload keyed by `(user_id, date)`.
#[derive(Clone, Debug)]
pub struct JournalUpsert {
	pub id: Uuid,
	pub user_id: Uuid,
	pub date: Date,
	pub content: Option<String>,
	pub mood: Option<String>,
	pub tech_used: Vec<String>,
	pub achievements: Vec<String>,
	pub blockers: Vec<String>,
}
