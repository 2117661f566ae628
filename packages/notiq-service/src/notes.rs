use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use notiq_config::EmbeddingProviderConfig;
use notiq_domain::content;
use notiq_storage::{
	Store,
	models::{NewNote, Note, NotePatch},
};

use crate::{EmbeddingProvider, Error, NotiqService, Result, SuccessResponse};

const DEFAULT_TITLE: &str = "Untitled Note";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteView {
	pub id: Uuid,
	pub user_id: Uuid,
	pub title: String,
	pub content: String,
	pub summary: Option<String>,
	pub tags: Vec<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<Note> for NoteView {
	fn from(note: Note) -> Self {
		Self {
			id: note.id,
			user_id: note.user_id,
			title: note.title,
			content: note.content,
			summary: note.summary,
			tags: note.tags,
			created_at: note.created_at,
			updated_at: note.updated_at,
		}
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct NotesResponse {
	pub notes: Vec<NoteView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NoteResponse {
	pub note: NoteView,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateNoteRequest {
	pub title: Option<String>,
	pub content: Option<String>,
	pub tags: Option<Vec<String>>,
}

/// Partial edit. Absent fields keep their stored value, so `summary` can be replaced (including
/// with `""`) but never cleared back to null.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateNoteRequest {
	pub title: Option<String>,
	pub content: Option<String>,
	pub summary: Option<String>,
	pub tags: Option<Vec<String>>,
}

impl NotiqService {
	pub async fn list_notes(&self, user_id: Uuid) -> Result<NotesResponse> {
		let notes = self.store.list_notes(user_id).await?;

		Ok(NotesResponse { notes: notes.into_iter().map(NoteView::from).collect() })
	}

	pub async fn create_note(&self, user_id: Uuid, req: CreateNoteRequest) -> Result<NoteResponse> {
		let title = req
			.title
			.map(|title| title.trim().to_string())
			.filter(|title| !title.is_empty())
			.unwrap_or_else(|| DEFAULT_TITLE.to_string());
		let note = NewNote {
			id: Uuid::new_v4(),
			user_id,
			title,
			content: req.content.unwrap_or_default(),
			tags: notiq_domain::response::normalize_tags(req.tags.unwrap_or_default()),
		};
		let note = self.store.insert_note(&note).await?;

		Ok(NoteResponse { note: note.into() })
	}

	pub async fn get_note(&self, user_id: Uuid, note_id: Uuid) -> Result<NoteResponse> {
		let note = self.store.get_note(user_id, note_id).await?.ok_or_else(note_not_found)?;

		Ok(NoteResponse { note: note.into() })
	}

	/// Applies a partial edit. Last write wins.
	///
	/// A material content change schedules an embedding refresh in the background; the response
	/// does not wait for it.
	pub async fn update_note(
		&self,
		user_id: Uuid,
		note_id: Uuid,
		req: UpdateNoteRequest,
	) -> Result<NoteResponse> {
		let before = self.store.get_note(user_id, note_id).await?.ok_or_else(note_not_found)?;
		let patch = NotePatch {
			title: req.title,
			content: req.content,
			summary: req.summary,
			tags: req.tags.map(notiq_domain::response::normalize_tags),
		};
		let note =
			self.store.update_note(user_id, note_id, &patch).await?.ok_or_else(note_not_found)?;

		if content::changed_materially(&before.content, &note.content) {
			self.spawn_embedding_refresh(note.id, note.content.clone());
		}

		Ok(NoteResponse { note: note.into() })
	}

	pub async fn delete_note(&self, user_id: Uuid, note_id: Uuid) -> Result<SuccessResponse> {
		if !self.store.delete_note(user_id, note_id).await? {
			return Err(note_not_found());
		}

		Ok(SuccessResponse::ok())
	}

	/// Re-embeds a note unless its stored content hash already matches. Returns whether the
	/// embeddings provider was called.
	pub async fn refresh_note_embedding(&self, note_id: Uuid, content: &str) -> Result<bool> {
		refresh_embedding(
			self.store.as_ref(),
			self.providers.embedding.as_ref(),
			&self.cfg.providers.embedding,
			note_id,
			content,
		)
		.await
	}

	fn spawn_embedding_refresh(&self, note_id: Uuid, content: String) {
		let store: Arc<dyn Store> = self.store.clone();
		let provider: Arc<dyn EmbeddingProvider> = self.providers.embedding.clone();
		let cfg = self.cfg.providers.embedding.clone();

		tokio::spawn(async move {
			match refresh_embedding(store.as_ref(), provider.as_ref(), &cfg, note_id, &content).await
			{
				Ok(true) => tracing::debug!(%note_id, "Note embedding refreshed."),
				Ok(false) => tracing::debug!(%note_id, "Note embedding already current."),
				Err(err) => tracing::error!(error = %err, %note_id, "Note embedding refresh failed."),
			}
		});
	}
}

async fn refresh_embedding(
	store: &dyn Store,
	provider: &dyn EmbeddingProvider,
	cfg: &EmbeddingProviderConfig,
	note_id: Uuid,
	content: &str,
) -> Result<bool> {
	let hash = content::content_hash(content);

	if store.embedding_hash(note_id).await?.as_deref() == Some(hash.as_str()) {
		return Ok(false);
	}

	let vector = crate::embed_text(provider, cfg, content).await?;

	store.upsert_embedding(note_id, &vector, &hash).await?;

	Ok(true)
}

fn note_not_found() -> Error {
	Error::NotFound { message: "Note not found.".to_string() }
}
