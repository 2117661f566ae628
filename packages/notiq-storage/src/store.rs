//! The persistence seam used by the service layer.

use std::{future::Future, pin::Pin};

use uuid::Uuid;

use crate::{
	Result, ai_metadata,
	db::Db,
	error_logs, journal,
	models::{
		ErrorLog, JournalEntry, JournalUpsert, NewErrorLog, NewNote, NewSnippet, Note, NoteMatch,
		NotePatch, Snippet,
	},
	notes, snippets,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Per-entity reads and writes, each scoped to one owner.
pub trait Store: Send + Sync {
	fn list_notes<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, Result<Vec<Note>>>;

	fn insert_note<'a>(&'a self, note: &'a NewNote) -> BoxFuture<'a, Result<Note>>;

	fn get_note<'a>(&'a self, user_id: Uuid, note_id: Uuid) -> BoxFuture<'a, Result<Option<Note>>>;

	/// Owner of a note regardless of caller; used by service-role requests.
	fn note_owner<'a>(&'a self, note_id: Uuid) -> BoxFuture<'a, Result<Option<Uuid>>>;

	fn update_note<'a>(
		&'a self,
		user_id: Uuid,
		note_id: Uuid,
		patch: &'a NotePatch,
	) -> BoxFuture<'a, Result<Option<Note>>>;

	fn delete_note<'a>(&'a self, user_id: Uuid, note_id: Uuid) -> BoxFuture<'a, Result<bool>>;

	fn upsert_embedding<'a>(
		&'a self,
		note_id: Uuid,
		embedding: &'a [f32],
		content_hash: &'a str,
	) -> BoxFuture<'a, Result<()>>;

	fn embedding_hash<'a>(&'a self, note_id: Uuid) -> BoxFuture<'a, Result<Option<String>>>;

	fn search_notes_semantic<'a>(
		&'a self,
		query_embedding: &'a [f32],
		match_threshold: f32,
		match_count: u32,
		user_id: Uuid,
	) -> BoxFuture<'a, Result<Vec<NoteMatch>>>;

	fn list_snippets<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, Result<Vec<Snippet>>>;

	fn insert_snippet<'a>(&'a self, snippet: &'a NewSnippet) -> BoxFuture<'a, Result<Snippet>>;

	/// Atomic increment. Returns an error when the database function is unavailable.
	fn increment_snippet_usage<'a>(
		&'a self,
		user_id: Uuid,
		snippet_id: Uuid,
	) -> BoxFuture<'a, Result<()>>;

	fn snippet_usage<'a>(
		&'a self,
		user_id: Uuid,
		snippet_id: Uuid,
	) -> BoxFuture<'a, Result<Option<i32>>>;

	fn set_snippet_usage<'a>(
		&'a self,
		user_id: Uuid,
		snippet_id: Uuid,
		usage_count: i32,
	) -> BoxFuture<'a, Result<()>>;

	fn list_error_logs<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, Result<Vec<ErrorLog>>>;

	fn insert_error_log<'a>(&'a self, log: &'a NewErrorLog) -> BoxFuture<'a, Result<ErrorLog>>;

	fn set_error_log_resolved<'a>(
		&'a self,
		user_id: Uuid,
		log_id: Uuid,
		resolved: bool,
	) -> BoxFuture<'a, Result<bool>>;

	fn list_journal<'a>(
		&'a self,
		user_id: Uuid,
		limit: i64,
	) -> BoxFuture<'a, Result<Vec<JournalEntry>>>;

	fn upsert_journal<'a>(
		&'a self,
		entry: &'a JournalUpsert,
	) -> BoxFuture<'a, Result<JournalEntry>>;
}

impl Store for Db {
	fn list_notes<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, Result<Vec<Note>>> {
		Box::pin(notes::list(&self.pool, user_id))
	}

	fn insert_note<'a>(&'a self, note: &'a NewNote) -> BoxFuture<'a, Result<Note>> {
		Box::pin(notes::insert(&self.pool, note))
	}

	fn get_note<'a>(&'a self, user_id: Uuid, note_id: Uuid) -> BoxFuture<'a, Result<Option<Note>>> {
		Box::pin(notes::get(&self.pool, user_id, note_id))
	}

	fn note_owner<'a>(&'a self, note_id: Uuid) -> BoxFuture<'a, Result<Option<Uuid>>> {
		Box::pin(notes::owner(&self.pool, note_id))
	}

	fn update_note<'a>(
		&'a self,
		user_id: Uuid,
		note_id: Uuid,
		patch: &'a NotePatch,
	) -> BoxFuture<'a, Result<Option<Note>>> {
		Box::pin(notes::update(&self.pool, user_id, note_id, patch))
	}

	fn delete_note<'a>(&'a self, user_id: Uuid, note_id: Uuid) -> BoxFuture<'a, Result<bool>> {
		Box::pin(notes::delete(&self.pool, user_id, note_id))
	}

	fn upsert_embedding<'a>(
		&'a self,
		note_id: Uuid,
		embedding: &'a [f32],
		content_hash: &'a str,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(ai_metadata::upsert_embedding(&self.pool, note_id, embedding, content_hash))
	}

	fn embedding_hash<'a>(&'a self, note_id: Uuid) -> BoxFuture<'a, Result<Option<String>>> {
		Box::pin(async move {
			let metadata = ai_metadata::get(&self.pool, note_id).await?;

			Ok(metadata.and_then(|metadata| metadata.content_hash))
		})
	}

	fn search_notes_semantic<'a>(
		&'a self,
		query_embedding: &'a [f32],
		match_threshold: f32,
		match_count: u32,
		user_id: Uuid,
	) -> BoxFuture<'a, Result<Vec<NoteMatch>>> {
		Box::pin(notes::search_semantic(
			&self.pool,
			query_embedding,
			match_threshold,
			match_count,
			user_id,
		))
	}

	fn list_snippets<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, Result<Vec<Snippet>>> {
		Box::pin(snippets::list(&self.pool, user_id))
	}

	fn insert_snippet<'a>(&'a self, snippet: &'a NewSnippet) -> BoxFuture<'a, Result<Snippet>> {
		Box::pin(snippets::insert(&self.pool, snippet))
	}

	fn increment_snippet_usage<'a>(
		&'a self,
		user_id: Uuid,
		snippet_id: Uuid,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(snippets::increment_usage(&self.pool, user_id, snippet_id))
	}

	fn snippet_usage<'a>(
		&'a self,
		user_id: Uuid,
		snippet_id: Uuid,
	) -> BoxFuture<'a, Result<Option<i32>>> {
		Box::pin(snippets::usage(&self.pool, user_id, snippet_id))
	}

	fn set_snippet_usage<'a>(
		&'a self,
		user_id: Uuid,
		snippet_id: Uuid,
		usage_count: i32,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(snippets::set_usage(&self.pool, user_id, snippet_id, usage_count))
	}

	fn list_error_logs<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, Result<Vec<ErrorLog>>> {
		Box::pin(error_logs::list(&self.pool, user_id))
	}

	fn insert_error_log<'a>(&'a self, log: &'a NewErrorLog) -> BoxFuture<'a, Result<ErrorLog>> {
		Box::pin(error_logs::insert(&self.pool, log))
	}

	fn set_error_log_resolved<'a>(
		&'a self,
		user_id: Uuid,
		log_id: Uuid,
		resolved: bool,
	) -> BoxFuture<'a, Result<bool>> {
		Box::pin(error_logs::set_resolved(&self.pool, user_id, log_id, resolved))
	}

	fn list_journal<'a>(
		&'a self,
		user_id: Uuid,
		limit: i64,
	) -> BoxFuture<'a, Result<Vec<JournalEntry>>> {
		Box::pin(journal::list(&self.pool, user_id, limit))
	}

	fn upsert_journal<'a>(
		&'a self,
		entry: &'a JournalUpsert,
	) -> BoxFuture<'a, Result<JournalEntry>> {
		Box::pin(journal::upsert(&self.pool, entry))
	}
}
