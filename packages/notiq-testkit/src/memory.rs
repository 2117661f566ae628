//! An in-memory `Store` that mirrors the Postgres queries closely enough for service and HTTP
//! tests.

use std::{
	collections::HashMap,
	future,
	sync::{
		RwLock, RwLockReadGuard, RwLockWriteGuard,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
};

use time::OffsetDateTime;
use uuid::Uuid;

use notiq_storage::{
	BoxFuture, Error, Result, Store,
	models::{
		ErrorLog, JournalEntry, JournalUpsert, NewErrorLog, NewNote, NewSnippet, Note, NoteMatch,
		NotePatch, Snippet,
	},
};

#[derive(Default)]
struct State {
	notes: HashMap<Uuid, Note>,
	embeddings: HashMap<Uuid, (Vec<f32>, String)>,
	snippets: HashMap<Uuid, Snippet>,
	error_logs: HashMap<Uuid, ErrorLog>,
	journal: HashMap<(Uuid, time::Date), JournalEntry>,
}

pub struct MemoryStore {
	state: RwLock<State>,
	atomic_usage: AtomicBool,
	fail_error_logs: AtomicBool,
	atomic_usage_calls: AtomicUsize,
	upserted_embeddings: AtomicUsize,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self {
			state: RwLock::new(State::default()),
			atomic_usage: AtomicBool::new(true),
			fail_error_logs: AtomicBool::new(false),
			atomic_usage_calls: AtomicUsize::new(0),
			upserted_embeddings: AtomicUsize::new(0),
		}
	}

	/// Behaves like a database without the `increment_snippet_usage` function.
	pub fn without_atomic_usage(self) -> Self {
		self.atomic_usage.store(false, Ordering::SeqCst);

		self
	}

	/// Makes every error-log insert fail.
	pub fn with_failing_error_logs(self) -> Self {
		self.fail_error_logs.store(true, Ordering::SeqCst);

		self
	}

	pub fn atomic_usage_calls(&self) -> usize {
		self.atomic_usage_calls.load(Ordering::SeqCst)
	}

	pub fn upserted_embeddings(&self) -> usize {
		self.upserted_embeddings.load(Ordering::SeqCst)
	}

	pub fn embedding(&self, note_id: Uuid) -> Option<Vec<f32>> {
		self.read().embeddings.get(&note_id).map(|(vec, _)| vec.clone())
	}

	pub fn set_note_created_at(&self, note_id: Uuid, created_at: OffsetDateTime) {
		if let Some(note) = self.write().notes.get_mut(&note_id) {
			note.created_at = created_at;
		}
	}

	fn read(&self) -> RwLockReadGuard<'_, State> {
		self.state.read().unwrap_or_else(|err| err.into_inner())
	}

	fn write(&self) -> RwLockWriteGuard<'_, State> {
		self.state.write().unwrap_or_else(|err| err.into_inner())
	}
}
impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}
impl Store for MemoryStore {
	fn list_notes<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, Result<Vec<Note>>> {
		let mut notes: Vec<Note> =
			self.read().notes.values().filter(|note| note.user_id == user_id).cloned().collect();

		notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

		ready(Ok(notes))
	}

	fn insert_note<'a>(&'a self, note: &'a NewNote) -> BoxFuture<'a, Result<Note>> {
		let now = OffsetDateTime::now_utc();
		let row = Note {
			id: note.id,
			user_id: note.user_id,
			title: note.title.clone(),
			content: note.content.clone(),
			summary: None,
			tags: note.tags.clone(),
			created_at: now,
			updated_at: now,
		};

		self.write().notes.insert(row.id, row.clone());

		ready(Ok(row))
	}

	fn get_note<'a>(&'a self, user_id: Uuid, note_id: Uuid) -> BoxFuture<'a, Result<Option<Note>>> {
		let note = self.read().notes.get(&note_id).filter(|note| note.user_id == user_id).cloned();

		ready(Ok(note))
	}

	fn note_owner<'a>(&'a self, note_id: Uuid) -> BoxFuture<'a, Result<Option<Uuid>>> {
		ready(Ok(self.read().notes.get(&note_id).map(|note| note.user_id)))
	}

	fn update_note<'a>(
		&'a self,
		user_id: Uuid,
		note_id: Uuid,
		patch: &'a NotePatch,
	) -> BoxFuture<'a, Result<Option<Note>>> {
		let mut state = self.write();
		let updated = state.notes.get_mut(&note_id).filter(|note| note.user_id == user_id).map(
			|note| {
				if let Some(title) = &patch.title {
					note.title = title.clone();
				}
				if let Some(content) = &patch.content {
					note.content = content.clone();
				}
				if let Some(summary) = &patch.summary {
					note.summary = Some(summary.clone());
				}
				if let Some(tags) = &patch.tags {
					note.tags = tags.clone();
				}

				note.updated_at = OffsetDateTime::now_utc();

				note.clone()
			},
		);

		ready(Ok(updated))
	}

	fn delete_note<'a>(&'a self, user_id: Uuid, note_id: Uuid) -> BoxFuture<'a, Result<bool>> {
		let mut state = self.write();
		let owned = state.notes.get(&note_id).is_some_and(|note| note.user_id == user_id);

		if owned {
			state.notes.remove(&note_id);
			state.embeddings.remove(&note_id);
		}

		ready(Ok(owned))
	}

	fn upsert_embedding<'a>(
		&'a self,
		note_id: Uuid,
		embedding: &'a [f32],
		content_hash: &'a str,
	) -> BoxFuture<'a, Result<()>> {
		let mut state = self.write();

		if !state.notes.contains_key(&note_id) {
			return ready(Err(Error::NotFound(format!("note {note_id}"))));
		}

		state.embeddings.insert(note_id, (embedding.to_vec(), content_hash.to_string()));
		self.upserted_embeddings.fetch_add(1, Ordering::SeqCst);

		ready(Ok(()))
	}

	fn embedding_hash<'a>(&'a self, note_id: Uuid) -> BoxFuture<'a, Result<Option<String>>> {
		ready(Ok(self.read().embeddings.get(&note_id).map(|(_, hash)| hash.clone())))
	}

	fn search_notes_semantic<'a>(
		&'a self,
		query_embedding: &'a [f32],
		match_threshold: f32,
		match_count: u32,
		user_id: Uuid,
	) -> BoxFuture<'a, Result<Vec<NoteMatch>>> {
		let state = self.read();
		let mut matches: Vec<NoteMatch> = state
			.notes
			.values()
			.filter(|note| note.user_id == user_id)
			.filter_map(|note| {
				let (vec, _) = state.embeddings.get(&note.id)?;
				let similarity = cosine_similarity(query_embedding, vec);

				(similarity > f64::from(match_threshold))
					.then(|| NoteMatch { note: note.clone(), similarity })
			})
			.collect();

		matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
		matches.truncate(match_count as usize);

		ready(Ok(matches))
	}

	fn list_snippets<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, Result<Vec<Snippet>>> {
		let mut snippets: Vec<Snippet> = self
			.read()
			.snippets
			.values()
			.filter(|snippet| snippet.user_id == user_id)
			.cloned()
			.collect();

		snippets.sort_by(|a, b| {
			b.usage_count.cmp(&a.usage_count).then_with(|| b.updated_at.cmp(&a.updated_at))
		});

		ready(Ok(snippets))
	}

	fn insert_snippet<'a>(&'a self, snippet: &'a NewSnippet) -> BoxFuture<'a, Result<Snippet>> {
		let now = OffsetDateTime::now_utc();
		let row = Snippet {
			id: snippet.id,
			user_id: snippet.user_id,
			note_id: snippet.note_id,
			title: snippet.title.clone(),
			code: snippet.code.clone(),
			language: snippet.language.clone(),
			description: snippet.description.clone(),
			tags: snippet.tags.clone(),
			usage_count: 0,
			created_at: now,
			updated_at: now,
		};

		self.write().snippets.insert(row.id, row.clone());

		ready(Ok(row))
	}

	fn increment_snippet_usage<'a>(
		&'a self,
		user_id: Uuid,
		snippet_id: Uuid,
	) -> BoxFuture<'a, Result<()>> {
		self.atomic_usage_calls.fetch_add(1, Ordering::SeqCst);

		if !self.atomic_usage.load(Ordering::SeqCst) {
			return ready(Err(Error::NotFound(
				"function increment_snippet_usage(uuid, uuid)".to_string(),
			)));
		}

		if let Some(snippet) = self
			.write()
			.snippets
			.get_mut(&snippet_id)
			.filter(|snippet| snippet.user_id == user_id)
		{
			snippet.usage_count += 1;
		}

		ready(Ok(()))
	}

	fn snippet_usage<'a>(
		&'a self,
		user_id: Uuid,
		snippet_id: Uuid,
	) -> BoxFuture<'a, Result<Option<i32>>> {
		let count = self
			.read()
			.snippets
			.get(&snippet_id)
			.filter(|snippet| snippet.user_id == user_id)
			.map(|snippet| snippet.usage_count);

		ready(Ok(count))
	}

	fn set_snippet_usage<'a>(
		&'a self,
		user_id: Uuid,
		snippet_id: Uuid,
		usage_count: i32,
	) -> BoxFuture<'a, Result<()>> {
		if let Some(snippet) = self
			.write()
			.snippets
			.get_mut(&snippet_id)
			.filter(|snippet| snippet.user_id == user_id)
		{
			snippet.usage_count = usage_count;
		}

		ready(Ok(()))
	}

	fn list_error_logs<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, Result<Vec<ErrorLog>>> {
		let mut logs: Vec<ErrorLog> =
			self.read().error_logs.values().filter(|log| log.user_id == user_id).cloned().collect();

		logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

		ready(Ok(logs))
	}

	fn insert_error_log<'a>(&'a self, log: &'a NewErrorLog) -> BoxFuture<'a, Result<ErrorLog>> {
		if self.fail_error_logs.load(Ordering::SeqCst) {
			return ready(Err(Error::InvalidArgument("error_logs is unavailable".to_string())));
		}

		let row = ErrorLog {
			id: log.id,
			user_id: log.user_id,
			note_id: log.note_id,
			error_text: log.error_text.clone(),
			language: log.language.clone(),
			framework: log.framework.clone(),
			ai_explanation: log.ai_explanation.clone(),
			ai_solution: log.ai_solution.clone(),
			is_resolved: false,
			created_at: OffsetDateTime::now_utc(),
		};

		self.write().error_logs.insert(row.id, row.clone());

		ready(Ok(row))
	}

	fn set_error_log_resolved<'a>(
		&'a self,
		user_id: Uuid,
		log_id: Uuid,
		resolved: bool,
	) -> BoxFuture<'a, Result<bool>> {
		let updated = self
			.write()
			.error_logs
			.get_mut(&log_id)
			.filter(|log| log.user_id == user_id)
			.map(|log| log.is_resolved = resolved)
			.is_some();

		ready(Ok(updated))
	}

	fn list_journal<'a>(
		&'a self,
		user_id: Uuid,
		limit: i64,
	) -> BoxFuture<'a, Result<Vec<JournalEntry>>> {
		let mut entries: Vec<JournalEntry> = self
			.read()
			.journal
			.values()
			.filter(|entry| entry.user_id == user_id)
			.cloned()
			.collect();

		entries.sort_by(|a, b| b.date.cmp(&a.date));
		entries.truncate(usize::try_from(limit).unwrap_or(0));

		ready(Ok(entries))
	}

	fn upsert_journal<'a>(
		&'a self,
		entry: &'a JournalUpsert,
	) -> BoxFuture<'a, Result<JournalEntry>> {
		let now = OffsetDateTime::now_utc();
		let mut state = self.write();
		let row = state
			.journal
			.entry((entry.user_id, entry.date))
			.and_modify(|existing| {
				existing.content = entry.content.clone();
				existing.mood = entry.mood.clone();
				existing.tech_used = entry.tech_used.clone();
				existing.achievements = entry.achievements.clone();
				existing.blockers = entry.blockers.clone();
				existing.updated_at = now;
			})
			.or_insert_with(|| JournalEntry {
				id: entry.id,
				user_id: entry.user_id,
				date: entry.date,
				content: entry.content.clone(),
				mood: entry.mood.clone(),
				tech_used: entry.tech_used.clone(),
				achievements: entry.achievements.clone(),
				blockers: entry.blockers.clone(),
				created_at: now,
				updated_at: now,
			})
			.clone();

		ready(Ok(row))
	}
}

fn ready<'a, T>(value: T) -> BoxFuture<'a, T>
where
	T: Send + 'a,
{
	Box::pin(future::ready(value))
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
	if a.len() != b.len() || a.is_empty() {
		return 0.0;
	}

	let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);

	for (x, y) in a.iter().zip(b) {
		let (x, y) = (f64::from(*x), f64::from(*y));

		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return 0.0;
	}

	dot / (norm_a.sqrt() * norm_b.sqrt())
}
