use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use notiq_domain::{
	prompt,
	response::{self, TagResult},
};
use notiq_storage::models::{NewSnippet, Snippet};

use crate::{Error, NotiqService, Result, SuccessResponse, access};

#[derive(Clone, Debug, Serialize)]
pub struct SnippetView {
	pub id: Uuid,
	pub user_id: Uuid,
	pub note_id: Option<Uuid>,
	pub title: String,
	pub code: String,
	pub language: String,
	pub description: Option<String>,
	pub tags: Vec<String>,
	pub usage_count: i32,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<Snippet> for SnippetView {
	fn from(snippet: Snippet) -> Self {
		Self {
			id: snippet.id,
			user_id: snippet.user_id,
			note_id: snippet.note_id,
			title: snippet.title,
			code: snippet.code,
			language: snippet.language,
			description: snippet.description,
			tags: snippet.tags,
			usage_count: snippet.usage_count,
			created_at: snippet.created_at,
			updated_at: snippet.updated_at,
		}
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct SnippetsResponse {
	pub snippets: Vec<SnippetView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SnippetResponse {
	pub snippet: SnippetView,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateSnippetRequest {
	pub title: Option<String>,
	pub code: Option<String>,
	pub language: Option<String>,
	pub description: Option<String>,
	pub tags: Option<Vec<String>>,
	pub note_id: Option<String>,
}

impl NotiqService {
	pub async fn list_snippets(&self, user_id: Uuid) -> Result<SnippetsResponse> {
		let snippets = self.store.list_snippets(user_id).await?;

		Ok(SnippetsResponse { snippets: snippets.into_iter().map(SnippetView::from).collect() })
	}

	/// Saves a snippet. Without explicit tags, tags are generated from the title and code; a
	/// failed generation leaves the snippet untagged.
	pub async fn create_snippet(
		&self,
		user_id: Uuid,
		req: CreateSnippetRequest,
	) -> Result<SnippetResponse> {
		let (Some(title), Some(code), Some(language)) =
			(non_blank(req.title), non_blank(req.code), non_blank(req.language))
		else {
			return Err(Error::InvalidRequest {
				message: "Title, code and language are required".to_string(),
			});
		};
		let note_id = access::parse_optional_id("note_id", req.note_id.as_deref())?;
		let mut tags = response::normalize_tags(req.tags.unwrap_or_default());

		if tags.is_empty() {
			tags = self.generate_snippet_tags(&title, &code).await;
		}

		let snippet = NewSnippet {
			id: Uuid::new_v4(),
			user_id,
			note_id,
			title,
			code,
			language,
			description: non_blank(req.description),
			tags,
		};
		let snippet = self.store.insert_snippet(&snippet).await?;

		Ok(SnippetResponse { snippet: snippet.into() })
	}

	/// Counts one copy of a snippet. Uses the atomic database function when available and falls
	/// back to read-then-write otherwise. Unknown snippets still succeed.
	pub async fn record_snippet_usage(
		&self,
		user_id: Uuid,
		snippet_id: Uuid,
	) -> Result<SuccessResponse> {
		if let Err(err) = self.store.increment_snippet_usage(user_id, snippet_id).await {
			tracing::warn!(
				error = %err,
				%snippet_id,
				"Atomic usage increment failed. Falling back to read-then-write."
			);

			if let Some(count) = self.store.snippet_usage(user_id, snippet_id).await? {
				self.store.set_snippet_usage(user_id, snippet_id, count.saturating_add(1)).await?;
			}
		}

		Ok(SuccessResponse::ok())
	}

	async fn generate_snippet_tags(&self, title: &str, code: &str) -> Vec<String> {
		let content = format!("{title}\n\n{code}");
		let prompt = match prompt::tag(Some(&content)) {
			Ok(Some(prompt)) => prompt,
			Ok(None) | Err(_) => return Vec::new(),
		};

		match self.complete(&prompt).await {
			Ok(raw) => {
				let result: TagResult = crate::decode_or_default(&prompt, &raw, response::decode_tags);

				result.tags
			},
			Err(err) => {
				tracing::warn!(error = %err, "Snippet auto-tagging failed. Saving without tags.");

				Vec::new()
			},
		}
	}
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.trim().is_empty())
}
