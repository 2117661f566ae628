use serde::{Deserialize, Serialize};

use notiq_domain::content;

use crate::{Error, NotiqService, Principal, Result, access};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedRequest {
	pub note_id: Option<String>,
	pub content: Option<String>,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct SuccessResponse {
	pub success: bool,
}
impl SuccessResponse {
	pub fn ok() -> Self {
		Self { success: true }
	}
}

impl NotiqService {
	/// Embeds `content` and stores the vector for the note.
	pub async fn embed(&self, principal: Principal, req: EmbedRequest) -> Result<SuccessResponse> {
		let note_id = access::parse_optional_id("noteId", req.note_id.as_deref())?;
		let content = req.content.as_deref().filter(|content| !content.trim().is_empty());
		let (Some(note_id), Some(content)) = (note_id, content) else {
			return Err(Error::InvalidRequest {
				message: "Note ID and content are required".to_string(),
			});
		};
		let exists = match principal {
			Principal::User(user_id) => self.store.get_note(user_id, note_id).await?.is_some(),
			Principal::Service => self.store.note_owner(note_id).await?.is_some(),
		};

		if !exists {
			return Err(Error::NotFound { message: "Note not found.".to_string() });
		}

		let vector = crate::embed_text(
			self.providers.embedding.as_ref(),
			&self.cfg.providers.embedding,
			content,
		)
		.await?;

		self.store.upsert_embedding(note_id, &vector, &content::content_hash(content)).await?;

		Ok(SuccessResponse::ok())
	}
}
