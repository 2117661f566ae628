use serde::Deserialize;

use notiq_domain::{prompt, response::TagResult};

use crate::{NotiqService, Result};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TagRequest {
	pub content: Option<String>,
}

impl NotiqService {
	/// Blank content returns no tags without asking the model.
	pub async fn tag(&self, req: TagRequest) -> Result<TagResult> {
		let Some(prompt) = prompt::tag(req.content.as_deref())? else {
			return Ok(TagResult::default());
		};
		let raw = self.complete(&prompt).await?;

		Ok(crate::decode_or_default(&prompt, &raw, notiq_domain::response::decode_tags))
	}
}
