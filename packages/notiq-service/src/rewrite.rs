use serde::{Deserialize, Serialize};

use notiq_domain::prompt;

use crate::{NotiqService, Result};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RewriteRequest {
	pub content: Option<String>,
	pub instruction: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RewriteResponse {
	pub rewritten: String,
}

impl NotiqService {
	pub async fn rewrite(&self, req: RewriteRequest) -> Result<RewriteResponse> {
		let prompt = prompt::rewrite(req.content.as_deref(), req.instruction.as_deref())?;
		let rewritten = self.complete(&prompt).await?;

		Ok(RewriteResponse { rewritten })
	}
}
