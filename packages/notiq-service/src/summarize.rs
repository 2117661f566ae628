use serde::{Deserialize, Serialize};

use notiq_domain::prompt;

use crate::{NotiqService, Result};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SummarizeRequest {
	pub content: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SummarizeResponse {
	pub summary: String,
}

impl NotiqService {
	pub async fn summarize(&self, req: SummarizeRequest) -> Result<SummarizeResponse> {
		let prompt = prompt::summarize(req.content.as_deref())?;
		let summary = self.complete(&prompt).await?;

		Ok(SummarizeResponse { summary })
	}
}
