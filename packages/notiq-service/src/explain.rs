use serde::Deserialize;

use notiq_domain::{prompt, response::ExplainResult};

use crate::{NotiqService, Result};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExplainRequest {
	pub code: Option<String>,
	pub language: Option<String>,
	pub context: Option<String>,
}

impl NotiqService {
	pub async fn explain(&self, req: ExplainRequest) -> Result<ExplainResult> {
		let prompt = prompt::explain(
			req.code.as_deref(),
			req.language.as_deref(),
			req.context.as_deref(),
		)?;

		self.complete_json(&prompt).await
	}
}
