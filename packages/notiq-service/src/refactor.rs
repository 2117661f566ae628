use serde::Deserialize;

use notiq_domain::{prompt, response::RefactorResult};

use crate::{NotiqService, Result};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RefactorRequest {
	pub code: Option<String>,
	pub language: Option<String>,
	pub instruction: Option<String>,
}

impl NotiqService {
	pub async fn refactor(&self, req: RefactorRequest) -> Result<RefactorResult> {
		let prompt = prompt::refactor(
			req.code.as_deref(),
			req.language.as_deref(),
			req.instruction.as_deref(),
		)?;

		self.complete_json(&prompt).await
	}
}
