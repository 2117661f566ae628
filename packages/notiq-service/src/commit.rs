use serde::Deserialize;

use notiq_domain::{prompt, response::CommitResult};

use crate::{NotiqService, Result};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CommitRequest {
	pub diff: Option<String>,
	pub style: Option<String>,
}

impl NotiqService {
	pub async fn commit_message(&self, req: CommitRequest) -> Result<CommitResult> {
		let prompt = prompt::commit_message(req.diff.as_deref(), req.style.as_deref())?;

		self.complete_json(&prompt).await
	}
}
