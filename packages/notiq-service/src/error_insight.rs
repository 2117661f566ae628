use serde::Deserialize;
use uuid::Uuid;

use notiq_domain::{prompt, response::ErrorInsightResult};
use notiq_storage::models::NewErrorLog;

use crate::{NotiqService, Principal, Result};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInsightRequest {
	pub error_text: Option<String>,
	pub context: Option<ErrorContext>,
	pub user_id: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorContext {
	pub language: Option<String>,
	pub framework: Option<String>,
}

impl NotiqService {
	/// Analyzes an error log. When the request names the caller's own `userId`, the analysis is
	/// also recorded in `error_logs`; that write is best-effort.
	pub async fn error_insight(
		&self,
		principal: Principal,
		req: ErrorInsightRequest,
	) -> Result<ErrorInsightResult> {
		let context = req.context.unwrap_or_default();
		let prompt = prompt::error_insight(
			req.error_text.as_deref(),
			context.language.as_deref(),
			context.framework.as_deref(),
		)?;
		// Only the caller's own id is recorded. Any other value just skips the log.
		let owner = req
			.user_id
			.as_deref()
			.and_then(|raw| Uuid::parse_str(raw.trim()).ok())
			.filter(|requested| principal == Principal::User(*requested));
		let insight: ErrorInsightResult = self.complete_json(&prompt).await?;

		if let Some(user_id) = owner {
			let log = NewErrorLog {
				id: Uuid::new_v4(),
				user_id,
				note_id: None,
				error_text: req.error_text.unwrap_or_default(),
				language: insight.detected_language.clone(),
				framework: insight.detected_framework.clone(),
				ai_explanation: insight.explanation.clone(),
				ai_solution: serde_json::to_value(&insight.solutions)
					.unwrap_or_else(|_| serde_json::Value::Array(Vec::new())),
			};

			if let Err(err) = self.store.insert_error_log(&log).await {
				tracing::warn!(error = %err, %user_id, "Failed to record error log.");
			}
		}

		Ok(insight)
	}
}
