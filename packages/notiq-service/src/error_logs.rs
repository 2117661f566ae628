use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use notiq_storage::models::ErrorLog;

use crate::{Error, NotiqService, Result, SuccessResponse};

#[derive(Clone, Debug, Serialize)]
pub struct ErrorLogView {
	pub id: Uuid,
	pub user_id: Uuid,
	pub note_id: Option<Uuid>,
	pub error_text: String,
	pub language: String,
	pub framework: Option<String>,
	pub ai_explanation: String,
	pub ai_solution: Value,
	pub is_resolved: bool,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<ErrorLog> for ErrorLogView {
	fn from(log: ErrorLog) -> Self {
		Self {
			id: log.id,
			user_id: log.user_id,
			note_id: log.note_id,
			error_text: log.error_text,
			language: log.language,
			framework: log.framework,
			ai_explanation: log.ai_explanation,
			ai_solution: log.ai_solution,
			is_resolved: log.is_resolved,
			created_at: log.created_at,
		}
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct ErrorLogsResponse {
	pub errors: Vec<ErrorLogView>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResolveErrorRequest {
	pub resolved: Option<bool>,
}

impl NotiqService {
	pub async fn list_error_logs(&self, user_id: Uuid) -> Result<ErrorLogsResponse> {
		let logs = self.store.list_error_logs(user_id).await?;

		Ok(ErrorLogsResponse { errors: logs.into_iter().map(ErrorLogView::from).collect() })
	}

	pub async fn resolve_error_log(
		&self,
		user_id: Uuid,
		log_id: Uuid,
		req: ResolveErrorRequest,
	) -> Result<SuccessResponse> {
		let resolved = req.resolved.unwrap_or(true);

		if !self.store.set_error_log_resolved(user_id, log_id, resolved).await? {
			return Err(Error::NotFound { message: "Error log not found.".to_string() });
		}

		Ok(SuccessResponse::ok())
	}
}
