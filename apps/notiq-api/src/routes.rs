use axum::{
	Json, Router,
	body::Bytes,
	extract::{FromRequest, Path, Request, State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
	auth::{Caller, UserSession},
	state::AppState,
};
use notiq_domain::response::{
	CommitResult, ErrorInsightResult, ExplainResult, RefactorResult, TagResult,
};
use notiq_service::{
	CommitRequest, CreateNoteRequest, CreateSnippetRequest, EmbedRequest, Error as ServiceError,
	ErrorInsightRequest, ErrorLogsResponse, ExplainRequest, JournalEntryResponse,
	JournalListResponse, JournalRequest, NoteResponse, NotesResponse, RefactorRequest,
	ResolveErrorRequest, RewriteRequest, RewriteResponse, SearchRequest, SearchResponse,
	SnippetResponse, SnippetsResponse, SuccessResponse, SummarizeRequest, SummarizeResponse,
	TagRequest, UpdateNoteRequest,
};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/summarize", post(summarize))
		.route("/api/rewrite", post(rewrite))
		.route("/api/tag", post(tag))
		.route("/api/ai/explain", post(explain))
		.route("/api/ai/refactor", post(refactor))
		.route("/api/ai/commit", post(commit))
		.route("/api/ai/error-insight", post(error_insight))
		.route("/api/embed", post(embed))
		.route("/api/search", post(search))
		.route("/api/notes", get(list_notes).post(create_note))
		.route("/api/notes/{id}", get(get_note).patch(update_note).delete(delete_note))
		.route("/api/snippets", get(list_snippets).post(create_snippet))
		.route("/api/snippets/{id}/usage", post(record_snippet_usage))
		.route("/api/errors", get(list_error_logs))
		.route("/api/errors/{id}/resolve", post(resolve_error_log))
		.route("/api/journal", get(list_journal).post(upsert_journal))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn summarize(
	State(state): State<AppState>,
	UserSession(_): UserSession,
	Payload(payload): Payload<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
	let response = state.service.summarize(payload).await?;

	Ok(Json(response))
}

async fn rewrite(
	State(state): State<AppState>,
	UserSession(_): UserSession,
	Payload(payload): Payload<RewriteRequest>,
) -> Result<Json<RewriteResponse>, ApiError> {
	let response = state.service.rewrite(payload).await?;

	Ok(Json(response))
}

async fn tag(
	State(state): State<AppState>,
	UserSession(_): UserSession,
	Payload(payload): Payload<TagRequest>,
) -> Result<Json<TagResult>, ApiError> {
	let response = state.service.tag(payload).await?;

	Ok(Json(response))
}

async fn explain(
	State(state): State<AppState>,
	UserSession(_): UserSession,
	Payload(payload): Payload<ExplainRequest>,
) -> Result<Json<ExplainResult>, ApiError> {
	let response = state.service.explain(payload).await?;

	Ok(Json(response))
}

async fn refactor(
	State(state): State<AppState>,
	UserSession(_): UserSession,
	Payload(payload): Payload<RefactorRequest>,
) -> Result<Json<RefactorResult>, ApiError> {
	let response = state.service.refactor(payload).await?;

	Ok(Json(response))
}

async fn commit(
	State(state): State<AppState>,
	UserSession(_): UserSession,
	Payload(payload): Payload<CommitRequest>,
) -> Result<Json<CommitResult>, ApiError> {
	let response = state.service.commit_message(payload).await?;

	Ok(Json(response))
}

async fn error_insight(
	State(state): State<AppState>,
	UserSession(user_id): UserSession,
	Payload(payload): Payload<ErrorInsightRequest>,
) -> Result<Json<ErrorInsightResult>, ApiError> {
	let response =
		state.service.error_insight(notiq_service::Principal::User(user_id), payload).await?;

	Ok(Json(response))
}

async fn embed(
	State(state): State<AppState>,
	Caller(principal): Caller,
	Payload(payload): Payload<EmbedRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
	let response = state.service.embed(principal, payload).await?;

	Ok(Json(response))
}

async fn search(
	State(state): State<AppState>,
	Caller(principal): Caller,
	Payload(payload): Payload<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(principal, payload).await?;

	Ok(Json(response))
}

async fn list_notes(
	State(state): State<AppState>,
	UserSession(user_id): UserSession,
) -> Result<Json<NotesResponse>, ApiError> {
	let response = state.service.list_notes(user_id).await?;

	Ok(Json(response))
}

async fn create_note(
	State(state): State<AppState>,
	UserSession(user_id): UserSession,
	Payload(payload): Payload<CreateNoteRequest>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
	let response = state.service.create_note(user_id, payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn get_note(
	State(state): State<AppState>,
	UserSession(user_id): UserSession,
	Path(id): Path<String>,
) -> Result<Json<NoteResponse>, ApiError> {
	let response = state.service.get_note(user_id, parse_id(&id)?).await?;

	Ok(Json(response))
}

async fn update_note(
	State(state): State<AppState>,
	UserSession(user_id): UserSession,
	Path(id): Path<String>,
	Payload(payload): Payload<UpdateNoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
	let response = state.service.update_note(user_id, parse_id(&id)?, payload).await?;

	Ok(Json(response))
}

async fn delete_note(
	State(state): State<AppState>,
	UserSession(user_id): UserSession,
	Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
	let response = state.service.delete_note(user_id, parse_id(&id)?).await?;

	Ok(Json(response))
}

async fn list_snippets(
	State(state): State<AppState>,
	UserSession(user_id): UserSession,
) -> Result<Json<SnippetsResponse>, ApiError> {
	let response = state.service.list_snippets(user_id).await?;

	Ok(Json(response))
}

async fn create_snippet(
	State(state): State<AppState>,
	UserSession(user_id): UserSession,
	Payload(payload): Payload<CreateSnippetRequest>,
) -> Result<(StatusCode, Json<SnippetResponse>), ApiError> {
	let response = state.service.create_snippet(user_id, payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn record_snippet_usage(
	State(state): State<AppState>,
	UserSession(user_id): UserSession,
	Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
	let response = state.service.record_snippet_usage(user_id, parse_id(&id)?).await?;

	Ok(Json(response))
}

async fn list_error_logs(
	State(state): State<AppState>,
	UserSession(user_id): UserSession,
) -> Result<Json<ErrorLogsResponse>, ApiError> {
	let response = state.service.list_error_logs(user_id).await?;

	Ok(Json(response))
}

async fn resolve_error_log(
	State(state): State<AppState>,
	UserSession(user_id): UserSession,
	Path(id): Path<String>,
	body: Bytes,
) -> Result<Json<SuccessResponse>, ApiError> {
	let log_id = parse_id(&id)?;
	// The body is optional here; an empty one means "resolved".
	let payload: ResolveErrorRequest = if body.iter().all(u8::is_ascii_whitespace) {
		ResolveErrorRequest::default()
	} else {
		decode_body(&body)?
	};
	let response = state.service.resolve_error_log(user_id, log_id, payload).await?;

	Ok(Json(response))
}

async fn list_journal(
	State(state): State<AppState>,
	UserSession(user_id): UserSession,
) -> Result<Json<JournalListResponse>, ApiError> {
	let response = state.service.list_journal(user_id).await?;

	Ok(Json(response))
}

async fn upsert_journal(
	State(state): State<AppState>,
	UserSession(user_id): UserSession,
	Payload(payload): Payload<JournalRequest>,
) -> Result<(StatusCode, Json<JournalEntryResponse>), ApiError> {
	let response = state.service.upsert_journal(user_id, payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
	Uuid::parse_str(raw.trim()).map_err(|_| ApiError::bad_request("Path id must be a UUID."))
}

fn decode_body<T>(body: &[u8]) -> Result<T, ApiError>
where
	T: DeserializeOwned,
{
	serde_json::from_slice(body)
		.map_err(|err| ApiError::bad_request(format!("Invalid JSON body: {err}.")))
}

/// JSON request body whose rejections use the `{error}` envelope with status 400.
pub struct Payload<T>(pub T);
impl<S, T> FromRequest<S> for Payload<T>
where
	Json<T>: FromRequest<S, Rejection = JsonRejection>,
	S: Send + Sync,
{
	type Rejection = ApiError;

	async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
		match Json::<T>::from_request(req, state).await {
			Ok(Json(value)) => Ok(Self(value)),
			Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
		}
	}
}

#[derive(Serialize)]
struct ErrorBody {
	error: String,
}

#[derive(Debug)]
pub struct ApiError {
	pub status: StatusCode,
	pub message: String,
}
impl ApiError {
	pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
		Self { status, message: message.into() }
	}

	pub fn bad_request(message: impl Into<String>) -> Self {
		Self::new(StatusCode::BAD_REQUEST, message)
	}

	pub fn unauthorized(message: impl Into<String>) -> Self {
		Self::new(StatusCode::UNAUTHORIZED, message)
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } => Self::new(StatusCode::BAD_REQUEST, message),
			ServiceError::Unauthorized { message } => Self::new(StatusCode::UNAUTHORIZED, message),
			ServiceError::Forbidden { message } => Self::new(StatusCode::FORBIDDEN, message),
			ServiceError::NotFound { message } => Self::new(StatusCode::NOT_FOUND, message),
			ServiceError::Provider { message } => {
				tracing::error!(error = %message, "Provider call failed.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
			},
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Storage call failed.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(ErrorBody { error: self.message })).into_response()
	}
}
