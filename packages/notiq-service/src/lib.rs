pub mod access;
pub mod commit;
pub mod embed;
pub mod error_insight;
pub mod error_logs;
pub mod explain;
pub mod journal;
pub mod notes;
pub mod refactor;
pub mod rewrite;
pub mod search;
pub mod snippets;
pub mod summarize;
pub mod tag;
pub mod time_serde;

mod error;

pub use access::Principal;
pub use commit::CommitRequest;
pub use embed::{EmbedRequest, SuccessResponse};
pub use error::{Error, Result};
pub use error_insight::{ErrorContext, ErrorInsightRequest};
pub use error_logs::{ErrorLogView, ErrorLogsResponse, ResolveErrorRequest};
pub use explain::ExplainRequest;
pub use journal::{JournalEntryResponse, JournalEntryView, JournalListResponse, JournalRequest};
pub use notes::{CreateNoteRequest, NoteResponse, NoteView, NotesResponse, UpdateNoteRequest};
pub use notiq_storage::BoxFuture;
pub use refactor::RefactorRequest;
pub use rewrite::{RewriteRequest, RewriteResponse};
pub use search::{SearchFiltersInput, SearchHit, SearchRequest, SearchResponse};
pub use snippets::{CreateSnippetRequest, SnippetResponse, SnippetView, SnippetsResponse};
pub use summarize::{SummarizeRequest, SummarizeResponse};
pub use tag::TagRequest;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use notiq_config::{ChatProviderConfig, Config, EmbeddingProviderConfig};
use notiq_domain::prompt::{OutputFormat, Prompt};
use notiq_providers::{completion, embedding};
use notiq_storage::{Store, db::Db};

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		messages: &'a [Value],
		format: OutputFormat,
	) -> BoxFuture<'a, Result<String>>;
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub completion: Arc<dyn CompletionProvider>,
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl Providers {
	pub fn new(
		completion: Arc<dyn CompletionProvider>,
		embedding: Arc<dyn EmbeddingProvider>,
	) -> Self {
		Self { completion, embedding }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { completion: provider.clone(), embedding: provider }
	}
}

pub struct NotiqService {
	pub cfg: Config,
	pub store: Arc<dyn Store>,
	pub providers: Providers,
}
impl NotiqService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, store: Arc::new(db), providers: Providers::default() }
	}

	pub fn with_parts(cfg: Config, store: Arc<dyn Store>, providers: Providers) -> Self {
		Self { cfg, store, providers }
	}

	pub(crate) async fn complete(&self, prompt: &Prompt) -> Result<String> {
		let messages = prompt.messages();
		let raw = self
			.providers
			.completion
			.complete(&self.cfg.providers.chat, &messages, prompt.format)
			.await?;

		tracing::debug!(
			operation = prompt.operation.as_str(),
			len = raw.len(),
			"Completion received."
		);

		Ok(raw)
	}

	/// Runs a JSON prompt and decodes the answer, substituting `T::default()` when the model
	/// returns something that does not parse.
	pub(crate) async fn complete_json<T>(&self, prompt: &Prompt) -> Result<T>
	where
		T: DeserializeOwned + Default,
	{
		let raw = self.complete(prompt).await?;

		Ok(decode_or_default(prompt, &raw, notiq_domain::response::decode::<T>))
	}
}

struct DefaultProviders;
impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		messages: &'a [Value],
		format: OutputFormat,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			Ok(completion::complete(cfg, messages, format == OutputFormat::JsonObject).await?)
		})
	}
}
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(embedding::embed(cfg, texts).await?) })
	}
}

pub(crate) fn decode_or_default<T, F>(prompt: &Prompt, raw: &str, decode: F) -> T
where
	T: Default,
	F: FnOnce(&str) -> serde_json::Result<T>,
{
	match decode(raw) {
		Ok(value) => value,
		Err(err) => {
			tracing::warn!(
				operation = prompt.operation.as_str(),
				error = %err,
				"Completion output is not valid JSON. Returning an empty result."
			);

			T::default()
		},
	}
}

/// Embeds one text and returns its vector.
pub(crate) async fn embed_text(
	provider: &dyn EmbeddingProvider,
	cfg: &EmbeddingProviderConfig,
	text: &str,
) -> Result<Vec<f32>> {
	let texts = [text.to_string()];
	let mut vectors = provider.embed(cfg, &texts).await?;

	if vectors.is_empty() {
		return Err(Error::Provider {
			message: "Embedding provider returned no vectors.".to_string(),
		});
	}

	Ok(vectors.swap_remove(0))
}
