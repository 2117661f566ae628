use serde::{Deserialize, Serialize};

use notiq_domain::search_filter::SearchFilters;

use crate::{Error, NotiqService, Principal, Result, access, notes::NoteView};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
	pub query: Option<String>,
	pub user_id: Option<String>,
	pub filters: Option<SearchFiltersInput>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFiltersInput {
	pub tags: Option<Vec<String>>,
	pub date_from: Option<String>,
	pub date_to: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchHit {
	#[serde(flatten)]
	pub note: NoteView,
	pub similarity: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchResponse {
	pub results: Vec<SearchHit>,
	pub count: usize,
}

impl NotiqService {
	/// Semantic search over the owner's notes, narrowed by tag and date filters.
	///
	/// The database returns at most `search.match_count` rows above `search.match_threshold`.
	/// Filters only drop rows; similarity order is kept.
	pub async fn search(&self, principal: Principal, req: SearchRequest) -> Result<SearchResponse> {
		let query = req.query.as_deref().filter(|query| !query.trim().is_empty());
		let requested = access::parse_optional_id("userId", req.user_id.as_deref())?;
		let (Some(query), Some(requested)) = (query, requested) else {
			return Err(Error::InvalidRequest {
				message: "Query and userId are required".to_string(),
			});
		};
		let filters = match req.filters {
			Some(input) => SearchFilters::from_raw(
				input.tags,
				input.date_from.as_deref(),
				input.date_to.as_deref(),
			)?,
			None => SearchFilters::default(),
		};
		let owner = principal.acting_for(Some(requested))?;
		let vector = crate::embed_text(
			self.providers.embedding.as_ref(),
			&self.cfg.providers.embedding,
			query,
		)
		.await?;
		let matches = self
			.store
			.search_notes_semantic(
				&vector,
				self.cfg.search.match_threshold,
				self.cfg.search.match_count,
				owner,
			)
			.await?;
		let fetched = matches.len();
		let results: Vec<SearchHit> = filters
			.apply(matches, |hit| (hit.note.tags.as_slice(), hit.note.created_at))
			.into_iter()
			.map(|hit| SearchHit { note: hit.note.into(), similarity: hit.similarity })
			.collect();

		tracing::debug!(%owner, fetched, kept = results.len(), "Semantic search finished.");

		Ok(SearchResponse { count: results.len(), results })
	}
}
