use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use notiq_domain::journal::{self, Mood};
use notiq_storage::models::{JournalEntry, JournalUpsert};

use crate::{Error, NotiqService, Result};

#[derive(Clone, Debug, Serialize)]
pub struct JournalEntryView {
	pub id: Uuid,
	pub user_id: Uuid,
	#[serde(with = "crate::time_serde::date")]
	pub date: Date,
	pub content: Option<String>,
	pub mood: Option<String>,
	pub tech_used: Vec<String>,
	pub achievements: Vec<String>,
	pub blockers: Vec<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<JournalEntry> for JournalEntryView {
	fn from(entry: JournalEntry) -> Self {
		Self {
			id: entry.id,
			user_id: entry.user_id,
			date: entry.date,
			content: entry.content,
			mood: entry.mood,
			tech_used: entry.tech_used,
			achievements: entry.achievements,
			blockers: entry.blockers,
			created_at: entry.created_at,
			updated_at: entry.updated_at,
		}
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct JournalListResponse {
	pub entries: Vec<JournalEntryView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct JournalEntryResponse {
	pub entry: JournalEntryView,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct JournalRequest {
	pub date: Option<String>,
	pub content: Option<String>,
	pub mood: Option<String>,
	pub tech_used: Option<Vec<String>>,
	pub achievements: Option<Vec<String>>,
	pub blockers: Option<Vec<String>>,
}

impl NotiqService {
	/// The most recent entries, newest date first.
	pub async fn list_journal(&self, user_id: Uuid) -> Result<JournalListResponse> {
		let entries = self.store.list_journal(user_id, journal::JOURNAL_PAGE_SIZE).await?;

		Ok(JournalListResponse {
			entries: entries.into_iter().map(JournalEntryView::from).collect(),
		})
	}

	/// Writes the entry for `(user, date)`, replacing any existing one.
	pub async fn upsert_journal(
		&self,
		user_id: Uuid,
		req: JournalRequest,
	) -> Result<JournalEntryResponse> {
		let date = journal::parse_entry_date(req.date.as_deref())?;
		let mood = match req.mood.as_deref().map(str::trim).filter(|mood| !mood.is_empty()) {
			Some(raw) => Some(Mood::parse(&raw.to_ascii_lowercase()).ok_or_else(|| {
				Error::InvalidRequest {
					message: format!(
						"Unknown mood {raw:?}; expected productive, learning, challenging, frustrated or excited."
					),
				}
			})?),
			None => None,
		};
		let entry = JournalUpsert {
			id: Uuid::new_v4(),
			user_id,
			date,
			content: req.content,
			mood: mood.map(|mood| mood.as_str().to_string()),
			tech_used: req.tech_used.unwrap_or_default(),
			achievements: req.achievements.unwrap_or_default(),
			blockers: req.blockers.unwrap_or_default(),
		};
		let entry = self.store.upsert_journal(&entry).await?;

		Ok(JournalEntryResponse { entry: entry.into() })
	}
}
