//! In-memory filters applied after the database similarity search.

use time::{
	Date, OffsetDateTime, Time, format_description::well_known::Rfc3339, macros::format_description,
};

use crate::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchFilters {
	pub tags: Vec<String>,
	pub date_from: Option<OffsetDateTime>,
	pub date_to: Option<OffsetDateTime>,
}
impl SearchFilters {
	/// Builds filters from raw request values. Bounds accept RFC 3339 or `YYYY-MM-DD`.
	pub fn from_raw(
		tags: Option<Vec<String>>,
		date_from: Option<&str>,
		date_to: Option<&str>,
	) -> Result<Self> {
		Ok(Self {
			tags: tags.unwrap_or_default(),
			date_from: date_from.map(|raw| parse_date_bound("dateFrom", raw)).transpose()?,
			date_to: date_to.map(|raw| parse_date_bound("dateTo", raw)).transpose()?,
		})
	}

	pub fn is_empty(&self) -> bool {
		self.tags.is_empty() && self.date_from.is_none() && self.date_to.is_none()
	}

	/// A row passes when it shares at least one tag with the filter and `created_at` lies inside
	/// the inclusive bounds.
	pub fn matches(&self, tags: &[String], created_at: OffsetDateTime) -> bool {
		if !self.tags.is_empty() && !self.tags.iter().any(|wanted| tags.contains(wanted)) {
			return false;
		}
		if self.date_from.is_some_and(|from| created_at < from) {
			return false;
		}
		if self.date_to.is_some_and(|to| created_at > to) {
			return false;
		}

		true
	}

	/// Keeps matching rows in their original order.
	pub fn apply<T, F>(&self, rows: Vec<T>, key: F) -> Vec<T>
	where
		F: Fn(&T) -> (&[String], OffsetDateTime),
	{
		if self.is_empty() {
			return rows;
		}

		rows.into_iter()
			.filter(|row| {
				let (tags, created_at) = key(row);

				self.matches(tags, created_at)
			})
			.collect()
	}
}

pub fn parse_date_bound(field: &str, raw: &str) -> Result<OffsetDateTime> {
	let trimmed = raw.trim();

	if let Ok(value) = OffsetDateTime::parse(trimmed, &Rfc3339) {
		return Ok(value);
	}

	Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
		.map(|date| date.with_time(Time::MIDNIGHT).assume_utc())
		.map_err(|_| Error::InvalidInput {
			message: format!("{field} must be an RFC 3339 timestamp or a YYYY-MM-DD date."),
		})
}
