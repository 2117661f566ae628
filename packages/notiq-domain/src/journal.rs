use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::{Error, Result};

/// Most recent entries returned by a journal listing.
pub const JOURNAL_PAGE_SIZE: i64 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
	Productive,
	Learning,
	Challenging,
	Frustrated,
	Excited,
}
impl Mood {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Productive => "productive",
			Self::Learning => "learning",
			Self::Challenging => "challenging",
			Self::Frustrated => "frustrated",
			Self::Excited => "excited",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"productive" => Some(Self::Productive),
			"learning" => Some(Self::Learning),
			"challenging" => Some(Self::Challenging),
			"frustrated" => Some(Self::Frustrated),
			"excited" => Some(Self::Excited),
			_ => None,
		}
	}
}

pub fn parse_entry_date(raw: Option<&str>) -> Result<Date> {
	let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
		return Err(Error::MissingField { message: "Date is required".to_string() });
	};

	Date::parse(raw, format_description!("[year]-[month]-[day]")).map_err(|_| Error::InvalidInput {
		message: "date must be formatted as YYYY-MM-DD.".to_string(),
	})
}

#[cfg(test)]
mod tests {
	use time::macros::date;

	use super::*;

	#[test]
	fn parses_iso_dates() {
		assert_eq!(parse_entry_date(Some("2025-01-31")), Ok(date!(2025 - 01 - 31)));
	}

	#[test]
	fn rejects_missing_and_malformed_dates() {
		assert!(matches!(parse_entry_date(None), Err(Error::MissingField { .. })));
		assert!(matches!(parse_entry_date(Some(" ")), Err(Error::MissingField { .. })));
		assert!(matches!(parse_entry_date(Some("31/01/2025")), Err(Error::InvalidInput { .. })));
	}

	#[test]
	fn mood_round_trips_through_its_label() {
		for mood in
			[Mood::Productive, Mood::Learning, Mood::Challenging, Mood::Frustrated, Mood::Excited]
		{
			assert_eq!(Mood::parse(mood.as_str()), Some(mood));
		}
	}
}
