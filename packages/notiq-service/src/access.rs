use uuid::Uuid;

use crate::{Error, Result};

/// The authenticated caller of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Principal {
	/// A user session. Every row it touches is owned by this id.
	User(Uuid),
	/// A trusted backend caller that names the user it acts for.
	Service,
}
impl Principal {
	/// The session's own user id. Service callers are rejected.
	pub fn user_id(self) -> Result<Uuid> {
		match self {
			Self::User(user_id) => Ok(user_id),
			Self::Service => Err(Error::Unauthorized {
				message: "This endpoint requires a user session.".to_string(),
			}),
		}
	}

	/// Resolves the owner a request acts for, given the `userId` it names.
	pub fn acting_for(self, requested: Option<Uuid>) -> Result<Uuid> {
		match (self, requested) {
			(Self::User(user_id), None) => Ok(user_id),
			(Self::User(user_id), Some(requested)) if requested == user_id => Ok(user_id),
			(Self::User(_), Some(_)) => Err(Error::Forbidden {
				message: "Cannot act on behalf of another user.".to_string(),
			}),
			(Self::Service, Some(requested)) => Ok(requested),
			(Self::Service, None) => {
				Err(Error::InvalidRequest { message: "userId is required.".to_string() })
			},
		}
	}
}

/// Parses an optional id from a request body. Blank counts as absent.
pub fn parse_optional_id(field: &str, raw: Option<&str>) -> Result<Option<Uuid>> {
	let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
		return Ok(None);
	};

	Uuid::parse_str(raw)
		.map(Some)
		.map_err(|_| Error::InvalidRequest { message: format!("{field} must be a UUID.") })
}
