use std::collections::HashMap;

use axum::{
	extract::FromRequestParts,
	http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use color_eyre::eyre;
use uuid::Uuid;

use crate::{routes::ApiError, state::AppState};
use notiq_config::{AUTH_MODE_OFF, AUTH_MODE_STATIC_KEYS, Security, SecurityAuthRole};
use notiq_service::Principal;

/// Identity header honored when `security.auth_mode=off`.
pub const USER_ID_HEADER: &str = "x-notiq-user-id";

#[derive(Clone, Debug)]
pub enum Authenticator {
	Off,
	StaticKeys { keys: HashMap<String, Principal> },
}
impl Authenticator {
	pub fn from_config(security: &Security) -> color_eyre::Result<Self> {
		match security.auth_mode.trim() {
			AUTH_MODE_OFF => Ok(Self::Off),
			AUTH_MODE_STATIC_KEYS => {
				let keys = security
					.auth_keys
					.iter()
					.map(|key| {
						let principal = match (key.role, key.user_id) {
							(SecurityAuthRole::User, Some(user_id)) => Principal::User(user_id),
							(SecurityAuthRole::Service, None) => Principal::Service,
							_ => {
								return Err(eyre::eyre!(
									"security.auth_keys entry {} has an invalid role binding.",
									key.token_id
								));
							},
						};

						Ok((key.token.clone(), principal))
					})
					.collect::<color_eyre::Result<HashMap<_, _>>>()?;

				Ok(Self::StaticKeys { keys })
			},
			other => Err(eyre::eyre!("Unsupported security.auth_mode {other:?}.")),
		}
	}

	pub fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, ApiError> {
		match self {
			Self::Off => {
				let raw = header_str(headers, USER_ID_HEADER).ok_or_else(|| {
					ApiError::unauthorized(format!("Missing {USER_ID_HEADER} header."))
				})?;

				Uuid::parse_str(raw.trim()).map(Principal::User).map_err(|_| {
					ApiError::unauthorized(format!("{USER_ID_HEADER} must be a UUID."))
				})
			},
			Self::StaticKeys { keys } => {
				let token = header_str(headers, AUTHORIZATION.as_str())
					.and_then(|value| value.strip_prefix("Bearer "))
					.map(str::trim)
					.filter(|token| !token.is_empty())
					.ok_or_else(|| ApiError::unauthorized("Missing bearer token."))?;

				keys.get(token).copied().ok_or_else(|| ApiError::unauthorized("Invalid bearer token."))
			},
		}
	}
}

/// Any authenticated caller, user session or service role.
pub struct Caller(pub Principal);
impl FromRequestParts<AppState> for Caller {
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
		state.auth.authenticate(&parts.headers).map(Self)
	}
}

/// A user session. Service-role callers are rejected with 401.
pub struct UserSession(pub Uuid);
impl FromRequestParts<AppState> for UserSession {
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
		let principal = state.auth.authenticate(&parts.headers)?;

		Ok(Self(principal.user_id()?))
	}
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
	headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
	use axum::http::HeaderValue;

	use super::*;
	use notiq_config::SecurityAuthKey;

	fn security(auth_mode: &str, auth_keys: Vec<SecurityAuthKey>) -> Security {
		Security { bind_localhost_only: true, auth_mode: auth_mode.to_string(), auth_keys }
	}

	fn key(token: &str, role: SecurityAuthRole, user_id: Option<Uuid>) -> SecurityAuthKey {
		SecurityAuthKey { token_id: token.to_string(), token: token.to_string(), role, user_id }
	}

	fn bearer(token: &str) -> HeaderMap {
		let mut headers = HeaderMap::new();

		headers.insert(
			AUTHORIZATION,
			HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header"),
		);

		headers
	}

	#[test]
	fn off_mode_reads_the_user_header() {
		let auth = Authenticator::from_config(&security("off", Vec::new())).expect("off mode");
		let user_id = Uuid::new_v4();
		let mut headers = HeaderMap::new();

		headers.insert(
			USER_ID_HEADER,
			HeaderValue::from_str(&user_id.to_string()).expect("valid header"),
		);

		assert_eq!(auth.authenticate(&headers).expect("authenticated"), Principal::User(user_id));
		assert_eq!(
			auth.authenticate(&HeaderMap::new()).expect_err("missing header").status.as_u16(),
			401
		);
	}

	#[test]
	fn static_keys_resolve_roles() {
		let user_id = Uuid::new_v4();
		let auth = Authenticator::from_config(&security(
			"static_keys",
			vec![
				key("alice-token", SecurityAuthRole::User, Some(user_id)),
				key("indexer-token", SecurityAuthRole::Service, None),
			],
		))
		.expect("static keys");

		assert_eq!(
			auth.authenticate(&bearer("alice-token")).expect("user"),
			Principal::User(user_id)
		);
		assert_eq!(auth.authenticate(&bearer("indexer-token")).expect("service"), Principal::Service);
		assert_eq!(auth.authenticate(&bearer("nope")).expect_err("unknown").status.as_u16(), 401);
	}

	#[test]
	fn unknown_mode_is_rejected() {
		let err = Authenticator::from_config(&security("oauth", Vec::new()))
			.expect_err("Expected an unsupported mode error.");

		assert!(err.to_string().contains("security.auth_mode"));
	}
}
