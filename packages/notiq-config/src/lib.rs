mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	ChatProviderConfig, Config, EmbeddingProviderConfig, Postgres, Providers, Search, Security,
	SecurityAuthKey, SecurityAuthRole, Service, Storage,
};

use std::{collections::HashSet, fs, path::Path};

pub const AUTH_MODE_OFF: &str = "off";
pub const AUTH_MODE_STATIC_KEYS: &str = "static_keys";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		ParseFailure::Toml(source) => Error::ParseConfig { path: path.to_path_buf(), source },
		ParseFailure::Invalid(err) => err,
	})
}

pub fn from_toml_str(raw: &str) -> Result<Config> {
	parse(raw).map_err(|err| match err {
		ParseFailure::Toml(source) => Error::Validation { message: source.to_string() },
		ParseFailure::Invalid(err) => err,
	})
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.log_level", &cfg.service.log_level),
		("storage.postgres.dsn", &cfg.storage.postgres.dsn),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	validate_providers(&cfg.providers)?;

	if !cfg.search.match_threshold.is_finite() {
		return Err(Error::Validation {
			message: "search.match_threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.search.match_threshold) {
		return Err(Error::Validation {
			message: "search.match_threshold must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.search.match_count == 0 {
		return Err(Error::Validation {
			message: "search.match_count must be greater than zero.".to_string(),
		});
	}

	validate_security(&cfg.security)
}

fn validate_providers(providers: &Providers) -> Result<()> {
	let chat = &providers.chat;
	let embedding = &providers.embedding;

	for (label, value) in [
		("providers.chat.api_base", &chat.api_base),
		("providers.chat.api_key", &chat.api_key),
		("providers.chat.model", &chat.model),
		("providers.embedding.api_base", &embedding.api_base),
		("providers.embedding.api_key", &embedding.api_key),
		("providers.embedding.model", &embedding.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if chat.timeout_ms == 0 || embedding.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "Provider timeout_ms must be greater than zero.".to_string(),
		});
	}
	if embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}

	if let Some(temperature) = chat.temperature
		&& !(temperature.is_finite() && (0.0..=2.0).contains(&temperature))
	{
		return Err(Error::Validation {
			message: "providers.chat.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}

	for (label, headers) in [
		("providers.chat.default_headers", &chat.default_headers),
		("providers.embedding.default_headers", &embedding.default_headers),
	] {
		if headers.values().any(|value| !value.is_string()) {
			return Err(Error::Validation {
				message: format!("{label} values must be strings."),
			});
		}
	}

	Ok(())
}

fn validate_security(security: &Security) -> Result<()> {
	match security.auth_mode.as_str() {
		AUTH_MODE_OFF => return Ok(()),
		AUTH_MODE_STATIC_KEYS => {},
		other => {
			return Err(Error::Validation {
				message: format!(
					"security.auth_mode must be one of off or static_keys, got {other}."
				),
			});
		},
	}

	if security.auth_keys.is_empty() {
		return Err(Error::Validation {
			message: "security.auth_keys must be non-empty when security.auth_mode=static_keys."
				.to_string(),
		});
	}

	let mut token_ids = HashSet::new();
	let mut tokens = HashSet::new();

	for key in &security.auth_keys {
		if key.token_id.trim().is_empty() || key.token.trim().is_empty() {
			return Err(Error::Validation {
				message: "security.auth_keys entries need a non-empty token_id and token."
					.to_string(),
			});
		}
		if !token_ids.insert(key.token_id.as_str()) {
			return Err(Error::Validation {
				message: format!("security.auth_keys token_id {} is duplicated.", key.token_id),
			});
		}
		if !tokens.insert(key.token.as_str()) {
			return Err(Error::Validation {
				message: format!(
					"security.auth_keys token for {} duplicates another key.",
					key.token_id
				),
			});
		}

		match (key.role, key.user_id) {
			(SecurityAuthRole::User, None) => {
				return Err(Error::Validation {
					message: format!(
						"security.auth_keys entry {} has role user and needs a user_id.",
						key.token_id
					),
				});
			},
			(SecurityAuthRole::Service, Some(_)) => {
				return Err(Error::Validation {
					message: format!(
						"security.auth_keys entry {} has role service and must not set user_id.",
						key.token_id
					),
				});
			},
			_ => {},
		}
	}

	Ok(())
}

enum ParseFailure {
	Toml(toml::de::Error),
	Invalid(Error),
}

fn parse(raw: &str) -> std::result::Result<Config, ParseFailure> {
	let mut cfg: Config = toml::from_str(raw).map_err(ParseFailure::Toml)?;

	normalize(&mut cfg);
	validate(&cfg).map_err(ParseFailure::Invalid)?;

	Ok(cfg)
}

fn normalize(cfg: &mut Config) {
	cfg.security.auth_mode = cfg.security.auth_mode.trim().to_ascii_lowercase();

	for api_base in
		[&mut cfg.providers.chat.api_base, &mut cfg.providers.embedding.api_base]
	{
		let trimmed = api_base.trim().trim_end_matches('/').to_string();

		*api_base = trimmed;
	}
}
