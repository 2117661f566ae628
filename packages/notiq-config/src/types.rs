use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
	pub security: Security,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Providers {
	pub chat: ChatProviderConfig,
	pub embedding: EmbeddingProviderConfig,
}

/// OpenAI-compatible chat completion endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	/// Omitted from the request when unset so the provider default applies.
	pub temperature: Option<f32>,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	/// Also sizes the `vector` columns created at bootstrap.
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub match_threshold: f32,
	pub match_count: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self { match_threshold: 0.7, match_count: 10 }
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	#[serde(default = "default_auth_mode")]
	pub auth_mode: String,
	#[serde(default)]
	pub auth_keys: Vec<SecurityAuthKey>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SecurityAuthKey {
	pub token_id: String,
	pub token: String,
	pub role: SecurityAuthRole,
	pub user_id: Option<Uuid>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SecurityAuthRole {
	User,
	Service,
}

fn default_auth_mode() -> String {
	"static_keys".to_string()
}
