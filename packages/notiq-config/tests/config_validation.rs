use std::{
	env, fs,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::{Table, Value};

use notiq_config::{Error, SecurityAuthRole};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

static NEXT_FILE_ID: AtomicU64 = AtomicU64::new(0);

fn sample_table() -> Table {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.")
}

fn section<'a>(root: &'a mut Table, path: &[&str]) -> &'a mut Table {
	let mut current = root;

	for key in path {
		current = current
			.get_mut(*key)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Sample config must include [{key}]."));
	}

	current
}

fn render(table: &Table) -> String {
	toml::to_string(table).expect("Failed to render config.")
}

fn expect_validation_error(raw: &str, needle: &str) {
	match notiq_config::from_toml_str(raw) {
		Err(Error::Validation { message }) =>
			assert!(message.contains(needle), "unexpected message: {message}"),
		Err(other) => panic!("Expected a validation error, got {other:?}."),
		Ok(_) => panic!("Expected config validation to fail on {needle}."),
	}
}

#[test]
fn sample_config_loads_with_search_defaults() {
	let cfg = notiq_config::from_toml_str(SAMPLE_CONFIG_TOML).expect("Sample config must load.");

	assert_eq!(cfg.search.match_threshold, 0.7);
	assert_eq!(cfg.search.match_count, 10);
	assert_eq!(cfg.providers.chat.temperature, None);
	assert_eq!(cfg.security.auth_keys.len(), 2);
	assert_eq!(cfg.security.auth_keys[1].role, SecurityAuthRole::Service);
}

#[test]
fn api_base_trailing_slash_is_trimmed() {
	let cfg = notiq_config::from_toml_str(SAMPLE_CONFIG_TOML).expect("Sample config must load.");

	assert_eq!(cfg.providers.chat.api_base, "https://openrouter.ai/api/v1");
}

#[test]
fn load_reads_from_disk() {
	let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
	let path = env::temp_dir().join(format!(
		"notiq_config_{}_{}_{nanos}.toml",
		std::process::id(),
		NEXT_FILE_ID.fetch_add(1, Ordering::SeqCst)
	));

	fs::write(&path, SAMPLE_CONFIG_TOML).expect("Failed to write config file.");

	let cfg = notiq_config::load(&path).expect("Config must load from disk.");

	fs::remove_file(&path).expect("Failed to remove config file.");

	assert_eq!(cfg.service.http_bind, "127.0.0.1:8080");
}

#[test]
fn load_reports_missing_file() {
	let path = env::temp_dir().join("notiq_config_does_not_exist.toml");
	let err = notiq_config::load(&path).expect_err("Missing file must fail.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}

#[test]
fn rejects_match_threshold_out_of_range() {
	let mut table = sample_table();
	let mut search = Table::new();

	search.insert("match_threshold".to_string(), Value::Float(1.5));
	table.insert("search".to_string(), Value::Table(search));

	expect_validation_error(&render(&table), "search.match_threshold");
}

#[test]
fn rejects_zero_match_count() {
	let mut table = sample_table();
	let mut search = Table::new();

	search.insert("match_count".to_string(), Value::Integer(0));
	table.insert("search".to_string(), Value::Table(search));

	expect_validation_error(&render(&table), "search.match_count");
}

#[test]
fn rejects_zero_embedding_dimensions() {
	let mut table = sample_table();

	section(&mut table, &["providers", "embedding"])
		.insert("dimensions".to_string(), Value::Integer(0));

	expect_validation_error(&render(&table), "providers.embedding.dimensions");
}

#[test]
fn rejects_blank_chat_api_key() {
	let mut table = sample_table();

	section(&mut table, &["providers", "chat"])
		.insert("api_key".to_string(), Value::String("  ".to_string()));

	expect_validation_error(&render(&table), "providers.chat.api_key");
}

#[test]
fn rejects_unknown_auth_mode() {
	let mut table = sample_table();

	section(&mut table, &["security"])
		.insert("auth_mode".to_string(), Value::String("oauth".to_string()));

	expect_validation_error(&render(&table), "security.auth_mode");
}

#[test]
fn off_mode_needs_no_keys() {
	let mut table = sample_table();
	let security = section(&mut table, &["security"]);

	security.insert("auth_mode".to_string(), Value::String("OFF".to_string()));
	security.remove("auth_keys");

	let cfg = notiq_config::from_toml_str(&render(&table)).expect("Off mode must load.");

	assert_eq!(cfg.security.auth_mode, notiq_config::AUTH_MODE_OFF);
}

#[test]
fn static_keys_mode_requires_keys() {
	let mut table = sample_table();

	section(&mut table, &["security"]).remove("auth_keys");

	expect_validation_error(&render(&table), "security.auth_keys must be non-empty");
}

#[test]
fn user_key_requires_user_id() {
	let raw = SAMPLE_CONFIG_TOML.replace("user_id  = \"7d3c4f1e-2a4b-4c55-9a0e-3f1f2b6c8d90\"", "");

	expect_validation_error(&raw, "needs a user_id");
}

#[test]
fn service_key_rejects_user_id() {
	let raw = format!(
		"{SAMPLE_CONFIG_TOML}\n[[security.auth_keys]]\ntoken_id = \"bot\"\ntoken = \"bot-token\"\nrole = \"service\"\nuser_id = \"7d3c4f1e-2a4b-4c55-9a0e-3f1f2b6c8d91\"\n"
	);

	expect_validation_error(&raw, "must not set user_id");
}

#[test]
fn rejects_duplicate_tokens() {
	let raw = format!(
		"{SAMPLE_CONFIG_TOML}\n[[security.auth_keys]]\ntoken_id = \"bob\"\ntoken = \"alice-token\"\nrole = \"service\"\n"
	);

	expect_validation_error(&raw, "duplicates another key");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut table = sample_table();
	let mut headers = Table::new();

	headers.insert("X-Retries".to_string(), Value::Integer(3));
	section(&mut table, &["providers", "chat"])
		.insert("default_headers".to_string(), Value::Table(headers));

	expect_validation_error(&render(&table), "providers.chat.default_headers");
}
