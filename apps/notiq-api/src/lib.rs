pub mod auth;
pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf};

use clap::{
	Parser,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};
use color_eyre::eyre;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

#[derive(Debug, Parser)]
#[command(
	version = VERSION,
	rename_all = "kebab",
	styles = styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Red.on_default() | Effects::BOLD)
		.usage(AnsiColor::Red.on_default() | Effects::BOLD)
		.literal(AnsiColor::Blue.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = notiq_config::load(&args.config)?;

	init_tracing(&config)?;

	let http_addr = http_addr(&config)?;
	let state = AppState::new(config).await?;
	let app = routes::router(state);
	let listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, version = VERSION, "HTTP server listening.");

	axum::serve(listener, app).await?;

	Ok(())
}

/// Resolves the HTTP bind address and enforces the loopback rules.
pub fn http_addr(config: &notiq_config::Config) -> color_eyre::Result<SocketAddr> {
	let http_addr: SocketAddr = config.service.http_bind.parse()?;

	if http_addr.ip().is_loopback() {
		return Ok(http_addr);
	}
	if config.security.bind_localhost_only {
		return Err(eyre::eyre!(
			"service.http_bind must be a loopback address when bind_localhost_only is true."
		));
	}
	if config.security.auth_mode.trim() == notiq_config::AUTH_MODE_OFF {
		return Err(eyre::eyre!(
			"security.auth_mode=off requires service.http_bind to be a loopback address."
		));
	}

	Ok(http_addr)
}

fn init_tracing(config: &notiq_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(http_bind: &str, bind_localhost_only: bool, auth_mode: &str) -> notiq_config::Config {
		let raw = format!(
			r#"
[service]
http_bind = "{http_bind}"
log_level = "info"

[storage.postgres]
dsn = "postgres://unused@127.0.0.1/unused"
pool_max_conns = 1

[providers.chat]
provider_id = "stub"
api_base = "http://127.0.0.1:9"
api_key = "stub"
path = "/chat/completions"
model = "stub-chat"
timeout_ms = 1000

[providers.embedding]
provider_id = "stub"
api_base = "http://127.0.0.1:9"
api_key = "stub"
path = "/embeddings"
model = "stub-embed"
dimensions = 3
timeout_ms = 1000

[security]
bind_localhost_only = {bind_localhost_only}
auth_mode = "{auth_mode}"

[[security.auth_keys]]
token_id = "indexer"
token = "indexer-token"
role = "service"
"#
		);

		notiq_config::from_toml_str(&raw).expect("Test config must be valid.")
	}

	#[test]
	fn loopback_bind_is_always_accepted() {
		let addr = http_addr(&config("127.0.0.1:8080", true, "off")).expect("loopback bind");

		assert!(addr.ip().is_loopback());
	}

	#[test]
	fn public_bind_requires_localhost_only_to_be_disabled() {
		let err = http_addr(&config("0.0.0.0:8080", true, "static_keys"))
			.expect_err("Expected a loopback error.");

		assert!(err.to_string().contains("bind_localhost_only"));
	}

	#[test]
	fn auth_off_rejects_public_bind() {
		let err =
			http_addr(&config("0.0.0.0:8080", false, "off")).expect_err("Expected an auth error.");

		assert!(err.to_string().contains("security.auth_mode=off"));
	}

	#[test]
	fn static_keys_allow_public_bind() {
		let addr =
			http_addr(&config("0.0.0.0:8080", false, "static_keys")).expect("public bind allowed");

		assert!(!addr.ip().is_loopback());
	}
}
