use std::sync::Arc;

use crate::auth::Authenticator;
use notiq_config::Config;
use notiq_service::NotiqService;
use notiq_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<NotiqService>,
	pub auth: Arc<Authenticator>,
}
impl AppState {
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(config.providers.embedding.dimensions).await?;

		tracing::info!("Database schema is ready.");

		Self::with_service(NotiqService::new(config, db))
	}

	/// Wraps an already-built service. The authenticator follows `service.cfg.security`.
	pub fn with_service(service: NotiqService) -> color_eyre::Result<Self> {
		let auth = Authenticator::from_config(&service.cfg.security)?;

		Ok(Self { service: Arc::new(service), auth: Arc::new(auth) })
	}
}
