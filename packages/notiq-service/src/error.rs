pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{message}")]
	InvalidRequest { message: String },
	#[error("{message}")]
	Unauthorized { message: String },
	#[error("{message}")]
	Forbidden { message: String },
	#[error("{message}")]
	NotFound { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<notiq_domain::Error> for Error {
	fn from(err: notiq_domain::Error) -> Self {
		match err {
			notiq_domain::Error::MissingField { message }
			| notiq_domain::Error::InvalidInput { message } => Self::InvalidRequest { message },
		}
	}
}

impl From<notiq_providers::Error> for Error {
	fn from(err: notiq_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<notiq_storage::Error> for Error {
	fn from(err: notiq_storage::Error) -> Self {
		match err {
			notiq_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			notiq_storage::Error::InvalidArgument(message) => Self::Storage { message },
			notiq_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}
