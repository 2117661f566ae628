pub mod ai_metadata;
pub mod db;
pub mod error_logs;
pub mod journal;
pub mod models;
pub mod notes;
pub mod schema;
pub mod snippets;
pub mod store;
pub mod vector;

mod error;

pub use error::Error;
pub use store::{BoxFuture, Store};

pub type Result<T, E = Error> = std::result::Result<T, E>;
