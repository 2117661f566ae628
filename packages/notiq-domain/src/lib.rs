pub mod content;
pub mod journal;
pub mod prompt;
pub mod response;
pub mod search_filter;

mod error;

pub use error::{Error, Result};
