pub mod config;
pub mod error;
pub mod utils;

pub use error::ApiError;
pub use utils::Role;
