pub mod config;
pub mod error;
pub mod logger;
pub mod types;

pub use config::*;
pub use error::*;
pub use logger::*;
pub use types::*;
