pub mod config;
pub mod error;
pub mod types;

pub use config::{load_rules, EspionageRules};
pub use error::{IntelError, Result};
