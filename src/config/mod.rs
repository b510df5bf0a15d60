//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or FailoverConfig built in code
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FailoverConfig (validated, immutable)
//!     → FailoverPool::new
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the server set is fixed for the pool's lifetime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    FailoverConfig, ObservabilityConfig, ServerConfig, SessionPoolConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
