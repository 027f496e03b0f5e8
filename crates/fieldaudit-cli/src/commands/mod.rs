//! Command implementations.

pub mod audit;
pub mod cache;
pub mod config;
pub mod normalize;

pub use self::audit::execute_audit;
pub use self::cache::execute_cache;
pub use self::config::execute_config;
pub use self::normalize::execute_normalize;
