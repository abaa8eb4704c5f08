// Database Module
// Connection pooling, error types and per-aggregate repositories

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DbError;
pub use pool::DbPool;
pub use repositories::Repositories;
