// Health check service implementation

use sea_orm::DatabaseConnection;

pub struct HealthChecker<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> HealthChecker<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// True when the database answers a ping
    pub async fn check(&self) -> bool {
        match self.db.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Health check failed: {}", e);
                false
            }
        }
    }
}
