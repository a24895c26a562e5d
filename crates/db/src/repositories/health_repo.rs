//! Database reachability probe behind the [`HealthCheck`] trait.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::store::{HealthCheck, StoreResult};

pub struct PgHealthCheck {
    pool: PgPool,
}

impl PgHealthCheck {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PgHealthCheck {
    async fn ping(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
