use sqlx::PgPool;
use crate::model::error::DatabaseResult;

#[derive(Debug, Clone)]
pub struct DbConnection {
    pool: PgPool, // cloning is cheap, pool is just a wrapper around Arc<>
}

impl DbConnection {
    /// Nothing is dialed until the first query runs.
    pub fn connect(connection_str: &str) -> DatabaseResult<Self> {
        let pool = PgPool::connect_lazy(connection_str)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[tracing::instrument(skip(self))]
    pub async fn migrate(&self, dir: &std::path::Path) -> DatabaseResult<()> {
        let migrator = sqlx::migrate::Migrator::new(dir).await?;
        tracing::debug!("applying migrations...");
        migrator.run(&self.pool).await?;
        Ok(())
    }
}
