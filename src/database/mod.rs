use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub type DatabasePool = Arc<PgPool>;

pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    // With the native-tls feature, TLS is negotiated when the DSN carries
    // sslmode=require; local development DSNs connect in the clear.
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await?;

    if !database_url.contains("sslmode=require")
        && !database_url.contains("localhost")
        && !database_url.contains("127.0.0.1")
    {
        tracing::warn!("connecting to a remote database without sslmode=require");
    }

    Ok(pool)
}

pub async fn new_pool(database_url: &str) -> anyhow::Result<DatabasePool> {
    let pool = create_pool(database_url).await?;
    Ok(Arc::new(pool))
}
