
use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use crate::db::connect_in_memory;

/// Setup test database with migrations
pub(crate) async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::test]
async fn test_connection_ping() -> Result<()> {
    let db = setup_test_db().await?;
    db.ping().await?;
    Ok(())
}
