use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::error::AppError;

/// Connect and bring the schema up to date.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, AppError> {
    let mut options = ConnectOptions::new(database_url.to_string());
    options.sqlx_logging(false);

    let conn = Database::connect(options).await?;
    migrate(&conn, MigrationCommand::Up).await?;
    Ok(conn)
}
