pub mod models;
pub mod test_utils;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::path::Path;
use util::config;

/// Builds the connection URL from `DATABASE_PATH`.
///
/// A value that is already a DSN is used as-is; anything else is treated as a
/// SQLite file path and opened in read-write-create mode.
pub fn database_url(path_or_url: &str) -> String {
    if path_or_url.starts_with("sqlite:")
        || path_or_url.starts_with("postgres://")
        || path_or_url.starts_with("mysql://")
    {
        path_or_url.to_owned()
    } else {
        // SQLite won't create intermediate dirs.
        if let Some(parent) = Path::new(path_or_url).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        format!("sqlite://{path_or_url}?mode=rwc")
    }
}

pub async fn try_connect() -> Result<DatabaseConnection, DbErr> {
    let url = database_url(&config::database_path());
    tracing::debug!(%url, "connecting to database");

    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false);
    Database::connect(opts).await
}

pub async fn connect() -> DatabaseConnection {
    try_connect().await.expect("Failed to connect to database")
}
