pub mod ingest;
pub mod models;
pub mod test_utils;

use common::AppConfig;
use sea_orm::{Database, DatabaseConnection};
use std::path::Path;

/// Opens the configured SQLite database. `DATABASE_PATH` is either a
/// `sqlite:` DSN (used as-is) or a file path, in which case missing
/// parent directories are created first.
pub async fn connect() -> DatabaseConnection {
    let path_or_url = AppConfig::global().database_path.clone();
    let url = if path_or_url.starts_with("sqlite:") {
        path_or_url
    } else {
        if let Some(parent) = Path::new(&path_or_url).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        format!("sqlite://{path_or_url}")
    };

    Database::connect(&url)
        .await
        .expect("Failed to connect to database")
}

#[cfg(test)]
mod tests {
    use super::connect;
    use common::AppConfig;

    #[tokio::test]
    async fn connect_accepts_sqlite_dsn() {
        AppConfig::init_test_defaults();
        AppConfig::set_database_path("sqlite::memory:");

        let db = connect().await;
        assert!(db.ping().await.is_ok());
    }
}
