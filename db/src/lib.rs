pub mod grade;
pub mod models;
pub mod test_utils;

use sea_orm::{Database, DatabaseConnection, DbErr};
use std::path::Path;
use util::config::AppConfig;

pub async fn connect(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    let path_or_url = config.database_path.as_str();
    // A DSN is used as-is; anything else is a SQLite file path.
    let url = if path_or_url.starts_with("sqlite:") {
        path_or_url.to_string()
    } else {
        // SQLite won't create intermediate dirs.
        let _ = util::paths::ensure_parent_dir(Path::new(path_or_url));
        format!("sqlite://{path_or_url}?mode=rwc")
    };

    tracing::debug!(url = %url, "connecting to database");
    Database::connect(&url).await
}
