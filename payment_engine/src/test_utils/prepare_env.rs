use log::*;

use crate::SqliteDatabase;

/// Loads `.env.test`, starts logging and returns a freshly migrated database at `url`.
pub async fn prepare_test_env(url: &str) -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    db.run_migrations().await.expect("Error running DB migrations");
    info!("🚀️ Test database ready at {url}");
    db
}

/// A database url pointing at a new, random file in the system temp directory.
pub fn random_db_path() -> String {
    let path = std::env::temp_dir().join(format!("mpg_test_store_{}.db", rand::random::<u64>()));
    format!("sqlite://{}", path.display())
}
