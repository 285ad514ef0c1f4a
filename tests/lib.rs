//! Postgres fixtures for the end-to-end suite. Every test gets its own
//! throwaway database derived from `TEST_DATABASE_URL`; without that variable
//! the fixtures return `None` and the tests skip themselves.

use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool, connect};
use retainiq_hr::EmployeeRepo;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, Statement};
use url::Url;
use uuid::Uuid;

pub struct PgTestDb {
    pub repo: EmployeeRepo,
    admin_url: String,
    db_name: String,
}

impl PgTestDb {
    pub async fn new() -> Option<Self> {
        let base = std::env::var("TEST_DATABASE_URL").ok()?;
        let (admin_url, db_name, test_url) = build_urls(&base)?;
        let admin = Database::connect(&admin_url).await.ok()?;
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("CREATE DATABASE \"{db_name}\";"),
            ))
            .await
            .ok()?;
        let pool = connect(&DatabaseSettings::new(test_url)).await.ok()?;
        Migrator::up(&pool, None).await.ok()?;
        Some(Self {
            repo: EmployeeRepo::new(pool),
            admin_url,
            db_name,
        })
    }

    pub fn pool(&self) -> &DbPool {
        self.repo.connection()
    }

    pub async fn cleanup(self) {
        let Self {
            repo,
            admin_url,
            db_name,
        } = self;
        drop(repo);
        if let Ok(admin) = Database::connect(&admin_url).await {
            let drop_sql = format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE);");
            let _ = admin
                .execute(Statement::from_string(DatabaseBackend::Postgres, drop_sql))
                .await;
        }
    }
}

fn build_urls(base: &str) -> Option<(String, String, String)> {
    let url = Url::parse(base).ok()?;
    let db_path = url.path().trim_start_matches('/').to_string();
    let base_name = if db_path.is_empty() {
        "retainiq_test".to_string()
    } else {
        db_path
    };
    let db_name = format!("{}_{}", base_name, Uuid::new_v4().simple());
    let mut admin_url = url.clone();
    admin_url.set_path("/postgres");
    let mut test_url = url;
    test_url.set_path(&format!("/{db_name}"));
    Some((admin_url.to_string(), db_name, test_url.to_string()))
}
