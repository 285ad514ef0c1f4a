#![allow(dead_code)]

use migration::{Migrator, MigratorTrait};
use retainiq_hr::{EmployeeRepo, NewEmployee};
use sea_orm::Database;

/// Fresh in-memory store with the real schema applied.
pub async fn repo() -> EmployeeRepo {
    let conn = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&conn, None).await.unwrap();
    EmployeeRepo::new(conn)
}

pub fn jane() -> NewEmployee {
    NewEmployee::new("Jane Doe", "jane@x.com", "Engineering", "Developer")
}
