use entity::employees;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr, extension::postgres::PgExpr},
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    error::{HrError, HrResult},
    model::{EmployeeFilter, EmployeePatch, NewEmployee, validate_risk_score},
};

/// Data access for the `employees` table. Every operation is a single
/// statement (or a read followed by one write); there is no cross-statement
/// transaction and concurrent edits resolve as last-writer-wins.
#[derive(Clone, Debug)]
pub struct EmployeeRepo {
    db: DatabaseConnection,
}

impl EmployeeRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn backend(&self) -> DatabaseBackend {
        self.db.get_database_backend()
    }

    #[instrument(name = "hr.employees.list_all", skip(self))]
    pub async fn list_all(&self) -> HrResult<Vec<employees::Model>> {
        self.list(&EmployeeFilter::default()).await
    }

    #[instrument(
        name = "hr.employees.list",
        skip_all,
        fields(has_q = tracing::field::Empty, department = tracing::field::Empty)
    )]
    pub async fn list(&self, filter: &EmployeeFilter) -> HrResult<Vec<employees::Model>> {
        let mut query = employees::Entity::find();
        let search = filter.search_term();
        tracing::Span::current().record("has_q", search.is_some());
        if let Some(q) = search {
            query = query.filter(contains_ci(self.backend(), employees::Column::Name, &q));
        }
        if let Some(department) = filter.department() {
            tracing::Span::current().record("department", department);
            query = query.filter(employees::Column::Department.eq(department));
        }
        let records = query
            .order_by_asc(employees::Column::Name)
            .order_by_asc(employees::Column::EmployeeId)
            .all(&self.db)
            .await?;
        debug!(count = records.len(), "employees listed");
        Ok(records)
    }

    #[instrument(name = "hr.employees.get", skip(self))]
    pub async fn get(&self, id: Uuid) -> HrResult<employees::Model> {
        employees::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(HrError::NotFound(id))
    }

    #[instrument(name = "hr.employees.find_by_email", skip_all)]
    pub async fn find_by_email(&self, email: &str) -> HrResult<Option<employees::Model>> {
        let found = employees::Entity::find()
            .filter(employees::Column::Email.eq(email.trim()))
            .one(&self.db)
            .await?;
        Ok(found)
    }

    #[instrument(
        name = "hr.employees.create",
        skip_all,
        fields(employee_id = tracing::field::Empty)
    )]
    pub async fn create(&self, input: NewEmployee) -> HrResult<employees::Model> {
        let id = Uuid::new_v4();
        tracing::Span::current().record("employee_id", tracing::field::display(id));
        let active = input.into_active_model(id)?;
        employees::Entity::insert(active)
            .exec_without_returning(&self.db)
            .await?;
        employees::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                HrError::Store(DbErr::RecordNotFound(format!(
                    "inserted employee {id} could not be reloaded"
                )))
            })
    }

    /// Applies `patch` to an existing record. The store is left untouched when
    /// the identifier is unknown or the patch fails validation.
    #[instrument(name = "hr.employees.update", skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: EmployeePatch) -> HrResult<employees::Model> {
        let existing = self.get(id).await?;
        if patch.is_empty() {
            return Ok(existing);
        }
        let mut active: employees::ActiveModel = existing.into();
        patch.apply(&mut active)?;
        active.update(&self.db).await.map_err(|err| match err {
            DbErr::RecordNotUpdated => HrError::NotFound(id),
            other => HrError::Store(other),
        })
    }

    #[instrument(name = "hr.employees.delete", skip(self))]
    pub async fn delete(&self, id: Uuid) -> HrResult<()> {
        let res = employees::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(HrError::NotFound(id));
        }
        Ok(())
    }

    /// Writes only the `riskscore` column.
    #[instrument(name = "hr.employees.set_risk_score", skip(self))]
    pub async fn set_risk_score(&self, id: Uuid, score: f64) -> HrResult<employees::Model> {
        let score = validate_risk_score(score)?;
        let res = employees::Entity::update_many()
            .col_expr(employees::Column::RiskScore, Expr::value(score))
            .filter(employees::Column::EmployeeId.eq(id))
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Err(HrError::NotFound(id));
        }
        self.get(id).await
    }

    /// Names of HR staff, offered as reporting managers by the edit form.
    #[instrument(name = "hr.employees.managers", skip(self))]
    pub async fn managers(&self) -> HrResult<Vec<String>> {
        let names = employees::Entity::find()
            .select_only()
            .column(employees::Column::Name)
            .filter(contains_ci(self.backend(), employees::Column::Position, "hr"))
            .order_by_asc(employees::Column::Name)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;
        Ok(names)
    }
}

/// Case-insensitive substring match; `needle` must already be lower-case.
/// Postgres folds case with `ILIKE`. Elsewhere the column goes through
/// `LOWER()`, which SQLite applies to ASCII letters only.
fn contains_ci(backend: DatabaseBackend, column: employees::Column, needle: &str) -> SimpleExpr {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let pattern = LikeExpr::new(format!("%{escaped}%")).escape('\\');
    match backend {
        DatabaseBackend::Postgres => Expr::col(column).ilike(pattern),
        _ => Expr::expr(Func::lower(Expr::col(column))).like(pattern),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::QueryTrait;

    fn search_sql(backend: DatabaseBackend) -> String {
        employees::Entity::find()
            .filter(contains_ci(backend, employees::Column::Name, "50%_off"))
            .build(backend)
            .to_string()
            .to_uppercase()
    }

    #[test]
    fn sqlite_search_lowers_the_column() {
        let sql = search_sql(DatabaseBackend::Sqlite);
        assert!(sql.contains("LOWER("));
        assert!(sql.contains(" LIKE "));
        assert!(sql.contains("ESCAPE"));
    }

    #[test]
    fn postgres_search_uses_ilike() {
        let sql = search_sql(DatabaseBackend::Postgres);
        assert!(sql.contains(" ILIKE "));
        assert!(sql.contains("ESCAPE"));
        assert!(!sql.contains("LOWER("));
    }
}
