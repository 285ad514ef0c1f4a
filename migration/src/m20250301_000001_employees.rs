use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employees {
    Table,
    Employeeid,
    Name,
    Email,
    Phone,
    Department,
    Position,
    Employmenttype,
    Startdate,
    Dob,
    Gender,
    Manager,
    Salary,
    Skills,
    Education,
    Certifications,
    Performancerating,
    Goals,
    Location,
    Riskscore,
}

const EMPLOYMENT_TYPES: [&str; 4] = ["Full-time", "Part-time", "Contract", "Intern"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Employeeid)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Employees::Email).string_len(320).not_null())
                    .col(ColumnDef::new(Employees::Phone).string_len(64))
                    .col(
                        ColumnDef::new(Employees::Department)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employees::Position)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employees::Employmenttype)
                            .string_len(16)
                            .check(Expr::col(Employees::Employmenttype).is_in(EMPLOYMENT_TYPES)),
                    )
                    .col(ColumnDef::new(Employees::Startdate).date())
                    .col(ColumnDef::new(Employees::Dob).date())
                    .col(ColumnDef::new(Employees::Gender).string_len(64))
                    .col(ColumnDef::new(Employees::Manager).string_len(256))
                    .col(ColumnDef::new(Employees::Salary).double())
                    .col(ColumnDef::new(Employees::Skills).text())
                    .col(ColumnDef::new(Employees::Education).text())
                    .col(ColumnDef::new(Employees::Certifications).text())
                    .col(
                        ColumnDef::new(Employees::Performancerating)
                            .integer()
                            .check(Expr::col(Employees::Performancerating).between(1, 5)),
                    )
                    .col(ColumnDef::new(Employees::Goals).text())
                    .col(ColumnDef::new(Employees::Location).string_len(256))
                    .col(
                        ColumnDef::new(Employees::Riskscore)
                            .double()
                            .check(Expr::col(Employees::Riskscore).between(0.0, 100.0)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employees_email")
                    .table(Employees::Table)
                    .col(Employees::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employees_department")
                    .table(Employees::Table)
                    .col(Employees::Department)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Employees::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}
