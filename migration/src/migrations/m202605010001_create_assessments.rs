use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub enum Assessments {
    Table,
    Id,
    Title,
    AssessmentType,
    MaxPoints,
    AllowRealTimeGrading,
    CreatedAt,
    UpdatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202605010001_create_assessments"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Assessments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assessments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assessments::Title).string().not_null())
                    .col(
                        ColumnDef::new(Assessments::AssessmentType)
                            .enumeration(
                                Alias::new("assessment_type_enum"),
                                vec![Alias::new("homework"), Alias::new("exam")],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assessments::MaxPoints).double().not_null())
                    .col(
                        ColumnDef::new(Assessments::AllowRealTimeGrading)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Assessments::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Assessments::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Assessments::Table).to_owned())
            .await
    }
}
