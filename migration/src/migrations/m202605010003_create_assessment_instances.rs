use sea_orm_migration::prelude::*;

use super::m202605010001_create_assessments::Assessments;

#[derive(DeriveIden)]
pub enum AssessmentInstances {
    Table,
    Id,
    AssessmentId,
    UserId,
    Number,
    MaxPoints,
    Points,
    ScorePerc,
    CreditedPoints,
    CreditedScorePerc,
    CreatedAt,
    UpdatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202605010003_create_assessment_instances"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AssessmentInstances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssessmentInstances::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AssessmentInstances::AssessmentId).integer().not_null())
                    .col(ColumnDef::new(AssessmentInstances::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(AssessmentInstances::Number)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(AssessmentInstances::MaxPoints).double().not_null())
                    .col(
                        ColumnDef::new(AssessmentInstances::Points)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(AssessmentInstances::ScorePerc)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(AssessmentInstances::CreditedPoints)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(AssessmentInstances::CreditedScorePerc)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(AssessmentInstances::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(AssessmentInstances::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AssessmentInstances::Table, AssessmentInstances::AssessmentId)
                            .to(Assessments::Table, Assessments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("uq_assessment_instances_assessment_user_number")
                            .col(AssessmentInstances::AssessmentId)
                            .col(AssessmentInstances::UserId)
                            .col(AssessmentInstances::Number)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssessmentInstances::Table).to_owned())
            .await
    }
}
