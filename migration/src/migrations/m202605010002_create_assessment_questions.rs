use sea_orm_migration::prelude::*;

use super::m202605010001_create_assessments::Assessments;

#[derive(DeriveIden)]
pub enum AssessmentQuestions {
    Table,
    Id,
    AssessmentId,
    Qid,
    Title,
    Number,
    MaxPoints,
    InitPoints,
    CreatedAt,
    UpdatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202605010002_create_assessment_questions"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AssessmentQuestions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssessmentQuestions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AssessmentQuestions::AssessmentId).integer().not_null())
                    .col(ColumnDef::new(AssessmentQuestions::Qid).string().not_null())
                    .col(ColumnDef::new(AssessmentQuestions::Title).string().not_null())
                    .col(ColumnDef::new(AssessmentQuestions::Number).integer().not_null())
                    .col(ColumnDef::new(AssessmentQuestions::MaxPoints).double().not_null())
                    .col(ColumnDef::new(AssessmentQuestions::InitPoints).double().null())
                    .col(
                        ColumnDef::new(AssessmentQuestions::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(AssessmentQuestions::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AssessmentQuestions::Table, AssessmentQuestions::AssessmentId)
                            .to(Assessments::Table, Assessments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("uq_assessment_questions_assessment_qid")
                            .col(AssessmentQuestions::AssessmentId)
                            .col(AssessmentQuestions::Qid)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssessmentQuestions::Table).to_owned())
            .await
    }
}
