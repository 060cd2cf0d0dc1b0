use sea_orm_migration::prelude::*;

use super::m202605010002_create_assessment_questions::AssessmentQuestions;
use super::m202605010003_create_assessment_instances::AssessmentInstances;

#[derive(DeriveIden)]
pub enum InstanceQuestions {
    Table,
    Id,
    AssessmentInstanceId,
    AssessmentQuestionId,
    MaxPoints,
    Points,
    ScorePerc,
    CurrentValue,
    NumberAttempts,
    CreatedAt,
    UpdatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202605010004_create_instance_questions"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InstanceQuestions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InstanceQuestions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InstanceQuestions::AssessmentInstanceId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstanceQuestions::AssessmentQuestionId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InstanceQuestions::MaxPoints).double().not_null())
                    .col(
                        ColumnDef::new(InstanceQuestions::Points)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(InstanceQuestions::ScorePerc)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(InstanceQuestions::CurrentValue).double().not_null())
                    .col(
                        ColumnDef::new(InstanceQuestions::NumberAttempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(InstanceQuestions::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(InstanceQuestions::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(InstanceQuestions::Table, InstanceQuestions::AssessmentInstanceId)
                            .to(AssessmentInstances::Table, AssessmentInstances::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(InstanceQuestions::Table, InstanceQuestions::AssessmentQuestionId)
                            .to(AssessmentQuestions::Table, AssessmentQuestions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("uq_instance_questions_instance_question")
                            .col(InstanceQuestions::AssessmentInstanceId)
                            .col(InstanceQuestions::AssessmentQuestionId)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InstanceQuestions::Table).to_owned())
            .await
    }
}
