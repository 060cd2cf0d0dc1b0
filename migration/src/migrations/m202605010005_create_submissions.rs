use sea_orm_migration::prelude::*;

use super::m202605010004_create_instance_questions::InstanceQuestions;

#[derive(DeriveIden)]
enum Submissions {
    Table,
    Id,
    InstanceQuestionId,
    SubmittedAnswer,
    Score,
    Correct,
    Points,
    CreatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202605010005_create_submissions"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Submissions::InstanceQuestionId).integer().not_null())
                    .col(ColumnDef::new(Submissions::SubmittedAnswer).text().not_null())
                    .col(ColumnDef::new(Submissions::Score).double().null())
                    .col(ColumnDef::new(Submissions::Correct).boolean().null())
                    .col(ColumnDef::new(Submissions::Points).double().null())
                    .col(
                        ColumnDef::new(Submissions::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::InstanceQuestionId)
                            .to(InstanceQuestions::Table, InstanceQuestions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submissions_instance_question_created")
                    .table(Submissions::Table)
                    .col(Submissions::InstanceQuestionId)
                    .col(Submissions::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await
    }
}
