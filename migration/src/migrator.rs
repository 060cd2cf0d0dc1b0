use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202605010001_create_assessments::Migration),
            Box::new(migrations::m202605010002_create_assessment_questions::Migration),
            Box::new(migrations::m202605010003_create_assessment_instances::Migration),
            Box::new(migrations::m202605010004_create_instance_questions::Migration),
            Box::new(migrations::m202605010005_create_submissions::Migration),
        ]
    }
}
