use crate::seed::{SeedContext, Seeder, run_seeder};
use crate::seeds::{
    assessment::AssessmentSeeder, assessment_instance::AssessmentInstanceSeeder,
    submission::SubmissionSeeder,
};
use migration::{Migrator, MigratorTrait};
use services::locks::InstanceQuestionLocks;
use util::config::AppConfig;
use util::logging::init_logging;

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };
    let _log_guard = init_logging(&config);

    let db = match db::connect(&config).await {
        Ok(db) => db,
        Err(err) => {
            eprintln!("Failed to connect to database: {}", err);
            std::process::exit(1);
        }
    };
    if let Err(err) = Migrator::up(&db, None).await {
        eprintln!("Failed to run migrations: {}", err);
        std::process::exit(1);
    }

    let ctx = SeedContext {
        db,
        locks: InstanceQuestionLocks::new(),
        storage_root: config.storage_root_path(),
    };

    for (seeder, name) in [
        (Box::new(AssessmentSeeder) as Box<dyn Seeder + Send + Sync>, "Assessment"),
        (Box::new(AssessmentInstanceSeeder), "AssessmentInstance"),
        (Box::new(SubmissionSeeder), "Submission"),
    ] {
        run_seeder(&*seeder, name, &ctx).await;
    }

    tracing::info!(
        project = %config.project_name,
        storage_root = %ctx.storage_root.display(),
        "seeding finished"
    );
}
