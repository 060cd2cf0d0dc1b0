use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use async_trait::async_trait;
use colored::*;
use futures::FutureExt;
use sea_orm::DatabaseConnection;
use services::ServiceError;
use services::locks::InstanceQuestionLocks;

const STATUS_COLUMN: usize = 80;

pub struct SeedContext {
    pub db: DatabaseConnection,
    pub locks: InstanceQuestionLocks,
    pub storage_root: PathBuf,
}

#[async_trait]
pub trait Seeder {
    async fn seed(&self, ctx: &SeedContext) -> Result<(), ServiceError>;
}

pub async fn run_seeder<S: Seeder + ?Sized>(seeder: &S, name: &str, ctx: &SeedContext) {
    let base_msg = format!("Seeding {}", name.bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(base_msg.len()));
    print!("{}{} ", base_msg, dots);
    let _ = io::stdout().flush();

    let start = Instant::now();
    match std::panic::AssertUnwindSafe(seeder.seed(ctx)).catch_unwind().await {
        Ok(Ok(())) => {
            let time_str = format!("({:.2?})", start.elapsed()).dimmed();
            println!("{} {}", "done".green(), time_str);
        }
        Ok(Err(err)) => {
            println!("{}", "failed".red());
            eprintln!("  {}", err.to_string().red());
            std::process::exit(1);
        }
        Err(_) => {
            println!("{}", "failed".red());
            std::process::exit(1);
        }
    }
}
