use migration::Migrator;
use std::{env, fs, path::Path};
use util::config::AppConfig;

mod runner;

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let db_path = config.database_path.clone();
    let url = format!("sqlite://{}?mode=rwc", db_path);
    let args: Vec<String> = env::args().collect();

    let outcome = match args.get(1).map(|s| s.as_str()) {
        Some("clean") => {
            clean(&config);
            Ok(())
        }
        Some("fresh") => {
            clean(&config);
            create_db_dir(&db_path);
            runner::run_all_migrations(&url).await
        }
        _ => {
            create_db_dir(&db_path);
            runner::run_all_migrations(&url).await
        }
    };

    if let Err(err) = outcome {
        eprintln!("Migration failed: {}", err);
        std::process::exit(1);
    }
}

fn clean(config: &AppConfig) {
    let db_path = Path::new(&config.database_path);
    if db_path.exists() {
        match fs::remove_file(db_path) {
            Ok(()) => println!("Deleted DB: {}", db_path.display()),
            Err(err) => eprintln!("Failed to delete DB {}: {}", db_path.display(), err),
        }
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }

    // Assessment configs live under the storage root
    let storage_path = config.storage_root_path();
    if storage_path.exists() {
        match fs::remove_dir_all(&storage_path) {
            Ok(()) => println!("Deleted assessment storage: {}", storage_path.display()),
            Err(err) => eprintln!("Failed to delete {}: {}", storage_path.display(), err),
        }
    } else {
        println!("Assessment storage does not exist: {}", storage_path.display());
    }
}

fn create_db_dir(path: &str) {
    if let Some(parent) = Path::new(path).parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            eprintln!("Failed to create DB directory: {}", err);
        }
    }
}
