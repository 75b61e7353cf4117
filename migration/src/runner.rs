use colored::*;
use futures::FutureExt;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 80;

pub async fn run_all_migrations(url: &str) {
    let db = sea_orm::Database::connect(url)
        .await
        .expect("DB connection failed");

    println!("Running migrations...");
    let schema_manager = SchemaManager::new(&db);

    for migration in <migration::Migrator as MigratorTrait>::migrations() {
        run_step(&schema_manager, migration, "Applying", true).await;
    }
}

pub async fn rollback_all_migrations(url: &str) {
    let db = sea_orm::Database::connect(url)
        .await
        .expect("DB connection failed");

    println!("Rolling back migrations...");
    let schema_manager = SchemaManager::new(&db);

    for migration in <migration::Migrator as MigratorTrait>::migrations()
        .into_iter()
        .rev()
    {
        run_step(&schema_manager, migration, "Reverting", false).await;
    }
}

async fn run_step(
    schema_manager: &SchemaManager<'_>,
    migration: Box<dyn MigrationTrait>,
    verb: &str,
    up: bool,
) {
    let name_str = format!("{} {}", verb, migration.name().bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(name_str.len()));
    print!("{}{} ", name_str, dots);
    let _ = io::stdout().flush();

    let start = Instant::now();
    let step = async {
        if up {
            migration.up(schema_manager).await
        } else {
            migration.down(schema_manager).await
        }
    };
    let result = std::panic::AssertUnwindSafe(step).catch_unwind().await;

    match result {
        Ok(Ok(())) => {
            let time_str = format!("({:.2?})", start.elapsed()).dimmed();
            println!("{} {}", "done".green(), time_str);
        }
        Ok(Err(err)) => {
            println!("{}", "failed".red());
            eprintln!("{err}");
            std::process::exit(1);
        }
        Err(_) => {
            println!("{}", "failed".red());
            std::process::exit(1);
        }
    }
}
