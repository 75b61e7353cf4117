use crate::seed::{Seeder, run_seeder};
use crate::seeds::{pic::PicSeeder, session::SessionSeeder, user::UserSeeder};
use colored::*;
use migration::{Migrator, MigratorTrait};

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let db = match db::try_connect().await {
        Ok(db) => db,
        Err(err) => {
            eprintln!("{} {err}", "Database connection failed:".red());
            std::process::exit(1);
        }
    };

    if let Err(err) = Migrator::up(&db, None).await {
        eprintln!("{} {err}", "Migrations failed:".red());
        std::process::exit(1);
    }

    for (seeder, name) in [
        (Box::new(UserSeeder) as Box<dyn Seeder + Send + Sync>, "User"),
        (Box::new(PicSeeder), "Pic"),
        (Box::new(SessionSeeder), "Session"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
