use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202601100001_create_pics::Migration),
            Box::new(migrations::m202601100002_create_users::Migration),
            Box::new(migrations::m202601100003_create_sessions::Migration),
            Box::new(migrations::m202601100004_create_attendance_records::Migration),
        ]
    }
}
