use super::ADMIN_EMAIL;
use crate::seed::Seeder;
use chrono::{Days, Utc};
use db::models::{pic, session, user};
use sea_orm::DatabaseConnection;
use services::session_service::{NewSession, SessionService};
use services::{ServiceError, ServiceResult};

pub struct SessionSeeder;

#[async_trait::async_trait]
impl Seeder for SessionSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> ServiceResult<()> {
        if !session::Model::all_newest_first(db).await?.is_empty() {
            return Ok(());
        }

        let admin = user::Model::find_by_email(db, ADMIN_EMAIL)
            .await?
            .ok_or_else(|| ServiceError::invalid("admin account must be seeded first"))?;
        let today = Utc::now().date_naive();

        SessionService::create(
            db,
            admin.id,
            NewSession {
                name: "Rapat Pengurus".into(),
                date: today,
                pic_id: None,
            },
        )
        .await?;

        for (offset, group) in pic::Model::all(db).await?.into_iter().enumerate() {
            let date = today
                .checked_add_days(Days::new(offset as u64 + 1))
                .unwrap_or(today);
            SessionService::create(
                db,
                admin.id,
                NewSession {
                    name: format!("Pertemuan {}", group.name),
                    date,
                    pic_id: Some(group.id),
                },
            )
            .await?;
        }

        Ok(())
    }
}
