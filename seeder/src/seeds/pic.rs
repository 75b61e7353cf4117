use super::ADMIN_EMAIL;
use crate::seed::Seeder;
use db::models::{pic, user};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use services::{PicService, ServiceError, ServiceResult};

const PIC_NAMES: [&str; 4] = ["Kajian", "Mentoring", "Humas", "Dokumentasi"];
const MEMBERS_PER_PIC: usize = 5;

pub struct PicSeeder;

#[async_trait::async_trait]
impl Seeder for PicSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> ServiceResult<()> {
        let admin = user::Model::find_by_email(db, ADMIN_EMAIL)
            .await?
            .ok_or_else(|| ServiceError::invalid("admin account must be seeded first"))?;

        let mut unassigned: Vec<i64> = user::Entity::find()
            .filter(user::Column::Role.eq(user::Role::Member))
            .filter(user::Column::PicId.is_null())
            .order_by_asc(user::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();

        for name in PIC_NAMES {
            if pic::Model::find_by_name(db, name).await?.is_some() {
                continue;
            }
            let group = PicService::create_pic(db, admin.id, name).await?;

            let take = MEMBERS_PER_PIC.min(unassigned.len());
            let members: Vec<i64> = unassigned.drain(..take).collect();
            if let Some(&marker) = members.first() {
                PicService::assign_marker(db, admin.id, group.id, &members, Some(marker)).await?;
            }
        }

        Ok(())
    }
}
