use super::ADMIN_EMAIL;
use crate::seed::Seeder;
use db::models::user::{Model, Role};
use fake::{Fake, faker::name::en::Name};
use sea_orm::DatabaseConnection;
use services::ServiceResult;

const MEMBER_COUNT: usize = 24;
const CLASSES: [&str; 6] = ["10-A", "10-B", "11-A", "11-B", "12-A", "12-B"];

pub struct UserSeeder;

#[async_trait::async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> ServiceResult<()> {
        // Fixed leadership accounts
        let leadership = [
            (ADMIN_EMAIL, "Admin Rohis", Role::Admin),
            ("ketua@rohis.test", "Ketua Rohis", Role::Ketua),
            ("pembina@rohis.test", "Pembina Rohis", Role::Pembina),
        ];
        for (email, name, role) in leadership {
            if Model::find_by_email(db, email).await?.is_none() {
                Model::create(db, email, name, role, None).await?;
            }
        }

        // Members with random names and classes
        for n in 1..=MEMBER_COUNT {
            let email = format!("member{n:02}@rohis.test");
            if Model::find_by_email(db, &email).await?.is_some() {
                continue;
            }
            let name: String = Name().fake();
            let class = CLASSES[fastrand::usize(..CLASSES.len())];
            Model::create(db, &email, &name, Role::Member, Some(class)).await?;
        }

        Ok(())
    }
}
