use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents a club account in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User's unique email address.
    #[sea_orm(unique)]
    pub email: String,
    /// Display name.
    pub name: String,
    /// Organisational role.
    pub role: Role,
    /// School class, e.g. `10-B`.
    pub class_name: Option<String>,
    /// PIC group the user belongs to, if any.
    pub pic_id: Option<i64>,
    /// Delegated marking capability, granted by the PIC registry only.
    pub can_mark_attendance: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Organisational role of a user.
/// Backed by a `user_role` enum in the database.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Deserialize,
    Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "member")]
    Member,

    #[sea_orm(string_value = "admin")]
    Admin,

    #[sea_orm(string_value = "ketua")]
    Ketua,

    #[sea_orm(string_value = "pembina")]
    Pembina,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pic::Entity",
        from = "Column::PicId",
        to = "super::pic::Column::Id",
        on_delete = "SetNull"
    )]
    Pic,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
}

impl Related<super::pic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pic.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts a new account with no PIC and no delegation.
    pub async fn create<C>(
        db: &C,
        email: &str,
        name: &str,
        role: Role,
        class_name: Option<&str>,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        let user = ActiveModel {
            email: Set(email.trim().to_lowercase()),
            name: Set(name.to_owned()),
            role: Set(role),
            class_name: Set(class_name.map(|s| s.to_owned())),
            pic_id: Set(None),
            can_mark_attendance: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        user.insert(db).await
    }

    pub async fn find_by_email<C>(db: &C, email: &str) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(db)
            .await
    }

    /// Members of a PIC, ordered by name.
    pub async fn members_of_pic<C>(db: &C, pic_id: i64) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::PicId.eq(pic_id))
            .order_by_asc(Column::Name)
            .all(db)
            .await
    }

    /// Ids of the members of a PIC currently holding the marker flag.
    pub async fn marker_ids_of_pic<C>(db: &C, pic_id: i64) -> Result<Vec<i64>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::PicId.eq(pic_id))
            .filter(Column::CanMarkAttendance.eq(true))
            .into_tuple::<i64>()
            .all(db)
            .await
    }
}
