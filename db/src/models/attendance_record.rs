use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One attendance mark. Unique per `(session_id, user_id, attendance_type)`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    pub user_id: i64,
    pub status: AttendanceStatus,
    pub attendance_type: AttendanceType,
    /// Server-assigned at write time, UTC+7.
    pub timestamp: DateTimeWithTimeZone,
    /// The actor who recorded the mark.
    pub recorded_by: i64,
}

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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,
    #[sea_orm(string_value = "absent")]
    Absent,
    #[sea_orm(string_value = "excused")]
    Excused,
    #[sea_orm(string_value = "late")]
    Late,
}

/// Regular member attendance and leadership ("core") attendance are tracked
/// as independent classes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Deserialize,
    Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttendanceType {
    #[default]
    #[sea_orm(string_value = "regular")]
    Regular,
    #[sea_orm(string_value = "core")]
    Core,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::session::Entity",
        from = "Column::SessionId",
        to = "super::session::Column::Id"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn find_mark<C>(
        db: &C,
        session_id: i64,
        user_id: i64,
        attendance_type: AttendanceType,
    ) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::AttendanceType.eq(attendance_type))
            .one(db)
            .await
    }

    /// Every mark for a user, in insertion order.
    pub async fn for_user<C>(db: &C, user_id: i64) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Marks for a session, optionally restricted to one attendance class.
    pub async fn for_session<C>(
        db: &C,
        session_id: i64,
        attendance_type: Option<AttendanceType>,
    ) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut query = Entity::find().filter(Column::SessionId.eq(session_id));
        if let Some(kind) = attendance_type {
            query = query.filter(Column::AttendanceType.eq(kind));
        }
        query.order_by_asc(Column::Id).all(db).await
    }
}
