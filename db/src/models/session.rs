use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::QueryOrder;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A scheduled meeting or event that attendance is recorded against.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    /// Owning PIC, if the session belongs to one group.
    pub pic_id: Option<i64>,
    /// One-way: nothing transitions a locked session back to open.
    pub is_locked: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
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
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Records,
}

impl Related<super::pic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pic.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C>(
        db: &C,
        name: &str,
        date: NaiveDate,
        pic_id: Option<i64>,
        created_by: i64,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let session = ActiveModel {
            name: Set(name.to_owned()),
            date: Set(date),
            pic_id: Set(pic_id),
            is_locked: Set(false),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        session.insert(db).await
    }

    /// All sessions, newest date first.
    pub async fn all_newest_first<C>(db: &C) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    /// Sets `is_locked`. Returns the number of rows that actually changed, so
    /// an already-locked session yields `0`.
    pub async fn lock<C>(db: &C, id: i64) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Entity::update_many()
            .col_expr(Column::IsLocked, Expr::value(true))
            .filter(Column::Id.eq(id))
            .filter(Column::IsLocked.eq(false))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    /// No-op write on the row while it is still open.
    ///
    /// Returns `false` when the session is locked (or gone). Inside a
    /// transaction this holds the row's write lock until commit, so a
    /// concurrent [`Model::lock`] lands strictly before or after.
    pub async fn hold_open<C>(db: &C, id: i64) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Entity::update_many()
            .col_expr(Column::IsLocked, Expr::col(Column::IsLocked).into())
            .filter(Column::Id.eq(id))
            .filter(Column::IsLocked.eq(false))
            .exec(db)
            .await?;
        Ok(res.rows_affected == 1)
    }
}
