//! PIC registry.
//!
//! Owns the "at most one marker per PIC" invariant. Membership and delegation
//! flags are only ever written here, each change in a single transaction that
//! first touches the PIC row so reassignments of the same PIC serialise.

use std::collections::BTreeSet;

use chrono::Utc;
use db::models::user::Role;
use db::models::{pic, session, user};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};
use serde::Serialize;

use crate::authorization::{Action, Actor};
use crate::error::{is_unique_violation, ConflictReason, ServiceError, ServiceResult};

pub use db::models::pic::Model as Pic;

/// Membership written by [`PicService::assign_marker`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PicAssignment {
    pub pic_id: i64,
    pub member_ids: Vec<i64>,
    /// `None` when no marker was requested or the requested one was not
    /// eligible.
    pub marker_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PicDeletion {
    pub pic_id: i64,
    pub released_members: u64,
}

pub struct PicService;

impl PicService {
    pub async fn create_pic<C>(db: &C, actor_id: i64, name: &str) -> ServiceResult<Pic>
    where
        C: ConnectionTrait,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::invalid("pic name must not be empty"));
        }

        let actor = Actor::load(db, actor_id).await?;
        actor.authorize(Action::Administer)?;

        match pic::Model::create(db, name).await {
            Ok(created) => {
                tracing::info!(pic_id = created.id, actor_id, "pic created");
                Ok(created)
            }
            Err(err) if is_unique_violation(&err) => {
                Err(ServiceError::Conflict(ConflictReason::DuplicateName))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Moves `member_ids` into the PIC and hands the marker flag to
    /// `marker_id`.
    ///
    /// Every current member of the PIC loses the flag first. The marker gets
    /// it only if listed in `member_ids` and holding the `member` role;
    /// otherwise the PIC is left with no marker. An unknown user id aborts
    /// the whole assignment.
    pub async fn assign_marker(
        db: &DatabaseConnection,
        actor_id: i64,
        pic_id: i64,
        member_ids: &[i64],
        marker_id: Option<i64>,
    ) -> ServiceResult<PicAssignment> {
        if member_ids.is_empty() {
            return Err(ServiceError::invalid("member_ids must not be empty"));
        }
        let wanted: BTreeSet<i64> = member_ids.iter().copied().collect();

        let txn = db.begin().await?;
        let touched = touch_pic(&txn, pic_id).await?;
        let marker = match apply_assignment(&txn, actor_id, pic_id, touched, &wanted, marker_id).await
        {
            Ok(marker) => marker,
            Err(err) => {
                txn.rollback().await?;
                return Err(err);
            }
        };
        txn.commit().await?;

        tracing::info!(
            pic_id,
            actor_id,
            members = wanted.len(),
            marker_id = ?marker,
            "pic membership assigned"
        );
        Ok(PicAssignment {
            pic_id,
            member_ids: wanted.into_iter().collect(),
            marker_id: marker,
        })
    }

    /// Admin only. Releases every member (clearing their delegation) and
    /// detaches owned sessions before removing the PIC.
    pub async fn delete_pic(
        db: &DatabaseConnection,
        actor_id: i64,
        pic_id: i64,
    ) -> ServiceResult<PicDeletion> {
        let txn = db.begin().await?;
        let touched = touch_pic(&txn, pic_id).await?;
        let released = match release_and_delete(&txn, actor_id, pic_id, touched).await {
            Ok(released) => released,
            Err(err) => {
                txn.rollback().await?;
                return Err(err);
            }
        };
        txn.commit().await?;

        tracing::info!(pic_id, actor_id, released, "pic deleted");
        Ok(PicDeletion {
            pic_id,
            released_members: released,
        })
    }

    pub async fn list_pics<C>(db: &C) -> ServiceResult<Vec<Pic>>
    where
        C: ConnectionTrait,
    {
        Ok(pic::Model::all(db).await?)
    }

    pub async fn members<C>(db: &C, pic_id: i64) -> ServiceResult<Vec<user::Model>>
    where
        C: ConnectionTrait,
    {
        if pic::Entity::find_by_id(pic_id).one(db).await?.is_none() {
            return Err(ServiceError::not_found("pic", pic_id));
        }
        Ok(user::Model::members_of_pic(db, pic_id).await?)
    }
}

/// Bumps `updated_at` on the PIC row. Runs as the first statement of every
/// registry transaction so it takes the write lock before any read, which
/// also serialises writers on the same PIC. Returns whether the PIC exists.
async fn touch_pic<C>(db: &C, pic_id: i64) -> ServiceResult<bool>
where
    C: ConnectionTrait,
{
    let touched = pic::Entity::update_many()
        .col_expr(pic::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(pic::Column::Id.eq(pic_id))
        .exec(db)
        .await?;
    Ok(touched.rows_affected > 0)
}

async fn apply_assignment<C>(
    db: &C,
    actor_id: i64,
    pic_id: i64,
    pic_exists: bool,
    wanted: &BTreeSet<i64>,
    marker_id: Option<i64>,
) -> ServiceResult<Option<i64>>
where
    C: ConnectionTrait,
{
    let actor = Actor::load(db, actor_id).await?;
    if let Err(err) = actor.authorize(Action::Administer) {
        tracing::warn!(actor_id, pic_id, "marker assignment denied");
        return Err(err);
    }
    if !pic_exists {
        return Err(ServiceError::not_found("pic", pic_id));
    }

    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(wanted.iter().copied()))
        .all(db)
        .await?;
    if let Some(missing) = wanted
        .iter()
        .find(|id| !users.iter().any(|u| u.id == **id))
    {
        return Err(ServiceError::not_found("user", *missing));
    }

    let now = Utc::now();
    user::Entity::update_many()
        .col_expr(user::Column::CanMarkAttendance, Expr::value(false))
        .col_expr(user::Column::UpdatedAt, Expr::value(now))
        .filter(user::Column::PicId.eq(pic_id))
        .filter(user::Column::CanMarkAttendance.eq(true))
        .exec(db)
        .await?;

    user::Entity::update_many()
        .col_expr(user::Column::PicId, Expr::value(pic_id))
        .col_expr(user::Column::CanMarkAttendance, Expr::value(false))
        .col_expr(user::Column::UpdatedAt, Expr::value(now))
        .filter(user::Column::Id.is_in(wanted.iter().copied()))
        .exec(db)
        .await?;

    let marker = marker_id.and_then(|id| {
        users
            .iter()
            .find(|u| u.id == id && u.role == Role::Member)
            .map(|u| u.id)
    });
    if let Some(id) = marker {
        user::Entity::update_many()
            .col_expr(user::Column::CanMarkAttendance, Expr::value(true))
            .filter(user::Column::Id.eq(id))
            .exec(db)
            .await?;
    } else if let Some(requested) = marker_id {
        tracing::warn!(pic_id, marker_id = requested, "requested marker is not an eligible member");
    }

    Ok(marker)
}

async fn release_and_delete<C>(
    db: &C,
    actor_id: i64,
    pic_id: i64,
    pic_exists: bool,
) -> ServiceResult<u64>
where
    C: ConnectionTrait,
{
    let actor = Actor::load(db, actor_id).await?;
    if let Err(err) = actor.authorize(Action::DeletePic) {
        tracing::warn!(actor_id, pic_id, "pic deletion denied");
        return Err(err);
    }
    if !pic_exists {
        return Err(ServiceError::not_found("pic", pic_id));
    }

    let released = user::Entity::update_many()
        .col_expr(user::Column::PicId, Expr::value(Option::<i64>::None))
        .col_expr(user::Column::CanMarkAttendance, Expr::value(false))
        .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(user::Column::PicId.eq(pic_id))
        .exec(db)
        .await?;

    session::Entity::update_many()
        .col_expr(session::Column::PicId, Expr::value(Option::<i64>::None))
        .filter(session::Column::PicId.eq(pic_id))
        .exec(db)
        .await?;

    pic::Entity::delete_by_id(pic_id).exec(db).await?;
    Ok(released.rows_affected)
}
