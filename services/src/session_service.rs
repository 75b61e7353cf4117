//! Session lifecycle: `Open` → `Locked`.
//!
//! Locking is terminal for attendance writes. There is no unlock.

use chrono::NaiveDate;
use db::models::{pic, session};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, TransactionTrait};
use serde::Serialize;

use crate::authorization::{Action, Actor};
use crate::error::{is_foreign_key_violation, ServiceError, ServiceResult};

pub use db::models::session::Model as Session;

#[derive(Debug, Clone)]
pub struct NewSession {
    pub name: String,
    pub date: NaiveDate,
    pub pic_id: Option<i64>,
}

/// Display view of a session's lock state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub id: i64,
    pub name: String,
    pub locked: bool,
}

impl From<&Session> for SessionStatus {
    fn from(s: &Session) -> Self {
        SessionStatus {
            id: s.id,
            name: s.name.clone(),
            locked: s.is_locked,
        }
    }
}

pub struct SessionService;

impl SessionService {
    pub async fn create(
        db: &DatabaseConnection,
        actor_id: i64,
        input: NewSession,
    ) -> ServiceResult<Session> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ServiceError::invalid("session name must not be empty"));
        }

        let actor = Actor::load(db, actor_id).await?;
        if let Err(err) = actor.authorize(Action::Administer) {
            tracing::warn!(actor_id, "session creation denied");
            return Err(err);
        }

        if let Some(pic_id) = input.pic_id {
            if pic::Entity::find_by_id(pic_id).one(db).await?.is_none() {
                return Err(ServiceError::not_found("pic", pic_id));
            }
        }

        // Single autocommit insert; a PIC deleted in between trips the foreign key.
        let created = match session::Model::create(db, name, input.date, input.pic_id, actor.id).await
        {
            Ok(created) => created,
            Err(err) if is_foreign_key_violation(&err) => {
                return Err(ServiceError::not_found("pic", input.pic_id.unwrap_or_default()));
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(session_id = created.id, actor_id, "session created");
        Ok(created)
    }

    /// Locks a session. Locking an already-locked session succeeds without
    /// change.
    pub async fn lock(
        db: &DatabaseConnection,
        actor_id: i64,
        session_id: i64,
    ) -> ServiceResult<SessionStatus> {
        let txn = db.begin().await?;
        // Write first so the transaction holds the write lock before it reads.
        let changed = session::Model::lock(&txn, session_id).await?;

        let current = match Self::checked_lock_view(&txn, actor_id, session_id).await {
            Ok(current) => current,
            Err(err) => {
                txn.rollback().await?;
                return Err(err);
            }
        };
        txn.commit().await?;

        if changed > 0 {
            tracing::info!(session_id, actor_id, "session locked");
        }
        Ok(SessionStatus::from(&current))
    }

    /// Authorizes the lock and reads the session back inside its transaction.
    async fn checked_lock_view<C>(db: &C, actor_id: i64, session_id: i64) -> ServiceResult<Session>
    where
        C: ConnectionTrait,
    {
        let actor = Actor::load(db, actor_id).await?;
        if let Err(err) = actor.authorize(Action::Administer) {
            tracing::warn!(actor_id, session_id, "session lock denied");
            return Err(err);
        }
        Self::find(db, session_id).await
    }

    pub async fn is_locked<C>(db: &C, session_id: i64) -> ServiceResult<bool>
    where
        C: ConnectionTrait,
    {
        Ok(Self::find(db, session_id).await?.is_locked)
    }

    pub async fn status<C>(db: &C, session_id: i64) -> ServiceResult<SessionStatus>
    where
        C: ConnectionTrait,
    {
        Self::find(db, session_id)
            .await
            .map(|s| SessionStatus::from(&s))
    }

    pub async fn list<C>(db: &C) -> ServiceResult<Vec<Session>>
    where
        C: ConnectionTrait,
    {
        Ok(session::Model::all_newest_first(db).await?)
    }

    pub async fn find<C>(db: &C, session_id: i64) -> ServiceResult<Session>
    where
        C: ConnectionTrait,
    {
        session::Entity::find_by_id(session_id)
            .one(db)
            .await?
            .ok_or(ServiceError::not_found("session", session_id))
    }
}
