//! Attendance ledger.
//!
//! Every write runs in one transaction that first claims the session row with
//! a guarded no-op update (`is_locked = false`). A concurrent lock therefore
//! commits strictly before the mark (and the mark is refused) or strictly
//! after it. Uniqueness of `(session, user, type)` is enforced by the store;
//! a losing concurrent insert surfaces as `Conflict(AlreadyMarked)`.

use std::collections::HashSet;

use db::models::attendance_record::{self, AttendanceStatus, AttendanceType};
use db::models::{session, user};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::authorization::{Action, Actor};
use crate::clock::Clock;
use crate::error::{is_unique_violation, ConflictReason, DenyReason, ServiceError, ServiceResult};
use crate::session_service::{Session, SessionService};

pub use db::models::attendance_record::Model as AttendanceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkAttendance {
    pub session_id: i64,
    pub user_id: i64,
    pub status: AttendanceStatus,
    pub attendance_type: AttendanceType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BatchEntry {
    pub user_id: i64,
    pub status: AttendanceStatus,
}

/// Result of a batch: users marked now and users skipped because they already
/// had a mark of this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub recorded: Vec<i64>,
    pub skipped: Vec<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    pub present: usize,
    pub absent: usize,
    pub excused: usize,
    pub late: usize,
    pub total: usize,
}

impl AttendanceSummary {
    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            match r.status {
                AttendanceStatus::Present => acc.present += 1,
                AttendanceStatus::Absent => acc.absent += 1,
                AttendanceStatus::Excused => acc.excused += 1,
                AttendanceStatus::Late => acc.late += 1,
            }
            acc.total += 1;
            acc
        })
    }
}

pub struct AttendanceService;

impl AttendanceService {
    /// Records one mark. Checks run in order: session exists, session open,
    /// actor authorized for the attendance type, target eligible, no
    /// existing mark.
    pub async fn record(
        db: &DatabaseConnection,
        clock: &dyn Clock,
        actor_id: i64,
        mark: MarkAttendance,
    ) -> ServiceResult<AttendanceRecord> {
        let txn = db.begin().await?;
        let session = claim_open_session(&txn, mark.session_id).await?;
        let actor = Actor::load(&txn, actor_id).await?;

        authorize_type(&actor, &session, mark.attendance_type)?;
        let target = find_user(&txn, mark.user_id).await?;
        if let Err(err) = authorize_target(&actor, &session, &target, mark.attendance_type) {
            tracing::warn!(
                actor_id,
                session_id = session.id,
                user_id = target.id,
                code = err.code(),
                "attendance mark denied"
            );
            return Err(err);
        }

        if attendance_record::Model::find_mark(&txn, session.id, target.id, mark.attendance_type)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(ConflictReason::AlreadyMarked));
        }

        let record = insert_mark(
            &txn,
            clock,
            actor.id,
            session.id,
            target.id,
            mark.status,
            mark.attendance_type,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(
            actor_id,
            session_id = record.session_id,
            user_id = record.user_id,
            attendance_type = %record.attendance_type,
            status = %record.status,
            "attendance recorded"
        );
        Ok(record)
    }

    /// Records a leadership mark for a core user.
    pub async fn record_core(
        db: &DatabaseConnection,
        clock: &dyn Clock,
        actor_id: i64,
        session_id: i64,
        user_id: i64,
        status: AttendanceStatus,
    ) -> ServiceResult<AttendanceRecord> {
        Self::record(
            db,
            clock,
            actor_id,
            MarkAttendance {
                session_id,
                user_id,
                status,
                attendance_type: AttendanceType::Core,
            },
        )
        .await
    }

    /// Marks many users in one session. Session and actor checks run once;
    /// every target is validated before anything is written. Users that are
    /// already marked, or listed twice, are skipped.
    pub async fn record_batch(
        db: &DatabaseConnection,
        clock: &dyn Clock,
        actor_id: i64,
        session_id: i64,
        attendance_type: AttendanceType,
        entries: &[BatchEntry],
    ) -> ServiceResult<BatchOutcome> {
        if entries.is_empty() {
            return Err(ServiceError::invalid("batch must contain at least one entry"));
        }

        let txn = db.begin().await?;
        let session = claim_open_session(&txn, session_id).await?;
        let actor = Actor::load(&txn, actor_id).await?;
        authorize_type(&actor, &session, attendance_type)?;

        let mut seen = HashSet::new();
        let mut pending = Vec::with_capacity(entries.len());
        let mut outcome = BatchOutcome::default();
        for entry in entries {
            if !seen.insert(entry.user_id) {
                outcome.skipped.push(entry.user_id);
                continue;
            }
            let target = find_user(&txn, entry.user_id).await?;
            if let Err(err) = authorize_target(&actor, &session, &target, attendance_type) {
                tracing::warn!(
                    actor_id,
                    session_id,
                    user_id = target.id,
                    code = err.code(),
                    "batch rejected"
                );
                return Err(err);
            }
            pending.push(*entry);
        }

        for entry in pending {
            let already = attendance_record::Model::find_mark(
                &txn,
                session_id,
                entry.user_id,
                attendance_type,
            )
            .await?
            .is_some();
            if already {
                outcome.skipped.push(entry.user_id);
                continue;
            }
            match insert_mark(
                &txn,
                clock,
                actor.id,
                session_id,
                entry.user_id,
                entry.status,
                attendance_type,
            )
            .await
            {
                Ok(_) => outcome.recorded.push(entry.user_id),
                Err(ServiceError::Conflict(ConflictReason::AlreadyMarked)) => {
                    outcome.skipped.push(entry.user_id)
                }
                Err(err) => return Err(err),
            }
        }
        txn.commit().await?;

        tracing::info!(
            actor_id,
            session_id,
            attendance_type = %attendance_type,
            recorded = outcome.recorded.len(),
            skipped = outcome.skipped.len(),
            "attendance batch recorded"
        );
        Ok(outcome)
    }

    /// A user's marks in insertion order. Visible to the user and to
    /// elevated roles.
    pub async fn list_for_user<C>(
        db: &C,
        actor_id: i64,
        user_id: i64,
    ) -> ServiceResult<Vec<AttendanceRecord>>
    where
        C: ConnectionTrait,
    {
        let actor = Actor::load(db, actor_id).await?;
        actor.authorize(Action::ViewUserAttendance { user_id })?;
        find_user(db, user_id).await?;
        Ok(attendance_record::Model::for_user(db, user_id).await?)
    }

    pub async fn list_for_session<C>(
        db: &C,
        actor_id: i64,
        session_id: i64,
        attendance_type: Option<AttendanceType>,
    ) -> ServiceResult<Vec<AttendanceRecord>>
    where
        C: ConnectionTrait,
    {
        let actor = Actor::load(db, actor_id).await?;
        let session = SessionService::find(db, session_id).await?;
        actor.authorize(Action::ViewSessionAttendance {
            session_pic_id: session.pic_id,
        })?;
        Ok(attendance_record::Model::for_session(db, session_id, attendance_type).await?)
    }

    pub fn summarize(records: &[AttendanceRecord]) -> AttendanceSummary {
        AttendanceSummary::from_records(records)
    }
}

/// Loads the session and takes the write lock on its row while it is open.
async fn claim_open_session<C>(db: &C, session_id: i64) -> ServiceResult<Session>
where
    C: ConnectionTrait,
{
    if session::Model::hold_open(db, session_id).await? {
        return SessionService::find(db, session_id).await;
    }
    // Either missing or locked; tell them apart.
    SessionService::find(db, session_id).await?;
    tracing::warn!(session_id, "write refused on locked session");
    Err(ServiceError::Denied(DenyReason::SessionLocked))
}

fn authorize_type(
    actor: &Actor,
    session: &Session,
    attendance_type: AttendanceType,
) -> ServiceResult<()> {
    let action = match attendance_type {
        AttendanceType::Regular => Action::MarkSession {
            session_pic_id: session.pic_id,
        },
        AttendanceType::Core => Action::MarkCore,
    };
    actor.authorize(action).inspect_err(|_| {
        tracing::warn!(
            actor_id = actor.id,
            session_id = session.id,
            attendance_type = %attendance_type,
            "actor may not mark this session"
        );
    })
}

fn authorize_target(
    actor: &Actor,
    session: &Session,
    target: &user::Model,
    attendance_type: AttendanceType,
) -> ServiceResult<()> {
    let action = match attendance_type {
        AttendanceType::Regular => Action::MarkMember {
            session_pic_id: session.pic_id,
            member_pic_id: target.pic_id,
        },
        AttendanceType::Core => Action::ReceiveCoreMark {
            target_role: target.role,
        },
    };
    actor.authorize(action)
}

async fn find_user<C>(db: &C, user_id: i64) -> ServiceResult<user::Model>
where
    C: ConnectionTrait,
{
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::not_found("user", user_id))
}

/// Inserts the mark unless the `(session, user, type)` triple already exists.
/// The store is authoritative: a row that slipped in after the pre-check is
/// reported as `Conflict(AlreadyMarked)`.
async fn insert_mark<C>(
    db: &C,
    clock: &dyn Clock,
    recorded_by: i64,
    session_id: i64,
    user_id: i64,
    status: AttendanceStatus,
    attendance_type: AttendanceType,
) -> ServiceResult<AttendanceRecord>
where
    C: ConnectionTrait,
{
    let timestamp = clock.now();
    let active = attendance_record::ActiveModel {
        session_id: Set(session_id),
        user_id: Set(user_id),
        status: Set(status),
        attendance_type: Set(attendance_type),
        timestamp: Set(timestamp),
        recorded_by: Set(recorded_by),
        ..Default::default()
    };

    let result = attendance_record::Entity::insert(active)
        .on_conflict(
            OnConflict::columns([
                attendance_record::Column::SessionId,
                attendance_record::Column::UserId,
                attendance_record::Column::AttendanceType,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec(db)
        .await;

    match result {
        Ok(res) => Ok(AttendanceRecord {
            id: res.last_insert_id,
            session_id,
            user_id,
            status,
            attendance_type,
            timestamp,
            recorded_by,
        }),
        Err(DbErr::RecordNotInserted) => Err(ServiceError::Conflict(ConflictReason::AlreadyMarked)),
        Err(err) if is_unique_violation(&err) => {
            Err(ServiceError::Conflict(ConflictReason::AlreadyMarked))
        }
        Err(err) => Err(err.into()),
    }
}
