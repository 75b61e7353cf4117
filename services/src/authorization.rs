//! Authorization engine.
//!
//! A pure decision function over an [`Actor`] snapshot. Callers load the
//! snapshot from storage inside the same transaction as the write it guards;
//! decisions are never cached.
//!
//! Role hierarchy:
//! - `admin`, `ketua`, `pembina` are *elevated*: they administer sessions and
//!   PICs and may mark regular attendance for anyone.
//! - A `member` may mark regular attendance only while holding the PIC
//!   delegation flag, and only for sessions owned by their PIC and users in
//!   their PIC.
//! - Core attendance is marked by and for *core users* (`admin`, `ketua`).
//! - Deleting a PIC is reserved to `admin`.

use db::models::user::{self, Role};
use sea_orm::{ConnectionTrait, EntityTrait};
use serde::Serialize;

use crate::error::{DenyReason, ServiceError, ServiceResult};

/// The acting user's authorization-relevant state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
    pub pic_id: Option<i64>,
    pub can_mark_attendance: bool,
}

impl From<&user::Model> for Actor {
    fn from(user: &user::Model) -> Self {
        Actor {
            id: user.id,
            role: user.role,
            pic_id: user.pic_id,
            can_mark_attendance: user.can_mark_attendance,
        }
    }
}

impl From<user::Model> for Actor {
    fn from(user: user::Model) -> Self {
        Actor::from(&user)
    }
}

impl Actor {
    /// Reads the actor's current snapshot. An unknown actor is denied rather
    /// than reported as missing.
    pub async fn load<C>(db: &C, id: i64) -> ServiceResult<Actor>
    where
        C: ConnectionTrait,
    {
        match user::Entity::find_by_id(id).one(db).await? {
            Some(user) => Ok(Actor::from(user)),
            None => Err(ServiceError::Denied(DenyReason::Forbidden)),
        }
    }

    pub fn authorize(&self, action: Action) -> ServiceResult<()> {
        authorize(self, action).into_result()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Session creation and locking, PIC creation and marker assignment.
    Administer,
    DeletePic,
    /// Record regular marks in a session at all.
    MarkSession { session_pic_id: Option<i64> },
    /// Record a regular mark for one user in a session.
    MarkMember {
        session_pic_id: Option<i64>,
        member_pic_id: Option<i64>,
    },
    /// Record core marks in any session.
    MarkCore,
    /// Receive a core mark.
    ReceiveCoreMark { target_role: Role },
    ViewUserAttendance { user_id: i64 },
    ViewSessionAttendance { session_pic_id: Option<i64> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), ServiceError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(ServiceError::Denied(reason)),
        }
    }
}

fn allow_if(condition: bool, otherwise: DenyReason) -> Decision {
    if condition {
        Decision::Allow
    } else {
        Decision::Deny(otherwise)
    }
}

pub fn authorize(actor: &Actor, action: Action) -> Decision {
    use DenyReason::{Forbidden, InvalidTarget};

    match action {
        Action::Administer => allow_if(can_administer(actor), Forbidden),
        Action::DeletePic => allow_if(actor.role == Role::Admin, Forbidden),
        Action::MarkSession { session_pic_id } => {
            allow_if(can_mark_session(actor, session_pic_id), Forbidden)
        }
        Action::MarkMember {
            session_pic_id,
            member_pic_id,
        } => allow_if(
            can_mark_session(actor, session_pic_id) && can_mark_attendance(actor, member_pic_id),
            Forbidden,
        ),
        Action::MarkCore => allow_if(can_mark_core_attendance(actor), Forbidden),
        Action::ReceiveCoreMark { target_role } => allow_if(is_core_role(target_role), InvalidTarget),
        Action::ViewUserAttendance { user_id } => {
            allow_if(actor.id == user_id || can_administer(actor), Forbidden)
        }
        Action::ViewSessionAttendance { session_pic_id } => {
            allow_if(can_mark_session(actor, session_pic_id), Forbidden)
        }
    }
}

/// `admin`, `ketua` and `pembina`.
pub fn is_elevated(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Ketua | Role::Pembina)
}

/// Leadership body tracked by core attendance. `pembina` is not part of it.
pub fn is_core_role(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Ketua)
}

pub fn is_core_user(user: &user::Model) -> bool {
    is_core_role(user.role)
}

pub fn can_administer(actor: &Actor) -> bool {
    is_elevated(actor.role)
}

/// Delegated member holding the marker flag for `pic_id`.
fn is_delegated_marker_for(actor: &Actor, pic_id: Option<i64>) -> bool {
    actor.role == Role::Member
        && actor.can_mark_attendance
        && actor.pic_id.is_some()
        && actor.pic_id == pic_id
}

/// May `actor` record a regular mark for someone in `target_pic_id`?
pub fn can_mark_attendance(actor: &Actor, target_pic_id: Option<i64>) -> bool {
    is_elevated(actor.role) || is_delegated_marker_for(actor, target_pic_id)
}

/// Session-level check: elevated roles mark any session, delegated markers
/// only sessions owned by their PIC.
pub fn can_mark_session(actor: &Actor, session_pic_id: Option<i64>) -> bool {
    is_elevated(actor.role) || is_delegated_marker_for(actor, session_pic_id)
}

pub fn can_mark_core_attendance(actor: &Actor) -> bool {
    is_core_role(actor.role)
}
