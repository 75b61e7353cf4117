//! Attendance authorization and session lifecycle.
//!
//! Every write in this crate runs in its own transaction and re-reads the
//! acting user's role and delegation from storage; nothing is cached.

pub mod attendance_service;
pub mod authorization;
pub mod clock;
pub mod error;
pub mod pic_service;
pub mod session_service;

pub use attendance_service::AttendanceService;
pub use authorization::{Action, Actor, Decision};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConflictReason, DenyReason, ServiceError, ServiceResult};
pub use pic_service::PicService;
pub use session_service::SessionService;
