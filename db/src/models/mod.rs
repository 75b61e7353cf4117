pub mod attendance_record;
pub mod pic;
pub mod session;
pub mod user;

pub use attendance_record::Entity as AttendanceRecord;
pub use pic::Entity as Pic;
pub use session::Entity as Session;
pub use user::Entity as User;
