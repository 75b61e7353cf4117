pub mod m202601100001_create_pics;
pub mod m202601100002_create_users;
pub mod m202601100003_create_sessions;
pub mod m202601100004_create_attendance_records;
