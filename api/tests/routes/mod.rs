mod attendance_test;
mod health_test;
mod pics_test;
mod sessions_test;
