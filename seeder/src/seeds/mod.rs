pub mod pic;
pub mod session;
pub mod user;

/// Seeded leadership account acting for every privileged seed step.
pub const ADMIN_EMAIL: &str = "admin@rohis.test";
