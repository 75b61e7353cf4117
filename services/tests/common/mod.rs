#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use db::models::user::{self, Model as UserModel, Role};
use db::test_utils::setup_test_db;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait};
use services::clock::FixedClock;
use services::pic_service::{Pic, PicService};
use services::session_service::{NewSession, Session, SessionService};
use tempfile::TempDir;

/// Pool size for the file-backed fixture.
pub const POOL_SIZE: u32 = 16;

/// A small club: leadership, two PICs and a handful of members.
///
/// Alpha = {u1 (marker), u2}, Beta = {u3 (marker), u4}, `loose` has no PIC.
pub struct TestCtx {
    pub db: DatabaseConnection,
    pub clock: FixedClock,
    pub admin: UserModel,
    pub ketua: UserModel,
    pub pembina: UserModel,
    pub u1: UserModel,
    pub u2: UserModel,
    pub u3: UserModel,
    pub u4: UserModel,
    pub loose: UserModel,
    pub alpha: Pic,
    pub beta: Pic,
    pub alpha_session: Session,
    pub open_session: Session,
    /// Keeps a file-backed database alive for the test's duration.
    _dir: Option<TempDir>,
}

pub fn test_clock() -> FixedClock {
    FixedClock::at(Utc.with_ymd_and_hms(2026, 1, 16, 6, 0, 0).unwrap())
}

pub async fn create_user(db: &DatabaseConnection, handle: &str, role: Role) -> UserModel {
    UserModel::create(db, &format!("{handle}@rohis.test"), handle, role, Some("11-A"))
        .await
        .expect("create user")
}

pub async fn reload(db: &DatabaseConnection, id: i64) -> UserModel {
    user::Entity::find_by_id(id)
        .one(db)
        .await
        .unwrap()
        .expect("user exists")
}

/// Fixture on a single-connection in-memory database.
pub async fn setup() -> TestCtx {
    build(setup_test_db().await, None).await
}

/// Fixture on a file-backed SQLite database behind a real connection pool,
/// so concurrent transactions contend for the database lock.
pub async fn setup_pooled() -> TestCtx {
    let dir = TempDir::new().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("club.db").display());

    let mut opts = ConnectOptions::new(url);
    opts.max_connections(POOL_SIZE).min_connections(2).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect file db");
    Migrator::up(&db, None).await.expect("run migrations");

    build(db, Some(dir)).await
}

async fn build(db: DatabaseConnection, dir: Option<TempDir>) -> TestCtx {

    let admin = create_user(&db, "admin", Role::Admin).await;
    let ketua = create_user(&db, "ketua", Role::Ketua).await;
    let pembina = create_user(&db, "pembina", Role::Pembina).await;
    let u1 = create_user(&db, "u1", Role::Member).await;
    let u2 = create_user(&db, "u2", Role::Member).await;
    let u3 = create_user(&db, "u3", Role::Member).await;
    let u4 = create_user(&db, "u4", Role::Member).await;
    let loose = create_user(&db, "loose", Role::Member).await;

    let alpha = PicService::create_pic(&db, admin.id, "Alpha").await.unwrap();
    let beta = PicService::create_pic(&db, admin.id, "Beta").await.unwrap();
    PicService::assign_marker(&db, admin.id, alpha.id, &[u1.id, u2.id], Some(u1.id))
        .await
        .unwrap();
    PicService::assign_marker(&db, admin.id, beta.id, &[u3.id, u4.id], Some(u3.id))
        .await
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2026, 1, 16).unwrap();
    let alpha_session = SessionService::create(
        &db,
        admin.id,
        NewSession {
            name: "Mentoring Alpha".into(),
            date,
            pic_id: Some(alpha.id),
        },
    )
    .await
    .unwrap();
    let open_session = SessionService::create(
        &db,
        admin.id,
        NewSession {
            name: "Kajian Jumat".into(),
            date,
            pic_id: None,
        },
    )
    .await
    .unwrap();

    TestCtx {
        u1: reload(&db, u1.id).await,
        u2: reload(&db, u2.id).await,
        u3: reload(&db, u3.id).await,
        u4: reload(&db, u4.id).await,
        db,
        clock: test_clock(),
        admin,
        ketua,
        pembina,
        loose,
        alpha,
        beta,
        alpha_session,
        open_session,
        _dir: dir,
    }
}
