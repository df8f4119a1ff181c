//! Postgres databases and fixtures for fitplan integration tests.
//!
//! Every test binary shares one server: the one at `FITPLAN_TEST_PG_URL`
//! when that is set, otherwise a Postgres container started on first use.
//! Each test then works in its own migrated database from
//! [`create_test_db`], dropped again with [`drop_test_db`].

use sqlx::{Executor, PgPool};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use fitplan_db::models::{Exercise, User};
use fitplan_db::pool;
use fitplan_db::queries::exercises::{self, NewExercise};
use fitplan_db::queries::{lookups, users};

/// A small catalog covering cardio, both body sides and two equipment
/// types, as `(name, body part, equipment)`.
pub const SAMPLE_CATALOG: &[(&str, &str, &str)] = &[
    ("jump rope", "cardio", "rope"),
    ("running in place", "cardio", "body weight"),
    ("push up", "chest", "body weight"),
    ("pull up", "back", "body weight"),
    ("squat", "upper legs", "body weight"),
    ("calf raise", "lower legs", "body weight"),
    ("crunch", "waist", "body weight"),
    ("dumbbell curl", "upper arms", "dumbbell"),
];

/// Avatar created by [`seed_user`].
pub const TEST_AVATAR: &str = "owl";

struct TestServer {
    base_url: String,
    _container: Option<ContainerAsync<Postgres>>,
}

static SERVER: OnceCell<TestServer> = OnceCell::const_new();

async fn start_server() -> TestServer {
    if let Ok(base_url) = std::env::var("FITPLAN_TEST_PG_URL") {
        return TestServer {
            base_url,
            _container: None,
        };
    }

    let container = Postgres::default()
        .with_tag("17")
        .start()
        .await
        .expect("failed to start PostgreSQL container");
    let host = container.get_host().await.expect("container has no host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("container port 5432 is not mapped");

    TestServer {
        base_url: format!("postgresql://postgres:postgres@{host}:{port}"),
        _container: Some(container),
    }
}

/// Server URL without a database name.
pub async fn pg_url() -> &'static str {
    &SERVER.get_or_init(start_server).await.base_url
}

async fn on_maintenance_db(statement: &str) -> Result<(), sqlx::Error> {
    let url = format!("{}/postgres", pg_url().await);
    let maint = pool::connect(&url, 1)
        .await
        .unwrap_or_else(|e| panic!("maintenance database unreachable: {e:#}"));
    let result = maint.execute(statement).await.map(|_| ());
    maint.close().await;
    result
}

/// Create a fresh database with migrations applied. Returns `(pool,
/// db_name)`; the pool allows five connections.
pub async fn create_test_db() -> (PgPool, String) {
    let db_name = format!("fitplan_test_{}", Uuid::new_v4().simple());
    on_maintenance_db(&format!("CREATE DATABASE {db_name}"))
        .await
        .unwrap_or_else(|e| panic!("failed to create {db_name}: {e}"));

    let pool = connect_test_db(&db_name, 5).await;
    pool::run_migrations(&pool)
        .await
        .expect("migrations should succeed");
    (pool, db_name)
}

/// Another pool onto a database from [`create_test_db`], capped at
/// `max_connections`.
pub async fn connect_test_db(db_name: &str, max_connections: u32) -> PgPool {
    let url = format!("{}/{db_name}", pg_url().await);
    pool::connect(&url, max_connections)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to {db_name}: {e:#}"))
}

/// Drop a database from [`create_test_db`], disconnecting stragglers.
pub async fn drop_test_db(db_name: &str) {
    let _ = on_maintenance_db(&format!(
        "SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
         WHERE datname = '{db_name}' AND pid <> pg_backend_pid()"
    ))
    .await;
    let _ = on_maintenance_db(&format!("DROP DATABASE IF EXISTS {db_name}")).await;
}

/// Catalog entry with empty description and target.
pub fn catalog_entry(name: &str, body_part: &str, equipment: &str) -> NewExercise {
    NewExercise {
        name: name.to_owned(),
        description: String::new(),
        body_part: body_part.to_owned(),
        target: String::new(),
        equipment: equipment.to_owned(),
        difficulty_level: None,
    }
}

/// Upsert `(name, body part, equipment)` rows into the catalog.
pub async fn seed_catalog(pool: &PgPool, rows: &[(&str, &str, &str)]) -> Vec<Exercise> {
    let mut seeded = Vec::with_capacity(rows.len());
    for (name, body_part, equipment) in rows {
        let exercise = exercises::upsert_exercise(pool, &catalog_entry(name, body_part, equipment))
            .await
            .unwrap_or_else(|e| panic!("failed to seed exercise {name:?}: {e:#}"));
        seeded.push(exercise);
    }
    seeded
}

/// Register `uid` as `{uid}@example.com`, display name "Tester", with the
/// [`TEST_AVATAR`] avatar.
pub async fn seed_user(pool: &PgPool, uid: &str) -> User {
    lookups::upsert_avatar(pool, TEST_AVATAR, Some("https://img.example.com/owl.png"))
        .await
        .expect("failed to seed avatar");
    users::upsert_user(pool, &format!("{uid}@example.com"), uid, Some("Tester"), Some(TEST_AVATAR))
        .await
        .unwrap_or_else(|e| panic!("failed to seed user {uid:?}: {e:#}"))
}
