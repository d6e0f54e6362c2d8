/// Postgres store tests
/// Each test gets a fresh database with migrations applied; run with
/// `DATABASE_URL` pointing at a server and `cargo test -- --ignored`
use axum::http::StatusCode;
use sqlx::PgPool;
use userdb_service::{
    dtos::user::{NewUser, Page},
    error::AppError,
    store::{PgUserStore, UserStore, SEED_USERS},
};

fn new_user(first: &str, last: &str) -> NewUser {
    NewUser {
        first_name: first.to_string(),
        last_name: last.to_string(),
    }
}

async fn count_users(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_insert_then_get(pool: PgPool) {
    let store = PgUserStore::new(pool);

    let created = store.insert_user(&new_user("John", "Doe")).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.created_at, created.updated_at);

    let fetched = store.get_user(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let second = store.insert_user(&new_user("Jane", "Roe")).await.unwrap();
    assert!(second.id > created.id);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_get_unknown_id_is_not_found(pool: PgPool) {
    let store = PgUserStore::new(pool);
    let created = store.insert_user(&new_user("John", "Doe")).await.unwrap();

    let err = store.get_user(created.id + 1000).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_list_pages_in_id_order(pool: PgPool) {
    let store = PgUserStore::new(pool);
    store.seed().await.unwrap();

    let first = store.list_users(Page { limit: 2, offset: 0 }).await.unwrap();
    let rest = store.list_users(Page { limit: 2, offset: 2 }).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(rest.len(), 1);

    let names: Vec<(String, String)> = first
        .iter()
        .chain(rest.iter())
        .map(|u| (u.first_name.clone(), u.last_name.clone()))
        .collect();
    let expected: Vec<(String, String)> = SEED_USERS
        .iter()
        .map(|(f, l)| (f.to_string(), l.to_string()))
        .collect();
    assert_eq!(names, expected);
    assert!(first[0].id < first[1].id && first[1].id < rest[0].id);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_reseeding_does_not_duplicate(pool: PgPool) {
    let store = PgUserStore::new(pool.clone());

    assert_eq!(store.seed().await.unwrap(), 3);
    assert_eq!(store.seed().await.unwrap(), 0);
    assert_eq!(count_users(&pool).await, 3);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_concurrent_seeding_inserts_each_row_once(pool: PgPool) {
    for _ in 0..20 {
        sqlx::query("TRUNCATE users RESTART IDENTITY")
            .execute(&pool)
            .await
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = PgUserStore::new(pool.clone());
                tokio::spawn(async move { store.seed().await })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            inserted += handle.await.unwrap().unwrap();
        }

        assert_eq!(inserted, 3);
        assert_eq!(count_users(&pool).await, 3);
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_overlong_name_is_a_store_error(pool: PgPool) {
    let store = PgUserStore::new(pool.clone());

    let err = store
        .insert_user(&new_user(&"x".repeat(101), "Doe"))
        .await
        .unwrap_err();
    assert!(matches!(&err, AppError::Store(sqlx::Error::Database(db)) if db.code().as_deref() == Some("22001")));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(count_users(&pool).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_ping_and_closed_pool(pool: PgPool) {
    let store = PgUserStore::new(pool.clone());
    store.ping().await.unwrap();

    pool.close().await;
    let err = store.ping().await.unwrap_err();
    assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
}
