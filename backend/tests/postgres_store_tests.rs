//! Postgres adapter tests
//!
//! These need a live database and are ignored by default. Run with:
//! `TEST_DATABASE_URL=postgres://... cargo test -- --ignored`

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use kodbank_server::db::run_migrations;
use kodbank_server::models::{NewUser, UniqueField, UserRole};
use kodbank_server::store::{PgTokenLedger, PgUserStore, StoreError, TokenLedger, UserStore};

async fn test_pool() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");
    run_migrations(&pool).await.expect("Failed to migrate");
    pool
}

/// User with identifiers unique to this run
fn fresh_user() -> NewUser {
    let suffix = Uuid::new_v4().simple().to_string();
    NewUser {
        uid: format!("U-{}", &suffix[..12]),
        username: format!("user_{}", &suffix[..12]),
        password_hash: "$2b$04$placeholder".to_string(),
        email: format!("{}@example.com", &suffix[..12]),
        phone: "555".to_string(),
        role: UserRole::Customer,
        balance: 100_000,
    }
}

#[tokio::test]
#[ignore]
async fn test_user_store_round_trip() {
    let store = PgUserStore::new(test_pool().await);
    let user = fresh_user();

    let id = store.create(user.clone()).await.unwrap();
    assert!(id > 0);

    let found = store.find_by_username(&user.username).await.unwrap().unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.role, UserRole::Customer);
    assert!(store.find_by_email(&user.email).await.unwrap().is_some());
    assert!(store.find_by_uid(&user.uid).await.unwrap().is_some());
    assert_eq!(store.balance(&user.username).await.unwrap(), Some(100_000));
    assert_eq!(store.balance("no-such-user").await.unwrap(), None);
    store.ping().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_unique_violation_maps_to_duplicate() {
    let store = PgUserStore::new(test_pool().await);
    let user = fresh_user();
    store.create(user.clone()).await.unwrap();

    let clash = NewUser {
        uid: fresh_user().uid,
        email: fresh_user().email,
        ..user
    };
    let err = store.create(clash).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(UniqueField::Username)));
}

#[tokio::test]
#[ignore]
async fn test_token_ledger_revocation() {
    let pool = test_pool().await;
    let users = PgUserStore::new(pool.clone());
    let ledger = PgTokenLedger::new(pool);

    let user = fresh_user();
    users.create(user.clone()).await.unwrap();

    let token_a = format!("{}-a", user.username);
    let token_b = format!("{}-b", user.username);
    ledger.insert(&user.username, &token_a).await.unwrap();
    ledger.insert(&user.username, &token_b).await.unwrap();

    let row = ledger.find_by_token(&token_a).await.unwrap().unwrap();
    assert_eq!(row.owner, user.username);
    assert_eq!(row.token_hash.len(), 64);

    assert_eq!(ledger.revoke_token(&token_a).await.unwrap(), 1);
    assert!(ledger.find_by_token(&token_a).await.unwrap().is_none());
    assert!(ledger.find_by_token(&token_b).await.unwrap().is_some());

    assert_eq!(ledger.revoke_by_owner(&user.username).await.unwrap(), 1);
    assert!(ledger.find_by_token(&token_b).await.unwrap().is_none());
}
