//! HTTP-level integration tests for the reservation endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router.
//! Users and items are created via the repository layer to set up test
//! scenarios, then exercised through the HTTP API.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, build_test_app, delete_json, get, post_json};
use serde_json::json;
use sqlx::PgPool;
use trove_api::engine::reservations::{self, ReserveResult};
use trove_core::holds::HoldKind;
use trove_db::models::item::CreateItem;
use trove_db::models::user::CreateUser;
use trove_db::repositories::{ItemRepo, ReservationRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, name: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            display_name: name.to_string(),
            role: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_item(pool: &PgPool, seller_id: i64, title: &str) -> i64 {
    ItemRepo::create(
        pool,
        &CreateItem {
            seller_id,
            title: title.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Test: reserve succeeds and reports the configured hold length
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_reserve_succeeds_with_default_duration(pool: PgPool) {
    let seller = seed_user(&pool, "seller").await;
    let buyer = seed_user(&pool, "buyer").await;
    let item = seed_item(&pool, seller, "Road bike").await;

    let before = Utc::now();
    let response = post_json(
        build_test_app(pool),
        &format!("/api/v1/items/{item}/reserve"),
        json!({"user_id": buyer, "kind": "buy_now"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["reserved"], true);
    assert!(body.get("reason").is_none());

    // buy_now holds default to 10 minutes.
    let until: chrono::DateTime<Utc> =
        body["until"].as_str().unwrap().parse().unwrap();
    assert!(until > before + Duration::minutes(9));
    assert!(until < before + Duration::minutes(11));
}

// ---------------------------------------------------------------------------
// Test: a second buyer loses the race and is told "unavailable"
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_second_buyer_gets_unavailable(pool: PgPool) {
    let seller = seed_user(&pool, "seller").await;
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let item = seed_item(&pool, seller, "Armchair").await;

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/items/{item}/reserve"),
        json!({"user_id": alice, "kind": "cart"}),
    )
    .await;
    assert_eq!(body_json(response).await["reserved"], true);

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/items/{item}/reserve"),
        json!({"user_id": bob, "kind": "buy_now"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["reserved"], false);
    assert_eq!(body["reason"], "unavailable");

    // Exactly one reservation row exists, and it belongs to alice.
    let row = ReservationRepo::find_by_item(&pool, item).await.unwrap().unwrap();
    assert_eq!(row.user_id, alice);
}

// ---------------------------------------------------------------------------
// Test: the holder can renew their own reservation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_holder_renews_own_reservation(pool: PgPool) {
    let seller = seed_user(&pool, "seller").await;
    let buyer = seed_user(&pool, "buyer").await;
    let item = seed_item(&pool, seller, "Lamp").await;

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/items/{item}/reserve"),
        json!({"user_id": buyer, "kind": "cart"}),
    )
    .await;
    let first_until = body_json(response).await["until"].as_str().unwrap().to_string();

    // Renewal with a longer checkout hold succeeds and extends the expiry.
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/items/{item}/reserve"),
        json!({"user_id": buyer, "kind": "buy_now"}),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["reserved"], true);
    let second_until = body["until"].as_str().unwrap();
    assert!(second_until > first_until.as_str());

    let row = ReservationRepo::find_by_item(&pool, item).await.unwrap().unwrap();
    assert_eq!(row.kind, "buy_now");
}

// ---------------------------------------------------------------------------
// Test: an expired hold can be taken over without a sweep
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_expired_hold_taken_over(pool: PgPool) {
    let seller = seed_user(&pool, "seller").await;
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let item = seed_item(&pool, seller, "Desk").await;

    // Give alice a hold that already lapsed; no sweep runs.
    let past = Utc::now() - Duration::minutes(1);
    ReservationRepo::claim(&pool, item, alice, "cart", past, past - Duration::minutes(5))
        .await
        .unwrap()
        .expect("seed claim should succeed");

    // The lapsed hold reads as available.
    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/items/{item}/availability"),
    )
    .await;
    assert_eq!(body_json(response).await["status"], "available");

    // Bob claims it.
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/items/{item}/reserve"),
        json!({"user_id": bob, "kind": "buy_now"}),
    )
    .await;
    assert_eq!(body_json(response).await["reserved"], true);

    let row = ReservationRepo::find_by_item(&pool, item).await.unwrap().unwrap();
    assert_eq!(row.user_id, bob);
}

// ---------------------------------------------------------------------------
// Test: simultaneous claims on one item have exactly one winner
// ---------------------------------------------------------------------------

// Fires the claims from spawned tasks so they genuinely race on the
// reservations row. The claim is a single statement, so the losers must
// come back `Unavailable` with nothing written.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_concurrent_claims_have_one_winner(pool: PgPool) {
    let seller = seed_user(&pool, "seller").await;
    let item = seed_item(&pool, seller, "Tent").await;

    let mut buyers = Vec::new();
    for i in 0..5 {
        buyers.push(seed_user(&pool, &format!("buyer-{i}")).await);
    }

    let mut handles = Vec::new();
    for buyer in &buyers {
        let pool = pool.clone();
        let buyer = *buyer;
        handles.push(tokio::spawn(async move {
            reservations::reserve(&pool, item, buyer, HoldKind::BuyNow, 10).await
        }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            ReserveResult::Reserved(reservation) => winners.push(reservation.user_id),
            ReserveResult::Unavailable => {}
            ReserveResult::NotFound => panic!("item exists, claim must not report NotFound"),
        }
    }
    assert_eq!(winners.len(), 1, "exactly one claim must win");

    // The surviving row belongs to the winner.
    let row = ReservationRepo::find_by_item(&pool, item).await.unwrap();
    assert_matches!(row, Some(ref r) if r.user_id == winners[0]);
}

// ---------------------------------------------------------------------------
// Test: availability reports the holder and whose hold it is
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_availability_reports_holder(pool: PgPool) {
    let seller = seed_user(&pool, "seller").await;
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let item = seed_item(&pool, seller, "Mirror").await;

    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/items/{item}/reserve"),
        json!({"user_id": alice, "kind": "cart"}),
    )
    .await;

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/items/{item}/availability?user_id={alice}"),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["status"], "held");
    assert_eq!(body["reserved_by_current_user"], true);
    assert!(body["reserved_until"].is_string());

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/items/{item}/availability?user_id={bob}"),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["status"], "held");
    assert_eq!(body["reserved_by_current_user"], false);
}

// ---------------------------------------------------------------------------
// Test: release is ownership-checked and benign for non-owners
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_release_checks_ownership(pool: PgPool) {
    let seller = seed_user(&pool, "seller").await;
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let item = seed_item(&pool, seller, "Bookshelf").await;

    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/items/{item}/reserve"),
        json!({"user_id": alice, "kind": "cart"}),
    )
    .await;

    // Bob's defensive release is a no-op, not an error.
    let response = delete_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/items/{item}/reservation"),
        json!({"user_id": bob}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["released"], false);
    assert!(ReservationRepo::find_by_item(&pool, item).await.unwrap().is_some());

    // Alice's release removes the hold and the item reads available again.
    let response = delete_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/items/{item}/reservation"),
        json!({"user_id": alice}),
    )
    .await;
    assert_eq!(body_json(response).await["released"], true);
    assert!(ReservationRepo::find_by_item(&pool, item).await.unwrap().is_none());

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/items/{item}/availability"),
    )
    .await;
    assert_eq!(body_json(response).await["status"], "available");
}

// ---------------------------------------------------------------------------
// Test: terminal items pass through and cannot be reserved
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_sold_item_is_terminal(pool: PgPool) {
    let seller = seed_user(&pool, "seller").await;
    let buyer = seed_user(&pool, "buyer").await;
    let item = seed_item(&pool, seller, "Sofa").await;

    // Sold through the (out-of-scope) payment flow.
    sqlx::query("UPDATE items SET status = 'sold' WHERE id = $1")
        .bind(item)
        .execute(&pool)
        .await
        .unwrap();

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/items/{item}/availability"),
    )
    .await;
    assert_eq!(body_json(response).await["status"], "sold");

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/items/{item}/reserve"),
        json!({"user_id": buyer, "kind": "buy_now"}),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["reserved"], false);
    assert_eq!(body["reason"], "unavailable");
}

// ---------------------------------------------------------------------------
// Test: unknown items return 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_item_is_404(pool: PgPool) {
    let buyer = seed_user(&pool, "buyer").await;

    let response = get(build_test_app(pool.clone()), "/api/v1/items/9999/availability").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/items/9999/reserve",
        json!({"user_id": buyer, "kind": "cart"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
