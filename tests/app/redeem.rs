//! Tests for POST /app/coupons/redeem and GET /app/session.

use axum::http::StatusCode;
use serde_json::json;

#[path = "../common/mod.rs"]
mod common;
use common::*;

#[tokio::test]
async fn test_redeem_requires_session() {
    let state = create_test_app_state();
    {
        let conn = state.db.get().unwrap();
        create_test_coupon(&conn, "SAVE20", CouponType::Percent, 20);
    }

    let (status, json) = send(
        test_app(state),
        request(
            "POST",
            "/app/coupons/redeem",
            None,
            Some(json!({ "code": "SAVE20", "amount": 100 })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Unauthorized");
}

#[tokio::test]
async fn test_redeem_counts_a_use() {
    let state = create_test_app_state();
    let id = {
        let conn = state.db.get().unwrap();
        create_test_coupon(&conn, "SAVE20", CouponType::Percent, 20).id
    };
    let token = user_token();

    let (status, json) = send(
        test_app(state.clone()),
        request(
            "POST",
            "/app/coupons/redeem",
            Some(&token),
            Some(json!({ "code": "save20", "amount": 250 })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], true);
    assert_eq!(json["discountedAmount"].as_f64(), Some(200.0));
    assert_eq!(json["coupon"]["uses"], 1);

    let conn = state.db.get().unwrap();
    let coupon = queries::get_coupon_by_id(&conn, &id).unwrap().unwrap();
    assert_eq!(coupon.uses, 1);
}

#[tokio::test]
async fn test_redeem_stops_at_cap() {
    let state = create_test_app_state();
    let id = {
        let conn = state.db.get().unwrap();
        create_limited_coupon(&conn, "TWICE", None, Some(2), 0).id
    };
    let token = user_token();

    let mut statuses = Vec::new();
    for _ in 0..3 {
        let (status, json) = send(
            test_app(state.clone()),
            request(
                "POST",
                "/app/coupons/redeem",
                Some(&token),
                Some(json!({ "code": "TWICE", "amount": 100 })),
            ),
        )
        .await;
        statuses.push((status, json["reason"].clone()));
    }

    assert_eq!(statuses[0].0, StatusCode::OK);
    assert_eq!(statuses[1].0, StatusCode::OK);
    assert_eq!(statuses[2].0, StatusCode::BAD_REQUEST);
    assert_eq!(statuses[2].1, "maxed");

    let conn = state.db.get().unwrap();
    let coupon = queries::get_coupon_by_id(&conn, &id).unwrap().unwrap();
    assert_eq!(coupon.uses, 2, "uses must never pass max_redemptions");
}

#[tokio::test]
async fn test_redeem_rejection_does_not_count() {
    let state = create_test_app_state();
    let id = {
        let conn = state.db.get().unwrap();
        create_limited_coupon(&conn, "OLD", Some(past_timestamp(2)), None, 3).id
    };

    let (status, json) = send(
        test_app(state.clone()),
        request(
            "POST",
            "/app/coupons/redeem",
            Some(&user_token()),
            Some(json!({ "code": "OLD", "amount": 100 })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["reason"], "expired");

    let conn = state.db.get().unwrap();
    assert_eq!(queries::get_coupon_by_id(&conn, &id).unwrap().unwrap().uses, 3);
}

#[tokio::test]
async fn test_redeem_unknown_code() {
    let (status, json) = send(
        test_app(create_test_app_state()),
        request(
            "POST",
            "/app/coupons/redeem",
            Some(&user_token()),
            Some(json!({ "code": "GHOST", "amount": 100 })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["reason"], "invalid");
}

#[tokio::test]
async fn test_admin_can_redeem_too() {
    let state = create_test_app_state();
    {
        let conn = state.db.get().unwrap();
        create_test_coupon(&conn, "FLAT100", CouponType::Fixed, 100);
    }

    let (status, json) = send(
        test_app(state),
        request(
            "POST",
            "/app/coupons/redeem",
            Some(&admin_token()),
            Some(json!({ "code": "FLAT100", "amount": 150.5 })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["discountedAmount"].as_f64(), Some(50.5));
}

#[tokio::test]
async fn test_get_session_returns_verified_identity() {
    let (status, json) = send(
        test_app(create_test_app_state()),
        request("GET", "/app/session", Some(&user_token()), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["subject"], "user-1");
    assert_eq!(json["email"], "user@example.com");
    assert_eq!(json["isAdmin"], false);
}
