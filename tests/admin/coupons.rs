//! Tests for the admin coupon API under /admin/coupons.

use axum::http::StatusCode;
use serde_json::{Value, json};

#[path = "../common/mod.rs"]
mod common;
use common::*;

async fn admin(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send(test_app(state.clone()), request(method, uri, Some(&admin_token()), body)).await
}

#[tokio::test]
async fn test_create_coupon_normalizes_code() {
    let state = create_test_app_state();

    let (status, json) = admin(
        &state,
        "POST",
        "/admin/coupons",
        Some(json!({ "code": " spring-25 ", "type": "percent", "value": 25 })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["code"], "SPRING-25");
    assert_eq!(json["type"], "percent");
    assert_eq!(json["value"].as_f64(), Some(25.0));
    assert_eq!(json["active"], true);
    assert_eq!(json["uses"], 0);
    assert!(json["expiresAt"].is_null());
    assert!(json["maxRedemptions"].is_null());

    // Immediately usable through the public endpoint.
    let (status, json) = send(
        test_app(state),
        request(
            "POST",
            "/api/coupons/validate",
            None,
            Some(json!({ "code": "spring-25", "amount": 200 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["discountedAmount"].as_f64(), Some(150.0));
}

#[tokio::test]
async fn test_create_coupon_requires_admin() {
    let (status, _) = send(
        test_app(create_test_app_state()),
        request(
            "POST",
            "/admin/coupons",
            Some(&user_token()),
            Some(json!({ "code": "X", "type": "fixed", "value": 1 })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_coupon_rejects_bad_input() {
    let state = create_test_app_state();
    let bad = [
        json!({ "code": "", "type": "percent", "value": 10 }),
        json!({ "code": "has space", "type": "percent", "value": 10 }),
        json!({ "code": "NEG", "type": "fixed", "value": -1 }),
        json!({ "code": "CAP", "type": "fixed", "value": 1, "maxRedemptions": -1 }),
        json!({ "code": "KIND", "type": "bogo", "value": 1 }),
        json!({ "code": "NOVALUE", "type": "fixed" }),
    ];

    for body in bad {
        let (status, json) = admin(&state, "POST", "/admin/coupons", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body} should be rejected");
        assert_eq!(json["error"], "Bad request");
    }

    let conn = state.db.get().unwrap();
    assert_eq!(queries::count_coupons(&conn).unwrap(), (0, 0));
}

#[tokio::test]
async fn test_duplicate_code_is_conflict() {
    let state = create_test_app_state();
    {
        let conn = state.db.get().unwrap();
        create_test_coupon(&conn, "SAVE20", CouponType::Percent, 20);
    }

    let (status, json) = admin(
        &state,
        "POST",
        "/admin/coupons",
        Some(json!({ "code": "save20", "type": "fixed", "value": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["details"], "A coupon with this code already exists");
}

#[tokio::test]
async fn test_get_coupon() {
    let state = create_test_app_state();
    let coupon = {
        let conn = state.db.get().unwrap();
        create_test_coupon(&conn, "FLAT100", CouponType::Fixed, 100)
    };

    let (status, json) = admin(&state, "GET", &format!("/admin/coupons/{}", coupon.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], coupon.id.as_str());
    assert_eq!(json["code"], "FLAT100");

    let (status, json) = admin(&state, "GET", "/admin/coupons/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["details"], "Coupon not found");
}

#[tokio::test]
async fn test_update_coupon_sets_and_clears_limits() {
    let state = create_test_app_state();
    let coupon = {
        let conn = state.db.get().unwrap();
        create_test_coupon(&conn, "LIMITED", CouponType::Percent, 10)
    };
    let uri = format!("/admin/coupons/{}", coupon.id);
    let expires = future_timestamp(7);

    let (status, json) = admin(
        &state,
        "PUT",
        &uri,
        Some(json!({ "expiresAt": expires, "maxRedemptions": 50, "value": 12.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["expiresAt"], expires);
    assert_eq!(json["maxRedemptions"], 50);
    assert_eq!(json["value"].as_f64(), Some(12.5));
    assert_eq!(json["code"], "LIMITED", "absent fields stay unchanged");

    let (status, json) = admin(&state, "PUT", &uri, Some(json!({ "expiresAt": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["expiresAt"].is_null(), "null clears the expiry");
    assert_eq!(json["maxRedemptions"], 50, "absent field is left alone");
}

#[tokio::test]
async fn test_deactivating_coupon_makes_it_invalid() {
    let state = create_test_app_state();
    let coupon = {
        let conn = state.db.get().unwrap();
        create_test_coupon(&conn, "SAVE20", CouponType::Percent, 20)
    };

    let (status, _) = admin(
        &state,
        "PUT",
        &format!("/admin/coupons/{}", coupon.id),
        Some(json!({ "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(
        test_app(state),
        request(
            "POST",
            "/api/coupons/validate",
            None,
            Some(json!({ "code": "SAVE20", "amount": 100 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["reason"], "invalid");
}

#[tokio::test]
async fn test_update_coupon_errors() {
    let state = create_test_app_state();
    let (first, second) = {
        let conn = state.db.get().unwrap();
        (
            create_test_coupon(&conn, "FIRST", CouponType::Percent, 10),
            create_test_coupon(&conn, "SECOND", CouponType::Percent, 10),
        )
    };

    let (status, json) = admin(&state, "PUT", &format!("/admin/coupons/{}", first.id), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"], "No fields to update");

    let (status, _) = admin(
        &state,
        "PUT",
        &format!("/admin/coupons/{}", second.id),
        Some(json!({ "code": "first" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = admin(&state, "PUT", "/admin/coupons/missing", Some(json!({ "active": false }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_coupon() {
    let state = create_test_app_state();
    let coupon = {
        let conn = state.db.get().unwrap();
        create_test_coupon(&conn, "BYE", CouponType::Fixed, 5)
    };
    let uri = format!("/admin/coupons/{}", coupon.id);

    let (status, json) = admin(&state, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(json, Value::Null);

    let (status, _) = admin(&state, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = admin(&state, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_coupons_paginates() {
    let state = create_test_app_state();
    {
        let conn = state.db.get().unwrap();
        for code in ["C1", "C2", "C3", "C4", "C5"] {
            create_test_coupon(&conn, code, CouponType::Percent, 5);
        }
    }

    let (status, json) = admin(&state, "GET", "/admin/coupons?limit=2&offset=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 5);
    assert_eq!(json["limit"], 2);
    assert_eq!(json["offset"], 1);
    assert_eq!(json["items"].as_array().unwrap().len(), 2);

    let (_, json) = admin(&state, "GET", "/admin/coupons?limit=500", None).await;
    assert_eq!(json["limit"], 100);
    assert_eq!(json["items"].as_array().unwrap().len(), 5);

    let (status, _) = admin(&state, "GET", "/admin/coupons?limit=lots", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
