//! Integration tests for saved stage positions

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_and_list_positions() {
    let app = common::TestApp::new().await;
    let (token, user_id, _) = app.register_user("SecurePassword123!").await;

    let body = json!({
        "name": "slide 3, top-left",
        "x": 1250.5,
        "y": -340.25,
        "z": 12.0,
        "description": "calibration target"
    });
    let (status, response) = app.post_auth("/positions", &body.to_string(), &token).await;

    assert_eq!(status, StatusCode::CREATED);
    let created: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(created["name"], "slide 3, top-left");
    assert_eq!(created["ownerUserId"], user_id.to_string());

    let (status, response) = app.get_auth("/positions", &token).await;
    assert_eq!(status, StatusCode::OK);
    let listing: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(listing["pagination"]["total"], 1);
    assert_eq!(listing["data"][0]["x"], 1250.5);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_positions_are_scoped_per_owner() {
    let app = common::TestApp::new().await;
    let password = "SecurePassword123!";
    let (token_a, _, _) = app.register_user(password).await;
    let (token_b, _, _) = app.register_user(password).await;

    let body = json!({"name": "well A1", "x": 0.0, "y": 0.0, "z": 5.0});
    app.post_auth("/positions", &body.to_string(), &token_a)
        .await;

    let (_, response) = app.get_auth("/positions", &token_b).await;
    let listing: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(listing["pagination"]["total"], 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_foreign_position_forbidden() {
    let app = common::TestApp::new().await;
    let password = "SecurePassword123!";
    let (owner_token, _, _) = app.register_user(password).await;
    let (other_token, _, _) = app.register_user(password).await;

    let body = json!({"name": "well B2", "x": 10.0, "y": 20.0, "z": 3.5});
    let (_, response) = app
        .post_auth("/positions", &body.to_string(), &owner_token)
        .await;
    let created: serde_json::Value = serde_json::from_str(&response).unwrap();
    let id = created["id"].as_str().unwrap();

    let update = json!({"name": "hijacked"});
    let (status, _) = app
        .put_auth(&format!("/positions/{}", id), &update.to_string(), &other_token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Owner update succeeds
    let update = json!({"z": 4.0});
    let (status, response) = app
        .put_auth(&format!("/positions/{}", id), &update.to_string(), &owner_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let updated: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(updated["z"], 4.0);
    assert_eq!(updated["name"], "well B2");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_admin_deletes_foreign_position() {
    let app = common::TestApp::new().await;
    let password = "SecurePassword123!";
    let (owner_token, _, _) = app.register_user(password).await;
    let (_, _, admin_email) = app.register_user(password).await;
    let admin_token = app.promote_to_admin(&admin_email, password).await;

    let body = json!({"name": "well C3", "x": 1.0, "y": 2.0, "z": 3.0});
    let (_, response) = app
        .post_auth("/positions", &body.to_string(), &owner_token)
        .await;
    let created: serde_json::Value = serde_json::from_str(&response).unwrap();
    let id = created["id"].as_str().unwrap();

    let (status, response) = app
        .delete_auth(&format!("/positions/{}", id), &admin_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let deleted: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(deleted["success"], true);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_invalid_coordinates_rejected() {
    let app = common::TestApp::new().await;
    let (token, _, _) = app.register_user("SecurePassword123!").await;

    let body = json!({"name": "", "x": 0.0, "y": 0.0, "z": 0.0});
    let (status, _) = app.post_auth("/positions", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
