mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

use editorial_cms::domain::Role;
use editorial_cms::ports::UserRepository;

#[tokio::test]
async fn test_admin_routes_require_admin() {
    let app = TestApp::new();
    let (_, editor_token) = app.seed_user("Ed", "ed@x.com", Role::Editor).await;

    let (status, _) = app.request(Method::GET, "/admin/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(Method::GET, "/admin/users", Some(&editor_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_users_hides_password_hashes() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user("Root", "root@x.com", Role::Admin).await;
    app.seed_user("Ed", "ed@x.com", Role::Editor).await;

    let (status, body) = app
        .request(Method::GET, "/admin/users", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("passwordHash").is_none()));
}

#[tokio::test]
async fn test_admin_creates_editor_by_default() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user("Root", "root@x.com", Role::Admin).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/admin/register",
            Some(&admin_token),
            Some(json!({"name": "New", "email": "new@x.com", "password": "secret1"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "editor");
    assert!(body.get("token").is_none());

    let (status, body) = app
        .request(
            Method::POST,
            "/admin/register",
            Some(&admin_token),
            Some(json!({
                "name": "Reader",
                "email": "reader@x.com",
                "password": "secret1",
                "role": "subscriber"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "subscriber");

    let (status, _) = app
        .request(
            Method::POST,
            "/admin/register",
            Some(&admin_token),
            Some(json!({
                "name": "Bad",
                "email": "bad@x.com",
                "password": "secret1",
                "role": "owner"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_updates_user() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user("Root", "root@x.com", Role::Admin).await;
    let (editor, _) = app.seed_user("Ed", "ed@x.com", Role::Editor).await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/admin/users/{}", editor.id),
            Some(&admin_token),
            Some(json!({"name": "Edwina", "role": "admin", "password": "fresh-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Edwina");
    assert_eq!(body["role"], "admin");
    assert_eq!(body["email"], "ed@x.com");

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "ed@x.com", "password": "fresh-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_update_rejects_taken_email() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user("Root", "root@x.com", Role::Admin).await;
    let (editor, _) = app.seed_user("Ed", "ed@x.com", Role::Editor).await;

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/admin/users/{}", editor.id),
            Some(&admin_token),
            Some(json!({"email": "root@x.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_toggle_flips_or_sets_active() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user("Root", "root@x.com", Role::Admin).await;
    let (editor, _) = app.seed_user("Ed", "ed@x.com", Role::Editor).await;
    let uri = format!("/admin/users/{}/toggle", editor.id);

    let (status, body) = app
        .request(Method::PATCH, &uri, Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);

    let (_, body) = app
        .request(Method::PATCH, &uri, Some(&admin_token), Some(json!({"active": false})))
        .await;
    assert_eq!(body["active"], false);

    let (_, body) = app
        .request(Method::PATCH, &uri, Some(&admin_token), None)
        .await;
    assert_eq!(body["active"], true);
}

#[tokio::test]
async fn test_toggle_rejects_unparseable_body() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user("Root", "root@x.com", Role::Admin).await;
    let (editor, _) = app.seed_user("Ed", "ed@x.com", Role::Editor).await;
    let uri = format!("/admin/users/{}/toggle", editor.id);

    let (status, body) = app
        .request(Method::PATCH, &uri, Some(&admin_token), Some(json!({"active": "true"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let stored = app.users.get_by_id(editor.id).await.unwrap();
    assert!(stored.active);
}

#[tokio::test]
async fn test_malformed_user_id_is_json_bad_request() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user("Root", "root@x.com", Role::Admin).await;

    for (method, uri) in [
        (Method::DELETE, "/admin/users/not-a-uuid"),
        (Method::PATCH, "/admin/users/not-a-uuid/toggle"),
    ] {
        let (status, body) = app.request(method, uri, Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_admin_cannot_toggle_or_delete_self() {
    let app = TestApp::new();
    let (admin, admin_token) = app.seed_user("Root", "root@x.com", Role::Admin).await;

    let (status, _) = app
        .request(
            Method::PATCH,
            &format!("/admin/users/{}/toggle", admin.id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/admin/users/{}", admin.id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let stored = app.users.get_by_id(admin.id).await.unwrap();
    assert!(stored.active);
    assert_eq!(stored.role, Role::Admin);
    assert_eq!(stored.updated_at, admin.updated_at);
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user("Root", "root@x.com", Role::Admin).await;
    let (editor, _) = app.seed_user("Ed", "ed@x.com", Role::Editor).await;
    let uri = format!("/admin/users/{}", editor.id);

    let (status, body) = app
        .request(Method::DELETE, &uri, Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(app.users.get_by_id(editor.id).await.is_err());

    let (status, _) = app
        .request(Method::DELETE, &uri, Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
