//! User flows over HTTP. Users share the customer use cases but differ in
//! route methods and the delete response.

use accounts_integration_tests::TestServer;
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn create_user(server: &TestServer, email: &str) -> Value {
    let resp = server
        .client
        .post(server.url("/users"))
        .json(&json!({
            "email": email,
            "firstName": "Grace",
            "lastName": "Hopper",
            "phoneNumber": "+1 555 0199"
        }))
        .send()
        .await
        .expect("Failed to create user");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Invalid user JSON")
}

#[tokio::test]
async fn test_status_routes_accept_post() {
    let server = TestServer::spawn().await;
    let user = create_user(&server, "grace@example.com").await;
    let base = server.url(&format!("/users/{}", user["id"].as_str().unwrap()));

    let resp = server
        .client
        .post(format!("{base}/confirm-email"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = server
        .client
        .post(format!("{base}/deactivate"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = server
        .client
        .patch(format!("{base}/activate"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = server
        .client
        .get(&base)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["emailConfirmed"], true);
    assert_eq!(body["isActive"], true);
}

#[tokio::test]
async fn test_delete_returns_message() {
    let server = TestServer::spawn().await;
    let user = create_user(&server, "grace@example.com").await;
    let url = server.url(&format!("/users/{}", user["id"].as_str().unwrap()));

    let resp = server.client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": "User deleted successfully" }));

    let resp = server.client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["statusCode"], 404);
}

#[tokio::test]
async fn test_get_by_email_not_found() {
    let server = TestServer::spawn().await;

    let resp = server
        .client
        .get(server.url("/users/email/ghost@example.com"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "User with email 'ghost@example.com' not found");
}

#[tokio::test]
async fn test_empty_patch_returns_entity_unchanged() {
    let server = TestServer::spawn().await;
    let user = create_user(&server, "grace@example.com").await;

    let resp = server
        .client
        .patch(server.url(&format!("/users/{}", user["id"].as_str().unwrap())))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, user);
}
