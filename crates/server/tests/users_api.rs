use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::DatabaseConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::startup::{build_app, prepare_database};

async fn build_test_app() -> anyhow::Result<Router> {
    let cfg = DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let db = prepare_database(&cfg).await?;
    Ok(build_app(db))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&v)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

#[tokio::test]
async fn create_then_duplicate_is_conflict() -> anyhow::Result<()> {
    let app = build_test_app().await?;

    let (status, body) = send(&app, "POST", "/users", Some(json!({"name": "Taro", "email": "taro@example.com"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Taro");
    assert_eq!(body["email"], "taro@example.com");
    assert!(body["created_at"].is_string());

    let (status, body) = send(&app, "POST", "/users", Some(json!({"name": "Taro", "email": "taro@example.com"}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"detail": "Email address is already registered"}));

    let (status, body) = send(&app, "GET", "/users", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn get_missing_user_is_not_found() -> anyhow::Result<()> {
    let app = build_test_app().await?;

    let (status, body) = send(&app, "GET", "/users/999", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "User not found"}));
    Ok(())
}

#[tokio::test]
async fn partial_update_keeps_other_fields() -> anyhow::Result<()> {
    let app = build_test_app().await?;

    let (_, created) = send(&app, "POST", "/users", Some(json!({"name": "Taro", "email": "taro@example.com"}))).await?;

    let (status, updated) = send(&app, "PUT", "/users/1", Some(json!({"name": "Jiro"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Jiro");
    assert_eq!(updated["email"], created["email"]);
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_eq!(updated["id"], created["id"]);

    // explicit null behaves like an omitted field
    let (status, updated) = send(&app, "PUT", "/users/1", Some(json!({"name": null, "email": "jiro@example.com"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Jiro");
    assert_eq!(updated["email"], "jiro@example.com");
    Ok(())
}

#[tokio::test]
async fn update_to_taken_email_is_conflict_and_leaves_row() -> anyhow::Result<()> {
    let app = build_test_app().await?;

    send(&app, "POST", "/users", Some(json!({"name": "A", "email": "a@example.com"}))).await?;
    let (_, b) = send(&app, "POST", "/users", Some(json!({"name": "B", "email": "b@example.com"}))).await?;

    let (status, body) = send(&app, "PUT", "/users/2", Some(json!({"email": "a@example.com"}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["detail"].is_string());

    let (status, after) = send(&app, "GET", "/users/2", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after, b);

    let (status, _) = send(&app, "PUT", "/users/42", Some(json!({"name": "nobody"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_then_get_and_delete_again() -> anyhow::Result<()> {
    let app = build_test_app().await?;

    send(&app, "POST", "/users", Some(json!({"name": "A", "email": "a@example.com"}))).await?;

    let (status, body) = send(&app, "DELETE", "/users/1", None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, "GET", "/users/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", "/users/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");
    Ok(())
}

#[tokio::test]
async fn list_reflects_creates_minus_deletes() -> anyhow::Result<()> {
    let app = build_test_app().await?;

    for i in 0..4 {
        let (status, _) = send(&app, "POST", "/users", Some(json!({"name": format!("U{i}"), "email": format!("u{i}@example.com")}))).await?;
        assert_eq!(status, StatusCode::CREATED);
    }
    send(&app, "DELETE", "/users/2", None).await?;

    let (_, body) = send(&app, "GET", "/users", None).await?;
    let ids: Vec<i64> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|u| u["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![1, 3, 4]);
    Ok(())
}

#[tokio::test]
async fn invalid_input_is_client_error_with_detail() -> anyhow::Result<()> {
    let app = build_test_app().await?;

    // missing required field
    let (status, body) = send(&app, "POST", "/users", Some(json!({"name": "NoEmail"}))).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    // supplied but empty
    let (status, body) = send(&app, "POST", "/users", Some(json!({"name": "", "email": "e@example.com"}))).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    // non-integer id
    let (status, body) = send(&app, "GET", "/users/abc", None).await?;
    assert!(status.is_client_error());
    assert!(body["detail"].is_string());

    let (_, list) = send(&app, "GET", "/users", None).await?;
    assert_eq!(list, json!([]));
    Ok(())
}

#[tokio::test]
async fn root_and_health() -> anyhow::Result<()> {
    let app = build_test_app().await?;

    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, "GET", "/", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Hello from the user service!"}));
    Ok(())
}

#[tokio::test]
async fn unknown_routes_and_methods_have_detail() -> anyhow::Result<()> {
    let app = build_test_app().await?;

    let (status, body) = send(&app, "GET", "/users/", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Not Found"}));

    let (status, body) = send(&app, "GET", "/nowhere", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Not Found"}));

    let (status, body) = send(&app, "PATCH", "/users/1", Some(json!({"name": "x"}))).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"detail": "Method Not Allowed"}));

    let (status, body) = send(&app, "DELETE", "/users", None).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"detail": "Method Not Allowed"}));
    Ok(())
}

#[tokio::test]
async fn non_object_bodies_are_rejected() -> anyhow::Result<()> {
    let app = build_test_app().await?;

    let (_, created) = send(&app, "POST", "/users", Some(json!({"name": "A", "email": "a@example.com"}))).await?;

    for body in [json!([]), json!(["B", "b@example.com"]), json!("B"), json!(7)] {
        let (status, resp) = send(&app, "PUT", "/users/1", Some(body.clone())).await?;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "PUT {body}");
        assert!(resp["detail"].is_string());

        let (status, resp) = send(&app, "POST", "/users", Some(body.clone())).await?;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "POST {body}");
        assert!(resp["detail"].is_string());
    }

    let (_, list) = send(&app, "GET", "/users", None).await?;
    assert_eq!(list, json!([created]));
    Ok(())
}
