//! End-to-end API tests against an in-memory database

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use blogctl_server::db::{create_pool, migrations, seed};
use blogctl_server::{build_router, AppState, AuthConfig, AuthMode, BlogConfig};

async fn pool() -> SqlitePool {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    migrations::run(&pool).await.unwrap();
    pool
}

fn router(pool: SqlitePool, config: &BlogConfig) -> Router {
    build_router(AppState::new(pool, config), false)
}

async fn seeded() -> (Router, SqlitePool) {
    let pool = pool().await;
    seed::seed_demo_data(&pool).await.unwrap();
    (router(pool.clone(), &BlogConfig::default()), pool)
}

async fn empty() -> Router {
    router(pool().await, &BlogConfig::default())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

fn john_payload() -> Value {
    json!({
        "firstName": "John",
        "lastName": "Snow",
        "email": "j_snow@email.com",
        "age": 76
    })
}

#[tokio::test]
async fn health_reports_database() {
    let app = empty().await;
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn created_user_reads_back_with_links() {
    let app = empty().await;

    let (status, created) =
        send(&app, json_request(Method::POST, "/api/v1/users", john_payload())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, user) = send(&app, get(&format!("/api/v1/users/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["firstName"], "John");
    assert_eq!(user["lastName"], "Snow");
    assert_eq!(user["email"], "j_snow@email.com");
    assert_eq!(user["age"], 76);

    let links = &user["_links"];
    assert_eq!(links["self"]["href"], format!("/api/v1/users/{id}"));
    assert_eq!(links["user"]["href"], format!("/api/v1/users/{id}{{?projection}}"));
    assert_eq!(links["user"]["templated"], true);
    assert_eq!(links["posts"]["href"], format!("/api/v1/users/{id}/posts"));
    assert_eq!(links["comments"]["href"], format!("/api/v1/users/{id}/comments"));
}

#[tokio::test]
async fn create_sets_location_header() {
    let app = empty().await;
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/v1/users", john_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/api/v1/users/"));
}

#[tokio::test]
async fn users_resume_projection() {
    let (app, _) = seeded().await;

    let (status, body) = send(&app, get("/api/v1/users/1?projection=usersResume")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fullName"], "John Snow");
    assert!(body.get("firstName").is_none());
    assert!(body.get("lastName").is_none());
    assert_eq!(body["_links"]["self"]["href"], "/api/v1/users/1");
}

#[tokio::test]
async fn unknown_projection_returns_full_user() {
    let (app, _) = seeded().await;
    let (_, body) = send(&app, get("/api/v1/users/2?projection=whatever")).await;
    assert_eq!(body["firstName"], "Mario");
    assert!(body.get("fullName").is_none());
}

#[tokio::test]
async fn comment_pages_honor_size() {
    let (app, _) = seeded().await;

    for size in [5_usize, 10, 20, 30] {
        let (status, body) = send(&app, get(&format!("/api/v1/postComments?size={size}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["_embedded"]["postComments"].as_array().unwrap().len(),
            size
        );
        assert_eq!(body["page"]["size"], size);
        assert_eq!(body["page"]["totalElements"], 560);
        assert_eq!(body["page"]["number"], 0);
    }
}

#[tokio::test]
async fn comment_resume_projection_in_collection() {
    let (app, _) = seeded().await;
    let (_, body) = send(
        &app,
        get("/api/v1/postComments?size=3&projection=postCommentResume"),
    )
    .await;

    for comment in body["_embedded"]["postComments"].as_array().unwrap() {
        assert!(comment["status"].is_string());
        assert!(comment.get("createdAt").is_none());
        assert!(comment["_links"]["post"]["href"].is_string());
    }
}

#[tokio::test]
async fn paging_links_and_oversized_pages() {
    let (app, _) = seeded().await;

    let (_, body) = send(&app, get("/api/v1/posts?page=1&size=10&sort=title,desc")).await;
    assert_eq!(body["page"]["totalPages"], 6);
    assert_eq!(
        body["_links"]["next"]["href"],
        "/api/v1/posts?page=2&size=10&sort=title,desc"
    );
    assert_eq!(
        body["_links"]["prev"]["href"],
        "/api/v1/posts?page=0&size=10&sort=title,desc"
    );

    let (_, body) = send(&app, get("/api/v1/posts?size=0")).await;
    assert_eq!(body["page"]["size"], 20);

    let (_, body) = send(&app, get("/api/v1/postComments?size=5000")).await;
    assert_eq!(body["page"]["size"], 2000);
    assert_eq!(body["_embedded"]["postComments"].as_array().unwrap().len(), 560);
}

#[tokio::test]
async fn bad_query_parameters_are_400() {
    let (app, _) = seeded().await;

    let (status, body) = send(&app, get("/api/v1/users?sort=password")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = send(&app, get("/api/v1/users?size=lots")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/api/v1/postComments?status=99")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/api/v1/users/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn filters_narrow_collections() {
    let (app, _) = seeded().await;

    let (_, body) = send(&app, get("/api/v1/users?lastName=Pizza")).await;
    assert_eq!(body["page"]["totalElements"], 1);
    assert_eq!(body["_embedded"]["users"][0]["email"], "m_pizza@email.com");

    let (_, body) = send(&app, get("/api/v1/postComments?postId=1&size=50")).await;
    assert_eq!(body["page"]["totalElements"], 10);

    let (_, all) = send(&app, get("/api/v1/postComments?size=2000")).await;
    let approved = all["_embedded"]["postComments"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["status"] == "APPROVED")
        .count();
    let (_, body) = send(&app, get("/api/v1/postComments?status=APPROVED")).await;
    assert_eq!(body["page"]["totalElements"], approved);
    let (_, body) = send(&app, get("/api/v1/postComments?status=1")).await;
    assert_eq!(body["page"]["totalElements"], approved);
}

#[tokio::test]
async fn association_routes() {
    let (app, _) = seeded().await;

    let (status, body) = send(&app, get("/api/v1/users/1/posts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"]["totalElements"], 28);

    let (_, body) = send(&app, get("/api/v1/posts/1/user")).await;
    assert_eq!(body["firstName"], "John");

    let (_, body) = send(&app, get("/api/v1/posts/1/comments")).await;
    assert_eq!(body["page"]["totalElements"], 10);

    let (_, body) = send(&app, get("/api/v1/postComments/1/post")).await;
    assert_eq!(body["title"], "Post title 0");

    let (_, body) = send(&app, get("/api/v1/postComments/1/user?projection=usersResume")).await;
    assert_eq!(body["fullName"], "John Snow");

    let (status, _) = send(&app, get("/api/v1/users/999/posts")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn replace_changes_every_field() {
    let app = empty().await;
    let (_, created) = send(&app, json_request(Method::POST, "/api/v1/users", john_payload())).await;
    let id = created["id"].as_i64().unwrap();

    let (status, replaced) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/v1/users/{id}"),
            json!({
                "firstName": "John Changed",
                "lastName": "Snow Changed",
                "email": "changed_j_snow@email.com",
                "age": 77
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], id);
    assert_eq!(replaced["firstName"], "John Changed");
    assert_eq!(replaced["lastName"], "Snow Changed");
    assert_eq!(replaced["email"], "changed_j_snow@email.com");
    assert_eq!(replaced["age"], 77);
}

#[tokio::test]
async fn replace_unknown_id_is_404() {
    let app = empty().await;
    let (status, body) = send(
        &app,
        json_request(Method::PUT, "/api/v1/users/42", john_payload()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn deleted_user_is_gone() {
    let app = empty().await;
    let (_, created) = send(&app, json_request(Method::POST, "/api/v1/users", john_payload())).await;
    let uri = format!("/api/v1/users/{}", created["id"]);

    let (status, _) = send(&app, delete(&uri)).await;
    assert!(status.is_success());

    let (status, _) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_replace_then_delete() {
    let (app, _) = seeded().await;
    let payload = json!({ "title": "Draft", "content": "First words", "user": 1 });
    let (status, created) = send(&app, json_request(Method::POST, "/api/v1/posts", payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/v1/posts/{}", created["id"]);

    let replacement = json!({
        "title": "Final",
        "content": "Last words",
        "user": "/api/v1/users/2"
    });
    let (status, replaced) = send(&app, json_request(Method::PUT, &uri, replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], created["id"]);
    assert_eq!(replaced["title"], "Final");
    assert_eq!(replaced["userId"], 2);

    let (status, _) = send(&app, delete(&uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, delete(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_replace_then_delete() {
    let (app, _) = seeded().await;
    let uri = "/api/v1/postComments/1";

    let replacement = json!({
        "review": "Edited",
        "votes": 7,
        "status": "ARCHIVED",
        "post": 2,
        "user": 2
    });
    let (status, replaced) = send(&app, json_request(Method::PUT, uri, replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["review"], "Edited");
    assert_eq!(replaced["status"], "ARCHIVED");
    assert_eq!(replaced["postId"], 2);

    let (status, _) = send(&app, delete(uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get(uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, json_request(Method::PUT, uri, json!({ "review": "r", "post": 1, "user": 1 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn write_conflicts_and_bad_references() {
    let (app, _) = seeded().await;

    let duplicate = json!({
        "firstName": "Other",
        "lastName": "Person",
        "email": "j_snow@email.com",
        "age": 30
    });
    let (status, body) = send(&app, json_request(Method::POST, "/api/v1/users", duplicate)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, _) = send(&app, delete("/api/v1/users/1")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, delete("/api/v1/posts/1")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let orphan = json!({ "title": "t", "content": "c", "user": 999 });
    let (status, body) = send(&app, json_request(Method::POST, "/api/v1/posts", orphan)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn invalid_user_payloads_are_400() {
    let app = empty().await;

    for payload in [
        json!({ "firstName": "a", "lastName": "b", "email": "not-an-email", "age": 1 }),
        json!({ "firstName": " ", "lastName": "b", "email": "a@b.com", "age": 1 }),
        json!({ "firstName": "a", "lastName": "b", "email": "a@b.com", "age": -1 }),
        json!({ "firstName": "a", "lastName": "b", "email": "a@b.com" }),
    ] {
        let (status, body) = send(&app, json_request(Method::POST, "/api/v1/users", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }
}

#[tokio::test]
async fn comments_by_uri_reference_and_status() {
    let (app, _) = seeded().await;

    let payload = json!({
        "review": "Nice post",
        "votes": 3,
        "status": "approved",
        "post": "/api/v1/posts/2",
        "user": "/api/v1/users/1"
    });
    let (status, body) =
        send(&app, json_request(Method::POST, "/api/v1/postComments", payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "APPROVED");
    assert_eq!(body["postId"], 2);

    let bad_status = json!({ "review": "r", "status": 99, "post": 1, "user": 1 });
    let (status, _) =
        send(&app, json_request(Method::POST, "/api/v1/postComments", bad_status)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stored_unknown_status_is_internal_error() {
    let (app, pool) = seeded().await;
    sqlx::query("UPDATE post_comments SET status = 99 WHERE id = 1")
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = send(&app, get("/api/v1/postComments/1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
}

#[tokio::test]
async fn principal_required_for_reads() {
    let pool = pool().await;
    let config = BlogConfig {
        auth: AuthConfig {
            mode: AuthMode::PrincipalForReads,
            tokens: vec!["reader".into()],
        },
        ..Default::default()
    };
    let app = router(pool, &config);

    let (status, body) = send(&app, get("/api/v1/users")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    for uri in ["/api/v1/users/1", "/api/v1/users/999"] {
        let head = Request::head(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(head).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "HEAD {uri}");
    }

    let wrong = Request::get("/api/v1/users")
        .header(header::AUTHORIZATION, "Bearer mallory")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, wrong).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let right = Request::get("/api/v1/users")
        .header(header::AUTHORIZATION, "Bearer reader")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, right).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, json_request(Method::POST, "/api/v1/users", john_payload())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn public_url_prefixes_links() {
    let pool = pool().await;
    seed::seed_demo_data(&pool).await.unwrap();
    let config = BlogConfig {
        public_url: "https://blog.example.com".into(),
        ..Default::default()
    };
    let app = router(pool, &config);

    let (_, body) = send(&app, get("/api/v1/posts/1")).await;
    assert_eq!(
        body["_links"]["user"]["href"],
        "https://blog.example.com/api/v1/posts/1/user"
    );
}
