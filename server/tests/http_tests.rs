mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use larder_server::auth::create_session;
use larder_server::config::Config;
use larder_server::db::DbPool;
use larder_server::{app, AppContext};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use common::{test_pool, user};

// 1x1 transparent PNG.
const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0x64,
    0x60, 0xf8, 0x5f, 0x0f, 0x00, 0x02, 0x87, 0x01, 0x80, 0xeb, 0x47, 0xba, 0x92, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost/larder_unused".to_string()),
        "LARDER_PUBLIC_URL" => Some("http://larder.test".to_string()),
        _ => None,
    })
    .expect("test config")
}

/// A pool that never connects, for requests rejected before any query runs.
fn offline_pool() -> DbPool {
    Pool::builder()
        .min_idle(Some(0))
        .build_unchecked(ConnectionManager::<PgConnection>::new(
            "postgres://localhost/larder_unused",
        ))
}

async fn serve(pool: DbPool) -> SocketAddr {
    let state = Arc::new(AppContext {
        pool,
        config: test_config(),
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app(state)).await.expect("serve app") });
    addr
}

async fn send(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\nContent-Length: {}\r\n",
        body.len()
    );
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    req.push_str("\r\n");
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request head");
    stream
        .write_all(body.as_bytes())
        .await
        .expect("write request body");

    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_string(), body.to_string())
}

fn json(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("not JSON ({e}): {body}"))
}

const JSON: (&str, &str) = ("Content-Type", "application/json");

#[tokio::test]
async fn test_wrong_typed_field_is_field_error() {
    let addr = serve(offline_pool()).await;

    let (status, head, body) = send(
        addr,
        "POST",
        "/api/users",
        &[JSON],
        r#"{"email": 5, "username": "cook", "first_name": "A", "last_name": "B", "password": "pw"}"#,
    )
    .await;
    assert_eq!(status, 400, "{head}\n{body}");
    assert!(head.to_ascii_lowercase().contains("application/json"), "{head}");
    let body = json(&body);
    assert_eq!(body["error"], "Invalid request body");
    assert!(body["fields"]["email"][0].is_string(), "{body}");
}

#[tokio::test]
async fn test_malformed_body_uses_error_shape() {
    let addr = serve(offline_pool()).await;

    let (status, _, body) = send(addr, "POST", "/api/users", &[JSON], "{not json").await;
    assert_eq!(status, 400);
    assert!(json(&body)["error"].is_string());

    let (status, _, body) = send(addr, "POST", "/api/users", &[], "{}").await;
    assert_eq!(status, 400);
    assert!(json(&body)["error"].is_string());

    let (status, _, body) = send(addr, "POST", "/api/users", &[JSON], "{}").await;
    assert_eq!(status, 400);
    assert!(json(&body)["fields"]["email"].is_array(), "{body}");
}

#[tokio::test]
async fn test_recipe_body_type_errors_are_validation_errors() {
    let Some(pool) = test_pool() else {
        return;
    };
    let token = {
        let mut conn = pool.get().expect("test connection");
        let cook = user(&mut conn);
        create_session(&mut conn, cook.id, 1).expect("session")
    };
    let addr = serve(pool).await;
    let auth = format!("Token {token}");

    let (status, _, body) = send(
        addr,
        "POST",
        "/api/recipes",
        &[JSON, ("Authorization", &auth)],
        r#"{"name": "Soup", "text": "Boil.", "cooking_time": "abc", "tags": [], "ingredients": []}"#,
    )
    .await;
    assert_eq!(status, 400, "{body}");
    let body = json(&body);
    assert!(body["fields"]["cooking_time"].is_array(), "{body}");
}

#[tokio::test]
async fn test_large_avatar_is_accepted() {
    let Some(pool) = test_pool() else {
        return;
    };
    let token = {
        let mut conn = pool.get().expect("test connection");
        let cook = user(&mut conn);
        create_session(&mut conn, cook.id, 1).expect("session")
    };
    let addr = serve(pool).await;
    let auth = format!("Token {token}");

    let mut png = PIXEL_PNG.to_vec();
    png.resize(3 * 1024 * 1024, 0);
    let request = serde_json::json!({
        "avatar": format!("data:image/png;base64,{}", STANDARD.encode(&png)),
    })
    .to_string();
    assert!(request.len() > 2 * 1024 * 1024);

    let (status, _, body) = send(
        addr,
        "PUT",
        "/api/users/me/avatar",
        &[JSON, ("Authorization", &auth)],
        &request,
    )
    .await;
    assert_eq!(status, 200, "{body}");
    let avatar = json(&body)["avatar"].as_str().unwrap_or_default().to_string();
    assert!(avatar.starts_with("http://larder.test/api/images/"), "{avatar}");
}
