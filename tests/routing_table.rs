//! Route table tests: every generated route, driven in-process.

use axum::http::{header, StatusCode};
use serde_json::json;

use todo_backend::config::AppConfig;

mod common;

use common::{app, json_body, send, test_config};

#[tokio::test]
async fn test_every_crud_route_resolves() {
    let app = app(test_config());

    let res = send(&app, "POST", "/todos", Some(json!({ "title": "first" }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = send(&app, "GET", "/todos", None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = send(&app, "GET", "/todos/1", None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = send(&app, "PUT", "/todos/1", Some(json!({ "title": "renamed" }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = send(&app, "PATCH", "/todos/1", Some(json!({ "completed": true }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = send(&app, "DELETE", "/todos/1", None).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_trailing_slash_never_matches() {
    let app = app(test_config());
    send(&app, "POST", "/todos", Some(json!({ "title": "a" }))).await;

    for (method, path) in [
        ("GET", "/todos/"),
        ("POST", "/todos/"),
        ("GET", "/todos/1/"),
        ("PUT", "/todos/1/"),
        ("PATCH", "/todos/1/"),
        ("DELETE", "/todos/1/"),
    ] {
        let res = send(&app, method, path, None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{method} {path}");
        assert!(res.headers().get(header::LOCATION).is_none(), "no redirect");
        assert_eq!(json_body(res).await, json!({ "detail": "Not found." }));
    }
}

#[tokio::test]
async fn test_prefix_is_exact() {
    let app = app(test_config());
    for path in ["/api/todos", "/todo", "/todosx", "/TODOS", "/todos/1/extra"] {
        let res = send(&app, "GET", path, None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn test_unsupported_methods_are_405() {
    let app = app(test_config());

    let res = send(&app, "DELETE", "/todos", None).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()[header::ALLOW], "GET, POST, HEAD, OPTIONS");
    assert_eq!(
        json_body(res).await,
        json!({ "detail": "Method \"DELETE\" not allowed." })
    );

    let res = send(&app, "POST", "/todos/1", None).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        res.headers()[header::ALLOW],
        "GET, PUT, PATCH, DELETE, HEAD, OPTIONS"
    );
}

#[tokio::test]
async fn test_routed_responses_carry_allow() {
    let app = app(test_config());
    let res = send(&app, "GET", "/todos", None).await;
    assert_eq!(res.headers()[header::ALLOW], "GET, POST, HEAD, OPTIONS");

    let res = send(&app, "GET", "/todos/99", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        res.headers()[header::ALLOW],
        "GET, PUT, PATCH, DELETE, HEAD, OPTIONS"
    );
}

#[tokio::test]
async fn test_api_root_lists_prefix() {
    let app = app(test_config());
    let res = send(&app, "GET", "/", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        json_body(res).await,
        json!({ "todos": "http://testserver/todos" })
    );

    let res = send(&app, "POST", "/", None).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_options_metadata() {
    let app = app(test_config());
    let res = send(&app, "OPTIONS", "/todos", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::ALLOW], "GET, POST, HEAD, OPTIONS");
    let body = json_body(res).await;
    assert_eq!(body["name"], "Todo Item List");
    assert_eq!(body["renders"], json!(["application/json"]));
}

#[tokio::test]
async fn test_head_has_no_body() {
    let app = app(test_config());
    send(&app, "POST", "/todos", Some(json!({ "title": "a" }))).await;

    let res = send(&app, "HEAD", "/todos", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await, serde_json::Value::Null);
}

#[tokio::test]
async fn test_head_content_length_matches_get() {
    let app = app(test_config());
    send(&app, "POST", "/todos", Some(json!({ "title": "measure me" }))).await;

    for path in ["/todos", "/todos/1", "/"] {
        let get = send(&app, "GET", path, None).await;
        let get_len = axum::body::to_bytes(get.into_body(), usize::MAX)
            .await
            .unwrap()
            .len();
        assert!(get_len > 0, "{path}");

        let head = send(&app, "HEAD", path, None).await;
        assert_eq!(
            head.headers()[header::CONTENT_LENGTH],
            get_len.to_string().as_str(),
            "{path}"
        );
        assert!(axum::body::to_bytes(head.into_body(), usize::MAX)
            .await
            .unwrap()
            .is_empty());
    }
}

#[tokio::test]
async fn test_percent_encoded_paths_resolve() {
    let app = app(test_config());
    send(&app, "POST", "/todos", Some(json!({ "title": "encoded" }))).await;

    let res = send(&app, "GET", "/todos/%31", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["title"], "encoded");

    let res = send(&app, "GET", "/todo%73", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await.as_array().map(Vec::len), Some(1));

    // Decodes to a trailing slash, which never matches
    let res = send(&app, "GET", "/todos%2F", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = send(&app, "GET", "/todos/%FF", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().get(header::ALLOW).is_none());
}

#[tokio::test]
async fn test_format_suffix() {
    let app = app(test_config());
    send(&app, "POST", "/todos", Some(json!({ "title": "a" }))).await;

    let res = send(&app, "GET", "/todos.json", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await.as_array().map(Vec::len), Some(1));

    let res = send(&app, "GET", "/todos/1.json", None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = send(&app, "GET", "/todos.xml", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trailing_slash_option_flips_shape() {
    let mut config = test_config();
    config.router.trailing_slash = true;
    let app = app(config);

    let res = send(&app, "POST", "/todos/", Some(json!({ "title": "a" }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        res.headers()[header::LOCATION],
        "http://testserver/todos/1/"
    );

    let res = send(&app, "GET", "/todos", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // A format suffix makes the slash optional
    for path in ["/todos.json", "/todos.json/", "/todos/1.json"] {
        let res = send(&app, "GET", path, None).await;
        assert_eq!(res.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn test_public_url_overrides_host() {
    let mut config = AppConfig::default();
    config.api.public_url = Some("https://todo.example.com".into());
    let app = app(config);

    let res = send(&app, "POST", "/todos", Some(json!({ "title": "a" }))).await;
    assert_eq!(
        json_body(res).await["url"],
        "https://todo.example.com/todos/1"
    );
}

#[tokio::test]
async fn test_request_id_is_assigned() {
    let app = app(test_config());
    let res = send(&app, "GET", "/todos", None).await;
    let id = res.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}
