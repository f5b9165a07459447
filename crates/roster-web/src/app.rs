//! # Application Routes
//!
//! Route registration and the request handlers behind them.
//!
//! Routes are registered in a fixed startup order and matched first to
//! last: `GET /`, `GET /hello`, `GET /users`, `GET /users/{id}`, and the
//! `GET /static/*path` catch-all. Handlers receive the record store as an
//! injected `Arc`, perform at most one query, and produce exactly one
//! response; store faults propagate to the dispatcher's 500 boundary
//! untouched.

use crate::pages::layout;
use crate::store::RecordStore;
use roster_core::{static_files, Fragment, RequestContext, Response, Result, Server};
use std::path::PathBuf;
use std::sync::Arc;

/// Build the server with every route registered, ready to serve.
///
/// # Errors
///
/// Returns [`roster_core::Error::InvalidRoutePattern`] if a registered
/// pattern is malformed.
pub fn build_app(store: Arc<dyn RecordStore>, static_root: PathBuf) -> Result<Server> {
    let mut server = Server::new();

    server.get("/", |_ctx| async { Ok(home()) })?;
    server.get("/hello", |_ctx| async { Ok(hello()) })?;

    let users_store = store.clone();
    server.get("/users", move |_ctx| {
        let store = users_store.clone();
        async move { list_users(store.as_ref()).await }
    })?;

    let detail_store = store;
    server.get("/users/{id}", move |ctx| {
        let store = detail_store.clone();
        async move { user_detail(store.as_ref(), &ctx).await }
    })?;

    server.get("/static/*path", move |ctx| {
        let root = static_root.clone();
        async move {
            let asset = ctx.param("path").unwrap_or_default().to_string();
            static_files::serve(&root, &asset).await
        }
    })?;

    Ok(server)
}

/// `GET /` - the home page. No I/O.
fn home() -> Response {
    Response::html(layout("Hello, World!", Fragment::new()))
}

/// `GET /hello` - greeting page with a fixed static image reference. No I/O.
fn hello() -> Response {
    Response::html(layout(
        "Hello, Hono!",
        Fragment::raw("<img src=\"/static/hono.png\">"),
    ))
}

/// `GET /users` - every record as a link to its detail page.
///
/// Storage's natural order is preserved. Each list item escapes its name
/// individually; the assembled list is therefore pushed raw, so nothing is
/// escaped twice. Zero records yield an empty list, not an error.
async fn list_users(store: &dyn RecordStore) -> Result<Response> {
    let people = store.all().await?;

    let mut list = Fragment::raw("<ul>");
    for person in &people {
        list.push_raw("<li><a href=\"/users/");
        list.push_text(&person.id.to_string());
        list.push_raw("\">");
        list.push_text(&person.name);
        list.push_raw("</a></li>");
    }
    list.push_raw("</ul>");

    Ok(Response::html(layout("All Users", list)))
}

/// `GET /users/{id}` - detail page for one record, or a plain-text 404.
///
/// The id is an opaque string bound as a query parameter. A miss bypasses
/// the layout entirely.
async fn user_detail(store: &dyn RecordStore, ctx: &RequestContext) -> Result<Response> {
    let id = ctx.param("id").unwrap_or_default();

    match store.by_id(id).await? {
        Some(person) => {
            let mut detail = Fragment::raw("Id: ");
            detail.push_text(&person.id.to_string());
            detail.push_raw("<br>User: ");
            detail.push_text(&person.name);
            Ok(Response::html(layout("User Details", detail)))
        }
        None => Ok(Response::text("User not found").with_status(404)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::memory_store;
    use crate::store::Person;
    use async_trait::async_trait;
    use roster_core::{Error, Method};

    async fn app_with(rows: &[(i64, &str)]) -> Server {
        let store = Arc::new(memory_store(rows).await);
        build_app(store, PathBuf::from("static")).unwrap()
    }

    #[tokio::test]
    async fn test_home_page() {
        let app = app_with(&[]).await;
        let resp = app.dispatch(Method::Get, "/").await;

        assert_eq!(resp.status, 200);
        let body = resp.body_str().unwrap();
        assert!(body.contains("<title>Hello, World!</title>"));
        assert!(body.contains("<h1>Hello, World!</h1>"));
    }

    #[tokio::test]
    async fn test_hello_page_embeds_image() {
        let app = app_with(&[]).await;
        let resp = app.dispatch(Method::Get, "/hello").await;

        assert_eq!(resp.status, 200);
        let body = resp.body_str().unwrap();
        assert!(body.contains("<title>Hello, Hono!</title>"));
        assert!(body.contains("<img src=\"/static/hono.png\">"));
    }

    #[tokio::test]
    async fn test_users_page_links_each_record() {
        let app = app_with(&[(1, "Alice"), (2, "Bob")]).await;
        let resp = app.dispatch(Method::Get, "/users").await;

        assert_eq!(resp.status, 200);
        let body = resp.body_str().unwrap();
        assert!(body.contains("<title>All Users</title>"));
        assert!(body.contains("<a href=\"/users/1\">Alice</a>"));
        assert!(body.contains("<a href=\"/users/2\">Bob</a>"));
    }

    #[tokio::test]
    async fn test_users_page_escapes_names() {
        let app = app_with(&[(1, "<script>alert(1)</script>")]).await;
        let resp = app.dispatch(Method::Get, "/users").await;

        let body = resp.body_str().unwrap();
        assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!body.contains("<script>"));
    }

    #[tokio::test]
    async fn test_users_page_with_no_records() {
        let app = app_with(&[]).await;
        let resp = app.dispatch(Method::Get, "/users").await;

        assert_eq!(resp.status, 200);
        let body = resp.body_str().unwrap();
        assert!(body.contains("<ul></ul>"));
        assert!(body.contains("<footer>"));
    }

    #[tokio::test]
    async fn test_user_detail_round_trip() {
        let app = app_with(&[(42, "Grace")]).await;
        let resp = app.dispatch(Method::Get, "/users/42").await;

        assert_eq!(resp.status, 200);
        let body = resp.body_str().unwrap();
        assert!(body.contains("<title>User Details</title>"));
        assert!(body.contains("Id: 42"));
        assert!(body.contains("User: Grace"));
    }

    #[tokio::test]
    async fn test_user_detail_escapes_name() {
        let app = app_with(&[(1, "<b>bold</b>")]).await;
        let resp = app.dispatch(Method::Get, "/users/1").await;

        let body = resp.body_str().unwrap();
        assert!(body.contains("User: &lt;b&gt;bold&lt;/b&gt;"));
        assert!(!body.contains("<b>bold</b>"));
    }

    #[tokio::test]
    async fn test_user_detail_miss_is_plain_404() {
        let app = app_with(&[(1, "Alice")]).await;
        let resp = app.dispatch(Method::Get, "/users/999").await;

        assert_eq!(resp.status, 404);
        assert_eq!(resp.body_str(), Some("User not found"));
        assert_eq!(resp.content_type, "text/plain; charset=utf-8");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let app = app_with(&[(1, "Alice")]).await;
        let resp = app.dispatch(Method::Get, "/nonexistent-path").await;
        assert_eq!(resp.status, 404);
    }

    #[tokio::test]
    async fn test_users_literal_not_captured_by_detail_route() {
        // /users renders the list, not a detail lookup for an empty id.
        let app = app_with(&[(1, "Alice")]).await;
        let resp = app.dispatch(Method::Get, "/users").await;

        assert_eq!(resp.status, 200);
        assert!(resp.body_str().unwrap().contains("<title>All Users</title>"));
    }

    #[tokio::test]
    async fn test_static_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let payload: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        std::fs::write(dir.path().join("hono.png"), &payload).unwrap();

        let store = Arc::new(memory_store(&[]).await);
        let app = build_app(store, dir.path().to_path_buf()).unwrap();

        let resp = app.dispatch(Method::Get, "/static/hono.png").await;
        assert_eq!(resp.status, 200);
        assert_eq!(resp.content_type, "image/png");
        assert_eq!(resp.body.as_ref(), payload.as_slice());

        let resp = app.dispatch(Method::Get, "/static/missing-file.png").await;
        assert_eq!(resp.status, 404);
    }

    struct FailingStore;

    #[async_trait]
    impl RecordStore for FailingStore {
        async fn all(&self) -> Result<Vec<Person>> {
            Err(Error::Database {
                message: "connection lost".to_string(),
            })
        }

        async fn by_id(&self, _id: &str) -> Result<Option<Person>> {
            Err(Error::Database {
                message: "connection lost".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_store_fault_becomes_500_without_leaking() {
        let app = build_app(Arc::new(FailingStore), PathBuf::from("static")).unwrap();

        for path in ["/users", "/users/1"] {
            let resp = app.dispatch(Method::Get, path).await;
            assert_eq!(resp.status, 500);
            assert_eq!(resp.body_str(), Some("Internal Server Error"));
        }
    }
}
