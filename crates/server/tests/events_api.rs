use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::events::repository::mock::{InMemoryEventStore, StoreOp};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes;
use server::state::ServerState;

struct TestApp {
    base_url: String,
    store: Arc<InMemoryEventStore>,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let store = Arc::new(InMemoryEventStore::default());
    let state = ServerState::new(store.clone());

    let app: Router = routes::build_router(state, CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, store })
}

async fn create(c: &reqwest::Client, app: &TestApp, body: Value) -> anyhow::Result<Value> {
    let res = c.post(format!("{}/events", app.base_url)).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(res.json::<Value>().await?)
}

#[tokio::test]
async fn health_reports_ok() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn legacy_post_path_creates_event() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.post(format!("{}/post", app.base_url))
        .json(&json!({"name": "quarterly review", "payload": {"room": "4B"}}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert!(body["id"].as_str().and_then(|s| Uuid::parse_str(s).ok()).is_some());
    assert_eq!(body["name"], "quarterly review");
    assert_eq!(body["payload"]["room"], "4B");
    assert_eq!(body["notification_sent"], false);
    assert_eq!(body["is_deleted"], false);
    Ok(())
}

#[tokio::test]
async fn create_rejected_by_store_is_unprocessable_and_empty() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.store.set_fail_saves(true);

    let res = reqwest::Client::new()
        .post(format!("{}/events", app.base_url))
        .json(&json!({"name": "never stored"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.bytes().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn create_with_wrongly_typed_field_is_unprocessable_and_empty() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::Client::new()
        .post(format!("{}/events", app.base_url))
        .json(&json!({"name": 5}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.bytes().await?.is_empty());
    assert_eq!(app.store.calls(StoreOp::Save), 0);
    Ok(())
}

#[tokio::test]
async fn create_with_broken_json_is_bad_request() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::Client::new()
        .post(format!("{}/events", app.base_url))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(app.store.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn store_outage_is_internal_error_and_empty() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let created = create(&c, &app, json!({"name": "town hall"})).await?;
    let url = format!("{}/events/{}", app.base_url, created["id"].as_str().unwrap_or_default());
    app.store.set_fail_reads(true);

    for res in [
        c.get(&url).send().await?,
        c.put(format!("{url}/notification")).send().await?,
        c.delete(&url).send().await?,
        c.get(format!("{}/events?is_deleted=false", app.base_url)).send().await?,
    ] {
        assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.bytes().await?.is_empty());
    }
    assert_eq!(app.store.calls(StoreOp::Save), 1);
    Ok(())
}

#[tokio::test]
async fn get_known_and_unknown_event() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let created = create(&c, &app, json!({"name": "standup"})).await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let res = c.get(format!("{}/events/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, created);

    let res = c.get(format!("{}/events/{}", app.base_url, Uuid::new_v4())).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert!(res.bytes().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_id_is_bad_request() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/events/not-a-uuid", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Bad Request");
    Ok(())
}

#[tokio::test]
async fn notification_can_be_marked_only_once() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let created = create(&c, &app, json!({"name": "webinar"})).await?;
    let url = format!("{}/events/{}/notification", app.base_url, created["id"].as_str().unwrap_or_default());

    let res = c.put(&url).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["notification_sent"], true);

    let res = c.put(&url).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.bytes().await?.is_empty());

    // create + first update; the refused update never reaches save
    assert_eq!(app.store.calls(StoreOp::Save), 2);

    let res = c.put(format!("{}/events/{}/notification", app.base_url, Uuid::new_v4())).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_is_soft_and_not_repeatable() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let created = create(&c, &app, json!({"name": "offsite"})).await?;
    let url = format!("{}/events/{}", app.base_url, created["id"].as_str().unwrap_or_default());

    let res = c.delete(&url).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty());

    // record is kept with the flag set
    let res = c.get(&url).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["is_deleted"], true);

    let res = c.delete(&url).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

    let saves = app.store.calls(StoreOp::Save);
    let res = c.delete(format!("{}/events/{}", app.base_url, Uuid::new_v4())).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(app.store.calls(StoreOp::Save), saves);
    Ok(())
}

#[tokio::test]
async fn list_dispatches_on_filters() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let a = create(&c, &app, json!({"name": "a", "notification_sent": true})).await?;
    let b = create(&c, &app, json!({"name": "b", "notification_sent": true, "is_deleted": true})).await?;
    let _plain = create(&c, &app, json!({"name": "c"})).await?;

    let res = c.get(format!("{}/events", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Vec<Value>>().await?.len(), 3);
    assert_eq!(app.store.calls(StoreOp::FindAll), 1);

    let res = c.get(format!("{}/events?notification_sent=true&page=2", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Vec<Value>>().await?, vec![a.clone(), b.clone()]);
    assert_eq!(app.store.calls(StoreOp::FilterByNotificationSent), 1);

    let res = c.get(format!("{}/events?is_deleted=true", app.base_url)).send().await?;
    assert_eq!(res.json::<Vec<Value>>().await?, vec![b]);
    assert_eq!(app.store.calls(StoreOp::FilterByIsDeleted), 1);

    let res = c.get(format!("{}/events?notification_sent=true&is_deleted=false", app.base_url)).send().await?;
    assert_eq!(res.json::<Vec<Value>>().await?, vec![a]);
    assert_eq!(app.store.calls(StoreOp::FilterByNotificationSentAndIsDeleted), 1);

    let res = c.get(format!("{}/events?notification_sent=false&is_deleted=true", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.json::<Vec<Value>>().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn non_boolean_filter_is_bad_request() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/events?is_deleted=maybe", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(app.store.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/api-docs/openapi.json", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let doc = res.json::<Value>().await?;
    assert!(doc["paths"].get("/events/{id}/notification").is_some());
    Ok(())
}
