#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use film_library_api::auth::{Role, TokenCodec};
use film_library_api::config::AppConfig;
use film_library_api::database::manager;
use film_library_api::router;
use film_library_api::state::AppState;

const SECRET: &str = "integration-test-secret";

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// In-process app backed by the database named in `DATABASE_URL`.
pub struct TestApp {
    pub app: Router,
    pub pool: PgPool,
    pub admin: String,
    pub user: String,
}

/// Returns `None` when `DATABASE_URL` is not set, so the suite passes on
/// machines without Postgres.
pub async fn setup() -> Result<Option<TestApp>> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return Ok(None);
    };

    let mut config = AppConfig::for_tests(SECRET);
    config.database.url = Some(url);
    config.database.max_connections = 2;

    let pool = manager::connect(&config.database).await.context("failed to connect")?;
    manager::migrate(&pool).await.context("failed to migrate")?;

    let codec = TokenCodec::from_config(&config.security);
    Ok(Some(TestApp {
        app: router::app(AppState::new(&config, pool.clone())),
        pool,
        admin: codec.issue(1, Role::Admin)?,
        user: codec.issue(2, Role::User)?,
    }))
}

/// Name that no other test run will collide with.
pub fn unique(prefix: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}-{:x}-{}", prefix, nanos, COUNTER.fetch_add(1, Ordering::Relaxed))
}

impl TestApp {
    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<(StatusCode, String)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        let response = self.app.clone().oneshot(builder.body(body)?).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        Ok((status, String::from_utf8(bytes.to_vec())?))
    }

    pub async fn json(&self, uri: &str) -> Result<Value> {
        let (status, body) = self.send(Method::GET, uri, Some(&self.user), None).await?;
        anyhow::ensure!(status == StatusCode::OK, "GET {} returned {}: {}", uri, status, body);
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn create(&self, uri: &str, body: Value) -> Result<i32> {
        let (status, text) = self.send(Method::POST, uri, Some(&self.admin), Some(body)).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "POST {} returned {}: {}", uri, status, text);
        Ok(text.parse()?)
    }
}
