//! Common test utilities for integration tests
//!
//! Every test gets its own router over a fresh in-memory store, so tests
//! are independent and need no external services.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::collections::HashMap;
use tasklist_api::app::{build_router, AppState};
use tasklist_api::config::Config;
use tasklist_shared::store::Store;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing the app and its configuration
pub struct TestContext {
    pub app: Router,
    pub config: Config,
    pub store: Store,
}

/// A signed-up user and its bearer token
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

impl TestUser {
    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestContext {
    /// Creates a new test context over an empty in-memory store
    pub fn new() -> Self {
        let vars: HashMap<&str, &str> = [("JWT_SECRET", TEST_JWT_SECRET), ("STORAGE_BACKEND", "memory")]
            .into_iter()
            .collect();
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
            .expect("test config");

        let store = Store::memory();
        let app = build_router(AppState::new(store.clone(), config.clone()));

        Self { app, config, store }
    }

    /// Sends a request, optionally with a JSON body and bearer header
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        authorization: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    /// Sends a raw request
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, user: &TestUser) -> TestResponse {
        self.request(Method::GET, uri, None, Some(&user.auth_header()))
            .await
    }

    pub async fn post(&self, uri: &str, body: Value, user: Option<&TestUser>) -> TestResponse {
        let auth = user.map(|u| u.auth_header());
        self.request(Method::POST, uri, Some(body), auth.as_deref())
            .await
    }

    /// Signs a user up through the API
    pub async fn signup(&self, email: &str) -> TestUser {
        let response = self
            .post("/users", serde_json::json!({ "email": email }), None)
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        TestUser {
            id: response.body["user"]["id"].as_str().unwrap().to_string(),
            email: response.body["user"]["email"].as_str().unwrap().to_string(),
            token: response.body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a task through the API and returns its JSON
    pub async fn create_task(&self, user: &TestUser, title: &str) -> Value {
        let response = self
            .post(
                "/tasks",
                serde_json::json!({ "title": title, "description": "" }),
                Some(user),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        response.body["task"].clone()
    }
}
