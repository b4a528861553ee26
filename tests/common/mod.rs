#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, header},
};
use grader::{
    ADMIN_KEY_HEADER, AttemptKeyFields, AttemptTracker, GraderState,
    store::SqliteAttemptStore,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;

pub const ADMIN_KEY: &str = "let-me-in";

/// A migrated database in a fresh temp directory. Keep the `TempDir` alive
/// for as long as the pool is used.
pub async fn temp_db() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite:{}", dir.path().join("grader.db").display());
    let db = grader::db::connect(&url, 8).await.expect("connect");
    (dir, db)
}

pub fn sqlite_tracker(db: &SqlitePool) -> AttemptTracker {
    AttemptTracker::new(Arc::new(SqliteAttemptStore::new(db.clone())), ADMIN_KEY)
}

pub fn key_fields(user_id: &str, workbook: &str, page: &str, question_no: &str) -> AttemptKeyFields {
    AttemptKeyFields {
        user_id: Some(user_id.to_owned()),
        workbook: Some(workbook.to_owned()),
        page: Some(page.to_owned()),
        question_no: Some(question_no.to_owned()),
    }
}

pub async fn test_app() -> (TempDir, SqlitePool, Router) {
    let (dir, db) = temp_db().await;

    let state = GraderState {
        db_pool: db.clone(),
        tracker: sqlite_tracker(&db),
    };

    (dir, db, grader::app(state))
}

pub async fn seed_question(
    db: &SqlitePool,
    workbook: &str,
    page: i64,
    number: i64,
    type_: &str,
    answer: &str,
) {
    sqlx::query(
        "INSERT INTO grading_data (workbook, page, number, type, answer) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(workbook)
    .bind(page)
    .bind(number)
    .bind(type_)
    .bind(answer)
    .execute(db)
    .await
    .expect("seed question");
}

pub fn json_request(
    method: Method,
    uri: &str,
    admin_key: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(key) = admin_key {
        builder = builder.header(ADMIN_KEY_HEADER, key);
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
