use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::AttemptError,
    models::AttemptKeyFields,
    state::GraderState,
    tracker::{AttemptOutcome, AttemptTracker},
};

pub fn router() -> Router<GraderState> {
    Router::new().route("/attempt", post(post_attempt))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptForm {
    #[serde(flatten)]
    pub key: AttemptKeyFields,
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    pub is_correct: Option<bool>,
}

async fn post_attempt(
    State(tracker): State<AttemptTracker>,
    form: Result<Json<AttemptForm>, JsonRejection>,
) -> Result<Json<Value>, AttemptError> {
    let Json(form) = form.map_err(|rejection| {
        tracing::debug!(%rejection, "unreadable attempt body");
        AttemptError::InvalidRequest("body")
    })?;

    let outcome = tracker
        .record_attempt(form.key, form.question_type.as_deref(), form.is_correct)
        .await?;

    Ok(Json(match outcome {
        AttemptOutcome::Graded {
            locked,
            wrong_count,
        } => json!({ "ok": true, "locked": locked, "wrong_count": wrong_count }),
        AttemptOutcome::Skipped => json!({ "ok": true, "skipped": true }),
    }))
}
