use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::{
    admin::AdminKey,
    error::AttemptError,
    models::{AttemptKeyFields, LockScopeFields},
    state::GraderState,
    tracker::AttemptTracker,
};

pub fn router() -> Router<GraderState> {
    Router::new()
        .route("/locks", get(get_locks))
        .route("/admin/unlock", post(admin_unlock))
}

async fn get_locks(
    State(tracker): State<AttemptTracker>,
    Query(scope): Query<LockScopeFields>,
) -> Result<Json<Value>, AttemptError> {
    let locked = tracker.query_locks(scope).await?;
    Ok(Json(json!({ "locked": locked })))
}

async fn admin_unlock(
    admin_key: AdminKey,
    State(tracker): State<AttemptTracker>,
    body: Result<Json<AttemptKeyFields>, JsonRejection>,
) -> Result<Json<Value>, AttemptError> {
    // An unreadable body unlocks nothing; the credential is still checked first.
    let key = match body {
        Ok(Json(key)) => key,
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable unlock body");
            AttemptKeyFields::default()
        }
    };

    tracker.admin_unlock(admin_key.as_deref(), key).await?;
    Ok(Json(json!({ "ok": true })))
}
