use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::tracker::AttemptTracker;

#[derive(Clone, Debug)]
pub struct GraderState {
    pub db_pool: SqlitePool,
    pub tracker: AttemptTracker,
}

impl FromRef<GraderState> for SqlitePool {
    fn from_ref(state: &GraderState) -> Self {
        state.db_pool.clone()
    }
}

impl FromRef<GraderState> for AttemptTracker {
    fn from_ref(state: &GraderState) -> Self {
        state.tracker.clone()
    }
}
