#![deny(
    clippy::as_conversions,
    clippy::expect_used,
    clippy::future_not_send,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::pedantic,
    clippy::string_slice,
    clippy::todo,
    clippy::unwrap_used,
    unsafe_code
)]
#![allow(
    clippy::manual_non_exhaustive,
    clippy::missing_errors_doc,
    clippy::module_inception,
    clippy::module_name_repetitions,
    clippy::needless_return,
    clippy::single_match_else,
    clippy::multiple_crate_versions
)]

use std::{io, sync::Arc};

use axum::Router;

use crate::store::SqliteAttemptStore;

pub use admin::{ADMIN_KEY_HEADER, AdminKey};
pub use args::GraderArgs;
pub use error::{AttemptError, LookupError};
pub use models::{
    AttemptKey, AttemptKeyFields, AttemptRecord, LockScope, LockScopeFields, LockedQuestion,
    Question, QuestionType,
};
pub use state::GraderState;
pub use store::{AttemptStore, MemoryAttemptStore, StoreOutcome};
pub use tracker::{AttemptOutcome, AttemptTracker, LOCK_THRESHOLD};

mod admin;
mod args;
pub mod db;
mod error;
mod models;
pub mod pages;
mod routes;
mod state;
pub mod store;
mod tracker;

pub async fn server(args: GraderArgs) -> Result<Router, io::Error> {
    let db_pool = db::connect(&args.database, args.max_connections)
        .await
        .map_err(io::Error::other)?;

    let store = Arc::new(SqliteAttemptStore::new(db_pool.clone()));
    let tracker = AttemptTracker::new(store, args.admin_key.as_str());

    let state = GraderState { db_pool, tracker };

    Ok(app(state))
}

/// The full router over an already-built state.
#[must_use]
pub fn app(state: GraderState) -> Router {
    Router::new()
        .merge(routes::attempt::router())
        .merge(routes::lock::router())
        .merge(routes::question::router())
        .with_state(state)
}
