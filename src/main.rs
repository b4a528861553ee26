#![deny(
    clippy::expect_used,
    clippy::future_not_send,
    clippy::pedantic,
    clippy::as_conversions,
    clippy::unwrap_used,
    unsafe_code
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::manual_non_exhaustive,
    clippy::multiple_crate_versions
)]

use std::io;

use clap::Parser;
use grader::{GraderArgs, server};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), io::Error> {
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(io::Error::other(e)),
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grader=info")),
        )
        .init();

    let args = GraderArgs::parse();

    let listener = TcpListener::bind((args.bind.as_str(), args.port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    let app = server(args).await?;

    axum::serve(listener, app).await
}
