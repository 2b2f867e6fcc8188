use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::course::Course;
use crate::progress::ProgressStore;
use crate::utils::{Clock, signal::shutdown_signal};
use crate::{error::AppResult, web::AppState};

pub mod config;
pub use config::{Config, ConfigError, ConfigResult, StorageConfig};

pub mod auth;
pub mod course;
pub mod error;
pub mod model;
pub mod progress;
pub mod quiz;
pub mod unlock;
pub mod utils;
pub mod web;

static APPLICATION_NAME: &str = "finquest";

/// Loads the catalog named by configuration, falling back to the built-in course.
pub fn load_course(config: &Config) -> AppResult<Course> {
    let course = match config.app().course_path() {
        Some(path) => Course::load(path)?,
        None => Course::builtin()?,
    };
    tracing::info!(
        units = course.units().len(),
        lessons = course.lesson_count(),
        "course loaded"
    );
    Ok(course)
}

pub async fn build_server() -> AppResult<(AppState, Router)> {
    let use_local = cfg!(debug_assertions);
    let config = Config::get_or_init(use_local).await;

    let course = load_course(config)?;
    let clock = Clock::System;
    let store = progress::open_store(config.storage(), clock).await?;

    let state = AppState::new(Arc::new(course), store, clock, config.app().jwt());
    let app = web::routes::build_app(state.clone(), config.app().docs());
    Ok((state, app))
}

/// Server over an explicit course and store, without reading configuration.
pub fn build_server_with_store(
    course: Course,
    store: Arc<dyn ProgressStore>,
    clock: Clock,
    jwt: &str,
) -> (AppState, Router) {
    let state = AppState::new(Arc::new(course), store, clock, jwt);
    let app = web::routes::build_app(state.clone(), false);
    (state, app)
}

/// Periodically drops expired quiz sessions.
pub async fn sweep_sessions(state: AppState, every: std::time::Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        state.sessions().sweep(state.clock().now()).await;
    }
}

#[tracing::instrument]
pub async fn setup_workers() -> AppResult<()> {
    let (state, app) = build_server().await?;
    tokio::spawn(sweep_sessions(state, std::time::Duration::from_secs(60)));
    let config = Config::get_or_init(cfg!(debug_assertions)).await;
    let listener = TcpListener::bind(config.host().bindto()).await?;

    tracing::info!("axum is starting at: {}", config.host().bindto());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}

#[tracing::instrument]
pub async fn run() -> AppResult<()> {
    setup_trace();
    setup_workers().await?;
    Ok(())
}
