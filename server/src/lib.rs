//! JSON-over-HTTP interface to the civic reporting core.

pub mod error;
pub mod response;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{get, patch, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use civic::config::{Config, SubmissionMode};
use civic::location::GeocodeError;
use civic::submission::StoreSubmitter;
use civic::Database;

pub use error::AppError;
pub use response::ApiResponse;
pub use state::AppState;

/// Builds the shared state for `config` on top of an open database.
///
/// Reports received over HTTP are always persisted; `submission.mode` only
/// selects the submitter of in-process report sessions.
pub fn build_state(config: &Config, db: Database) -> Result<AppState, GeocodeError> {
    if config.submission.mode == SubmissionMode::Simulated {
        log::info!("submission.mode is simulated; HTTP reports are still stored");
    }

    let mut reports = StoreSubmitter::new(db.clone(), config.submission.reference_prefix.clone());
    if let Some(reporter) = &config.submission.reporter {
        reports = reports.with_reporter(reporter.clone());
    }
    let dashboard = civic::build_dashboard(config, &db);
    let geocoder = civic::build_geocoder(&config.geocoder)?;
    Ok(AppState::new(db, reports, dashboard).with_geocoder(geocoder))
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route("/test", get(routes::connection_test))
        .route(
            "/reports",
            post(routes::reports::create).get(routes::reports::list),
        )
        .route("/reports/{reference}", get(routes::reports::get))
        .route(
            "/reports/{reference}/status",
            patch(routes::reports::update_status),
        )
        .route("/dashboard/stats", get(routes::dashboard::stats))
        .route("/dashboard/activity", get(routes::dashboard::activity))
        .route("/complaints", get(routes::dashboard::complaints))
        .route("/leaderboard", get(routes::dashboard::leaderboard))
        .route("/users", post(routes::users::create))
        .route(
            "/users/{id}",
            get(routes::users::get).put(routes::users::update),
        )
        .route("/health", post(routes::health::create))
        .route("/health/user/{user_id}", get(routes::health::by_user))
        .route("/health/vitals/{user_id}", get(routes::health::vitals))
        .route(
            "/health/{id}",
            put(routes::health::update).delete(routes::health::delete),
        )
        .route("/medicines", post(routes::medicines::create))
        .route("/medicines/user/{user_id}", get(routes::medicines::by_user))
        .route("/medicines/active/{user_id}", get(routes::medicines::active))
        .route("/medicines/{id}/taken", post(routes::medicines::mark_taken))
        .route(
            "/medicines/{id}",
            put(routes::medicines::update).delete(routes::medicines::delete),
        )
        .route("/appointments", post(routes::appointments::create))
        .route(
            "/appointments/user/{user_id}",
            get(routes::appointments::by_user),
        )
        .route("/appointments/doctors", get(routes::appointments::doctors))
        .route(
            "/appointments/doctors/specialty/{specialty}",
            get(routes::appointments::doctors_by_specialty),
        )
        .route(
            "/appointments/{id}",
            put(routes::appointments::update).delete(routes::appointments::cancel),
        )
        .route("/doctors", post(routes::doctors::create))
        .route(
            "/doctors/{id}",
            get(routes::doctors::get).put(routes::doctors::update),
        );

    Router::new()
        .route("/", get(routes::root))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Binds `config.server` and serves until Ctrl+C or SIGTERM.
pub async fn serve(config: &Config, state: AppState) -> std::io::Result<()> {
    let address = format!("{}:{}", config.server.host, config.server.port);
    log::info!("Binding to {}", address);

    let listener = TcpListener::bind(&address).await?;
    log::info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        log::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                log::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                log::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
