pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Caller routes
    let me_routes = Router::new()
        .route("/", get(routes::user::me))
        .route("/init", post(routes::user::init));

    // Agency routes
    let agency_routes = Router::new()
        .route("/", post(routes::agency::upsert))
        .route("/{agency_id}", put(routes::agency::update))
        .route("/{agency_id}", delete(routes::agency::delete))
        .route("/{agency_id}/notification", get(routes::agency::notifications))
        .route("/{agency_id}/team", get(routes::agency::team))
        .route("/{agency_id}/invitation", post(routes::agency::send_invitation))
        .route("/{agency_id}/subaccount", post(routes::agency::upsert_sub_account));

    // Sub-account routes
    let sub_account_routes = Router::new()
        .route("/{sub_account_id}", get(routes::sub_account::get))
        .route("/{sub_account_id}", delete(routes::sub_account::delete));

    // User routes
    let user_routes = Router::new()
        .route("/", post(routes::user::update))
        .route("/{user_id}", delete(routes::user::delete))
        .route("/{user_id}/permission", get(routes::user::permissions));

    // Compose API
    let api = Router::new()
        .nest("/me", me_routes)
        .route("/invitation/accept", post(routes::invitation::accept))
        .nest("/agency", agency_routes)
        .nest("/subaccount", sub_account_routes)
        .nest("/user", user_routes)
        .route("/permission", post(routes::permission::change))
        .route("/sidebar/{kind}/{id}", get(routes::sidebar::get))
        .route("/activity", post(routes::activity::log));

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
