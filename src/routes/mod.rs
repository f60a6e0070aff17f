use axum::{Router, routing::get};

use crate::state::AppState;

pub mod auth;
pub mod doc;
pub mod events;
pub mod files;
pub mod health;
pub mod orders;
pub mod pages;
pub mod params;
pub mod shops;
pub mod uploads;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/shops", shops::router())
        .nest("/orders", orders::router())
        .nest("/upload", uploads::router())
        .route("/events", get(events::dashboard_events))
}
