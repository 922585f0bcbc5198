pub mod admin;
pub mod client;
pub mod health;
pub mod manage;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/", get(client::home))
        .route("/api/services", get(client::list_services))
        .route("/api/availability/days", get(client::available_days))
        .route("/api/availability/slots", get(client::available_slots))
        .route("/api/bookings", post(client::create_booking))
        .route("/api/manage/:id", get(manage::get_appointment))
        .route("/api/manage/:id/cancel", post(manage::cancel_appointment))
        .route(
            "/api/admin/settings",
            get(admin::get_settings).post(admin::update_settings),
        )
        .route(
            "/api/admin/staff",
            get(admin::list_staff).post(admin::add_staff),
        )
        .route(
            "/api/admin/staff/:id",
            post(admin::update_staff).delete(admin::delete_staff),
        )
        .route(
            "/api/admin/services",
            get(admin::list_services).post(admin::add_service),
        )
        .route(
            "/api/admin/services/:id",
            post(admin::update_service).delete(admin::delete_service),
        )
        .route("/api/admin/appointments", get(admin::get_appointments))
        .route("/api/admin/clients", get(admin::get_clients))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
