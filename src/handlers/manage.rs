use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Appointment, AppointmentStatus, Settings};
use crate::services::cancellation::CancelOutcome;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ManageView {
    id: String,
    customer_name: String,
    service_name: String,
    date: NaiveDate,
    time: String,
    status: AppointmentStatus,
    can_cancel: bool,
}

pub fn manage_view(settings: &Settings, appointment: &Appointment) -> ManageView {
    ManageView {
        id: appointment.id.clone(),
        customer_name: appointment.customer_name.clone(),
        service_name: settings
            .service(&appointment.service_id)
            .map(|s| s.name.clone())
            .unwrap_or_default(),
        date: appointment.date,
        time: appointment.time.clone(),
        status: appointment.status,
        can_cancel: appointment.is_confirmed(),
    }
}

// GET /api/manage/:id
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ManageView>, AppError> {
    let salon = state.salon()?;
    let appointment = salon
        .appointment(&id)
        .ok_or_else(|| AppError::NotFound(format!("appointment {id}")))?;
    Ok(Json(manage_view(salon.settings(), appointment)))
}

// POST /api/manage/:id/cancel
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let outcome = {
        let mut salon = state.salon()?;
        salon.cancel(&id, Local::now().naive_local())?
    };

    match outcome {
        CancelOutcome::Cancelled => {
            tracing::info!(id = %id, "appointment cancelled");
            Ok(Redirect::to("/"))
        }
        CancelOutcome::WindowPassed { limit_hours } => {
            tracing::info!(id = %id, limit_hours, "cancellation rejected, notice window passed");
            Err(AppError::CancellationWindow(outcome.to_string()))
        }
        CancelOutcome::NotFound => Err(AppError::NotFound(format!("appointment {id}"))),
    }
}
