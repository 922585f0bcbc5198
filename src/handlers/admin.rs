use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Appointment, BusinessHours, Review, Service, Settings, Socials, Staff};
use crate::services::clients::{client_history, ClientHistory};
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

/// Applies `f` to a copy of the settings, validates, then persists.
fn mutate_settings<T>(
    state: &AppState,
    f: impl FnOnce(&mut Settings) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let mut salon = state.salon()?;
    let mut settings = salon.settings().clone();
    let out = f(&mut settings)?;
    settings
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    salon.set_settings(settings)?;
    Ok(out)
}

// GET /api/admin/settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Settings>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let salon = state.salon()?;
    Ok(Json(salon.settings().clone()))
}

// POST /api/admin/settings
#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub about_us: Option<String>,
    pub business_hours: Option<Vec<BusinessHours>>,
    pub holidays: Option<Vec<NaiveDate>>,
    pub cancellation_limit_hours: Option<u32>,
    pub socials: Option<Socials>,
    pub reviews: Option<Vec<Review>>,
    pub message_template: Option<String>,
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<Settings>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let updated = mutate_settings(&state, |settings| {
        if let Some(name) = body.name {
            settings.name = name;
        }
        if let Some(address) = body.address {
            settings.address = address;
        }
        if let Some(phone) = body.phone {
            settings.phone = phone;
        }
        if let Some(email) = body.email {
            settings.email = email;
        }
        if let Some(about) = body.about_us {
            settings.about_us = about;
        }
        if let Some(hours) = body.business_hours {
            settings.business_hours = hours;
        }
        if let Some(mut holidays) = body.holidays {
            holidays.sort();
            holidays.dedup();
            settings.holidays = holidays;
        }
        if let Some(limit) = body.cancellation_limit_hours {
            settings.cancellation_limit_hours = limit;
        }
        if let Some(socials) = body.socials {
            settings.socials = socials;
        }
        if let Some(reviews) = body.reviews {
            settings.reviews = reviews;
        }
        if let Some(template) = body.message_template {
            settings.messaging.template = template;
        }
        Ok(settings.clone())
    })?;

    tracing::info!("settings updated");
    Ok(Json(updated))
}

// ── Staff ──

pub async fn list_staff(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Staff>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let salon = state.salon()?;
    Ok(Json(salon.settings().staff.clone()))
}

#[derive(Deserialize)]
pub struct StaffRequest {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

// POST /api/admin/staff
pub async fn add_staff(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<StaffRequest>,
) -> Result<(StatusCode, Json<Staff>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let staff = mutate_settings(&state, |settings| {
        let staff = Staff {
            id: uuid::Uuid::new_v4().to_string(),
            name: body.name.unwrap_or_else(|| "New Staff Member".to_string()),
            is_active: body.is_active.unwrap_or(true),
        };
        settings.staff.push(staff.clone());
        Ok(staff)
    })?;

    Ok((StatusCode::CREATED, Json(staff)))
}

// POST /api/admin/staff/:id
pub async fn update_staff(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<StaffRequest>,
) -> Result<Json<Staff>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let staff = mutate_settings(&state, |settings| {
        let staff = settings
            .staff
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound(format!("staff {id}")))?;
        if let Some(name) = body.name {
            staff.name = name;
        }
        if let Some(active) = body.is_active {
            staff.is_active = active;
        }
        Ok(staff.clone())
    })?;

    Ok(Json(staff))
}

// DELETE /api/admin/staff/:id
pub async fn delete_staff(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    mutate_settings(&state, |settings| {
        let before = settings.staff.len();
        settings.staff.retain(|s| s.id != id);
        if settings.staff.len() == before {
            return Err(AppError::NotFound(format!("staff {id}")));
        }
        Ok(())
    })?;

    Ok(Json(serde_json::json!({"ok": true})))
}

// ── Services ──

pub async fn list_services(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Service>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let salon = state.salon()?;
    Ok(Json(salon.settings().services.clone()))
}

#[derive(Deserialize)]
pub struct ServiceRequest {
    pub name: Option<String>,
    pub duration: Option<u32>,
    pub price: Option<f64>,
}

// POST /api/admin/services
pub async fn add_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ServiceRequest>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let (Some(name), Some(duration)) = (body.name, body.duration) else {
        return Err(AppError::BadRequest(
            "name and duration are required".to_string(),
        ));
    };

    let service = mutate_settings(&state, |settings| {
        let service = Service {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            duration,
            price: body.price.unwrap_or(0.0),
        };
        settings.services.push(service.clone());
        Ok(service)
    })?;

    Ok((StatusCode::CREATED, Json(service)))
}

// POST /api/admin/services/:id
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ServiceRequest>,
) -> Result<Json<Service>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let service = mutate_settings(&state, |settings| {
        let service = settings
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound(format!("service {id}")))?;
        if let Some(name) = body.name {
            service.name = name;
        }
        if let Some(duration) = body.duration {
            service.duration = duration;
        }
        if let Some(price) = body.price {
            service.price = price;
        }
        Ok(service.clone())
    })?;

    Ok(Json(service))
}

// DELETE /api/admin/services/:id
pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    mutate_settings(&state, |settings| {
        let before = settings.services.len();
        settings.services.retain(|s| s.id != id);
        if settings.services.len() == before {
            return Err(AppError::NotFound(format!("service {id}")));
        }
        Ok(())
    })?;

    Ok(Json(serde_json::json!({"ok": true})))
}

// GET /api/admin/appointments?date=YYYY-MM-DD
#[derive(Deserialize)]
pub struct AgendaQuery {
    pub date: NaiveDate,
}

#[derive(Serialize)]
pub struct AgendaEntry {
    #[serde(flatten)]
    appointment: Appointment,
    staff_name: String,
    service_name: String,
}

pub async fn get_appointments(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<AgendaQuery>,
) -> Result<Json<Vec<AgendaEntry>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let salon = state.salon()?;
    let settings = salon.settings();
    let entries = salon
        .day_agenda(query.date)
        .into_iter()
        .map(|a| AgendaEntry {
            staff_name: settings
                .staff_member(&a.staff_id)
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            service_name: settings
                .service(&a.service_id)
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            appointment: a.clone(),
        })
        .collect();

    Ok(Json(entries))
}

// GET /api/admin/clients
pub async fn get_clients(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<BTreeMap<String, ClientHistory>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let salon = state.salon()?;
    Ok(Json(client_history(salon.appointments())))
}
