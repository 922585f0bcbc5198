use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Datelike, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::handlers::manage::{manage_view, ManageView};
use crate::models::{Appointment, Review, Service, Settings, Socials};
use crate::services::availability::{self, DayStatus, SlotOffer};
use crate::services::booking::BookingFlow;
use crate::services::messaging::{self, manage_link};
use crate::state::AppState;

// GET /?action=manage&id=...
#[derive(Deserialize)]
pub struct DeepLinkQuery {
    pub action: Option<String>,
    pub id: Option<String>,
}

#[derive(Serialize)]
pub struct SalonProfile {
    name: String,
    address: String,
    phone: String,
    email: String,
    about_us: String,
    socials: Socials,
    services: Vec<Service>,
    reviews: Vec<Review>,
}

impl From<&Settings> for SalonProfile {
    fn from(s: &Settings) -> Self {
        Self {
            name: s.name.clone(),
            address: s.address.clone(),
            phone: s.phone.clone(),
            email: s.email.clone(),
            about_us: s.about_us.clone(),
            socials: s.socials.clone(),
            services: s.services.clone(),
            reviews: s.reviews.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum HomeResponse {
    Client { salon: SalonProfile },
    Manage { appointment: ManageView },
}

pub async fn home(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeepLinkQuery>,
) -> Result<Json<HomeResponse>, AppError> {
    let salon = state.salon()?;

    if let (Some("manage"), Some(id)) = (query.action.as_deref(), query.id.as_deref()) {
        if let Some(appointment) = salon.appointment(id) {
            return Ok(Json(HomeResponse::Manage {
                appointment: manage_view(salon.settings(), appointment),
            }));
        }
        tracing::info!(id = %id, "deep link to unknown appointment");
    }

    Ok(Json(HomeResponse::Client {
        salon: SalonProfile::from(salon.settings()),
    }))
}

// GET /api/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Service>>, AppError> {
    let salon = state.salon()?;
    Ok(Json(salon.settings().services.clone()))
}

// GET /api/availability/days?month=YYYY-MM
#[derive(Deserialize)]
pub struct DaysQuery {
    pub month: Option<String>,
}

#[derive(Serialize)]
pub struct DayResponse {
    date: NaiveDate,
    status: DayStatus,
}

pub async fn available_days(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DaysQuery>,
) -> Result<Json<Vec<DayResponse>>, AppError> {
    let today = Local::now().date_naive();
    let first = match query.month.as_deref() {
        Some(month) => NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
            .map_err(|_| AppError::BadRequest(format!("invalid month: {month}")))?,
        None => today,
    };

    let salon = state.salon()?;
    let days = availability::month_days(first.year(), first.month())
        .into_iter()
        .map(|date| DayResponse {
            date,
            status: availability::day_status(salon.settings(), salon.appointments(), date, today),
        })
        .collect();

    Ok(Json(days))
}

// GET /api/availability/slots?date=YYYY-MM-DD&service_id=...
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
    pub service_id: String,
}

pub async fn available_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Vec<SlotOffer>>, AppError> {
    let salon = state.salon()?;
    let service = salon
        .settings()
        .service(&query.service_id)
        .ok_or_else(|| AppError::NotFound(format!("service {}", query.service_id)))?;

    Ok(Json(availability::slot_offers(
        salon.settings(),
        salon.appointments(),
        query.date,
        service,
    )))
}

// POST /api/bookings
#[derive(Deserialize)]
pub struct BookingRequest {
    pub service_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    appointment: Appointment,
    manage_link: String,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let (appointment, settings) = {
        let mut salon = state.salon()?;
        let today = Local::now().date_naive();

        let mut flow = BookingFlow::new();
        flow.select_service(salon.settings(), &body.service_id)?;
        flow.select_date(salon.settings(), salon.appointments(), body.date, today)?;
        flow.select_slot(salon.settings(), salon.appointments(), &body.time)?;
        flow.set_contact(
            &body.customer_name,
            &body.customer_phone,
            body.notes.as_deref().unwrap_or(""),
        );

        let appointment = flow.submit(Utc::now())?;
        salon.add_appointment(appointment.clone())?;
        (appointment, salon.settings().clone())
    };

    tracing::info!(
        id = %appointment.id,
        date = %appointment.date,
        time = %appointment.time,
        staff = %appointment.staff_id,
        "appointment booked"
    );

    if let Err(e) = messaging::send_confirmation(
        state.messaging.as_ref(),
        &settings,
        &appointment,
        &state.config.public_url,
    )
    .await
    {
        tracing::warn!(error = %e, id = %appointment.id, "failed to send confirmation");
    }

    let manage_link = manage_link(&state.config.public_url, &appointment.id);
    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            appointment,
            manage_link,
        }),
    ))
}
