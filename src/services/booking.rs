//! Client booking wizard: service, then date and slot, then contact details.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Appointment, AppointmentStatus, Settings};
use crate::services::availability::{self, DayStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Service = 1,
    Schedule = 2,
    Contact = 3,
}

#[derive(Debug, PartialEq, Eq)]
pub enum BookingFlowError {
    UnknownService,
    NoServiceSelected,
    NoDateSelected,
    DateUnavailable,
    SlotUnavailable,
    StepLocked(Step),
    MissingContact,
}

impl std::fmt::Display for BookingFlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingFlowError::UnknownService => write!(f, "That service is not offered."),
            BookingFlowError::NoServiceSelected => write!(f, "Please choose a service first."),
            BookingFlowError::NoDateSelected => write!(f, "Please choose a date first."),
            BookingFlowError::DateUnavailable => {
                write!(f, "That day is not available for booking.")
            }
            BookingFlowError::SlotUnavailable => {
                write!(f, "That time is no longer available. Please pick another slot.")
            }
            BookingFlowError::StepLocked(step) => {
                write!(f, "Step {} is not reachable yet.", *step as u8)
            }
            BookingFlowError::MissingContact => {
                write!(f, "Name and phone number are required.")
            }
        }
    }
}

impl std::error::Error for BookingFlowError {}

/// Selections survive moving back to an earlier step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFlow {
    step: Step,
    pub service_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub staff_id: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub notes: String,
}

impl BookingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn select_service(
        &mut self,
        settings: &Settings,
        service_id: &str,
    ) -> Result<(), BookingFlowError> {
        if settings.service(service_id).is_none() {
            return Err(BookingFlowError::UnknownService);
        }
        if self.service_id.as_deref() != Some(service_id) {
            self.clear_slot();
        }
        self.service_id = Some(service_id.to_string());
        self.step = Step::Schedule;
        Ok(())
    }

    pub fn select_date(
        &mut self,
        settings: &Settings,
        appointments: &[Appointment],
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), BookingFlowError> {
        if self.service_id.is_none() {
            return Err(BookingFlowError::NoServiceSelected);
        }
        if availability::day_status(settings, appointments, date, today) != DayStatus::Available {
            return Err(BookingFlowError::DateUnavailable);
        }
        if self.date != Some(date) {
            self.clear_slot();
            self.step = Step::Schedule;
        }
        self.date = Some(date);
        Ok(())
    }

    // A chosen slot was only checked for the service and date it was picked with.
    fn clear_slot(&mut self) {
        self.time = None;
        self.staff_id = None;
    }

    /// Picks a start time and assigns the first eligible staff member. Returns
    /// the assigned staff id.
    pub fn select_slot(
        &mut self,
        settings: &Settings,
        appointments: &[Appointment],
        time: &str,
    ) -> Result<&str, BookingFlowError> {
        let service = self
            .service_id
            .as_deref()
            .and_then(|id| settings.service(id))
            .ok_or(BookingFlowError::NoServiceSelected)?;
        let date = self.date.ok_or(BookingFlowError::NoDateSelected)?;

        let staff_id = availability::find_offer(settings, appointments, date, service, time)
            .and_then(|offer| offer.staff_id)
            .ok_or(BookingFlowError::SlotUnavailable)?;

        self.time = Some(time.to_string());
        self.step = Step::Contact;
        Ok(self.staff_id.insert(staff_id).as_str())
    }

    pub fn set_contact(&mut self, name: &str, phone: &str, notes: &str) {
        self.customer_name = name.to_string();
        self.customer_phone = phone.to_string();
        self.notes = notes.to_string();
    }

    pub fn go_to(&mut self, step: Step) -> Result<(), BookingFlowError> {
        let reachable = match step {
            Step::Service => true,
            Step::Schedule => self.service_id.is_some(),
            Step::Contact => {
                self.date.is_some() && self.time.is_some() && self.staff_id.is_some()
            }
        };
        if !reachable {
            return Err(BookingFlowError::StepLocked(step));
        }
        self.step = step;
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        self.step() == Step::Contact
            && !self.customer_name.trim().is_empty()
            && !self.customer_phone.trim().is_empty()
    }

    /// Builds the confirmed appointment. Appending it to the collection is the
    /// caller's job.
    pub fn submit(&self, now: DateTime<Utc>) -> Result<Appointment, BookingFlowError> {
        if self.step() != Step::Contact {
            return Err(BookingFlowError::StepLocked(Step::Contact));
        }
        let (Some(service_id), Some(date), Some(time), Some(staff_id)) = (
            self.service_id.as_ref(),
            self.date,
            self.time.as_ref(),
            self.staff_id.as_ref(),
        ) else {
            return Err(BookingFlowError::StepLocked(Step::Contact));
        };
        if !self.can_submit() {
            return Err(BookingFlowError::MissingContact);
        }

        let notes = self.notes.trim();
        Ok(Appointment {
            id: uuid::Uuid::new_v4().to_string(),
            customer_name: self.customer_name.trim().to_string(),
            customer_phone: self.customer_phone.trim().to_string(),
            service_id: service_id.clone(),
            staff_id: staff_id.clone(),
            date,
            time: time.clone(),
            status: AppointmentStatus::Confirmed,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            created_at: now,
        })
    }
}
