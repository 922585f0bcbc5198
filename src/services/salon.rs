use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{Appointment, Settings};
use crate::services::cancellation::{self, CancelOutcome};
use crate::services::storage::Gateway;

/// In-memory salon state. Loaded once from the gateway; every mutation is
/// written back before it becomes visible.
pub struct Salon {
    gateway: Gateway,
    settings: Settings,
    appointments: Vec<Appointment>,
}

impl Salon {
    pub fn load(gateway: Gateway) -> Self {
        let settings = gateway.load_settings();
        let appointments = gateway.load_appointments();
        tracing::info!(
            salon = %settings.name,
            appointments = appointments.len(),
            "loaded salon state"
        );
        Self {
            gateway,
            settings,
            appointments,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn appointment(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    pub fn set_settings(&mut self, settings: Settings) -> anyhow::Result<()> {
        self.gateway.save_settings(&settings)?;
        self.settings = settings;
        Ok(())
    }

    pub fn add_appointment(&mut self, appointment: Appointment) -> anyhow::Result<()> {
        let mut next = self.appointments.clone();
        next.push(appointment);
        self.gateway.save_appointments(&next)?;
        self.appointments = next;
        Ok(())
    }

    pub fn cancel(&mut self, id: &str, now: NaiveDateTime) -> anyhow::Result<CancelOutcome> {
        let mut next = self.appointments.clone();
        let outcome = cancellation::cancel(
            &mut next,
            id,
            self.settings.cancellation_limit_hours,
            now,
        );
        if outcome == CancelOutcome::Cancelled {
            self.gateway.save_appointments(&next)?;
            self.appointments = next;
        }
        Ok(outcome)
    }

    /// Every appointment on `date`, cancelled included, ordered by start time.
    pub fn day_agenda(&self, date: NaiveDate) -> Vec<&Appointment> {
        let mut agenda: Vec<&Appointment> =
            self.appointments.iter().filter(|a| a.date == date).collect();
        agenda.sort_by(|a, b| a.time.cmp(&b.time));
        agenda
    }
}
