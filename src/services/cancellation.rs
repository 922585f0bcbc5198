use chrono::NaiveDateTime;

use crate::models::{Appointment, AppointmentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    NotFound,
    WindowPassed { limit_hours: u32 },
    Cancelled,
}

impl std::fmt::Display for CancelOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelOutcome::NotFound => write!(f, "Appointment not found."),
            CancelOutcome::WindowPassed { limit_hours } => write!(
                f,
                "Sorry, appointments can only be cancelled up to {limit_hours} hours in advance."
            ),
            CancelOutcome::Cancelled => write!(f, "Appointment cancelled successfully."),
        }
    }
}

/// Whole hours from `now` until the appointment starts, truncated toward zero.
/// Negative once the appointment is in the past.
pub fn hours_until(appointment: &Appointment, now: NaiveDateTime) -> Option<i64> {
    let scheduled = appointment.scheduled_at()?;
    Some((scheduled - now).num_hours())
}

pub fn cancel(
    appointments: &mut [Appointment],
    id: &str,
    limit_hours: u32,
    now: NaiveDateTime,
) -> CancelOutcome {
    let Some(appointment) = appointments.iter_mut().find(|a| a.id == id) else {
        return CancelOutcome::NotFound;
    };

    // An unparseable start time cannot be shown to be outside the window.
    let within_notice = hours_until(appointment, now)
        .map_or(true, |hours| hours < i64::from(limit_hours));
    if within_notice {
        return CancelOutcome::WindowPassed { limit_hours };
    }

    appointment.status = AppointmentStatus::Cancelled;
    CancelOutcome::Cancelled
}
