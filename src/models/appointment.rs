use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::hours::parse_clock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub service_id: String,
    pub staff_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn is_confirmed(&self) -> bool {
        self.status == AppointmentStatus::Confirmed
    }

    /// Start as minutes since midnight, `None` if `time` is malformed.
    pub fn start_minutes(&self) -> Option<u32> {
        parse_clock(&self.time).ok()
    }

    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        let minutes = self.start_minutes()?;
        self.date.and_hms_opt(minutes / 60, minutes % 60, 0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Confirmed,
    Cancelled,
}
