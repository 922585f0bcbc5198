pub mod appointment;
pub mod catalog;
pub mod hours;
pub mod settings;

pub use appointment::{Appointment, AppointmentStatus};
pub use catalog::{Review, Service, Staff};
pub use hours::{BusinessHours, TimeRange};
pub use settings::{MessagingConfig, Settings, Socials};
