use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::{Review, Service, Staff};
use super::hours::{BusinessHours, TimeRange};

/// Longest service the salon can offer: one full day.
pub const MAX_SERVICE_MINUTES: u32 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub about_us: String,
    pub services: Vec<Service>,
    pub staff: Vec<Staff>,
    pub business_hours: Vec<BusinessHours>,
    pub holidays: Vec<NaiveDate>,
    pub cancellation_limit_hours: u32,
    pub socials: Socials,
    pub reviews: Vec<Review>,
    pub messaging: MessagingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

/// Outbound confirmation settings. Not wired to a real gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default = "default_sender_id")]
    pub sender_id: String,
    #[serde(default = "default_template")]
    pub template: String,
}

fn default_sender_id() -> String {
    "Salon".to_string()
}

fn default_template() -> String {
    "Hi [NAME], your appointment for [SERVICE] on [DATE] at [TIME] is confirmed. Manage it here: [LINK]"
        .to_string()
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            sender_id: default_sender_id(),
            template: default_template(),
        }
    }
}

impl MessagingConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl Settings {
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn staff_member(&self, id: &str) -> Option<&Staff> {
        self.staff.iter().find(|s| s.id == id)
    }

    /// Hours entry for a weekday counted from Sunday.
    pub fn hours_for(&self, day: u8) -> Option<&BusinessHours> {
        self.business_hours.iter().find(|h| h.day == day)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for hours in &self.business_hours {
            hours.validate()?;
        }
        if let Some(service) = self
            .services
            .iter()
            .find(|s| !(1..=MAX_SERVICE_MINUTES).contains(&s.duration))
        {
            return Err(anyhow::anyhow!(
                "service {} must last between 1 and {MAX_SERVICE_MINUTES} minutes",
                service.id
            ));
        }
        Ok(())
    }
}

fn service(id: &str, name: &str, duration: u32, price: f64) -> Service {
    Service {
        id: id.to_string(),
        name: name.to_string(),
        duration,
        price,
    }
}

fn split_day(day: u8) -> BusinessHours {
    BusinessHours::open(
        day,
        vec![
            TimeRange::new("08:30", "12:30"),
            TimeRange::new("14:30", "19:30"),
        ],
    )
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: "Chic & Shine Salon".to_string(),
            address: "Via della Moda 123, Milano".to_string(),
            phone: "02 1234567".to_string(),
            email: "info@chicnshine.it".to_string(),
            about_us: "For over 15 years we have looked after your hair with passion and certified organic products."
                .to_string(),
            services: vec![
                service("1", "Cut & Blow-dry", 60, 45.0),
                service("2", "Cut Only", 30, 25.0),
                service("3", "Cut & Colour", 120, 85.0),
                service("4", "Colour Only", 90, 50.0),
                service("5", "Blow-dry", 45, 20.0),
            ],
            staff: vec![
                Staff {
                    id: "s1".to_string(),
                    name: "Elena (Senior)".to_string(),
                    is_active: true,
                },
                Staff {
                    id: "s2".to_string(),
                    name: "Giulia (Stylist)".to_string(),
                    is_active: true,
                },
            ],
            business_hours: vec![
                BusinessHours::closed(0),
                BusinessHours::closed(1),
                split_day(2),
                split_day(3),
                split_day(4),
                split_day(5),
                BusinessHours::open(6, vec![TimeRange::new("08:30", "19:30")]),
            ],
            holidays: vec![],
            cancellation_limit_hours: 24,
            socials: Socials {
                instagram: Some("chicnshine_salon".to_string()),
                facebook: Some("chicnshine.milano".to_string()),
            },
            reviews: vec![
                Review {
                    id: "r1".to_string(),
                    author: "Marta R.".to_string(),
                    text: "Elena is brilliant with colour, highly recommended!".to_string(),
                    rating: 5,
                },
                Review {
                    id: "r2".to_string(),
                    author: "Sofia V.".to_string(),
                    text: "Relaxing atmosphere and very professional.".to_string(),
                    rating: 5,
                },
            ],
            messaging: MessagingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.business_hours.len(), 7);
        assert_eq!(settings.cancellation_limit_hours, 24);
    }

    #[test]
    fn test_lookup_helpers() {
        let settings = Settings::default();
        assert_eq!(settings.service("3").map(|s| s.duration), Some(120));
        assert!(settings.service("missing").is_none());
        assert_eq!(settings.staff_member("s2").map(|s| s.name.as_str()), Some("Giulia (Stylist)"));
        assert!(settings.hours_for(2).is_some_and(|h| h.is_open));
        assert!(settings.hours_for(1).is_some_and(|h| !h.is_open));
    }

    #[test]
    fn test_zero_duration_service_rejected() {
        let mut settings = Settings::default();
        settings.services[0].duration = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_overlong_service_rejected() {
        let mut settings = Settings::default();
        settings.services[0].duration = MAX_SERVICE_MINUTES;
        assert!(settings.validate().is_ok());

        settings.services[0].duration = MAX_SERVICE_MINUTES + 1;
        assert!(settings.validate().is_err());

        settings.services[0].duration = u32::MAX;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_messaging_config_uses_defaults() {
        let config: MessagingConfig = serde_json::from_str(r#"{"api_key":"k"}"#).unwrap();
        assert_eq!(config.sender_id, "Salon");
        assert!(config.template.contains("[LINK]"));
        assert!(!config.is_configured());
    }
}
