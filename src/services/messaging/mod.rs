pub mod stub;

use async_trait::async_trait;

use crate::models::{Appointment, Settings};

#[async_trait]
pub trait MessagingProvider: Send + Sync {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()>;
}

/// Deep link that opens the manage view for one appointment.
pub fn manage_link(base_url: &str, appointment_id: &str) -> String {
    format!(
        "{}?action=manage&id={appointment_id}",
        base_url.trim_end_matches('/')
    )
}

/// Sends the booking confirmation to the customer's phone.
pub async fn send_confirmation(
    provider: &dyn MessagingProvider,
    settings: &Settings,
    appointment: &Appointment,
    base_url: &str,
) -> anyhow::Result<()> {
    if !settings.messaging.is_configured() {
        tracing::warn!("messaging credentials not configured, simulating send");
    }
    let body = confirmation_message(settings, appointment, base_url);
    provider
        .send_message(&appointment.customer_phone, &body)
        .await
}

pub fn confirmation_message(settings: &Settings, appointment: &Appointment, base_url: &str) -> String {
    let service_name = settings
        .service(&appointment.service_id)
        .map(|s| s.name.as_str())
        .unwrap_or("Service");

    settings
        .messaging
        .template
        .replace("[NAME]", &appointment.customer_name)
        .replace("[SERVICE]", service_name)
        .replace("[DATE]", &appointment.date.format("%d/%m/%Y").to_string())
        .replace("[TIME]", &appointment.time)
        .replace("[LINK]", &manage_link(base_url, &appointment.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;
    use chrono::{NaiveDate, Utc};

    fn appointment(service_id: &str) -> Appointment {
        Appointment {
            id: "abc-123".to_string(),
            customer_name: "Alice".to_string(),
            customer_phone: "+39333".to_string(),
            service_id: service_id.to_string(),
            staff_id: "s1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 17).unwrap(),
            time: "14:30".to_string(),
            status: AppointmentStatus::Confirmed,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_manage_link() {
        assert_eq!(
            manage_link("https://salon.example/", "abc"),
            "https://salon.example?action=manage&id=abc"
        );
    }

    #[test]
    fn test_confirmation_message_fills_placeholders() {
        let settings = Settings::default();
        let msg = confirmation_message(&settings, &appointment("1"), "https://salon.example");
        assert_eq!(
            msg,
            "Hi Alice, your appointment for Cut & Blow-dry on 17/06/2025 at 14:30 is confirmed. \
             Manage it here: https://salon.example?action=manage&id=abc-123"
        );
    }

    struct Recorder(std::sync::Mutex<Vec<(String, String)>>);

    #[async_trait]
    impl MessagingProvider for Recorder {
        async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
            self.0.lock().unwrap().push((to.to_string(), body.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_send_confirmation_targets_customer_phone() {
        let recorder = Recorder(std::sync::Mutex::new(vec![]));
        send_confirmation(&recorder, &Settings::default(), &appointment("2"), "http://x")
            .await
            .unwrap();

        let sent = recorder.0.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+39333");
        assert!(sent[0].1.contains("Cut Only"));
        assert!(sent[0].1.contains("http://x?action=manage&id=abc-123"));
    }

    #[test]
    fn test_unknown_service_uses_placeholder_name() {
        let mut settings = Settings::default();
        settings.messaging.template = "[SERVICE] / [SERVICE]".to_string();
        let msg = confirmation_message(&settings, &appointment("gone"), "http://x");
        assert_eq!(msg, "Service / Service");
    }
}
