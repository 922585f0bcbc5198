use anyhow::Context;

use crate::db::KeyValueStore;
use crate::models::{Appointment, Settings};

pub const SETTINGS_KEY: &str = "salon_settings_v1";
pub const APPOINTMENTS_KEY: &str = "salon_appointments_v1";

/// Loads and saves the two persisted collections. Reads never fail: absent or
/// corrupt data degrades to defaults.
pub struct Gateway {
    store: Box<dyn KeyValueStore>,
}

impl Gateway {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load_settings(&self) -> Settings {
        let raw = match self.store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Settings::default(),
            Err(e) => {
                tracing::error!(error = %e, "failed to read settings, using defaults");
                return Settings::default();
            }
        };

        merge_with_defaults(&raw).unwrap_or_else(|e| {
            tracing::error!(error = %e, "stored settings are unreadable, using defaults");
            Settings::default()
        })
    }

    pub fn save_settings(&self, settings: &Settings) -> anyhow::Result<()> {
        let json = serde_json::to_string(settings).context("failed to serialize settings")?;
        self.store.set(SETTINGS_KEY, &json)
    }

    pub fn load_appointments(&self) -> Vec<Appointment> {
        let raw = match self.store.get(APPOINTMENTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return vec![],
            Err(e) => {
                tracing::error!(error = %e, "failed to read appointments");
                return vec![];
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::error!(error = %e, "stored appointments are unreadable, starting empty");
            vec![]
        })
    }

    pub fn save_appointments(&self, appointments: &[Appointment]) -> anyhow::Result<()> {
        let json =
            serde_json::to_string(appointments).context("failed to serialize appointments")?;
        self.store.set(APPOINTMENTS_KEY, &json)
    }
}

/// Top-level keys present in storage win; absent keys come from the defaults.
fn merge_with_defaults(raw: &str) -> anyhow::Result<Settings> {
    let stored: serde_json::Value = serde_json::from_str(raw)?;
    let serde_json::Value::Object(stored) = stored else {
        anyhow::bail!("stored settings are not a JSON object");
    };

    let mut merged = serde_json::to_value(Settings::default())?;
    if let Some(defaults) = merged.as_object_mut() {
        defaults.extend(stored);
    }

    Ok(serde_json::from_value(merged)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, SqliteStore};
    use crate::models::AppointmentStatus;
    use chrono::{NaiveDate, Utc};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Err(anyhow::anyhow!("disk on fire"))
        }

        fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }
    }

    fn store() -> SqliteStore {
        SqliteStore::new(db::init_db(":memory:").unwrap())
    }

    fn gateway() -> Gateway {
        Gateway::new(Box::new(store()))
    }

    fn gateway_with(key: &str, raw: &str) -> Gateway {
        let store = store();
        store.set(key, raw).unwrap();
        Gateway::new(Box::new(store))
    }

    #[test]
    fn test_empty_store_yields_defaults() {
        let gw = gateway();
        assert_eq!(gw.load_settings(), Settings::default());
        assert!(gw.load_appointments().is_empty());
    }

    #[test]
    fn test_settings_round_trip() {
        let gw = gateway();
        let mut settings = Settings::default();
        settings.name = "Studio Nove".to_string();
        settings.cancellation_limit_hours = 48;
        settings.holidays.push(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap());
        settings.staff[1].is_active = false;

        gw.save_settings(&settings).unwrap();
        assert_eq!(gw.load_settings(), settings);
    }

    #[test]
    fn test_partial_settings_merge_with_defaults() {
        let gw = gateway_with(SETTINGS_KEY, r#"{"name":"Old Save","cancellation_limit_hours":12}"#);
        let settings = gw.load_settings();
        assert_eq!(settings.name, "Old Save");
        assert_eq!(settings.cancellation_limit_hours, 12);
        assert_eq!(settings.services, Settings::default().services);
        assert_eq!(settings.messaging, Settings::default().messaging);
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let gw = gateway_with(SETTINGS_KEY, "{not json");
        assert_eq!(gw.load_settings(), Settings::default());
    }

    #[test]
    fn test_non_object_settings_fall_back() {
        let gw = gateway_with(SETTINGS_KEY, "[1,2,3]");
        assert_eq!(gw.load_settings(), Settings::default());
    }

    #[test]
    fn test_mistyped_settings_fall_back() {
        let gw = gateway_with(SETTINGS_KEY, r#"{"cancellation_limit_hours":"soon"}"#);
        assert_eq!(gw.load_settings(), Settings::default());
    }

    #[test]
    fn test_appointments_round_trip() {
        let gw = gateway();
        let appointments = vec![Appointment {
            id: "a1".to_string(),
            customer_name: "Alice".to_string(),
            customer_phone: "+39333".to_string(),
            service_id: "1".to_string(),
            staff_id: "s1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 17).unwrap(),
            time: "09:00".to_string(),
            status: AppointmentStatus::Confirmed,
            notes: Some("fringe only".to_string()),
            created_at: Utc::now(),
        }];

        gw.save_appointments(&appointments).unwrap();
        assert_eq!(gw.load_appointments(), appointments);
    }

    #[test]
    fn test_corrupt_appointments_yield_empty() {
        let gw = gateway_with(APPOINTMENTS_KEY, r#"{"oops":true}"#);
        assert!(gw.load_appointments().is_empty());
    }

    #[test]
    fn test_store_failure_degrades_on_read() {
        let gw = Gateway::new(Box::new(BrokenStore));
        assert_eq!(gw.load_settings(), Settings::default());
        assert!(gw.load_appointments().is_empty());
        assert!(gw.save_settings(&Settings::default()).is_err());
    }
}
