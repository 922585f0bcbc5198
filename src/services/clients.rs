use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Appointment;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientHistory {
    pub name: String,
    pub phone: String,
    pub appointments: Vec<Appointment>,
}

/// Groups appointments by customer phone. The client's name is taken from the
/// first appointment seen; each history is in chronological order.
pub fn client_history(appointments: &[Appointment]) -> BTreeMap<String, ClientHistory> {
    let mut clients: BTreeMap<String, ClientHistory> = BTreeMap::new();

    for appointment in appointments {
        clients
            .entry(appointment.customer_phone.clone())
            .or_insert_with(|| ClientHistory {
                name: appointment.customer_name.clone(),
                phone: appointment.customer_phone.clone(),
                appointments: vec![],
            })
            .appointments
            .push(appointment.clone());
    }

    for client in clients.values_mut() {
        client
            .appointments
            .sort_by(|a, b| (a.date, &a.time).cmp(&(b.date, &b.time)));
    }

    clients
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;
    use chrono::{NaiveDate, Utc};

    fn appt(id: &str, name: &str, phone: &str, day: u32, time: &str) -> Appointment {
        Appointment {
            id: id.to_string(),
            customer_name: name.to_string(),
            customer_phone: phone.to_string(),
            service_id: "1".to_string(),
            staff_id: "s1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            time: time.to_string(),
            status: AppointmentStatus::Confirmed,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty() {
        assert!(client_history(&[]).is_empty());
    }

    #[test]
    fn test_groups_by_phone() {
        let appointments = vec![
            appt("a1", "Alice", "+391", 20, "10:00"),
            appt("b1", "Bea", "+392", 18, "09:00"),
            appt("a2", "Alice R.", "+391", 17, "15:00"),
        ];
        let clients = client_history(&appointments);
        assert_eq!(clients.len(), 2);

        let alice = &clients["+391"];
        assert_eq!(alice.name, "Alice");
        let ids: Vec<&str> = alice.appointments.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a1"]);

        assert_eq!(clients["+392"].appointments.len(), 1);
    }

    #[test]
    fn test_same_day_ordered_by_time() {
        let appointments = vec![
            appt("late", "Alice", "+391", 17, "16:00"),
            appt("early", "Alice", "+391", 17, "08:30"),
        ];
        let clients = client_history(&appointments);
        assert_eq!(clients["+391"].appointments[0].id, "early");
    }

    #[test]
    fn test_cancelled_appointments_kept_in_history() {
        let mut cancelled = appt("a1", "Alice", "+391", 17, "10:00");
        cancelled.status = AppointmentStatus::Cancelled;
        let clients = client_history(&[cancelled]);
        assert_eq!(clients["+391"].appointments.len(), 1);
    }
}
