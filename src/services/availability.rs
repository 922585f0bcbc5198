use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::models::hours::format_clock;
use crate::models::{Appointment, BusinessHours, Service, Settings, Staff};

/// Granularity of slot candidates and of the day-level capacity heuristic.
pub const SLOT_MINUTES: u32 = 30;
/// Duration assumed for an appointment whose service no longer exists.
pub const FALLBACK_DURATION_MINUTES: u32 = 30;
/// Closed regardless of what its hours entry says.
pub const ALWAYS_CLOSED_WEEKDAY: Weekday = Weekday::Sun;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotOffer {
    pub time: String,
    pub available: bool,
    /// First eligible staff member in configured order.
    pub staff_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Unavailable,
    FullyBooked,
    Available,
}

pub fn weekday_index(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always 0..=6
    date.weekday().num_days_from_sunday() as u8
}

pub fn is_holiday(settings: &Settings, date: NaiveDate) -> bool {
    settings.holidays.contains(&date)
}

pub fn is_closed_day(settings: &Settings, date: NaiveDate) -> bool {
    if date.weekday() == ALWAYS_CLOSED_WEEKDAY || is_holiday(settings, date) {
        return true;
    }
    !settings
        .hours_for(weekday_index(date))
        .is_some_and(|h| h.is_open)
}

/// Number of 30-minute units across all open ranges, floored per range.
pub fn day_capacity(hours: &BusinessHours) -> u32 {
    open_ranges(hours)
        .map(|(open, close)| close.saturating_sub(open) / SLOT_MINUTES)
        .sum()
}

/// Coarse capacity signal for the calendar: compares the raw count of confirmed
/// appointments on the day against `day_capacity`. It ignores service durations
/// and staff count, so it can disagree with `slot_offers`.
pub fn is_fully_booked(settings: &Settings, appointments: &[Appointment], date: NaiveDate) -> bool {
    let Some(hours) = settings
        .hours_for(weekday_index(date))
        .filter(|h| h.is_open)
    else {
        return false;
    };

    let booked = appointments
        .iter()
        .filter(|a| a.date == date && a.is_confirmed())
        .count();

    booked >= day_capacity(hours) as usize
}

/// Slot start times in minutes since midnight, every 30 minutes from each
/// range's open (inclusive) to its close (exclusive).
pub fn slot_candidates(hours: &BusinessHours) -> Vec<u32> {
    open_ranges(hours)
        .flat_map(|(open, close)| (open..close).step_by(SLOT_MINUTES as usize))
        .collect()
}

pub fn appointment_duration(settings: &Settings, appointment: &Appointment) -> u32 {
    settings
        .service(&appointment.service_id)
        .map(|s| s.duration)
        .unwrap_or(FALLBACK_DURATION_MINUTES)
}

pub fn is_staff_available(
    settings: &Settings,
    appointments: &[Appointment],
    date: NaiveDate,
    staff_id: &str,
    start: u32,
    duration: u32,
) -> bool {
    let Some(hours) = settings.hours_for(weekday_index(date)) else {
        return false;
    };
    let Some(end) = start.checked_add(duration) else {
        return false;
    };

    // Must nest inside a single range; spanning a midday gap is not allowed.
    if !hours.slots.iter().any(|range| range.contains(start, end)) {
        return false;
    }

    !appointments
        .iter()
        .filter(|a| a.date == date && a.staff_id == staff_id && a.is_confirmed())
        .any(|a| {
            let Some(booked_start) = a.start_minutes() else {
                tracing::warn!(appointment = %a.id, time = %a.time, "skipping appointment with malformed time");
                return false;
            };
            let booked_end = booked_start.saturating_add(appointment_duration(settings, a));
            start < booked_end && end > booked_start
        })
}

/// Active staff free for `[start, start + duration)`, in configured order.
pub fn eligible_staff<'a>(
    settings: &'a Settings,
    appointments: &[Appointment],
    date: NaiveDate,
    start: u32,
    duration: u32,
) -> Vec<&'a Staff> {
    settings
        .staff
        .iter()
        .filter(|s| s.is_active)
        .filter(|s| is_staff_available(settings, appointments, date, &s.id, start, duration))
        .collect()
}

pub fn slot_offers(
    settings: &Settings,
    appointments: &[Appointment],
    date: NaiveDate,
    service: &Service,
) -> Vec<SlotOffer> {
    if is_closed_day(settings, date) {
        return vec![];
    }
    let Some(hours) = settings.hours_for(weekday_index(date)) else {
        return vec![];
    };

    slot_candidates(hours)
        .into_iter()
        .map(|start| {
            let staff_id = eligible_staff(settings, appointments, date, start, service.duration)
                .first()
                .map(|s| s.id.clone());
            SlotOffer {
                time: format_clock(start),
                available: staff_id.is_some(),
                staff_id,
            }
        })
        .collect()
}

/// The offer for one start time, if that time is a candidate on the day.
pub fn find_offer(
    settings: &Settings,
    appointments: &[Appointment],
    date: NaiveDate,
    service: &Service,
    time: &str,
) -> Option<SlotOffer> {
    slot_offers(settings, appointments, date, service)
        .into_iter()
        .find(|offer| offer.time == time)
}

pub fn day_status(
    settings: &Settings,
    appointments: &[Appointment],
    date: NaiveDate,
    today: NaiveDate,
) -> DayStatus {
    if date < today || is_closed_day(settings, date) {
        DayStatus::Unavailable
    } else if is_fully_booked(settings, appointments, date) {
        DayStatus::FullyBooked
    } else {
        DayStatus::Available
    }
}

pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return vec![];
    };
    first.iter_days().take_while(|d| d.month() == month).collect()
}

fn open_ranges(hours: &BusinessHours) -> impl Iterator<Item = (u32, u32)> + '_ {
    hours.slots.iter().filter_map(|range| {
        let minutes = range.minutes();
        if minutes.is_none() {
            tracing::warn!(day = hours.day, open = %range.open, close = %range.close, "skipping malformed range");
        }
        minutes
    })
}
