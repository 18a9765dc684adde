// libs/appointment-cell/src/services/stats.rs
use std::collections::BTreeMap;

use crate::models::{Appointment, AppointmentStats, AppointmentStatus, DailyCount};

/// Aggregates appointments into the figures behind the dashboard charts.
pub fn compute_stats(appointments: &[Appointment]) -> AppointmentStats {
    let mut by_status: BTreeMap<AppointmentStatus, u64> = BTreeMap::new();
    let mut by_day: BTreeMap<chrono::NaiveDate, u64> = BTreeMap::new();
    let mut revenue = 0.0;

    for appointment in appointments {
        *by_status.entry(appointment.status.clone()).or_insert(0) += 1;
        *by_day.entry(appointment.start_time.date_naive()).or_insert(0) += 1;

        if appointment.status == AppointmentStatus::Completed {
            revenue += appointment.price.unwrap_or(0.0);
        }
    }

    let count = |status: AppointmentStatus| by_status.get(&status).copied().unwrap_or(0);
    let total = appointments.len() as u64;
    let rate = |n: u64| if total == 0 { 0.0 } else { n as f64 / total as f64 };

    AppointmentStats {
        total,
        upcoming: count(AppointmentStatus::Upcoming),
        on_going: count(AppointmentStatus::OnGoing),
        completed: count(AppointmentStatus::Completed),
        cancelled: count(AppointmentStatus::Cancelled),
        completion_rate: rate(count(AppointmentStatus::Completed)),
        cancellation_rate: rate(count(AppointmentStatus::Cancelled)),
        revenue,
        daily: by_day
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect(),
    }
}
