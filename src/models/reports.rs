use serde::Serialize;

use super::appointment::Appointment;
use super::error::NoData;
use super::specialty::Specialty;

/// Minutes each queued appointment adds to the wait of the ones behind it
pub const DEFAULT_SLOT_MINUTES: u32 = 15;

/// One row of the wait-time report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitTime {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub specialty: Specialty,
    pub wait_minutes: u32,
}

/// Count and share of one specialty in the statistics report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialtyShare {
    pub specialty: Specialty,
    pub count: usize,
    /// Percentage of all appointments, rounded to one decimal
    pub percentage: f64,
}

/// Aggregate statistics over the registered appointments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total: usize,
    /// Mean age, rounded to one decimal
    pub mean_age: f64,
    /// One entry per specialty, in [`Specialty::ALL`] order
    pub distribution: Vec<SpecialtyShare>,
}

impl Statistics {
    /// Share for a specific specialty
    pub fn share(&self, specialty: Specialty) -> Option<&SpecialtyShare> {
        self.distribution.iter().find(|s| s.specialty == specialty)
    }
}

/// Estimated wait per appointment under a single FIFO queue.
///
/// Position in registration order is the only factor: the entry at index `i`
/// waits `i * slot_minutes`.
pub fn wait_times(appointments: &[Appointment], slot_minutes: u32) -> Result<Vec<WaitTime>, NoData> {
    if appointments.is_empty() {
        return Err(NoData);
    }

    Ok(appointments
        .iter()
        .enumerate()
        .map(|(position, a)| WaitTime {
            id: a.id,
            name: a.name.clone(),
            age: a.age,
            specialty: a.specialty,
            wait_minutes: u32::try_from(position)
                .unwrap_or(u32::MAX)
                .saturating_mul(slot_minutes),
        })
        .collect())
}

/// Total, mean age and per-specialty distribution
pub fn statistics(appointments: &[Appointment]) -> Result<Statistics, NoData> {
    let total = appointments.len();
    if total == 0 {
        return Err(NoData);
    }

    let age_sum: u64 = appointments.iter().map(|a| u64::from(a.age)).sum();
    let mean_age = round_one_decimal(age_sum as f64 / total as f64);

    let distribution = Specialty::ALL
        .iter()
        .map(|&specialty| {
            let count = appointments
                .iter()
                .filter(|a| a.specialty == specialty)
                .count();
            SpecialtyShare {
                specialty,
                count,
                percentage: round_one_decimal(count as f64 / total as f64 * 100.0),
            }
        })
        .collect();

    Ok(Statistics {
        total,
        mean_age,
        distribution,
    })
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
