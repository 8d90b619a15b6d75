//! Per-stop schedule derivation.
//!
//! Schedules are derived values: given the route legs, an anchor time
//! and the dwell time they can always be recomputed. Arithmetic runs on
//! a fixed reference date; only the time of day survives in the output,
//! so routes crossing midnight wrap naturally.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::traits::RouteLeg;

/// Schedule entry for one stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopSchedule {
    pub order: usize,
    pub arrival: NaiveTime,
    pub departure: NaiveTime,
}

fn on_reference_date(time: NaiveTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap_or_default()
        .and_time(time)
}

/// Outbound schedule: works backward from the fixed arrival time at the
/// destination. Leg `i` is the hop leaving stop `i`; the vehicle departs
/// each stop just early enough to make the anchor, dwelling `dwell_secs`
/// between arriving at and departing from every stop.
pub fn outbound_schedule(
    legs: &[RouteLeg],
    arrival_time: NaiveTime,
    dwell_secs: u32,
) -> Vec<StopSchedule> {
    let dwell = Duration::seconds(i64::from(dwell_secs));
    let mut current = on_reference_date(arrival_time);
    let mut schedule = Vec::with_capacity(legs.len());

    for i in (0..legs.len()).rev() {
        let leg = Duration::seconds(i64::from(legs[i].duration_s));
        let departure = current - leg;
        let arrival = departure - dwell;

        schedule.push(StopSchedule {
            order: i,
            arrival: arrival.time(),
            departure: departure.time(),
        });

        current = arrival;
    }

    schedule.reverse();
    schedule
}

/// Return schedule: works forward from the fixed departure time at the
/// origin. Leg 0 is origin to the first drop-off.
pub fn return_schedule(
    legs: &[RouteLeg],
    departure_time: NaiveTime,
    dwell_secs: u32,
) -> Vec<StopSchedule> {
    let dwell = Duration::seconds(i64::from(dwell_secs));
    let mut current = on_reference_date(departure_time);
    let mut schedule = Vec::with_capacity(legs.len());

    for (i, leg) in legs.iter().enumerate() {
        let arrival = current + Duration::seconds(i64::from(leg.duration_s));
        let departure = arrival + dwell;

        schedule.push(StopSchedule {
            order: i,
            arrival: arrival.time(),
            departure: departure.time(),
        });

        current = departure;
    }

    schedule
}

/// Minutes a passenger boarding at `stop_departure` spends in the
/// vehicle until the destination arrival. Floored at zero.
pub fn in_vehicle_minutes(stop_departure: NaiveTime, destination_arrival: NaiveTime) -> i64 {
    let diff = on_reference_date(destination_arrival) - on_reference_date(stop_departure);
    let minutes = (diff.num_seconds() as f64 / 60.0).round() as i64;
    minutes.max(0)
}
