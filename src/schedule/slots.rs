//! Slot-to-label policy.
//!
//! Up to four doses a day use the familiar named periods. Beyond that the
//! waking window 08:00–22:00 is divided evenly and each slot is labelled
//! with its period and clock time. Total over any `times_per_day >= 1`.

use chrono::NaiveTime;

use crate::models::enums::SlotPeriod;
use crate::models::DoseSlot;

const WAKE_MINUTES: u32 = 8 * 60;
const WAKING_SPAN_MINUTES: u32 = 14 * 60;

/// Named slots for small daily counts: (period, hour).
fn named_slots(times_per_day: u32) -> Option<&'static [(SlotPeriod, u32)]> {
    use SlotPeriod::*;
    match times_per_day {
        1 => Some(&[(Morning, 8)]),
        2 => Some(&[(Morning, 8), (Night, 20)]),
        3 => Some(&[(Morning, 8), (Noon, 13), (Night, 20)]),
        4 => Some(&[(Morning, 8), (Noon, 12), (Evening, 17), (Night, 21)]),
        _ => None,
    }
}

/// Period a clock time falls in.
pub fn period_for(minutes_since_midnight: u32) -> SlotPeriod {
    match minutes_since_midnight / 60 {
        0..=11 => SlotPeriod::Morning,
        12..=13 => SlotPeriod::Noon,
        14..=16 => SlotPeriod::Afternoon,
        17..=20 => SlotPeriod::Evening,
        _ => SlotPeriod::Night,
    }
}

/// Build the slot for `slot_index` out of `times_per_day`.
///
/// Callers guarantee `times_per_day >= 1` and `slot_index < times_per_day`.
pub fn slot_for(slot_index: u32, times_per_day: u32) -> DoseSlot {
    if let Some(&(period, hour)) =
        named_slots(times_per_day).and_then(|slots| slots.get(slot_index as usize))
    {
        return DoseSlot {
            index: slot_index,
            period,
            label: period.as_str().to_string(),
            time: clock(hour * 60),
        };
    }

    let gaps = u64::from(times_per_day.saturating_sub(1).max(1));
    let offset = u64::from(slot_index) * u64::from(WAKING_SPAN_MINUTES) / gaps;
    // offset <= WAKING_SPAN_MINUTES because slot_index < times_per_day
    let minutes = WAKE_MINUTES + offset.min(u64::from(WAKING_SPAN_MINUTES)) as u32;
    let period = period_for(minutes);
    let time = clock(minutes);

    DoseSlot {
        index: slot_index,
        period,
        label: format!("{} {}", period.as_str(), time.format("%H:%M")),
        time,
    }
}

fn clock(minutes_since_midnight: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(minutes_since_midnight * 60, 0)
        .unwrap_or(NaiveTime::MIN)
}
