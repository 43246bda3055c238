use super::{LoadPhase, phase_duration};
use crate::{Error, Result};
use crate::har::Entry;
use chrono::{DateTime, Duration, FixedOffset};

/// Half-open span `[start, end)` an entry occupied on the wall clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl Interval {
    /// Interval of `duration_ms` starting at `start`. Fails when the end
    /// falls outside the representable date range.
    pub fn new(start: DateTime<FixedOffset>, duration_ms: f64) -> Result<Self> {
        Ok(Self {
            start,
            end: shift(start, duration_ms)?,
        })
    }

    /// Interval covered by `entry`. For [`LoadPhase::Receive`] the interval
    /// is the tail of the request, ending where the full request ends.
    pub fn for_entry(entry: &Entry, phase: LoadPhase) -> Result<Self> {
        let started = entry.started_at()?;
        let total = entry.duration_ms();
        let active = phase_duration(entry, phase);

        Self::new(shift(started, total - active)?, active)
    }

    pub fn duration_ms(&self) -> f64 {
        let delta = self.end - self.start;
        match delta.num_microseconds() {
            Some(micros) => micros as f64 / 1000.0,
            None => delta.num_milliseconds() as f64,
        }
    }
}

/// Merge overlapping intervals into disjoint spans, ordered by start.
///
/// An interval that starts exactly where the current span ends is folded
/// into it.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by_key(|interval| interval.start);

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(current) if interval.start <= current.end => {
                current.end = current.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

fn millis(ms: f64) -> Duration {
    Duration::microseconds((ms * 1000.0).round() as i64)
}

fn shift(start: DateTime<FixedOffset>, ms: f64) -> Result<DateTime<FixedOffset>> {
    start
        .checked_add_signed(millis(ms))
        .ok_or_else(|| Error::Timestamp {
            value: start.to_rfc3339(),
            reason: format!("{} ms past this instant is out of range", ms),
        })
}
