//! Load time reduction for a set of HAR entries.
//!
//! Two models are supported. [`TimingModel::Serial`] adds up every entry's
//! `time` as if the browser fetched one resource after another.
//! [`TimingModel::Overlap`] lays each entry out on the wall clock and merges
//! overlapping intervals, so time during which several requests were in
//! flight is counted once.

mod interval;

pub use interval::{Interval, merge_intervals};

use crate::Result;
use crate::filter::EntryFilter;
use crate::har::Entry;

/// How a set of entries is reduced to a single duration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimingModel {
    /// Sum of individual durations
    Serial,
    /// Wall-clock span after merging overlapping requests
    #[default]
    Overlap,
}

/// Which part of an entry's elapsed time counts towards the load time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    /// The whole request, from `startedDateTime` to `startedDateTime + time`
    #[default]
    Full,
    /// Only the trailing `receive` phase; entries without a timing
    /// breakdown fall back to their full time
    Receive,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadTimeAnalyzer {
    model: TimingModel,
    phase: LoadPhase,
}

impl LoadTimeAnalyzer {
    pub fn new(model: TimingModel) -> Self {
        Self {
            model,
            phase: LoadPhase::Full,
        }
    }

    pub fn with_phase(mut self, phase: LoadPhase) -> Self {
        self.phase = phase;
        self
    }

    /// Reduce `entries` to a duration in milliseconds. Empty input yields `0`.
    pub fn load_time<'a, I>(&self, entries: I) -> Result<f64>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        match self.model {
            TimingModel::Serial => Ok(entries
                .into_iter()
                .map(|entry| phase_duration(entry, self.phase))
                .sum()),
            TimingModel::Overlap => {
                let intervals = entries
                    .into_iter()
                    .map(|entry| Interval::for_entry(entry, self.phase))
                    .collect::<Result<Vec<_>>>()?;

                let merged = merge_intervals(intervals);
                tracing::debug!("Merged request intervals into {} spans", merged.len());

                Ok(merged.iter().map(Interval::duration_ms).sum())
            }
        }
    }
}

/// Filter `entries` with `filter`, then reduce the matches under `model`
pub fn get_load_time<'a, I>(entries: I, filter: &EntryFilter, model: TimingModel) -> Result<f64>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let matching = filter.apply(entries);
    LoadTimeAnalyzer::new(model).load_time(matching)
}

pub(crate) fn phase_duration(entry: &Entry, phase: LoadPhase) -> f64 {
    let total = entry.duration_ms();
    match (phase, &entry.timings) {
        (LoadPhase::Receive, Some(timings)) => timings.receive().min(total),
        _ => total,
    }
}
