//! Derivation of the period table from the event log: which periods were
//! actually played, how long each ran, and where each sits on the monotonic
//! elapsed-time axis.

use crate::domain::{GameEvent, Period};

const REGULATION_SECONDS: u32 = 600;
const OVERTIME_SECONDS: u32 = 300;
const REGULATION_PERIODS: u8 = 4;

fn default_duration(period: u8) -> u32 {
    if period > REGULATION_PERIODS {
        OVERTIME_SECONDS
    } else {
        REGULATION_SECONDS
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct PeriodSpan {
    period: u8,
    start_seconds: u32,
    duration_seconds: u32,
}

/// The immutable period table for one game. Built once from the normalized
/// event stream; all elapsed-time arithmetic goes through it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeriodTable {
    spans: Vec<PeriodSpan>,
}
impl PeriodTable {
    /// Scans the event stream for the periods actually present. Regulation
    /// periods default to 10 minutes and overtimes to 5; a period whose
    /// observed game clock exceeds its default is widened to the observed
    /// maximum, rounded up to the whole minute. Absent any events, a plain
    /// four-quarter game is assumed.
    pub fn from_events(events: &[GameEvent]) -> PeriodTable {
        let last_period = events
            .iter()
            .map(|event| event.period)
            .max()
            .unwrap_or(REGULATION_PERIODS)
            .max(1);

        let mut spans = Vec::with_capacity(last_period as usize);
        let mut offset = 0;
        for period in 1..=last_period {
            let max_clock = events
                .iter()
                .filter(|event| event.period == period)
                .map(|event| event.clock_seconds)
                .max()
                .unwrap_or(0);
            let observed = max_clock.div_ceil(60) * 60;
            let duration_seconds = default_duration(period).max(observed);
            spans.push(PeriodSpan {
                period,
                start_seconds: offset,
                duration_seconds,
            });
            offset += duration_seconds;
        }
        PeriodTable { spans }
    }

    pub fn count(&self) -> u8 {
        self.spans.len() as u8
    }

    pub fn num_overtimes(&self) -> u8 {
        self.count().saturating_sub(REGULATION_PERIODS)
    }

    pub fn total_seconds(&self) -> u32 {
        self.spans
            .last()
            .map(|span| span.start_seconds + span.duration_seconds)
            .unwrap_or(0)
    }

    pub fn total_minutes(&self) -> u32 {
        self.total_seconds().div_ceil(60)
    }

    /// Converts a countdown clock reading within `period` to seconds since
    /// the opening tip. A clock reading in excess of the period duration
    /// would put the event before the period began; such glitches clamp to
    /// the period start.
    pub fn elapsed_seconds(&self, period: u8, clock_seconds: u32) -> u32 {
        let span = match self.spans.get(period.saturating_sub(1) as usize) {
            Some(span) => span,
            None => return self.total_seconds(),
        };
        span.start_seconds + span.duration_seconds.saturating_sub(clock_seconds)
    }

    /// Stamps every event with its elapsed-time coordinate.
    pub fn localize(&self, events: &mut [GameEvent]) {
        for event in events {
            event.elapsed_seconds = self.elapsed_seconds(event.period, event.clock_seconds);
        }
    }

    /// The period list in the shape consumed by the visualization: labels
    /// plus start/end offsets on the elapsed-minute axis.
    pub fn labels(&self) -> Vec<Period> {
        self.spans
            .iter()
            .map(|span| {
                let label = if span.period > REGULATION_PERIODS {
                    format!("OT{}", span.period - REGULATION_PERIODS)
                } else {
                    format!("Q{}", span.period)
                };
                let duration = span.duration_seconds.div_ceil(60);
                let start_minute = span.start_seconds / 60;
                Period {
                    period: span.period,
                    label,
                    start_minute,
                    end_minute: start_minute + duration,
                    duration,
                }
            })
            .collect()
    }
}
