//! Box-score accumulation: a deterministic fold of typed events into
//! per-player counters.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::domain::{EventKind, GameEvent};

/// Per-player box-score totals. Field names match the emitted JSON, which
/// the visualization reads verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxStat {
    pub pts: u32,
    pub reb: u32,
    pub ast: u32,
    pub stl: u32,
    pub blk: u32,
    pub fgm: u32,
    pub fga: u32,
    pub fg3m: u32,
    pub fg3a: u32,
    pub ftm: u32,
    pub fta: u32,
    pub pf: u32,
    pub tov: u32,
}
impl BoxStat {
    /// Applies one event to the counters. Every kind updates exactly one
    /// counter set; free throws are kept apart from field goals; misses
    /// count attempts only. `Other` events contribute nothing.
    pub fn record(&mut self, kind: &EventKind) {
        match kind {
            EventKind::Score { points, made } => match points {
                1 => {
                    self.fta += 1;
                    if *made {
                        self.ftm += 1;
                        self.pts += 1;
                    }
                }
                2 => {
                    self.fga += 1;
                    if *made {
                        self.fgm += 1;
                        self.pts += 2;
                    }
                }
                3 => {
                    self.fga += 1;
                    self.fg3a += 1;
                    if *made {
                        self.fgm += 1;
                        self.fg3m += 1;
                        self.pts += 3;
                    }
                }
                _ => {}
            },
            EventKind::Rebound { .. } => self.reb += 1,
            EventKind::Assist => self.ast += 1,
            EventKind::Steal => self.stl += 1,
            EventKind::Block => self.blk += 1,
            EventKind::Turnover => self.tov += 1,
            EventKind::Foul => self.pf += 1,
            _ => {}
        }
    }
}

/// Folds the whole event stream into per-team, per-shirt box totals.
pub fn collect(events: &[GameEvent]) -> [FxHashMap<String, BoxStat>; 2] {
    let mut totals: [FxHashMap<String, BoxStat>; 2] =
        [FxHashMap::default(), FxHashMap::default()];
    for event in events {
        let (Some(team), Some(shirt)) = (event.team, &event.player) else {
            continue;
        };
        totals[team.index()]
            .entry(shirt.clone())
            .or_default()
            .record(&event.kind);
    }
    totals
}
