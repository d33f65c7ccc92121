//! Minute bucketization and scoring attribution: intersects stints with
//! fixed 60-second windows on the elapsed axis and walks scoring events
//! against the reconstructed lineups to credit points and plus-minus.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::boxscore::BoxStat;
use crate::domain::{EventKind, GameEvent, RosterPlayer, TeamNo};
use crate::rotation::Rotations;

/// One player's record for one minute of the game. Field names and units
/// are a compatibility boundary with the visualization: seconds on court,
/// integer minute index, signed plus-minus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinuteSlice {
    pub minute: u32,
    pub on_court: bool,
    pub full_minute: bool,
    pub on_court_seconds: u32,
    pub pts: u32,
    pub plus_minus: i32,
    pub stats: BoxStat,
}
impl MinuteSlice {
    fn empty(minute: u32) -> MinuteSlice {
        MinuteSlice {
            minute,
            on_court: false,
            full_minute: false,
            on_court_seconds: 0,
            pts: 0,
            plus_minus: 0,
            stats: BoxStat::default(),
        }
    }
}

/// Per-team, per-shirt minute slices covering every minute of the game.
pub type PlayerMinutes = [FxHashMap<String, Vec<MinuteSlice>>; 2];

fn minute_index(elapsed: u32, total_minutes: u32) -> usize {
    // half-open windows; the final instant of the game folds into the last minute
    (elapsed / 60).min(total_minutes.saturating_sub(1)) as usize
}

/// Builds the minute-slice matrix for every rostered player.
pub fn build(
    events: &[GameEvent],
    rotations: &Rotations,
    roster: &[RosterPlayer],
    total_minutes: u32,
) -> PlayerMinutes {
    let mut minutes: PlayerMinutes = [FxHashMap::default(), FxHashMap::default()];
    for player in roster {
        minutes[player.team.index()].insert(
            player.shirt_number.clone(),
            (0..total_minutes).map(MinuteSlice::empty).collect(),
        );
    }

    // occupancy: overlap of each stint with each minute window it touches;
    // two stints may touch the same minute, so seconds add, capped at 60
    for player in roster {
        let Some(slices) = minutes[player.team.index()].get_mut(&player.shirt_number) else {
            continue;
        };
        for stint in rotations.stints(player.team, &player.shirt_number) {
            if stint.duration() == 0 {
                continue;
            }
            let first = stint.time_in / 60;
            let last = (stint.time_out - 1) / 60;
            for minute in first..=last {
                let Some(slice) = slices.get_mut(minute as usize) else {
                    break;
                };
                let window = minute * 60..(minute + 1) * 60;
                let overlap = stint.time_out.min(window.end) - stint.time_in.max(window.start);
                slice.on_court_seconds = (slice.on_court_seconds + overlap).min(60);
            }
        }
    }

    for event in events {
        // plus-minus: every made score swings the slice of each on-court
        // player on both sides, signed from that player's team perspective
        if let EventKind::Score { points, made: true } = &event.kind {
            if let Some(scoring_team) = event.team {
                let minute = minute_index(event.elapsed_seconds, total_minutes);
                for side in [TeamNo::One, TeamNo::Two] {
                    let signed = if side == scoring_team {
                        *points as i32
                    } else {
                        -(*points as i32)
                    };
                    let on_court: Vec<String> = rotations
                        .on_court(side, event.elapsed_seconds)
                        .map(str::to_string)
                        .collect();
                    for shirt in on_court {
                        if let Some(slices) = minutes[side.index()].get_mut(&shirt) {
                            slices[minute].plus_minus += signed;
                        }
                    }
                }
            }
        }

        // personal per-minute stats accrue only while the player is on
        // court; a basket on the final buzzer (elapsed == game end) falls
        // outside every half-open stint, so it reaches the team
        // differential and the full-game box fold but no slice
        if let (Some(team), Some(shirt)) = (event.team, &event.player) {
            let on_court = rotations
                .stints(team, shirt)
                .iter()
                .any(|stint| stint.contains(event.elapsed_seconds));
            if on_court {
                let minute = minute_index(event.elapsed_seconds, total_minutes);
                if let Some(slices) = minutes[team.index()].get_mut(shirt) {
                    slices[minute].stats.record(&event.kind);
                }
            }
        }
    }

    for team_minutes in &mut minutes {
        for slices in team_minutes.values_mut() {
            for slice in slices {
                slice.on_court = slice.on_court_seconds > 0;
                slice.full_minute = slice.on_court_seconds == 60;
                slice.pts = slice.stats.pts;
            }
        }
    }
    minutes
}

/// Team-level plus-minus per minute: the signed differential of all made
/// scores whose minute index is `m`, independent of who was on court. The
/// two sequences are exact negations of each other by construction.
pub fn team_plus_minus(events: &[GameEvent], total_minutes: u32) -> [Vec<i32>; 2] {
    let mut diffs = [
        vec![0i32; total_minutes as usize],
        vec![0i32; total_minutes as usize],
    ];
    for event in events {
        if let EventKind::Score { points, made: true } = &event.kind {
            if let Some(team) = event.team {
                let minute = minute_index(event.elapsed_seconds, total_minutes);
                diffs[team.index()][minute] += *points as i32;
                diffs[team.opponent().index()][minute] -= *points as i32;
            }
        }
    }
    diffs
}
