//! The lineup state machine: replays the event stream in order, tracking
//! the five-a-side on-court roster per team, and emits the [`Stint`] list
//! every downstream computation hangs off.

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::domain::{EventKind, GameEvent, RosterPlayer, Stint, TeamNo};
use crate::periods::PeriodTable;

const COURT_SLOTS: usize = 5;

#[derive(Clone, Debug)]
struct OpenStint {
    time_in: u32,
    score_team_in: u16,
    score_opp_in: u16,
}

/// The replayed on-court history of one game: per team, per shirt number,
/// the append-only list of closed stints, plus the running final score
/// accumulated from made shots.
#[derive(Debug)]
pub struct Rotations {
    stints: [FxHashMap<String, Vec<Stint>>; 2],
    pub final_score: [u16; 2],
}
impl Rotations {
    pub fn stints(&self, team: TeamNo, shirt: &str) -> &[Stint] {
        self.stints[team.index()]
            .get(shirt)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn total_seconds(&self, team: TeamNo, shirt: &str) -> u32 {
        self.stints(team, shirt).iter().map(Stint::duration).sum()
    }

    /// The shirts on court for `team` at the given elapsed instant, per the
    /// reconstructed stint intervals (half-open, so an instant belongs to
    /// the stint it opens, not the one it closes).
    pub fn on_court(&self, team: TeamNo, elapsed: u32) -> impl Iterator<Item = &str> {
        self.stints[team.index()]
            .iter()
            .filter(move |(_, stints)| stints.iter().any(|stint| stint.contains(elapsed)))
            .map(|(shirt, _)| shirt.as_str())
    }
}

/// Replays the full event stream and returns the stint history. Expects
/// events in normalized order with elapsed times already assigned.
///
/// Malformed lineup data never aborts the replay: a substitution naming a
/// player who is not on court force-inserts that player and carries on, an
/// under-filled lineup is left under-filled, and every repair is logged as
/// a recoverable-data warning.
pub fn replay(events: &[GameEvent], roster: &[RosterPlayer], table: &PeriodTable) -> Rotations {
    let mut stints: [FxHashMap<String, Vec<Stint>>; 2] =
        [FxHashMap::default(), FxHashMap::default()];
    let mut open: [FxHashMap<String, OpenStint>; 2] =
        [FxHashMap::default(), FxHashMap::default()];
    let mut score: [u16; 2] = [0, 0];

    for player in roster {
        stints[player.team.index()]
            .entry(player.shirt_number.clone())
            .or_default();
        if player.is_starter {
            open[player.team.index()].insert(
                player.shirt_number.clone(),
                OpenStint {
                    time_in: 0,
                    score_team_in: 0,
                    score_opp_in: 0,
                },
            );
        }
    }
    for team in [TeamNo::One, TeamNo::Two] {
        let starters = open[team.index()].len();
        if starters != COURT_SLOTS {
            warn!("team {} starts with {starters} players on court", team.key());
        }
    }

    for event in events {
        match &event.kind {
            EventKind::Score { points, made: true } => {
                if let Some(team) = event.team {
                    score[team.index()] += *points as u16;
                }
            }
            EventKind::Substitution {
                player_in,
                player_out,
            } => {
                let Some(team) = event.team else {
                    warn!("substitution without a team at event {}", event.sequence);
                    continue;
                };
                if let Some(shirt) = player_out {
                    close_stint(
                        &mut stints,
                        &mut open,
                        &score,
                        team,
                        shirt,
                        event.elapsed_seconds,
                    );
                }
                if let Some(shirt) = player_in {
                    open_stint(&mut open, &score, team, shirt, event.elapsed_seconds);
                }
            }
            _ => {}
        }
    }

    // every still-open stint runs to the final buzzer
    let game_end = table.total_seconds();
    for team in [TeamNo::One, TeamNo::Two] {
        let shirts: Vec<String> = open[team.index()].keys().cloned().collect();
        for shirt in shirts {
            close_stint(&mut stints, &mut open, &score, team, &shirt, game_end);
        }
    }

    Rotations {
        stints,
        final_score: score,
    }
}

fn open_stint(
    open: &mut [FxHashMap<String, OpenStint>; 2],
    score: &[u16; 2],
    team: TeamNo,
    shirt: &str,
    elapsed: u32,
) {
    let active = &mut open[team.index()];
    if active.contains_key(shirt) {
        warn!(
            "substitution in for #{shirt} of team {} who is already on court",
            team.key()
        );
        return;
    }
    if active.len() >= COURT_SLOTS {
        warn!(
            "team {} exceeds {COURT_SLOTS} on court with #{shirt} entering at {elapsed}s",
            team.key()
        );
    }
    active.insert(
        shirt.to_string(),
        OpenStint {
            time_in: elapsed,
            score_team_in: score[team.index()],
            score_opp_in: score[team.opponent().index()],
        },
    );
}

fn close_stint(
    stints: &mut [FxHashMap<String, Vec<Stint>>; 2],
    open: &mut [FxHashMap<String, OpenStint>; 2],
    score: &[u16; 2],
    team: TeamNo,
    shirt: &str,
    elapsed: u32,
) {
    let start = match open[team.index()].remove(shirt) {
        Some(start) => start,
        None => {
            // inconsistent feed: the player must have entered unobserved
            warn!(
                "substitution out for #{shirt} of team {} who is not on court",
                team.key()
            );
            OpenStint {
                time_in: elapsed,
                score_team_in: score[team.index()],
                score_opp_in: score[team.opponent().index()],
            }
        }
    };
    stints[team.index()]
        .entry(shirt.to_string())
        .or_default()
        .push(Stint {
            team,
            shirt_number: shirt.to_string(),
            time_in: start.time_in,
            time_out: elapsed,
            score_team_in: start.score_team_in,
            score_opp_in: start.score_opp_in,
            score_team_out: score[team.index()],
            score_opp_out: score[team.opponent().index()],
        });
}
