//! Decoding of the raw per-game feed document and normalization of its
//! play-by-play stream into ordered [`GameEvent`]s.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{EventKind, GameEvent, RosterPlayer, TeamNo};

/// Raised when a required field of the play-by-play stream is missing or of
/// the wrong shape. Unrecoverable for that game: the input is static, so a
/// retry cannot change the outcome — callers skip the game and move on.
#[derive(Debug, Error)]
pub enum MalformedEvent {
    #[error("event {sequence}: missing required field `{field}`")]
    MissingField { sequence: u32, field: &'static str },

    #[error("event {sequence}: unparsable game clock {clock:?}")]
    UnparsableClock { sequence: u32, clock: String },
}

/// A raw scalar that the feed serves interchangeably as a string or a
/// number (scores and shirt numbers both come in either shape).
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
}
impl Scalar {
    pub fn as_string(&self) -> String {
        match self {
            Scalar::Str(str) => str.clone(),
            Scalar::Int(int) => int.to_string(),
            Scalar::Float(float) => float.to_string(),
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Scalar::Str(str) if str.is_empty() => None,
            Scalar::Str(str) => str.trim().parse().ok(),
            Scalar::Int(int) => u32::try_from(*int).ok(),
            Scalar::Float(float) => Some(*float as u32),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawGame {
    #[serde(default)]
    pub tm: HashMap<String, RawTeam>,
    #[serde(default)]
    pub pbp: Vec<RawEvent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTeam {
    pub name: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "shortName")]
    pub short_name: Option<String>,
    #[serde(default)]
    pub pl: HashMap<String, RawPlayer>,
}

#[derive(Debug, Deserialize)]
pub struct RawPlayer {
    #[serde(rename = "shirtNumber")]
    pub shirt_number: Option<Scalar>,
    pub name: Option<String>,
    #[serde(rename = "scoreboardName")]
    pub scoreboard_name: Option<String>,
    pub starter: Option<Scalar>,
    #[serde(rename = "sMinutes")]
    pub s_minutes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "actionNumber")]
    pub action_number: Option<u32>,
    pub gt: Option<String>,
    pub period: Option<u8>,
    pub tno: Option<u8>,
    #[serde(rename = "actionType")]
    pub action_type: Option<String>,
    #[serde(rename = "subType")]
    pub sub_type: Option<String>,
    pub success: Option<u8>,
    pub s1: Option<Scalar>,
    pub s2: Option<Scalar>,
    #[serde(rename = "shirtNumber")]
    pub shirt_number: Option<Scalar>,
    #[serde(rename = "scoreboardName")]
    pub scoreboard_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TeamMeta {
    pub name: String,
    pub code: String,
}

/// The decoded game document: team metadata, roster and the normalized,
/// ordered event stream. `elapsed_seconds` is zero on every event at this
/// stage; the period table assigns it (see [`crate::periods`]).
#[derive(Debug)]
pub struct GameLog {
    pub teams: [TeamMeta; 2],
    pub roster: Vec<RosterPlayer>,
    pub events: Vec<GameEvent>,
}
impl GameLog {
    pub fn roster_for(&self, team: TeamNo) -> impl Iterator<Item = &RosterPlayer> {
        self.roster.iter().filter(move |player| player.team == team)
    }
}

impl TryFrom<&RawGame> for GameLog {
    type Error = MalformedEvent;

    fn try_from(raw: &RawGame) -> Result<Self, Self::Error> {
        let mut teams = [TeamNo::One, TeamNo::Two].map(|team| TeamMeta {
            name: format!("Team {}", team.key()),
            code: format!("T{}", team.key()),
        });
        let mut roster = Vec::new();
        for team in [TeamNo::One, TeamNo::Two] {
            let Some(raw_team) = raw.tm.get(team.key()) else {
                continue;
            };
            teams[team.index()] = TeamMeta {
                name: raw_team.name.clone().unwrap_or_else(|| format!("Team {}", team.key())),
                code: raw_team
                    .code
                    .clone()
                    .or_else(|| raw_team.short_name.clone())
                    .unwrap_or_else(|| format!("T{}", team.key())),
            };
            for (id, pl) in &raw_team.pl {
                let shirt_number = pl
                    .shirt_number
                    .as_ref()
                    .map(Scalar::as_string)
                    .unwrap_or_default();
                let name = pl
                    .name
                    .clone()
                    .or_else(|| pl.scoreboard_name.clone())
                    .unwrap_or_else(|| format!("#{shirt_number}"));
                roster.push(RosterPlayer {
                    id: id.clone(),
                    name,
                    shirt_number,
                    team,
                    is_starter: pl.starter.as_ref().and_then(Scalar::as_u32) == Some(1),
                    stats_minutes: pl.s_minutes.clone(),
                });
            }
        }
        // deterministic roster order irrespective of feed map iteration
        roster.sort_by(|a, b| {
            (a.team, shirt_sort_key(&a.shirt_number), &a.id).cmp(&(
                b.team,
                shirt_sort_key(&b.shirt_number),
                &b.id,
            ))
        });
        // everything downstream keys players by shirt within a team, so
        // entries sharing a shirt (typically a blank shirtNumber) collapse
        // to the first in order rather than colliding later
        roster.dedup_by(|dup, kept| {
            if dup.team == kept.team && dup.shirt_number == kept.shirt_number {
                warn!(
                    "team {} lists {} under the same shirt {:?} as {}; collapsing",
                    dup.team.key(),
                    dup.id,
                    dup.shirt_number,
                    kept.id
                );
                true
            } else {
                false
            }
        });

        let events = normalize_events(&raw.pbp)?;
        debug!(
            "decoded {} events, {} roster entries",
            events.len(),
            roster.len()
        );
        Ok(GameLog {
            teams,
            roster,
            events,
        })
    }
}

fn shirt_sort_key(shirt: &str) -> (u32, String) {
    match shirt.trim().parse::<u32>() {
        Ok(num) => (num, String::new()),
        Err(_) => (u32::MAX, shirt.to_string()),
    }
}

/// Converts the raw play-by-play records into typed [`GameEvent`]s, sorted
/// by `(period, clock descending, sequence)`. The clock counts down within
/// a period, so a descending clock is chronological order; the feed
/// sequence number breaks ties.
pub fn normalize_events(pbp: &[RawEvent]) -> Result<Vec<GameEvent>, MalformedEvent> {
    let mut events = Vec::with_capacity(pbp.len());
    for raw in pbp {
        let sequence = raw.action_number.unwrap_or(0);
        let period = raw.period.ok_or(MalformedEvent::MissingField {
            sequence,
            field: "period",
        })?;
        let clock = raw.gt.as_deref().ok_or(MalformedEvent::MissingField {
            sequence,
            field: "gt",
        })?;
        let clock_seconds =
            parse_clock(clock).ok_or_else(|| MalformedEvent::UnparsableClock {
                sequence,
                clock: clock.to_string(),
            })?;
        let action_type = raw.action_type.as_deref().ok_or(MalformedEvent::MissingField {
            sequence,
            field: "actionType",
        })?;

        let team = raw.tno.and_then(TeamNo::from_tno);
        let player = raw
            .shirt_number
            .as_ref()
            .map(Scalar::as_string)
            .filter(|shirt| !shirt.is_empty());
        let kind = decode_kind(
            action_type,
            raw.sub_type.as_deref().unwrap_or(""),
            raw.success == Some(1),
            player.as_deref(),
        );

        events.push(GameEvent {
            period,
            clock_seconds,
            elapsed_seconds: 0,
            team,
            player,
            kind,
            sequence,
        });
    }

    events.sort_by(|a, b| {
        (a.period, b.clock_seconds, a.sequence).cmp(&(b.period, a.clock_seconds, b.sequence))
    });
    Ok(events)
}

/// Maps a raw action type to the typed event kind. Fails open: an action
/// type this crate has never heard of becomes [`EventKind::Other`], keeping
/// the decode boundary tolerant of feed evolution.
fn decode_kind(action_type: &str, sub_type: &str, success: bool, player: Option<&str>) -> EventKind {
    match action_type {
        "substitution" => match sub_type {
            "in" => EventKind::Substitution {
                player_in: player.map(str::to_string),
                player_out: None,
            },
            "out" => EventKind::Substitution {
                player_in: None,
                player_out: player.map(str::to_string),
            },
            _ => EventKind::Other,
        },
        "2pt" => EventKind::Score {
            points: 2,
            made: success,
        },
        "3pt" => EventKind::Score {
            points: 3,
            made: success,
        },
        "freethrow" => EventKind::Score {
            points: 1,
            made: success,
        },
        "rebound" => match sub_type {
            "offensive" => EventKind::Rebound { offensive: true },
            "defensive" => EventKind::Rebound { offensive: false },
            _ => EventKind::Other,
        },
        "assist" => EventKind::Assist,
        "steal" => EventKind::Steal,
        "block" => EventKind::Block,
        "turnover" => EventKind::Turnover,
        // technical fouls are not personal fouls
        "foul" => match sub_type {
            "technical" => EventKind::Other,
            _ => EventKind::Foul,
        },
        "period" => match sub_type {
            "start" => EventKind::PeriodStart,
            "end" => EventKind::PeriodEnd,
            _ => EventKind::Other,
        },
        _ => EventKind::Other,
    }
}

/// Parses a countdown game clock of the form `"MM:SS"` into seconds.
fn parse_clock(clock: &str) -> Option<u32> {
    let mut parts = clock.split(':');
    let minutes: u32 = parts.next()?.trim().parse().ok()?;
    let seconds: u32 = match parts.next() {
        Some(seconds) => seconds.trim().parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() || seconds >= 60 {
        return None;
    }
    Some(minutes * 60 + seconds)
}
