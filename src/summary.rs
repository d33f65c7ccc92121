//! The per-game orchestrator: decodes a raw document, replays it through
//! the rotation engine and assembles the [`GameResult`] tree consumed by
//! the site generator. Pure — no I/O, no process-wide state — so callers
//! may fan out over many games without synchronization.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::boxscore::{self, BoxStat};
use crate::data::{GameLog, MalformedEvent, RawGame};
use crate::domain::{Period, RosterPlayer, TeamNo};
use crate::minutes::{self, MinuteSlice};
use crate::periods::PeriodTable;
use crate::rating;
use crate::rotation;

#[derive(Debug, Serialize)]
pub struct TeamSummary {
    pub id: String,
    pub name: String,
    pub code: String,
    pub score: u16,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: String,
    pub name: String,
    pub shirt_number: String,
    pub is_starter: bool,
    pub total_seconds: u32,
    pub total_plus_minus: i32,
    pub game_stats: BoxStat,
    pub minutes: Vec<MinuteSlice>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub ortg: f64,
    pub drtg: f64,
    pub net_rating: f64,
}

/// The complete per-game result. The serialized shape is a compatibility
/// boundary: the visualization indexes `minutes` positionally and reads
/// the per-team maps under keys `"1"` and `"2"`, so field names, units and
/// keying must stay exactly as they are.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub game_id: String,
    pub team1: TeamSummary,
    pub team2: TeamSummary,
    pub periods: Vec<Period>,
    pub total_minutes: u32,
    #[serde(rename = "numOT")]
    pub num_ot: u8,
    pub players: BTreeMap<String, Vec<PlayerSummary>>,
    pub team_plus_minus: BTreeMap<String, Vec<i32>>,
    pub lineups: BTreeMap<String, Vec<Vec<String>>>,
    pub ratings: BTreeMap<String, RatingSummary>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Processes one raw game document end to end. Fails only on a malformed
/// event stream; lineup inconsistencies are repaired and logged instead.
pub fn analyze(raw: &RawGame, game_id: &str) -> Result<GameResult, MalformedEvent> {
    let log = GameLog::try_from(raw)?;
    Ok(analyze_log(log, game_id))
}

fn analyze_log(mut log: GameLog, game_id: &str) -> GameResult {
    let table = PeriodTable::from_events(&log.events);
    table.localize(&mut log.events);
    let total_minutes = table.total_minutes();

    let rotations = rotation::replay(&log.events, &log.roster, &table);
    let mut minutes = minutes::build(&log.events, &rotations, &log.roster, total_minutes);
    let minute_diffs = minutes::team_plus_minus(&log.events, total_minutes);
    let mut box_totals = boxscore::collect(&log.events);

    let mut players = BTreeMap::new();
    let mut team_plus_minus = BTreeMap::new();
    let mut lineups = BTreeMap::new();
    let mut ratings = BTreeMap::new();

    for team in [TeamNo::One, TeamNo::Two] {
        let mut summaries = Vec::new();
        for player in ordered_roster(&log, &rotations, team) {
            let stints = rotations.stints(team, &player.shirt_number);
            let player_rating = rating::rate_player(stints, &log.events);
            let slices = minutes[team.index()]
                .remove(&player.shirt_number)
                .unwrap_or_default();
            let total_plus_minus = slices
                .iter()
                .filter(|slice| slice.on_court)
                .map(|slice| slice.plus_minus)
                .sum();
            ratings.insert(
                format!("{}_{}", team.key(), player.shirt_number),
                RatingSummary {
                    ortg: round1(player_rating.ortg),
                    drtg: round1(player_rating.drtg),
                    net_rating: round1(player_rating.net_rating),
                },
            );
            summaries.push(PlayerSummary {
                id: player.id.clone(),
                name: player.name.clone(),
                shirt_number: player.shirt_number.clone(),
                is_starter: player.is_starter,
                total_seconds: rotations.total_seconds(team, &player.shirt_number),
                total_plus_minus,
                game_stats: box_totals[team.index()]
                    .remove(&player.shirt_number)
                    .unwrap_or_default(),
                minutes: slices,
            });
        }

        let team_lineups = (0..total_minutes)
            .map(|minute| {
                summaries
                    .iter()
                    .filter(|summary| summary.minutes[minute as usize].on_court)
                    .map(|summary| summary.name.clone())
                    .collect()
            })
            .collect();

        players.insert(team.key().to_string(), summaries);
        team_plus_minus.insert(team.key().to_string(), minute_diffs[team.index()].clone());
        lineups.insert(team.key().to_string(), team_lineups);
    }

    let [meta1, meta2] = log.teams;
    GameResult {
        game_id: game_id.to_string(),
        team1: TeamSummary {
            id: TeamNo::One.key().to_string(),
            name: meta1.name,
            code: meta1.code,
            score: rotations.final_score[TeamNo::One.index()],
        },
        team2: TeamSummary {
            id: TeamNo::Two.key().to_string(),
            name: meta2.name,
            code: meta2.code,
            score: rotations.final_score[TeamNo::Two.index()],
        },
        periods: table.labels(),
        total_minutes,
        num_ot: table.num_overtimes(),
        players,
        team_plus_minus,
        lineups,
        ratings,
    }
}

/// Starters first, then bench players who saw court time, each group by
/// total seconds descending. Bench players who never played are omitted.
fn ordered_roster<'a>(
    log: &'a GameLog,
    rotations: &rotation::Rotations,
    team: TeamNo,
) -> Vec<&'a RosterPlayer> {
    let mut ordered: Vec<&RosterPlayer> = log
        .roster_for(team)
        .filter(|player| {
            player.is_starter || rotations.total_seconds(team, &player.shirt_number) > 0
        })
        .collect();
    ordered.sort_by_key(|player| {
        (
            !player.is_starter,
            std::cmp::Reverse(rotations.total_seconds(team, &player.shirt_number)),
            player.shirt_number.clone(),
        )
    });
    ordered
}

#[cfg(test)]
mod tests;
